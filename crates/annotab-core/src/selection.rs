//! Table selection mode.
//!
//! The mode is a literal when it can be decided at compile time and a
//! binding expression otherwise. Rules are tried in order and the first that
//! applies decides:
//!
//! 1. manifest `None` while delete is possible
//! 2. a context action is always visible in the toolbar
//! 3. no action needs a selected row, but delete or mass edit is possible
//! 4. otherwise, gated on the visibility of the context actions

use annotab_expr::paths::is_editable;
use annotab_expr::{Expression, Value, and, compile, constant, if_else, or};
use annotab_model::{SelectionMode, SelectionModeSetting, SelectionModeValue};

/// Everything the selection mode depends on.
#[derive(Debug, Clone)]
pub struct SelectionInputs {
    pub manifest_mode: Option<SelectionModeSetting>,
    /// Rows come straight from an entity set (list report) rather than a navigation.
    pub is_entity_set: bool,
    /// `Capabilities.DeleteRestrictions` is not statically false.
    pub deletable: bool,
    pub delete_visibility: Expression,
    pub mass_edit_visibility: Expression,
    /// Some action needing a selected row is visible without condition.
    pub context_action_always_visible: bool,
    /// Visibility of every visible action that needs a selected row.
    pub context_action_visibilities: Vec<Expression>,
}

fn mode_constant(mode: SelectionModeValue) -> Expression {
    constant(mode.as_str())
}

fn into_selection_mode(expression: &Expression) -> SelectionMode {
    match expression {
        Expression::Constant(Value::String(text)) => match text.as_str() {
            "None" => SelectionMode::Literal(SelectionModeValue::None),
            "Single" => SelectionMode::Literal(SelectionModeValue::Single),
            "Multi" => SelectionMode::Literal(SelectionModeValue::Multi),
            _ => SelectionMode::Expression(compile(expression)),
        },
        other => SelectionMode::Expression(compile(other)),
    }
}

pub fn resolve_selection_mode(inputs: &SelectionInputs) -> SelectionMode {
    into_selection_mode(&selection_expression(inputs))
}

fn selection_expression(inputs: &SelectionInputs) -> Expression {
    let delete_possible = !inputs.delete_visibility.is_false();
    let mass_edit = !inputs.mass_edit_visibility.is_false();
    let none = mode_constant(SelectionModeValue::None);
    let multi = mode_constant(SelectionModeValue::Multi);
    let edit_gate = || {
        and([
            is_editable(),
            or([
                inputs.delete_visibility.clone(),
                inputs.mass_edit_visibility.clone(),
            ]),
        ])
    };

    if inputs.manifest_mode == Some(SelectionModeSetting::None) && delete_possible {
        let fallback = if inputs.is_entity_set {
            if_else(inputs.delete_visibility.clone(), multi.clone(), none.clone())
        } else {
            none.clone()
        };
        return if_else(edit_gate(), multi, fallback);
    }

    let mut mode = match inputs.manifest_mode {
        Some(SelectionModeSetting::None) => SelectionModeValue::None,
        Some(SelectionModeSetting::Single) => SelectionModeValue::Single,
        Some(SelectionModeSetting::Multi | SelectionModeSetting::Auto) | None => {
            SelectionModeValue::Multi
        }
    };
    if mass_edit && mode != SelectionModeValue::Single {
        mode = SelectionModeValue::Multi;
    }
    let mode = mode_constant(mode);

    if inputs.context_action_always_visible {
        return mode;
    }

    let context_visible = || or(inputs.context_action_visibilities.iter().cloned());
    if inputs.context_action_visibilities.is_empty() && (delete_possible || mass_edit) {
        return if inputs.is_entity_set {
            if inputs.deletable || mass_edit {
                mode
            } else {
                none
            }
        } else if inputs.deletable || mass_edit {
            if_else(edit_gate(), mode, none)
        } else {
            none
        };
    }

    if inputs.is_entity_set {
        if delete_possible || mass_edit {
            mode
        } else {
            if_else(context_visible(), mode, none)
        }
    } else if inputs.deletable || mass_edit {
        let outside_edit = if_else(context_visible(), mode.clone(), none);
        if_else(edit_gate(), mode, outside_edit)
    } else {
        if_else(context_visible(), mode, none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_expr::path;

    fn inputs() -> SelectionInputs {
        SelectionInputs {
            manifest_mode: None,
            is_entity_set: true,
            deletable: true,
            delete_visibility: constant(true),
            mass_edit_visibility: constant(false),
            context_action_always_visible: false,
            context_action_visibilities: Vec::new(),
        }
    }

    #[test]
    fn deletable_entity_set_defaults_to_multi() {
        assert_eq!(
            resolve_selection_mode(&inputs()),
            SelectionMode::Literal(SelectionModeValue::Multi)
        );
    }

    #[test]
    fn nothing_to_select_for_is_none() {
        let inputs = SelectionInputs {
            deletable: false,
            delete_visibility: constant(false),
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Literal(SelectionModeValue::None)
        );
    }

    #[test]
    fn manifest_single_is_kept() {
        let inputs = SelectionInputs {
            manifest_mode: Some(SelectionModeSetting::Single),
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Literal(SelectionModeValue::Single)
        );
    }

    #[test]
    fn always_visible_context_action_keeps_static_mode() {
        let inputs = SelectionInputs {
            is_entity_set: false,
            deletable: false,
            delete_visibility: constant(false),
            context_action_always_visible: true,
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Literal(SelectionModeValue::Multi)
        );
    }

    #[test]
    fn navigation_table_gates_on_edit_mode() {
        let inputs = SelectionInputs {
            is_entity_set: false,
            delete_visibility: path("DeleteVisible"),
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Expression(
                "{= (%{ui>/isEditable} && %{DeleteVisible}) ? 'Multi' : 'None'}".to_string()
            )
        );
    }

    #[test]
    fn context_actions_decide_outside_edit_mode() {
        let inputs = SelectionInputs {
            is_entity_set: true,
            deletable: false,
            delete_visibility: constant(false),
            context_action_visibilities: vec![path("CanApprove")],
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Expression("{= %{CanApprove} ? 'Multi' : 'None'}".to_string())
        );
    }

    #[test]
    fn manifest_none_with_delete_is_an_expression() {
        let inputs = SelectionInputs {
            manifest_mode: Some(SelectionModeSetting::None),
            is_entity_set: false,
            delete_visibility: path("DeleteVisible"),
            mass_edit_visibility: path("MassEditVisible"),
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Expression(
                "{= (%{ui>/isEditable} && (%{DeleteVisible} || %{MassEditVisible})) ? 'Multi' : 'None'}"
                    .to_string()
            )
        );
    }

    #[test]
    fn manifest_none_on_entity_set_falls_back_to_delete_visibility() {
        let inputs = SelectionInputs {
            manifest_mode: Some(SelectionModeSetting::None),
            delete_visibility: path("DeleteVisible"),
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Expression(
                "{= (%{ui>/isEditable} && %{DeleteVisible}) ? 'Multi' : (%{DeleteVisible} ? 'Multi' : 'None')}"
                    .to_string()
            )
        );
    }

    #[test]
    fn deletable_navigation_table_with_context_actions() {
        let inputs = SelectionInputs {
            is_entity_set: false,
            delete_visibility: path("DeleteVisible"),
            context_action_visibilities: vec![path("CanApprove")],
            ..inputs()
        };
        assert_eq!(
            resolve_selection_mode(&inputs),
            SelectionMode::Expression(
                "{= (%{ui>/isEditable} && %{DeleteVisible}) ? 'Multi' : (%{CanApprove} ? 'Multi' : 'None')}"
                    .to_string()
            )
        );
    }
}
