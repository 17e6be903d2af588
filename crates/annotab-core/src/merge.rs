//! Manifest overrides layered onto the annotation-derived columns and actions.
//!
//! Annotation elements keep their identity and order; the manifest can only
//! touch a fixed set of members on them. Manifest entries without an
//! annotation counterpart become custom elements, placed by their
//! `position` anchor or appended in key order.

use std::collections::HashSet;

use annotab_expr::compile;
use annotab_model::{
    Action, ActionKind, Column, ColumnKind, IssueCategory, IssueSeverity, ManifestAction,
    ManifestColumn, Placement, Position,
};
use tracing::debug;

use crate::actions::{AnnotationActions, selected_at_least_one};
use crate::context::{CompileContext, TableScope};
use crate::keys::property_alias;

/// Inserts custom elements into `items`.
///
/// Unanchored elements are appended first, in the order given. Anchored ones
/// are placed in repeated passes so an element may anchor on another custom
/// element; anchors that never appear leave the element appended at the end.
fn insert_positioned<T, K>(
    ctx: &CompileContext<'_>,
    items: &mut Vec<T>,
    custom: Vec<(T, Option<Position>)>,
    key: K,
) where
    K: Fn(&T) -> &str,
{
    let mut anchored: Vec<(T, String, Placement)> = Vec::new();
    for (item, position) in custom {
        match position.and_then(|position| position.anchor.map(|anchor| (anchor, position.placement))) {
            Some((anchor, placement)) => anchored.push((item, anchor, placement)),
            None => items.push(item),
        }
    }

    loop {
        let before = anchored.len();
        let mut waiting = Vec::with_capacity(anchored.len());
        for (item, anchor, placement) in anchored {
            match items.iter().position(|existing| key(existing) == anchor) {
                Some(index) => {
                    let at = match placement {
                        Placement::Before => index,
                        Placement::After => index + 1,
                    };
                    items.insert(at, item);
                }
                None => waiting.push((item, anchor, placement)),
            }
        }
        anchored = waiting;
        if anchored.is_empty() || anchored.len() == before {
            break;
        }
    }

    for (item, anchor, _) in anchored {
        ctx.report(
            IssueCategory::Manifest,
            IssueSeverity::Low,
            &format!("anchor {anchor} of {} does not exist", key(&item)),
            "UNKNOWN_ANCHOR",
        );
        items.push(item);
    }
}

/// Applies manifest action entries to the annotation actions.
pub fn merge_actions(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    annotation: AnnotationActions,
) -> Vec<Action> {
    let AnnotationActions {
        mut actions,
        hidden,
    } = annotation;
    let Some(control) = scope.control else {
        return actions;
    };

    let mut custom = Vec::new();
    for (key, entry) in &control.actions {
        if hidden.contains(key) {
            debug!(key = %key, "manifest entry targets a hidden annotation action");
            continue;
        }
        match actions.iter_mut().find(|action| &action.key == key) {
            Some(action) => override_action(action, entry),
            None => custom.push((custom_action(key, entry), entry.position.clone())),
        }
    }
    insert_positioned(ctx, &mut actions, custom, |action| action.key.as_str());
    actions
}

fn override_action(action: &mut Action, entry: &ManifestAction) {
    debug!(key = %action.key, "applying manifest action override");
    if entry.is_navigable.is_some() {
        action.is_navigable = entry.is_navigable;
    }
    if entry.enable_on_select.is_some() {
        action.enable_on_select = entry.enable_on_select;
    }
    if entry.enable_auto_scroll.is_some() {
        action.enable_auto_scroll = entry.enable_auto_scroll;
    }
    if let Some(enabled) = &entry.enabled {
        action.enabled = Some(enabled.to_binding());
    }
    if let Some(visible) = &entry.visible {
        action.visible = visible.to_binding();
    }
    if entry.default_values_extension_function.is_some() {
        action.default_values_extension_function = entry.default_values_extension_function.clone();
    }
    if entry.command.is_some() {
        action.command = entry.command.clone();
    }
    if action.requires_selection == Some(true) || entry.requires_selection == Some(true) {
        action.requires_selection = Some(true);
    }
}

fn custom_action(key: &str, entry: &ManifestAction) -> Action {
    let visible = entry
        .visible
        .as_ref()
        .map_or_else(|| "true".to_string(), |visible| visible.to_binding());
    let requires_selection = entry.requires_selection.unwrap_or(false);
    let mut action = Action::new(key, ActionKind::Default, visible);
    action.text = entry.text.clone();
    action.press = entry.press.clone();
    action.enabled = Some(match &entry.enabled {
        Some(enabled) => enabled.to_binding(),
        None if requires_selection => compile(&selected_at_least_one()),
        None => "true".to_string(),
    });
    action.requires_selection = Some(requires_selection);
    action.is_navigable = entry.is_navigable;
    action.enable_on_select = entry.enable_on_select;
    action.enable_auto_scroll = entry.enable_auto_scroll;
    action.default_values_extension_function = entry.default_values_extension_function.clone();
    action.command = entry.command.clone();
    action
}

/// Applies manifest column entries to the built columns.
pub fn merge_columns(ctx: &CompileContext<'_>, scope: &TableScope<'_>, columns: &mut Vec<Column>) {
    let Some(control) = scope.control else {
        return;
    };

    let mut custom = Vec::new();
    for (key, entry) in &control.columns {
        if let Some(column) = columns.iter_mut().find(|column| &column.key == key) {
            override_column(column, entry);
            continue;
        }
        if entry.template.is_none() {
            ctx.report(
                IssueCategory::Manifest,
                IssueSeverity::Low,
                &format!("manifest column {key} matches no annotation column"),
                "UNMATCHED_MANIFEST_COLUMN",
            );
            continue;
        }
        if columns.iter().any(|column| &column.name == key) {
            ctx.report(
                IssueCategory::Manifest,
                IssueSeverity::Low,
                &format!("custom column {key} clashes with an existing column name"),
                "DUPLICATE_CUSTOM_COLUMN",
            );
            continue;
        }
        let column = slot_column(ctx, columns, key, entry);
        custom.push((column, entry.position.clone()));
    }
    insert_positioned(ctx, columns, custom, |column| column.key.as_str());
}

fn override_column(column: &mut Column, entry: &ManifestColumn) {
    debug!(key = %column.key, "applying manifest column override");
    if entry.width.is_some() {
        column.width = entry.width.clone();
    }
    if entry.importance.is_some() {
        column.importance = entry.importance;
    }
    if entry.horizontal_align.is_some() {
        column.horizontal_align = entry.horizontal_align;
    }
    if let Some(availability) = entry.availability {
        column.availability = availability;
    }
    if entry.format_options.is_some() {
        column.format_options = entry.format_options.clone();
    }
    if entry.header.is_some() {
        column.header = entry.header.clone();
    }
}

/// Column name a custom column can reference for `path`: a plain column of
/// that name, or its `Property::` duplicate.
fn leaf_name(columns: &[Column], path: &str) -> Option<String> {
    if columns
        .iter()
        .any(|column| column.name == path && !column.is_composite())
    {
        return Some(path.to_string());
    }
    let alias = property_alias(path);
    columns
        .iter()
        .any(|column| column.name == alias && !column.is_composite())
        .then_some(alias)
}

fn slot_column(
    ctx: &CompileContext<'_>,
    columns: &[Column],
    key: &str,
    entry: &ManifestColumn,
) -> Column {
    let mut property_infos: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for path in &entry.properties {
        match leaf_name(columns, path) {
            Some(name) => {
                if seen.insert(name.clone()) {
                    property_infos.push(name);
                }
            }
            None => ctx.report(
                IssueCategory::Manifest,
                IssueSeverity::Low,
                &format!("custom column {key} references unknown property {path}"),
                "UNKNOWN_CUSTOM_COLUMN_PROPERTY",
            ),
        }
    }

    let mut column = Column::new(key, key, ColumnKind::Slot);
    column.label = entry.header.clone();
    column.header = entry.header.clone();
    column.width = entry.width.clone();
    column.template = entry.template.clone();
    column.horizontal_align = entry.horizontal_align;
    column.importance = entry.importance;
    column.availability = entry.availability.unwrap_or_default();
    column.format_options = entry.format_options.clone();
    column.sortable = !property_infos.is_empty();
    column.property_infos = property_infos;
    debug!(key, "adding custom column");
    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_model::{BindingValue, DiagnosticsCollector, ManifestSettings, ServiceMetadata};

    use crate::context::CompileOptions;

    fn action(key: &str) -> Action {
        Action::new(key, ActionKind::DataFieldForAction, "true")
    }

    fn position(anchor: &str, placement: Placement) -> Option<Position> {
        Some(Position {
            anchor: Some(anchor.to_string()),
            placement,
        })
    }

    fn with_context<R>(run: impl FnOnce(&CompileContext<'_>, &DiagnosticsCollector) -> R) -> R {
        let service = ServiceMetadata::default();
        let manifest = ManifestSettings::default();
        let diagnostics = DiagnosticsCollector::new();
        let options = CompileOptions::default();
        let ctx = CompileContext::new(&service, &manifest, &diagnostics, &options);
        run(&ctx, &diagnostics)
    }

    #[test]
    fn positions_chain_on_custom_anchors() {
        with_context(|ctx, diagnostics| {
            let mut items = vec![action("A"), action("B")];
            let custom = vec![
                (action("Y"), position("X", Placement::After)),
                (action("X"), position("A", Placement::Before)),
                (action("Z"), None),
                (action("Lost"), position("Nowhere", Placement::After)),
            ];
            insert_positioned(ctx, &mut items, custom, |action| action.key.as_str());
            let keys: Vec<&str> = items.iter().map(|action| action.key.as_str()).collect();
            assert_eq!(keys, vec!["X", "Y", "A", "B", "Z", "Lost"]);
            assert_eq!(diagnostics.issues().len(), 1);
        });
    }

    #[test]
    fn override_keeps_identity_and_forces_selection() {
        let mut target = action("DataFieldForAction::approve");
        target.requires_selection = Some(false);
        target.text = Some("Approve".to_string());
        let entry = ManifestAction {
            text: Some("Ignored".to_string()),
            visible: Some(BindingValue::Bool(false)),
            requires_selection: Some(true),
            command: Some("Approve".to_string()),
            ..ManifestAction::default()
        };
        override_action(&mut target, &entry);
        assert_eq!(target.text.as_deref(), Some("Approve"));
        assert_eq!(target.visible, "false");
        assert_eq!(target.requires_selection, Some(true));
        assert_eq!(target.command.as_deref(), Some("Approve"));
        assert_eq!(target.kind, ActionKind::DataFieldForAction);
    }

    #[test]
    fn custom_action_defaults() {
        let entry = ManifestAction {
            text: Some("Export".to_string()),
            press: Some("handler.export".to_string()),
            requires_selection: Some(true),
            ..ManifestAction::default()
        };
        let action = custom_action("Export", &entry);
        assert_eq!(action.kind, ActionKind::Default);
        assert_eq!(action.visible, "true");
        assert_eq!(
            action.enabled.as_deref(),
            Some("{= %{internal>numberOfSelectedContexts} >= 1}")
        );
        let plain = custom_action("Help", &ManifestAction::default());
        assert_eq!(plain.enabled.as_deref(), Some("true"));
        assert_eq!(plain.requires_selection, Some(false));
    }

    #[test]
    fn slot_column_references_leaf_columns_only() {
        with_context(|ctx, diagnostics| {
            let mut composite = Column::new("DataField::Price", "Price", ColumnKind::Annotation);
            composite.property_infos = vec!["Property::Price".to_string()];
            let columns = vec![
                composite,
                Column::new("Property::Price", "Property::Price", ColumnKind::Default),
                Column::new("Property::Currency", "Currency", ColumnKind::Default),
            ];
            let entry = ManifestColumn {
                header: Some("Amount".to_string()),
                template: Some("app.fragments.Amount".to_string()),
                properties: vec![
                    "Price".to_string(),
                    "Currency".to_string(),
                    "Missing".to_string(),
                ],
                ..ManifestColumn::default()
            };
            let column = slot_column(ctx, &columns, "Amount", &entry);
            assert_eq!(column.kind, ColumnKind::Slot);
            assert_eq!(column.property_infos, vec!["Property::Price", "Currency"]);
            assert!(column.sortable);
            assert_eq!(diagnostics.issues().len(), 1);
        });
    }
}
