//! Toolbar actions derived from line item action records.

use std::collections::BTreeSet;

use annotab_expr::paths::number_of_selected_contexts;
use annotab_expr::{Expression, and, compile, constant, equal, greater_or_equal, or, not, path};
use annotab_model::{
    Action, ActionDefinition, ActionKind, DataFieldAbstract, DataFieldForAction,
    DataFieldForIntentBasedNavigation, Dynamic, DynamicBool, EntityType, IssueCategory,
    IssueSeverity,
};
use tracing::debug;

use crate::columns::visibility::shown;
use crate::context::{CompileContext, TableScope};
use crate::keys::data_field_key;

const COPY_TEXT: &str = "Copy";

/// Actions built from the line item, plus the keys of records hidden outright.
#[derive(Debug, Clone, Default)]
pub struct AnnotationActions {
    pub actions: Vec<Action>,
    /// Statically hidden records; they never show and the manifest cannot revive them.
    pub hidden: BTreeSet<String>,
}

/// Enabled while exactly `count` rows are selected.
fn selected_exactly(count: u32) -> Expression {
    equal(number_of_selected_contexts(), constant(count))
}

/// Enabled while at least one row is selected.
pub(crate) fn selected_at_least_one() -> Expression {
    greater_or_equal(number_of_selected_contexts(), constant(1u32))
}

/// Operations whose availability cannot be evaluated against the selected
/// rows: unbound ones, collection-bound ones, and overloads bound to another
/// entity type. Their `enabled` state is computed up front.
pub fn needs_precomputed_enablement(action: &ActionDefinition, entity_type: &EntityType) -> bool {
    if !action.is_bound || action.is_static {
        return true;
    }
    action.source_type.as_deref().is_some_and(|source| {
        source != entity_type.name && source != entity_type.short_name()
    })
}

/// `Core.OperationAvailable` as an expression; absent means available.
pub fn operation_available(action: &ActionDefinition) -> Expression {
    match &action.annotations.operation_available {
        None => constant(true),
        Some(Dynamic::Static(value)) => constant(*value),
        Some(Dynamic::Path(_)) => match action.operation_available_path() {
            Some(available) => path(available),
            None => constant(true),
        },
    }
}

/// Whether the action works on selected rows.
pub fn requires_context(action: &ActionDefinition) -> bool {
    action.is_bound && !action.is_static
}

/// Builds the copy action and one action per visible action record.
pub fn annotation_actions(ctx: &CompileContext<'_>, scope: &TableScope<'_>) -> AnnotationActions {
    let mut result = AnnotationActions::default();
    let mut copy_seen = false;
    let mut pushed = BTreeSet::new();
    for (index, field) in scope.line_item.iter().enumerate() {
        if !field.is_action() {
            continue;
        }
        let Some(key) = data_field_key(field) else {
            continue;
        };
        if pushed.contains(&key) {
            debug!(key = %key, "repeated action record skipped");
            continue;
        }
        let annotation_path = format!("{}/{index}", scope.line_item_path);
        let is_copy = field
            .annotations()
            .and_then(|annotations| annotations.is_copy_action)
            .unwrap_or(false);
        if is_copy && let DataFieldAbstract::DataFieldForAction(record) = field {
            if !copy_seen {
                copy_seen = true;
                pushed.insert(key.clone());
                result
                    .actions
                    .push(copy_action(key, annotation_path, record));
            }
            continue;
        }
        if field.is_statically_hidden() {
            debug!(key = %key, "action record statically hidden");
            result.hidden.insert(key);
            continue;
        }
        let action = match field {
            DataFieldAbstract::DataFieldForAction(record) => {
                if record.inline || record.determining {
                    continue;
                }
                for_action(ctx, scope, key, annotation_path, record)
            }
            DataFieldAbstract::DataFieldForIntentBasedNavigation(record) => {
                if record.inline || record.determining {
                    continue;
                }
                for_navigation(key, annotation_path, record)
            }
            _ => continue,
        };
        pushed.insert(action.key.clone());
        result.actions.push(action);
    }
    result
}

fn record_hidden(hidden: Option<&DynamicBool>) -> String {
    compile(&shown(hidden, ""))
}

fn copy_action(key: String, annotation_path: String, record: &DataFieldForAction) -> Action {
    let mut action = Action::new(
        key,
        ActionKind::Copy,
        record_hidden(record.annotations.hidden.as_ref()),
    );
    action.annotation_path = Some(annotation_path);
    action.text = Some(record.label.clone().unwrap_or_else(|| COPY_TEXT.to_string()));
    action.enabled = Some(compile(&selected_exactly(1)));
    action.is_navigable = Some(true);
    action.requires_selection = Some(true);
    action
}

fn for_action(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    key: String,
    annotation_path: String,
    record: &DataFieldForAction,
) -> Action {
    let mut action = Action::new(
        key,
        ActionKind::DataFieldForAction,
        record_hidden(record.annotations.hidden.as_ref()),
    );
    action.annotation_path = Some(annotation_path);
    action.text = record.label.clone();
    action.is_navigable = Some(true);
    match ctx.metadata.action(&record.action) {
        Some(definition) => {
            action.requires_selection = Some(requires_context(definition));
            if needs_precomputed_enablement(definition, scope.entity_type) {
                action.enabled = Some(compile(&equal(
                    operation_available(definition),
                    constant(true),
                )));
            }
        }
        None => {
            ctx.report(
                IssueCategory::Annotation,
                IssueSeverity::Low,
                &format!("action {} is not defined in the service", record.action),
                "UNKNOWN_ACTION",
            );
            action.requires_selection = Some(false);
            action.enabled = Some(compile(&constant(true)));
        }
    }
    action
}

fn for_navigation(
    key: String,
    annotation_path: String,
    record: &DataFieldForIntentBasedNavigation,
) -> Action {
    let mut action = Action::new(
        key,
        ActionKind::DataFieldForIntentBasedNavigation,
        record_hidden(record.annotations.hidden.as_ref()),
    );
    action.annotation_path = Some(annotation_path);
    action.text = record.label.clone();
    let needs_context = match &record.requires_context {
        None => constant(false),
        Some(Dynamic::Static(value)) => constant(*value),
        Some(Dynamic::Path(required)) => equal(path(required.as_str()), constant(true)),
    };
    let available = match &record.navigation_available {
        None => constant(true),
        Some(Dynamic::Static(value)) => constant(*value),
        Some(Dynamic::Path(available)) => equal(path(available.as_str()), constant(true)),
    };
    action.requires_selection = Some(!needs_context.is_false());
    action.enabled = Some(compile(&and([
        available,
        or([not(needs_context), selected_at_least_one()]),
    ])));
    action
}
