use annotab_model::{Availability, Column, ColumnKind, Dynamic, PropertyTarget};
use tracing::debug;

use super::{
    ColumnArena, ColumnOrigin, draft_indicator, group_of, is_groupable, is_sortable,
    semantic_object_path,
};
use crate::context::{CompileContext, TableScope};
use crate::export::property_export;
use crate::keys::property_key;
use crate::labels::property_label;
use crate::properties::{CollectMode, PropertyCollector};
use crate::typing::type_config;

/// Column for a bare property, shared by raw and hidden related columns.
fn property_column(scope: &TableScope<'_>, target: &PropertyTarget<'_>, name: &str, key: String) -> Column {
    let property = target.property;
    let label = property_label(property);
    let sortable = is_sortable(scope, target);
    let (group, group_label) = group_of(target);

    let mut column = Column::new(key, name, ColumnKind::Default);
    column.relative_path = Some(target.path.to_string());
    column.export_settings = Some(property_export(target, Some(&label)));
    column.label = Some(label);
    column.group = group;
    column.group_label = group_label;
    column.sortable = sortable;
    column.is_groupable = is_groupable(scope, target.path, sortable);
    column.is_key = !target.path.contains('/') && scope.entity_type.is_key(target.path);
    column.type_config = type_config(property);
    column.semantic_object_path = semantic_object_path(target);
    column.format_options = draft_indicator(scope, target.path);
    column.unit = unit_of(target);
    column
}

/// Currency or unit shown next to the value, as a path or a fixed code.
pub(crate) fn unit_of(target: &PropertyTarget<'_>) -> Option<String> {
    let annotations = &target.property.annotations;
    let unit = annotations.iso_currency.as_ref().or(annotations.unit.as_ref())?;
    Some(match unit {
        Dynamic::Path(path) => format!("{}{}", target.navigation_prefix(), path.as_str()),
        Dynamic::Static(code) => code.clone(),
    })
}

/// One `Adaptation` column for every primitive property not yet shown.
///
/// A `#TextOnly` property also brings its text property in as a separate,
/// non-sortable column.
pub fn property_columns(ctx: &CompileContext<'_>, scope: &TableScope<'_>, arena: &mut ColumnArena) {
    let collector = PropertyCollector::new(ctx.metadata, scope.entity_type);
    for property in &scope.entity_type.properties {
        if !property.is_primitive() || arena.contains_name(&property.name) {
            continue;
        }
        let Some(target) = ctx.metadata.property(scope.entity_type, &property.name) else {
            continue;
        };
        let related = collector.collect_property(&property.name, CollectMode::Property);
        let text_only = related.text_only.clone();

        let mut column = property_column(scope, &target, &property.name, property_key(&property.name));
        column.availability = if property.is_statically_hidden() {
            Availability::Hidden
        } else {
            Availability::Adaptation
        };
        if arena.is_text_only(&property.name) {
            column.sortable = false;
            column.is_groupable = false;
        }
        arena.insert(column, ColumnOrigin::Property, related);

        for text in text_only {
            if arena.contains_name(&text) {
                continue;
            }
            let Some(text_target) = ctx.metadata.property(scope.entity_type, &text) else {
                continue;
            };
            let mut column = property_column(scope, &text_target, &text, property_key(&text));
            column.sortable = false;
            column.is_groupable = false;
            column.availability = if text_target.property.is_statically_hidden() {
                Availability::Hidden
            } else {
                Availability::Adaptation
            };
            debug!(text = %text, "adding text column for text-only property");
            arena.insert(column, ColumnOrigin::Property, Default::default());
        }
    }
}

/// Hidden column standing in for a dependency of another column.
pub fn related_column(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    path: &str,
    name: &str,
    key: String,
    text_only: bool,
) -> Option<Column> {
    let target = ctx.metadata.property(scope.entity_type, path)?;
    let mut column = property_column(scope, &target, name, key);
    column.availability = Availability::Hidden;
    if text_only {
        column.sortable = false;
        column.is_groupable = false;
    }
    Some(column)
}
