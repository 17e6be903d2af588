use annotab_expr::{Expression, compile, or};
use annotab_model::{
    AnnotationTarget, Availability, Column, ColumnKind, DataFieldAbstract, DataFieldForAnnotation,
    DataPoint, FieldGroup, FormatOptions, Importance, IssueCategory, IssueSeverity,
    ResolvedAnnotation,
};
use tracing::debug;

use super::importance::{field_group_importance, value_importance};
use super::property::unit_of;
use super::visibility::{field_group_visibility, field_visibility, shown};
use super::{
    ColumnArena, ColumnOrigin, draft_indicator, group_of, is_groupable, is_sortable,
    semantic_object_path,
};
use crate::context::{CompileContext, TableScope};
use crate::export::{composite_export, property_export};
use crate::keys::data_field_key;
use crate::labels::{LabelContext, field_label};
use crate::properties::PropertyCollector;
use crate::typing::type_config;

/// Builds one column per renderable line item record, in line item order.
///
/// Action records become toolbar actions instead; unknown record types are
/// skipped. A record whose name is already taken by an earlier record is
/// dropped.
pub fn line_item_columns(ctx: &CompileContext<'_>, scope: &TableScope<'_>, arena: &mut ColumnArena) {
    let collector = PropertyCollector::new(ctx.metadata, scope.entity_type);
    for (index, field) in scope.line_item.iter().enumerate() {
        let built = match field {
            DataFieldAbstract::DataFieldForAction(_)
            | DataFieldAbstract::DataFieldForIntentBasedNavigation(_) => continue,
            DataFieldAbstract::Unknown => {
                debug!(index, "skipping line item record of unknown type");
                continue;
            }
            DataFieldAbstract::DataFieldForAnnotation(annotation) => {
                annotation_column(ctx, scope, field, annotation)
            }
            other => value_column(ctx, scope, other),
        };
        let Some(mut column) = built else {
            continue;
        };
        column.annotation_path = Some(format!("{}/{index}", scope.line_item_path));
        column.is_part_of_line_item = true;

        let related = collector.collect_field(field);
        if column.export_settings.is_none() && !related.properties.is_empty() {
            column.export_settings = Some(composite_export(
                column.label.as_deref(),
                related.properties.len(),
            ));
        }
        debug!(key = %column.key, dependencies = related.properties.len(), "line item column");
        arena.insert(column, ColumnOrigin::LineItem, related);
    }
}

fn hidden_availability(field: &DataFieldAbstract) -> Availability {
    if field.is_statically_hidden() {
        Availability::Hidden
    } else {
        Availability::Default
    }
}

fn value_column(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    field: &DataFieldAbstract,
) -> Option<Column> {
    let path = field.value_path()?;
    let Some(target) = ctx.metadata.property(scope.entity_type, path) else {
        ctx.report(
            IssueCategory::Annotation,
            IssueSeverity::Low,
            &format!("line item value {path} does not resolve on {}", scope.entity_type.name),
            "UNRESOLVED_FIELD_VALUE",
        );
        return None;
    };
    if !target.property.is_primitive() {
        ctx.report(
            IssueCategory::Annotation,
            IssueSeverity::Low,
            &format!("line item value {path} is not a primitive property"),
            "COMPLEX_FIELD_VALUE",
        );
        return None;
    }
    let property = target.property;
    let label = field_label(field, Some(property), LabelContext::Column);
    let sortable = is_sortable(scope, &target);
    let (group, group_label) = group_of(&target);
    let visible = field_visibility(
        field,
        Some((property, target.navigation_prefix())),
        scope.is_analytics(),
    );

    let mut column = Column::new(data_field_key(field)?, path, ColumnKind::Annotation);
    column.relative_path = Some(path.to_string());
    column.export_settings = Some(property_export(&target, label.as_deref()));
    column.label = label;
    column.group = group;
    column.group_label = group_label;
    column.sortable = sortable;
    column.is_groupable = is_groupable(scope, path, sortable);
    column.is_key = !path.contains('/') && scope.entity_type.is_key(path);
    column.availability = if property.is_statically_hidden() {
        Availability::Hidden
    } else {
        hidden_availability(field)
    };
    column.type_config = type_config(property);
    column.importance = Some(value_importance(scope.entity_type, field, path));
    column.semantic_object_path = semantic_object_path(&target);
    column.format_options = draft_indicator(scope, path);
    column.visible = Some(compile(&visible));
    column.unit = unit_of(&target);
    Some(column)
}

fn annotation_column(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    field: &DataFieldAbstract,
    annotation: &DataFieldForAnnotation,
) -> Option<Column> {
    let target = &annotation.target.value;
    let path = match annotation.target.parse() {
        Ok(path) => path,
        Err(error) => {
            ctx.report(
                IssueCategory::Annotation,
                IssueSeverity::Low,
                &error.to_string(),
                "INVALID_ANNOTATION_PATH",
            );
            return None;
        }
    };
    let Some(resolved) = ctx.metadata.annotations_by_term(scope.entity_type, &path) else {
        ctx.report(
            IssueCategory::Annotation,
            IssueSeverity::Low,
            &format!("annotation {target} does not resolve on {}", scope.entity_type.name),
            "UNRESOLVED_ANNOTATION",
        );
        return None;
    };
    let key = data_field_key(field)?;
    match resolved.target {
        AnnotationTarget::FieldGroup(group) => Some(field_group_column(
            ctx,
            scope,
            field,
            Column::new(key, target.as_str(), ColumnKind::Annotation),
            group,
            &resolved,
            path.qualifier.as_deref(),
        )),
        AnnotationTarget::DataPoint(data_point) => data_point_column(
            ctx,
            scope,
            field,
            Column::new(key, target.as_str(), ColumnKind::Annotation),
            data_point,
            &resolved.navigation_prefix,
        ),
        AnnotationTarget::LineItem(_) | AnnotationTarget::PresentationVariant(_) => {
            debug!(target = %target, "annotation target cannot be shown as a column");
            None
        }
    }
}

fn field_group_column(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    field: &DataFieldAbstract,
    mut column: Column,
    group: &FieldGroup,
    resolved: &ResolvedAnnotation<'_>,
    qualifier: Option<&str>,
) -> Column {
    let prefix = resolved.navigation_prefix.as_str();
    let mut members: Vec<Expression> = Vec::new();
    let mut draft_key: Option<String> = None;
    for member in &group.data {
        match member {
            DataFieldAbstract::DataFieldForAction(_)
            | DataFieldAbstract::DataFieldForIntentBasedNavigation(_)
            | DataFieldAbstract::Unknown => {}
            DataFieldAbstract::DataFieldForAnnotation(_) => {
                let hidden = member.annotations().and_then(|a| a.hidden.as_ref());
                members.push(shown(hidden, prefix));
            }
            other => {
                let Some(value) = other.value_path() else {
                    continue;
                };
                let full = format!("{prefix}{value}");
                let property = ctx
                    .metadata
                    .property(scope.entity_type, &full)
                    .map(|target| (target.property, target.navigation_prefix()));
                members.push(field_visibility(other, property, false));
                if draft_key.is_none() && prefix.is_empty() && scope.entity_type.is_semantic_key(value)
                {
                    draft_key = Some(value.to_string());
                }
            }
        }
    }
    let members = or(members);

    let label = field
        .label()
        .or(group.label.as_deref())
        .map(str::to_string)
        .or_else(|| match group.data.as_slice() {
            [single] => {
                let property = single
                    .value_path()
                    .and_then(|value| resolved.entity_type.property(value));
                field_label(single, property, LabelContext::FieldGroupMember)
            }
            _ => None,
        });

    column.label = label;
    column.availability = hidden_availability(field);
    column.importance = Some(field_group_importance(
        scope.entity_type,
        field,
        group,
        prefix,
    ));
    column.visible = Some(compile(&field_group_visibility(field, &members)));
    column.field_group_hidden_expressions = Some(compile(&members));
    column.format_options = draft_key.map(|path| FormatOptions {
        has_draft_indicator: Some(true),
        field_group_draft_indicator_property_path: Some(path),
        field_group_name: Some(qualifier.unwrap_or_default().to_string()),
        ..FormatOptions::default()
    });
    column
}

fn data_point_column(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    field: &DataFieldAbstract,
    mut column: Column,
    data_point: &DataPoint,
    prefix: &str,
) -> Option<Column> {
    let value = format!("{prefix}{}", data_point.value.as_str());
    let Some(target) = ctx.metadata.property(scope.entity_type, &value) else {
        ctx.report(
            IssueCategory::Annotation,
            IssueSeverity::Low,
            &format!("data point value {value} does not resolve on {}", scope.entity_type.name),
            "UNRESOLVED_DATA_POINT",
        );
        return None;
    };
    let property = target.property;
    let label = field
        .label()
        .or(data_point.title.as_deref())
        .map(str::to_string)
        .or_else(|| field_label(field, Some(property), LabelContext::Column));
    let sortable = is_sortable(scope, &target);
    let (group, group_label) = group_of(&target);
    let visible = field_visibility(
        field,
        Some((property, target.navigation_prefix())),
        scope.is_analytics(),
    );

    column.relative_path = Some(value.clone());
    column.export_settings = Some(property_export(&target, label.as_deref()));
    column.label = label;
    column.group = group;
    column.group_label = group_label;
    column.sortable = sortable;
    column.is_groupable = is_groupable(scope, &value, sortable);
    column.availability = hidden_availability(field);
    column.type_config = type_config(property);
    // The semantic key does not raise a data point.
    column.importance = Some(field.importance().unwrap_or(Importance::None));
    column.visible = Some(compile(&visible));
    column.unit = unit_of(&target);
    Some(column)
}
