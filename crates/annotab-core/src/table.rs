//! Table compilation entry point.

use annotab_expr::{Expression, binding};
use annotab_model::{
    Action, AnnotationPath, AnnotationTarget, EntitySet, MetadataAccessor, TableAnnotationConfiguration,
    TableVisualization, Term,
};
use tracing::{debug, info_span};

use crate::actions::annotation_actions;
use crate::analytics::apply_analytics;
use crate::columns::{ColumnArena, line_item_columns, property_columns, related_column};
use crate::config::{
    aggregate_conditions, create_behavior, group_conditions, operation_availability,
    operation_visibility, p13n_mode, presentation_variant, row_configuration, sort_conditions,
    threshold,
};
use crate::context::{CompileContext, TableScope};
use crate::control::{control_configuration, resolve_table_type};
use crate::error::{CompileError, Result};
use crate::keys::sanitize;
use crate::merge::{merge_actions, merge_columns};
use crate::selection::{SelectionInputs, resolve_selection_mode};

/// Which table to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest {
    pub entity_set: String,
    /// Navigation from the entity set to the rows; empty for a list report.
    pub navigation_path: String,
    /// Line item relative to the row entity type.
    pub line_item: AnnotationPath,
    pub presentation_variant: Option<AnnotationPath>,
}

impl TableRequest {
    /// Unqualified line item of an entity set.
    pub fn new(entity_set: impl Into<String>) -> Self {
        Self {
            entity_set: entity_set.into(),
            navigation_path: String::new(),
            line_item: AnnotationPath::new(Term::LineItem, None),
            presentation_variant: None,
        }
    }

    pub fn with_navigation_path(mut self, navigation_path: impl Into<String>) -> Self {
        self.navigation_path = navigation_path.into();
        self
    }

    pub fn with_line_item(mut self, line_item: AnnotationPath) -> Self {
        self.line_item = line_item;
        self
    }

    pub fn with_presentation_variant(mut self, presentation_variant: AnnotationPath) -> Self {
        self.presentation_variant = Some(presentation_variant);
        self
    }
}

/// Entity set the rows live in, following navigation property bindings.
/// Falls back to the last set reached when a binding is missing.
fn target_set<'a>(
    metadata: &'a dyn MetadataAccessor,
    entity_set: &'a EntitySet,
    navigation_path: &str,
) -> &'a EntitySet {
    let mut current = entity_set;
    for segment in navigation_path.split('/').filter(|segment| !segment.is_empty()) {
        let Some(next) = current
            .navigation_property_bindings
            .get(segment)
            .and_then(|name| metadata.entity_set(name))
        else {
            break;
        };
        current = next;
    }
    current
}

fn resolve_scope<'a>(ctx: &CompileContext<'a>, request: &TableRequest) -> Result<TableScope<'a>> {
    let metadata = ctx.metadata;
    let entity_set = metadata
        .entity_set(&request.entity_set)
        .ok_or_else(|| CompileError::UnknownEntitySet(request.entity_set.clone()))?;
    let root_type = metadata
        .entity_type(&entity_set.entity_type)
        .ok_or_else(|| CompileError::UnknownEntityType(entity_set.entity_type.clone()))?;
    let navigation_path = request.navigation_path.trim_matches('/').to_string();
    let entity_type = metadata
        .entity_type_at(root_type, &navigation_path)
        .ok_or_else(|| CompileError::UnknownNavigation {
            entity_set: entity_set.name.clone(),
            path: navigation_path.clone(),
        })?;

    let missing = || CompileError::MissingLineItem {
        path: request.line_item.to_string(),
        entity_type: entity_type.name.clone(),
    };
    if request.line_item.term != Term::LineItem {
        return Err(missing());
    }
    let line_item = match metadata
        .annotations_by_term(entity_type, &request.line_item)
        .map(|resolved| resolved.target)
    {
        Some(AnnotationTarget::LineItem(line_item)) => line_item,
        _ => return Err(missing()),
    };

    let is_entity_set = navigation_path.is_empty();
    let data_model_path = if is_entity_set {
        entity_set.name.clone()
    } else {
        format!("{}/{navigation_path}", entity_set.name)
    };
    let visualization_path = if is_entity_set {
        request.line_item.to_string()
    } else {
        format!("{navigation_path}/{}", request.line_item)
    };
    let control = ctx.manifest.control_configuration(&visualization_path);
    let settings = control
        .map(|control| control.table_settings.clone())
        .unwrap_or_default();
    let (table_type, hierarchy_qualifier) = resolve_table_type(ctx, entity_type, &settings);

    Ok(TableScope {
        entity_set,
        target_set: target_set(metadata, entity_set, &navigation_path),
        entity_type,
        line_item_path: format!("/{}/{}", entity_type.name, request.line_item),
        navigation_path,
        data_model_path,
        is_entity_set,
        visualization_path,
        line_item,
        control,
        settings,
        table_type,
        hierarchy_qualifier,
    })
}

fn table_id(scope: &TableScope<'_>, line_item: &AnnotationPath) -> String {
    match &line_item.qualifier {
        Some(qualifier) => format!("{}::LineItem::{qualifier}", sanitize(&scope.data_model_path)),
        None => format!("{}::LineItem", sanitize(&scope.data_model_path)),
    }
}

fn selection_inputs(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    actions: &[Action],
    delete_visibility: &Expression,
    mass_edit_visibility: &Expression,
) -> SelectionInputs {
    // Statically hidden records never reach `actions`, so only manifest
    // overrides can leave a `"false"` visibility here.
    let context_actions: Vec<&Action> = actions
        .iter()
        .filter(|action| action.requires_selection == Some(true) && action.visible != "false")
        .collect();
    SelectionInputs {
        manifest_mode: scope.settings.selection_mode,
        is_entity_set: scope.is_entity_set,
        deletable: !ctx
            .capabilities
            .deletable(&scope.data_model_path)
            .is_static_false(),
        delete_visibility: delete_visibility.clone(),
        mass_edit_visibility: mass_edit_visibility.clone(),
        context_action_always_visible: context_actions
            .iter()
            .any(|action| action.visible == "true"),
        context_action_visibilities: context_actions
            .iter()
            .map(|action| binding(&action.visible))
            .collect(),
    }
}

/// Compiles one table from annotations and manifest overrides.
///
/// Soft problems are reported to the context's diagnostics sink and leave the
/// affected element out. Unknown entity sets, navigations and line items, and
/// conflicting creation settings, fail the whole table.
pub fn compile_table(ctx: &CompileContext<'_>, request: &TableRequest) -> Result<TableVisualization> {
    let span = info_span!(
        "compile_table",
        entity_set = %request.entity_set,
        navigation = %request.navigation_path,
        line_item = %request.line_item
    );
    let _guard = span.enter();

    let scope = resolve_scope(ctx, request)?;
    debug!(
        entity_type = %scope.entity_type.name,
        table_type = %scope.table_type,
        fields = scope.line_item.len(),
        "resolved table scope"
    );

    let mut arena = ColumnArena::new();
    line_item_columns(ctx, &scope, &mut arena);
    property_columns(ctx, &scope, &mut arena);
    arena.link_dependencies(|path, name, key, text_only| {
        related_column(ctx, &scope, path, name, key, text_only)
    });
    let units = arena.units().clone();
    let mut columns = arena.into_columns();
    merge_columns(ctx, &scope, &mut columns);
    let analytics = apply_analytics(ctx, &scope, &units, &mut columns);

    let actions = merge_actions(ctx, &scope, annotation_actions(ctx, &scope));

    let visibility = operation_visibility(ctx, &scope);
    let selection_mode = resolve_selection_mode(&selection_inputs(
        ctx,
        &scope,
        &actions,
        &visibility.delete,
        &visibility.mass_edit,
    ));
    let create = create_behavior(ctx, &scope)?;
    let variant = presentation_variant(
        ctx,
        &scope,
        request.presentation_variant.as_ref(),
        &request.line_item,
    );
    let availability = operation_availability(ctx, &scope)?;
    let header = scope.settings.header.clone().or_else(|| {
        scope
            .entity_type
            .annotations
            .header_info
            .as_ref()
            .and_then(|header| header.type_name_plural.clone())
    });

    let annotation = TableAnnotationConfiguration {
        id: table_id(&scope, &request.line_item),
        collection: format!("/{}", scope.data_model_path),
        navigation_path: scope.navigation_path.clone(),
        entity_name: scope.entity_set.name.clone(),
        is_entity_set: scope.is_entity_set,
        header,
        p13n_mode: p13n_mode(ctx, &scope),
        selection_mode,
        create: create.clone(),
        row: row_configuration(ctx, &scope, &request.line_item),
        show: visibility.to_show(),
        variant_management: ctx.manifest.variant_management,
        threshold: threshold(ctx, &scope, variant),
        searchable: ctx.capabilities.searchable(&scope.data_model_path),
        sort_conditions: sort_conditions(ctx, &scope, &columns, variant),
        group_conditions: group_conditions(ctx, &scope, &columns, variant),
        aggregate_conditions: aggregate_conditions(ctx, &scope, &columns, variant),
        operation_available_map: availability.map,
        operation_available_properties: availability.properties,
    };
    let control = control_configuration(ctx, &scope, &create);
    debug!(
        columns = columns.len(),
        actions = actions.len(),
        "compiled table"
    );

    Ok(TableVisualization {
        annotation,
        control,
        columns,
        actions,
        aggregates: analytics.aggregates,
        enable_analytics: analytics.enable_analytics,
        enable_basic_search: analytics.enable_basic_search,
    })
}
