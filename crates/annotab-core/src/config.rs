//! The annotation half of the descriptor: toolbar visibility, creation,
//! personalization, row navigation and presentation variant conditions.

use std::collections::BTreeMap;

use annotab_expr::paths::is_editable;
use annotab_expr::{Expression, and, compile, constant, path};
use annotab_model::{
    AggregateCondition, AggregateConditions, AnnotationPath, AnnotationTarget, Capability, Column,
    CreateBehavior, CreationMode, DataFieldAbstract, Dynamic, ExternalCreate,
    GroupConditions, GroupLevel, InAppCreate, IssueCategory, IssueSeverity, NavigationSettings,
    PersonalizationSetting, PresentationVariant, RowAction, RowConfiguration, ShowConfiguration,
    SortConditions, Sorter, TableType, TemplateType, Term, VariantManagementType,
};
use tracing::debug;

use crate::columns::visibility::shown;
use crate::context::{CompileContext, TableScope};
use crate::error::{CompileError, Result};
use crate::keys::property_alias;

/// Visibility of the standard toolbar operations, before compilation.
#[derive(Debug, Clone)]
pub struct OperationVisibility {
    pub create: Expression,
    pub delete: Expression,
    pub paste: Expression,
    pub mass_edit: Expression,
}

impl OperationVisibility {
    pub fn to_show(&self) -> ShowConfiguration {
        ShowConfiguration {
            create: compile(&self.create),
            delete: compile(&self.delete),
            paste: compile(&self.paste),
            mass_edit: compile(&self.mass_edit),
        }
    }
}

/// A capability as an expression. Row paths only make sense inside an
/// object page, so a dynamic capability on a list report counts as granted.
fn capability(capability: Capability, is_entity_set: bool) -> Expression {
    match capability {
        Capability::Static(value) => constant(value),
        Capability::Dynamic(_) if is_entity_set => constant(true),
        Capability::Dynamic(granted) => path(granted),
    }
}

fn edit_gate(scope: &TableScope<'_>) -> Expression {
    if scope.is_entity_set {
        constant(true)
    } else {
        is_editable()
    }
}

pub fn operation_visibility(ctx: &CompileContext<'_>, scope: &TableScope<'_>) -> OperationVisibility {
    let annotations = &scope.entity_type.annotations;
    let path = scope.data_model_path.as_str();

    let delete = and([
        shown(annotations.delete_hidden.as_ref(), ""),
        capability(ctx.capabilities.deletable(path), scope.is_entity_set),
        edit_gate(scope),
    ]);
    let create = and([
        shown(annotations.create_hidden.as_ref(), ""),
        capability(ctx.capabilities.insertable(path), scope.is_entity_set),
        edit_gate(scope),
    ]);
    let mass_edit = if scope.settings.enable_mass_edit.unwrap_or(false) {
        and([
            shown(annotations.update_hidden.as_ref(), ""),
            capability(ctx.capabilities.updatable(path), scope.is_entity_set),
            edit_gate(scope),
        ])
    } else {
        constant(false)
    };
    let paste_enabled = scope
        .settings
        .enable_paste
        .unwrap_or(ctx.manifest.template == TemplateType::ObjectPage);
    let paste = and([create.clone(), constant(paste_enabled)]);

    OperationVisibility {
        create,
        delete,
        paste,
        mass_edit,
    }
}

/// Key under which the manifest stores navigation for this table.
fn navigation_key<'a>(scope: &'a TableScope<'_>) -> &'a str {
    if scope.is_entity_set {
        scope.entity_set.name.as_str()
    } else {
        scope.navigation_path.as_str()
    }
}

fn navigation_settings<'a>(
    ctx: &CompileContext<'a>,
    scope: &TableScope<'_>,
) -> Option<&'a NavigationSettings> {
    ctx.manifest.navigation_settings(navigation_key(scope))
}

/// New action creating a document in the rows' entity set, if any.
fn new_action(scope: &TableScope<'_>) -> Option<String> {
    let annotations = &scope.target_set.annotations;
    annotations
        .draft_root
        .as_ref()
        .and_then(|draft| draft.new_action.clone())
        .or_else(|| {
            annotations
                .sticky_session
                .as_ref()
                .and_then(|sticky| sticky.new_action.clone())
        })
}

/// How new rows are created.
///
/// A `CreationRow` cannot call a custom new action and fails compilation.
/// `NewPage` without a route to navigate to falls back to `Inline`.
pub fn create_behavior(ctx: &CompileContext<'_>, scope: &TableScope<'_>) -> Result<CreateBehavior> {
    let configured = scope.settings.creation_mode.as_ref();
    let navigation = navigation_settings(ctx, scope);
    let create_target = navigation.and_then(|navigation| navigation.create.as_ref());

    let mode = configured.and_then(|settings| settings.name);
    let outbound = configured
        .and_then(|settings| settings.outbound.clone())
        .or_else(|| create_target.and_then(|target| target.outbound.clone()));
    let external = match mode {
        Some(CreationMode::External) => true,
        None => create_target.is_some_and(|target| target.outbound.is_some()),
        Some(_) => false,
    };

    if external {
        if let Some(outbound) = outbound {
            let outbound_detail = ctx.manifest.outbounds.get(&outbound).cloned();
            if outbound_detail.is_none() {
                ctx.report(
                    IssueCategory::Manifest,
                    IssueSeverity::Medium,
                    &format!("outbound {outbound} is not declared in the manifest"),
                    "UNKNOWN_OUTBOUND",
                );
            }
            return Ok(CreateBehavior::External(ExternalCreate {
                outbound,
                outbound_detail,
                navigation_settings: navigation.cloned(),
            }));
        }
        ctx.report(
            IssueCategory::Manifest,
            IssueSeverity::Medium,
            "external creation configured without an outbound",
            "MISSING_OUTBOUND",
        );
    }

    let new_action = new_action(scope);
    let mut mode = match mode {
        Some(CreationMode::External) | None => CreationMode::NewPage,
        Some(mode) => mode,
    };
    if mode == CreationMode::CreationRow
        && let Some(new_action) = &new_action
    {
        return Err(CompileError::CreationRowWithNewAction {
            new_action: new_action.clone(),
        });
    }

    let mut navigate_to_target = None;
    if mode == CreationMode::NewPage {
        let route = create_target
            .and_then(|target| target.route.clone())
            .or_else(|| {
                navigation
                    .and_then(|navigation| navigation.detail.as_ref())
                    .and_then(|detail| detail.route.clone())
            });
        match route {
            Some(route) => navigate_to_target = Some(route),
            None => {
                ctx.report(
                    IssueCategory::Manifest,
                    IssueSeverity::Medium,
                    &format!(
                        "creation mode NewPage on {} has no target route, using Inline",
                        navigation_key(scope)
                    ),
                    "NEW_PAGE_WITHOUT_ROUTE",
                );
                mode = CreationMode::Inline;
            }
        }
    }

    let append = configured
        .and_then(|settings| settings.create_at_end)
        .unwrap_or(mode == CreationMode::InlineCreationRows);
    debug!(mode = %mode, append, "creation behavior");
    Ok(CreateBehavior::InApp(InAppCreate {
        mode,
        append,
        new_action,
        navigate_to_target,
    }))
}

fn supports_group(table_type: TableType) -> bool {
    matches!(
        table_type,
        TableType::AnalyticalTable | TableType::ResponsiveTable
    )
}

/// Comma-separated personalization features, or `None` when switched off.
pub fn p13n_mode(ctx: &CompileContext<'_>, scope: &TableScope<'_>) -> Option<String> {
    let table_type = scope.table_type;
    let mut modes: Vec<&str> = Vec::new();
    match scope.settings.personalization {
        Some(PersonalizationSetting::Enabled(false)) => return None,
        Some(PersonalizationSetting::Enabled(true)) => {
            modes.extend(["Sort", "Column", "Filter"]);
            if supports_group(table_type) {
                modes.push("Group");
            }
            if table_type == TableType::AnalyticalTable {
                modes.push("Aggregate");
            }
        }
        Some(PersonalizationSetting::Options(options)) => {
            if options.sort.unwrap_or(false) {
                modes.push("Sort");
            }
            if options.column.unwrap_or(false) {
                modes.push("Column");
            }
            if options.filter.unwrap_or(false) {
                modes.push("Filter");
            }
            if options.group.unwrap_or(false) && supports_group(table_type) {
                modes.push("Group");
            }
            if options.aggregate.unwrap_or(false) && table_type == TableType::AnalyticalTable {
                modes.push("Aggregate");
            }
        }
        None => {
            modes.extend(["Sort", "Column"]);
            let manifest = ctx.manifest;
            if manifest.template != TemplateType::ListReport
                || manifest.variant_management == VariantManagementType::Control
                || manifest.hide_filter_bar
            {
                modes.push("Filter");
            }
            if supports_group(table_type) {
                modes.push("Group");
            }
            if table_type == TableType::AnalyticalTable {
                modes.push("Aggregate");
            }
        }
    }
    (!modes.is_empty()).then(|| modes.join(","))
}

/// What pressing a row does, and the row highlighting binding.
pub fn row_configuration(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    line_item: &AnnotationPath,
) -> RowConfiguration {
    let mut row = RowConfiguration::default();
    if let Some(navigation) = navigation_settings(ctx, scope) {
        let detail = navigation.detail.as_ref();
        if let Some(route) = detail.and_then(|detail| detail.route.clone()) {
            row.action = Some(RowAction::Navigation);
            row.navigation_target = Some(route);
        } else if let Some(outbound) = detail
            .and_then(|detail| detail.outbound.clone())
            .or_else(|| {
                navigation
                    .display
                    .as_ref()
                    .and_then(|display| display.outbound.clone())
            })
        {
            row.action = Some(RowAction::Outbound);
            row.navigation_target = Some(outbound);
        }
    }
    row.row_highlighting = scope
        .entity_type
        .annotations
        .line_item_criticality
        .get(line_item.qualifier_key())
        .map(|criticality| match criticality {
            Dynamic::Path(criticality) => format!("{{{}}}", criticality.as_str()),
            Dynamic::Static(criticality) => criticality.clone(),
        });
    row
}

fn shows_line_item(variant: &PresentationVariant, line_item: &AnnotationPath) -> bool {
    variant.visualizations.is_empty()
        || variant.visualizations.iter().any(|visualization| {
            visualization.parse().is_ok_and(|path| {
                path.term == Term::LineItem && path.qualifier == line_item.qualifier
            })
        })
}

/// Presentation variant steering sorting, grouping and totals.
///
/// An explicit request must resolve; otherwise the unqualified variant of the
/// entity type is used when it shows this line item.
pub fn presentation_variant<'a>(
    ctx: &CompileContext<'a>,
    scope: &TableScope<'a>,
    requested: Option<&AnnotationPath>,
    line_item: &AnnotationPath,
) -> Option<&'a PresentationVariant> {
    if let Some(requested) = requested {
        let resolved = ctx.metadata.annotations_by_term(scope.entity_type, requested);
        return match resolved.map(|resolved| resolved.target) {
            Some(AnnotationTarget::PresentationVariant(variant)) => Some(variant),
            _ => {
                ctx.report(
                    IssueCategory::Annotation,
                    IssueSeverity::Low,
                    &format!("presentation variant {requested} does not resolve"),
                    "UNRESOLVED_PRESENTATION_VARIANT",
                );
                None
            }
        };
    }
    scope
        .entity_type
        .annotations
        .presentation_variants
        .get("")
        .filter(|variant| shows_line_item(variant, line_item))
}

pub fn threshold(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    variant: Option<&PresentationVariant>,
) -> u32 {
    variant
        .and_then(|variant| variant.max_items)
        .unwrap_or_else(|| ctx.options.threshold_for(scope.table_type))
}

/// Name of the column a presentation variant path refers to, preferring
/// plain property columns over composite ones.
fn column_name(columns: &[Column], path: &str) -> Option<String> {
    let alias = property_alias(path);
    columns
        .iter()
        .find(|column| column.name == path && !column.is_composite())
        .or_else(|| columns.iter().find(|column| column.name == alias))
        .or_else(|| columns.iter().find(|column| column.name == path))
        .map(|column| column.name.clone())
}

fn resolve_path(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    columns: &[Column],
    path: &str,
    role: &str,
) -> Option<String> {
    if ctx.metadata.is_navigation_path(scope.entity_type, path) {
        ctx.report(
            IssueCategory::Annotation,
            IssueSeverity::Low,
            &format!("navigation property {path} cannot be used as a {role}"),
            "NAVIGATION_PROPERTY_CONDITION",
        );
        return None;
    }
    let name = column_name(columns, path);
    if name.is_none() {
        ctx.report(
            IssueCategory::Annotation,
            IssueSeverity::Low,
            &format!("{role} {path} matches no column"),
            "UNMATCHED_CONDITION",
        );
    }
    name
}

pub fn sort_conditions(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    columns: &[Column],
    variant: Option<&PresentationVariant>,
) -> Option<SortConditions> {
    let sorters: Vec<Sorter> = variant?
        .sort_order
        .iter()
        .filter_map(|order| {
            let name = resolve_path(ctx, scope, columns, order.property.as_str(), "sorter")?;
            Some(Sorter {
                name,
                descending: order.descending,
            })
        })
        .collect();
    (!sorters.is_empty()).then_some(SortConditions { sorters })
}

/// Group levels; responsive tables group by the first level only.
pub fn group_conditions(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    columns: &[Column],
    variant: Option<&PresentationVariant>,
) -> Option<GroupConditions> {
    if !supports_group(scope.table_type) {
        return None;
    }
    let limit = if scope.table_type == TableType::ResponsiveTable {
        1
    } else {
        usize::MAX
    };
    let group_levels: Vec<GroupLevel> = variant?
        .group_by
        .iter()
        .filter_map(|path| resolve_path(ctx, scope, columns, path.as_str(), "group level"))
        .take(limit)
        .map(|name| GroupLevel { name })
        .collect();
    (!group_levels.is_empty()).then_some(GroupConditions { group_levels })
}

/// Totals of an analytical table.
pub fn aggregate_conditions(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    columns: &[Column],
    variant: Option<&PresentationVariant>,
) -> Option<AggregateConditions> {
    if !scope.is_analytics() {
        return None;
    }
    let conditions: BTreeMap<String, AggregateCondition> = variant?
        .total
        .iter()
        .filter_map(|path| resolve_path(ctx, scope, columns, path.as_str(), "total"))
        .map(|name| (name, AggregateCondition {}))
        .collect();
    (!conditions.is_empty()).then_some(AggregateConditions(conditions))
}

/// Availability of the bound actions in the line item, evaluated per row by
/// the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationAvailability {
    /// JSON object from action name to availability path or `null`.
    pub map: String,
    /// Comma-separated properties the availability paths read.
    pub properties: String,
}

pub fn operation_availability(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
) -> Result<OperationAvailability> {
    let mut map: BTreeMap<String, Option<String>> = BTreeMap::new();
    let mut properties: Vec<String> = Vec::new();
    for field in scope.line_item {
        let DataFieldAbstract::DataFieldForAction(record) = field else {
            continue;
        };
        let Some(definition) = ctx.metadata.action(&record.action) else {
            continue;
        };
        if !definition.is_bound || definition.is_static {
            continue;
        }
        match &definition.annotations.operation_available {
            Some(Dynamic::Static(false)) => {
                map.insert(record.action.clone(), None);
            }
            Some(Dynamic::Path(_)) => {
                let Some(available) = definition.operation_available_path() else {
                    continue;
                };
                if !properties.contains(&available) {
                    properties.push(available.clone());
                }
                map.insert(record.action.clone(), Some(available));
            }
            Some(Dynamic::Static(true)) | None => {}
        }
    }
    Ok(OperationAvailability {
        map: serde_json::to_string(&map)?,
        properties: properties.join(","),
    })
}
