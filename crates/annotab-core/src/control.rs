//! Table type resolution and the control half of the descriptor.

use annotab_model::{
    CreateBehavior, CreationMode, EntityType, IssueCategory, IssueSeverity, TableControlConfiguration,
    TableSettings, TableType,
};
use tracing::debug;

use crate::context::{CompileContext, TableScope};

/// Effective table type and hierarchy qualifier.
///
/// Analytical tables need `Aggregation.ApplySupported` on the entity type and
/// fall back to a grid table otherwise. Tree tables need a hierarchy
/// qualifier naming a `Hierarchy.RecursiveHierarchy` and fall back to a
/// responsive table otherwise.
pub fn resolve_table_type(
    ctx: &CompileContext<'_>,
    entity_type: &EntityType,
    settings: &TableSettings,
) -> (TableType, Option<String>) {
    let requested = settings
        .table_type
        .unwrap_or(ctx.options.default_table_type);
    match requested {
        TableType::AnalyticalTable if entity_type.annotations.apply_supported.is_none() => {
            ctx.report(
                IssueCategory::Configuration,
                IssueSeverity::Low,
                &format!(
                    "{} does not support aggregation, using a grid table",
                    entity_type.name
                ),
                "ANALYTICS_NOT_SUPPORTED",
            );
            (TableType::GridTable, None)
        }
        TableType::TreeTable => {
            let qualifier = settings.hierarchy_qualifier.as_deref().filter(|qualifier| {
                entity_type
                    .annotations
                    .recursive_hierarchies
                    .contains_key(*qualifier)
            });
            match qualifier {
                Some(qualifier) => (TableType::TreeTable, Some(qualifier.to_string())),
                None => {
                    ctx.report(
                        IssueCategory::Configuration,
                        IssueSeverity::Medium,
                        &format!(
                            "tree table on {} needs a recursive hierarchy qualifier",
                            entity_type.name
                        ),
                        "MISSING_HIERARCHY",
                    );
                    (TableType::ResponsiveTable, None)
                }
            }
        }
        other => (other, None),
    }
}

/// Control settings handed to the renderer. Analytical tables are rendered
/// by a grid table with analytics switched on.
pub fn control_configuration(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    create: &CreateBehavior,
) -> TableControlConfiguration {
    let settings = &scope.settings;
    let (creation_mode, create_at_end) = match create {
        CreateBehavior::InApp(in_app) => (in_app.mode, in_app.append),
        CreateBehavior::External(_) => (CreationMode::External, false),
    };
    let table_type = match scope.table_type {
        TableType::AnalyticalTable => TableType::GridTable,
        other => other,
    };
    debug!(requested = %scope.table_type, rendered = %table_type, "table control type");
    TableControlConfiguration {
        table_type,
        creation_mode,
        create_at_end,
        enable_export: settings.enable_export.unwrap_or(true),
        enable_paste: settings.enable_paste.unwrap_or(false),
        enable_mass_edit: settings.enable_mass_edit.unwrap_or(false),
        enable_full_screen: settings.enable_full_screen.unwrap_or(false),
        condensed_table_layout: settings.condensed_table_layout.unwrap_or(false),
        selection_limit: settings
            .selection_limit
            .unwrap_or(ctx.options.default_selection_limit),
        row_count_mode: settings.row_count_mode,
        row_count: settings.row_count,
        hierarchy_qualifier: scope.hierarchy_qualifier.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_model::{
        ApplySupported, DiagnosticsCollector, EntityTypeAnnotations, ManifestSettings,
        ServiceMetadata,
    };

    use crate::context::CompileOptions;

    fn entity_type(annotations: EntityTypeAnnotations) -> EntityType {
        EntityType {
            name: "sales.Order".to_string(),
            keys: Vec::new(),
            properties: Vec::new(),
            navigation_properties: Vec::new(),
            annotations,
        }
    }

    fn resolve(entity_type: &EntityType, settings: &TableSettings) -> (TableType, Option<String>, usize) {
        let service = ServiceMetadata::default();
        let manifest = ManifestSettings::default();
        let diagnostics = DiagnosticsCollector::new();
        let options = CompileOptions::default();
        let ctx = CompileContext::new(&service, &manifest, &diagnostics, &options);
        let (table_type, qualifier) = resolve_table_type(&ctx, entity_type, settings);
        (table_type, qualifier, diagnostics.issues().len())
    }

    #[test]
    fn analytical_without_apply_supported_is_demoted() {
        let settings = TableSettings {
            table_type: Some(TableType::AnalyticalTable),
            ..TableSettings::default()
        };
        let plain = entity_type(EntityTypeAnnotations::default());
        assert_eq!(resolve(&plain, &settings), (TableType::GridTable, None, 1));

        let aggregated = entity_type(EntityTypeAnnotations {
            apply_supported: Some(ApplySupported::default()),
            ..EntityTypeAnnotations::default()
        });
        assert_eq!(
            resolve(&aggregated, &settings),
            (TableType::AnalyticalTable, None, 0)
        );
    }

    #[test]
    fn tree_table_needs_known_hierarchy() {
        let settings = TableSettings {
            table_type: Some(TableType::TreeTable),
            hierarchy_qualifier: Some("OrgChart".to_string()),
            ..TableSettings::default()
        };
        let plain = entity_type(EntityTypeAnnotations::default());
        assert_eq!(
            resolve(&plain, &settings),
            (TableType::ResponsiveTable, None, 1)
        );
    }

    #[test]
    fn default_type_comes_from_options() {
        let plain = entity_type(EntityTypeAnnotations::default());
        assert_eq!(
            resolve(&plain, &TableSettings::default()),
            (TableType::ResponsiveTable, None, 0)
        );
    }
}
