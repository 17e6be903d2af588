//! Compile-time context: the collaborators every builder reads from.

use annotab_model::{
    CapabilityResolver, ControlConfiguration, DataFieldAbstract, DiagnosticsSink, EntitySet,
    EntityType, IssueCategory, IssueSeverity, ManifestSettings, MetadataAccessor, TableSettings,
    TableType,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunable defaults applied when neither annotations nor the manifest decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Rows requested per page for responsive tables.
    pub responsive_threshold: u32,
    /// Rows requested per page for grid, analytical and tree tables.
    pub default_threshold: u32,
    pub default_selection_limit: u32,
    pub default_table_type: TableType,
    /// Treat medium and high diagnostics as failures at the CLI boundary.
    pub strict: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            responsive_threshold: 30,
            default_threshold: 100,
            default_selection_limit: 200,
            default_table_type: TableType::ResponsiveTable,
            strict: false,
        }
    }
}

impl CompileOptions {
    pub fn threshold_for(&self, table_type: TableType) -> u32 {
        match table_type {
            TableType::ResponsiveTable => self.responsive_threshold,
            TableType::GridTable | TableType::AnalyticalTable | TableType::TreeTable => {
                self.default_threshold
            }
        }
    }
}

/// Read-only inputs shared by one compile call.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    pub metadata: &'a dyn MetadataAccessor,
    pub capabilities: &'a dyn CapabilityResolver,
    pub manifest: &'a ManifestSettings,
    pub diagnostics: &'a dyn DiagnosticsSink,
    pub options: &'a CompileOptions,
}

impl<'a> CompileContext<'a> {
    /// Context over a service that answers both metadata and capability lookups.
    pub fn new<S>(
        service: &'a S,
        manifest: &'a ManifestSettings,
        diagnostics: &'a dyn DiagnosticsSink,
        options: &'a CompileOptions,
    ) -> Self
    where
        S: MetadataAccessor + CapabilityResolver,
    {
        Self {
            metadata: service,
            capabilities: service,
            manifest,
            diagnostics,
            options,
        }
    }

    pub(crate) fn report(
        &self,
        category: IssueCategory,
        severity: IssueSeverity,
        message: &str,
        code: &str,
    ) {
        if severity >= IssueSeverity::Medium {
            warn!(category = category.as_str(), code, "{message}");
        }
        self.diagnostics
            .add_issue(category, severity, message, Some(code));
    }
}

/// The table being compiled, resolved once from the request.
#[derive(Debug, Clone)]
pub struct TableScope<'a> {
    pub entity_set: &'a EntitySet,
    /// Entity set holding the rows; differs from `entity_set` behind a navigation.
    pub target_set: &'a EntitySet,
    /// Entity type of the rows.
    pub entity_type: &'a EntityType,
    /// Navigation from the entity set to the rows, empty on a list report.
    pub navigation_path: String,
    /// `Set` or `Set/navigation`, the path capabilities are looked up with.
    pub data_model_path: String,
    pub is_entity_set: bool,
    /// Visualization path as the manifest keys it, e.g. `_Items/@UI.LineItem#Open`.
    pub visualization_path: String,
    /// Absolute line item path, e.g. `/sales.Item/@UI.LineItem#Open`.
    pub line_item_path: String,
    pub line_item: &'a [DataFieldAbstract],
    pub control: Option<&'a ControlConfiguration>,
    pub settings: TableSettings,
    /// Effective table type after fallbacks.
    pub table_type: TableType,
    pub hierarchy_qualifier: Option<String>,
}

impl TableScope<'_> {
    pub fn is_analytics(&self) -> bool {
        self.table_type == TableType::AnalyticalTable
    }
}
