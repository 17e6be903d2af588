//! The compiled table descriptor handed to the renderer.
//!
//! Serializes to camelCase JSON. Optional members are omitted when unset so
//! the output stays close to what a hand-written descriptor would contain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{
    CreationMode, EnableOnSelect, HorizontalAlign, Importance, RowCountMode, TableType,
    VariantManagementType,
};
use crate::manifest::{NavigationSettings, OutboundDetail};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableVisualization {
    pub annotation: TableAnnotationConfiguration,
    pub control: TableControlConfiguration,
    pub columns: Vec<Column>,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<BTreeMap<String, AggregateDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_analytics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_basic_search: Option<bool>,
}

impl TableVisualization {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn action(&self, key: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Annotation,
    Default,
    Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Default,
    Hidden,
    Adaptation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub sortable: bool,
    pub is_groupable: bool,
    pub is_key: bool,
    pub availability: Availability,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_infos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_property_infos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<ExportSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_config: Option<TypeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    pub is_part_of_line_item: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_object_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_options: Option<FormatOptions>,
    /// Compiled row-level visibility of the rendered field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<String>,
    /// OR of the member visibilities of a field group column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_group_hidden_expressions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_align: Option<HorizontalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregatable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ColumnExtension>,
}

impl Column {
    /// Empty column of the given kind; builders fill in the rest.
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind,
            relative_path: None,
            annotation_path: None,
            label: None,
            group_label: None,
            group: None,
            sortable: false,
            is_groupable: false,
            is_key: false,
            availability: Availability::Default,
            property_infos: Vec::new(),
            additional_property_infos: Vec::new(),
            export_settings: None,
            type_config: None,
            importance: None,
            is_part_of_line_item: false,
            semantic_object_path: None,
            format_options: None,
            visible: None,
            field_group_hidden_expressions: None,
            unit: None,
            width: None,
            horizontal_align: None,
            template: None,
            header: None,
            aggregatable: None,
            extension: None,
        }
    }

    /// Composite columns render several properties and carry `propertyInfos`.
    pub fn is_composite(&self) -> bool {
        !self.property_infos.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportType {
    String,
    Number,
    Date,
    DateTime,
    Time,
    Boolean,
    Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    #[serde(rename = "type")]
    pub export_type: ExportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

impl ExportSettings {
    pub fn new(export_type: ExportType) -> Self {
        Self {
            export_type,
            template: None,
            label: None,
            input_format: None,
            scale: None,
            delimiter: None,
            unit_property: None,
            unit: None,
            timezone_property: None,
            timezone: None,
            utc: None,
            wrap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConfig {
    /// UI model type, e.g. `sap.ui.model.odata.type.Decimal`.
    pub class_name: String,
    #[serde(default)]
    pub constraints: TypeConstraints,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_digit_sequence: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_draft_indicator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_group_draft_indicator_property_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_lines_edit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_aggregate: Option<CustomAggregateDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAggregateDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_defining_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDefinition {
    pub default_aggregate: CustomAggregateDefinition,
    pub relative_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Copy,
    Default,
    DataFieldForAction,
    DataFieldForIntentBasedNavigation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub press: Option<String>,
    pub visible: String,
    /// Absent when enablement is evaluated per row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_navigable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_selection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_on_select: Option<EnableOnSelect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_values_extension_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Action {
    pub fn new(key: impl Into<String>, kind: ActionKind, visible: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            annotation_path: None,
            text: None,
            press: None,
            visible: visible.into(),
            enabled: None,
            is_navigable: None,
            requires_selection: None,
            enable_on_select: None,
            enable_auto_scroll: None,
            default_values_extension_function: None,
            command: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionModeValue {
    None,
    Single,
    Multi,
}

impl SelectionModeValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionModeValue::None => "None",
            SelectionModeValue::Single => "Single",
            SelectionModeValue::Multi => "Multi",
        }
    }
}

/// A literal mode or a compiled binding expression yielding one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionMode {
    Literal(SelectionModeValue),
    Expression(String),
}

impl SelectionMode {
    pub fn is_literal(&self) -> bool {
        matches!(self, SelectionMode::Literal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppCreate {
    pub mode: CreationMode,
    pub append: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_to_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCreate {
    pub outbound: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_detail: Option<OutboundDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_settings: Option<NavigationSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CreateBehavior {
    InApp(InAppCreate),
    External(ExternalCreate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowAction {
    Navigation,
    Outbound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RowAction>,
    /// Route or outbound the row press navigates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_highlighting: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorter {
    pub name: String,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConditions {
    pub sorters: Vec<Sorter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLevel {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConditions {
    pub group_levels: Vec<GroupLevel>,
}

/// Serialized as an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCondition {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateConditions(pub BTreeMap<String, AggregateCondition>);

impl AggregateConditions {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compiled visibility of the standard toolbar operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowConfiguration {
    pub create: String,
    pub delete: String,
    pub paste: String,
    pub mass_edit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAnnotationConfiguration {
    pub id: String,
    /// Absolute binding path, e.g. `/SalesOrders` or `/SalesOrders/_Items`.
    pub collection: String,
    pub navigation_path: String,
    pub entity_name: String,
    pub is_entity_set: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p13n_mode: Option<String>,
    pub selection_mode: SelectionMode,
    pub create: CreateBehavior,
    pub row: RowConfiguration,
    pub show: ShowConfiguration,
    pub variant_management: VariantManagementType,
    pub threshold: u32,
    pub searchable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_conditions: Option<SortConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_conditions: Option<GroupConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_conditions: Option<AggregateConditions>,
    /// JSON object: action name to availability path, `null` when statically unavailable.
    pub operation_available_map: String,
    /// Comma-separated property paths referenced by `operation_available_map`.
    pub operation_available_properties: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableControlConfiguration {
    #[serde(rename = "type")]
    pub table_type: TableType,
    pub creation_mode: CreationMode,
    pub create_at_end: bool,
    pub enable_export: bool,
    pub enable_paste: bool,
    pub enable_mass_edit: bool,
    pub enable_full_screen: bool,
    pub condensed_table_layout: bool,
    pub selection_limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count_mode: Option<RowCountMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_qualifier: Option<String>,
}
