//! Manifest override layer: per-visualization columns, actions and table settings.
//!
//! Control configurations are keyed by the visualization annotation path as
//! written in the manifest (`@com.sap.vocabularies.UI.v1.LineItem`,
//! `@UI.LineItem#Open`, `_Items/@UI.LineItem`). Column and action maps are
//! `BTreeMap`s, so custom entries without an anchor are appended in key order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{
    CreationMode, EnableOnSelect, HorizontalAlign, Importance, Placement, RowCountMode,
    SelectionModeSetting, TableType, TemplateType, VariantManagementType,
};
use crate::table::{Availability, FormatOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSettings {
    #[serde(default)]
    pub template: TemplateType,
    #[serde(default)]
    pub variant_management: VariantManagementType,
    /// Filter bar hidden on a list report (`hideFilterBar`).
    #[serde(default)]
    pub hide_filter_bar: bool,
    #[serde(default)]
    pub controls: BTreeMap<String, ControlConfiguration>,
    /// Navigation settings keyed by entity set or navigation path.
    #[serde(default)]
    pub navigation: BTreeMap<String, NavigationSettings>,
    /// Cross-application outbounds by name.
    #[serde(default)]
    pub outbounds: BTreeMap<String, OutboundDetail>,
}

impl ManifestSettings {
    /// Control configuration for a visualization path, tolerating the
    /// `UI.` alias and the full vocabulary namespace interchangeably.
    pub fn control_configuration(&self, visualization_path: &str) -> Option<&ControlConfiguration> {
        let normalized = normalize_visualization_path(visualization_path);
        self.controls
            .iter()
            .find(|(key, _)| normalize_visualization_path(key) == normalized)
            .map(|(_, configuration)| configuration)
    }

    pub fn navigation_settings(&self, path: &str) -> Option<&NavigationSettings> {
        self.navigation.get(path)
    }
}

fn normalize_visualization_path(path: &str) -> String {
    path.trim()
        .replace("@com.sap.vocabularies.UI.v1.", "@UI.")
        .trim_start_matches('/')
        .to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlConfiguration {
    #[serde(default)]
    pub columns: BTreeMap<String, ManifestColumn>,
    #[serde(default)]
    pub actions: BTreeMap<String, ManifestAction>,
    #[serde(default)]
    pub table_settings: TableSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSettings {
    #[serde(rename = "type", default)]
    pub table_type: Option<TableType>,
    #[serde(default)]
    pub selection_mode: Option<SelectionModeSetting>,
    #[serde(default)]
    pub selection_limit: Option<u32>,
    #[serde(default)]
    pub personalization: Option<PersonalizationSetting>,
    #[serde(default)]
    pub creation_mode: Option<CreationModeSettings>,
    #[serde(default)]
    pub enable_export: Option<bool>,
    #[serde(default)]
    pub enable_paste: Option<bool>,
    #[serde(default)]
    pub enable_mass_edit: Option<bool>,
    #[serde(default)]
    pub enable_full_screen: Option<bool>,
    #[serde(default)]
    pub condensed_table_layout: Option<bool>,
    #[serde(default)]
    pub row_count_mode: Option<RowCountMode>,
    #[serde(default)]
    pub row_count: Option<u32>,
    #[serde(default)]
    pub hierarchy_qualifier: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
}

/// `personalization` is either a switch or a per-feature object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonalizationSetting {
    Enabled(bool),
    Options(PersonalizationOptions),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationOptions {
    #[serde(default)]
    pub sort: Option<bool>,
    #[serde(default)]
    pub column: Option<bool>,
    #[serde(default)]
    pub filter: Option<bool>,
    #[serde(default)]
    pub group: Option<bool>,
    #[serde(default)]
    pub aggregate: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationModeSettings {
    #[serde(default)]
    pub name: Option<CreationMode>,
    #[serde(default)]
    pub create_at_end: Option<bool>,
    /// Outbound used when `name` is `External`.
    #[serde(default)]
    pub outbound: Option<String>,
}

/// Anchored position of a custom element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestColumn {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub importance: Option<Importance>,
    #[serde(default)]
    pub horizontal_align: Option<HorizontalAlign>,
    #[serde(default)]
    pub availability: Option<Availability>,
    /// Fragment rendering a custom column.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    /// Properties a custom column depends on, for sorting and export.
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub format_options: Option<FormatOptions>,
}

/// A boolean or a binding string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    Bool(bool),
    Binding(String),
}

impl BindingValue {
    pub fn to_binding(&self) -> String {
        match self {
            BindingValue::Bool(value) => value.to_string(),
            BindingValue::Binding(binding) => binding.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAction {
    #[serde(default)]
    pub text: Option<String>,
    /// Event handler for custom actions.
    #[serde(default)]
    pub press: Option<String>,
    #[serde(default)]
    pub enabled: Option<BindingValue>,
    #[serde(default)]
    pub visible: Option<BindingValue>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub requires_selection: Option<bool>,
    #[serde(default)]
    pub enable_on_select: Option<EnableOnSelect>,
    #[serde(default)]
    pub enable_auto_scroll: Option<bool>,
    #[serde(default)]
    pub is_navigable: Option<bool>,
    #[serde(default)]
    pub default_values_extension_function: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSettings {
    #[serde(default)]
    pub display: Option<NavigationTarget>,
    #[serde(default)]
    pub detail: Option<NavigationTarget>,
    #[serde(default)]
    pub create: Option<NavigationTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub outbound: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundDetail {
    pub semantic_object: String,
    pub action: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_configuration_matches_alias_and_namespace() {
        let mut settings = ManifestSettings::default();
        settings.controls.insert(
            "@com.sap.vocabularies.UI.v1.LineItem".to_string(),
            ControlConfiguration::default(),
        );
        assert!(settings.control_configuration("@UI.LineItem").is_some());
        assert!(settings.control_configuration("@UI.LineItem#Other").is_none());
    }

    #[test]
    fn personalization_accepts_bool_or_object() {
        let flag: PersonalizationSetting = serde_json::from_str("false").unwrap();
        assert_eq!(flag, PersonalizationSetting::Enabled(false));
        let options: PersonalizationSetting =
            serde_json::from_str(r#"{"sort": true, "group": false}"#).unwrap();
        match options {
            PersonalizationSetting::Options(options) => {
                assert_eq!(options.sort, Some(true));
                assert_eq!(options.column, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn binding_value_to_binding() {
        assert_eq!(BindingValue::Bool(false).to_binding(), "false");
        assert_eq!(
            BindingValue::Binding("{ui>/isEditable}".to_string()).to_binding(),
            "{ui>/isEditable}"
        );
    }
}
