//! UI data field records and the annotation collections built from them.
//!
//! `DataFieldAbstract` is a closed union over the `$Type` discriminator.
//! Records with a `$Type` this crate does not know, or with no `$Type` at
//! all, deserialize to [`DataFieldAbstract::Unknown`] so newer vocabularies
//! do not break parsing.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::annotation::{AnnotationPathExpression, Dynamic, DynamicBool, PathExpression};
use crate::enums::Importance;

/// Annotations attached to a data field record itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAnnotations {
    #[serde(rename = "UI.Hidden", default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<DynamicBool>,
    #[serde(rename = "UI.Importance", default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(rename = "UI.IsCopyAction", default, skip_serializing_if = "Option::is_none")]
    pub is_copy_action: Option<bool>,
}

impl FieldAnnotations {
    pub fn is_statically_hidden(&self) -> bool {
        self.hidden.as_ref().is_some_and(DynamicBool::is_static_true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataField {
    pub value: PathExpression,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldWithUrl {
    pub value: PathExpression,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<Dynamic<String>>,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldWithNavigationPath {
    pub value: PathExpression,
    #[serde(default)]
    pub label: Option<String>,
    pub target: PathExpression,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldWithAction {
    pub value: PathExpression,
    #[serde(default)]
    pub label: Option<String>,
    pub action: String,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldWithIntentBasedNavigation {
    pub value: PathExpression,
    #[serde(default)]
    pub label: Option<String>,
    pub semantic_object: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldForAnnotation {
    #[serde(default)]
    pub label: Option<String>,
    pub target: AnnotationPathExpression,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldForAction {
    #[serde(default)]
    pub label: Option<String>,
    pub action: String,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub determining: bool,
    #[serde(default)]
    pub invocation_grouping: Option<String>,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFieldForIntentBasedNavigation {
    #[serde(default)]
    pub label: Option<String>,
    pub semantic_object: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub requires_context: Option<DynamicBool>,
    #[serde(default)]
    pub navigation_available: Option<DynamicBool>,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub determining: bool,
    #[serde(rename = "annotations", default)]
    pub annotations: FieldAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "$Type")]
pub enum DataFieldAbstract {
    #[serde(rename = "com.sap.vocabularies.UI.v1.DataField", alias = "UI.DataField")]
    DataField(DataField),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldWithUrl",
        alias = "UI.DataFieldWithUrl"
    )]
    DataFieldWithUrl(DataFieldWithUrl),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldWithNavigationPath",
        alias = "UI.DataFieldWithNavigationPath"
    )]
    DataFieldWithNavigationPath(DataFieldWithNavigationPath),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldWithAction",
        alias = "UI.DataFieldWithAction"
    )]
    DataFieldWithAction(DataFieldWithAction),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldWithIntentBasedNavigation",
        alias = "UI.DataFieldWithIntentBasedNavigation"
    )]
    DataFieldWithIntentBasedNavigation(DataFieldWithIntentBasedNavigation),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldForAnnotation",
        alias = "UI.DataFieldForAnnotation"
    )]
    DataFieldForAnnotation(DataFieldForAnnotation),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldForAction",
        alias = "UI.DataFieldForAction"
    )]
    DataFieldForAction(DataFieldForAction),
    #[serde(
        rename = "com.sap.vocabularies.UI.v1.DataFieldForIntentBasedNavigation",
        alias = "UI.DataFieldForIntentBasedNavigation"
    )]
    DataFieldForIntentBasedNavigation(DataFieldForIntentBasedNavigation),
    #[serde(other)]
    Unknown,
}

impl<'de> Deserialize<'de> for DataFieldAbstract {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = serde_json::Value::deserialize(deserializer)?;
        if !record
            .get("$Type")
            .is_some_and(serde_json::Value::is_string)
        {
            return Ok(DataFieldAbstract::Unknown);
        }
        DataFieldAbstract::deserialize(record).map_err(de::Error::custom)
    }
}

impl Serialize for DataFieldAbstract {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DataFieldAbstract::serialize(self, serializer)
    }
}

impl DataFieldAbstract {
    /// Short type name used as key prefix, e.g. `DataFieldForAction`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DataField(_) => "DataField",
            Self::DataFieldWithUrl(_) => "DataFieldWithUrl",
            Self::DataFieldWithNavigationPath(_) => "DataFieldWithNavigationPath",
            Self::DataFieldWithAction(_) => "DataFieldWithAction",
            Self::DataFieldWithIntentBasedNavigation(_) => "DataFieldWithIntentBasedNavigation",
            Self::DataFieldForAnnotation(_) => "DataFieldForAnnotation",
            Self::DataFieldForAction(_) => "DataFieldForAction",
            Self::DataFieldForIntentBasedNavigation(_) => "DataFieldForIntentBasedNavigation",
            Self::Unknown => "Unknown",
        }
    }

    pub fn annotations(&self) -> Option<&FieldAnnotations> {
        match self {
            Self::DataField(field) => Some(&field.annotations),
            Self::DataFieldWithUrl(field) => Some(&field.annotations),
            Self::DataFieldWithNavigationPath(field) => Some(&field.annotations),
            Self::DataFieldWithAction(field) => Some(&field.annotations),
            Self::DataFieldWithIntentBasedNavigation(field) => Some(&field.annotations),
            Self::DataFieldForAnnotation(field) => Some(&field.annotations),
            Self::DataFieldForAction(field) => Some(&field.annotations),
            Self::DataFieldForIntentBasedNavigation(field) => Some(&field.annotations),
            Self::Unknown => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::DataField(field) => field.label.as_deref(),
            Self::DataFieldWithUrl(field) => field.label.as_deref(),
            Self::DataFieldWithNavigationPath(field) => field.label.as_deref(),
            Self::DataFieldWithAction(field) => field.label.as_deref(),
            Self::DataFieldWithIntentBasedNavigation(field) => field.label.as_deref(),
            Self::DataFieldForAnnotation(field) => field.label.as_deref(),
            Self::DataFieldForAction(field) => field.label.as_deref(),
            Self::DataFieldForIntentBasedNavigation(field) => field.label.as_deref(),
            Self::Unknown => None,
        }
    }

    /// `Value` path for the kinds that render a property.
    pub fn value_path(&self) -> Option<&str> {
        match self {
            Self::DataField(field) => Some(field.value.as_str()),
            Self::DataFieldWithUrl(field) => Some(field.value.as_str()),
            Self::DataFieldWithNavigationPath(field) => Some(field.value.as_str()),
            Self::DataFieldWithAction(field) => Some(field.value.as_str()),
            Self::DataFieldWithIntentBasedNavigation(field) => Some(field.value.as_str()),
            _ => None,
        }
    }

    /// True for `DataFieldForAction` and `DataFieldForIntentBasedNavigation`,
    /// which become toolbar actions instead of columns.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            Self::DataFieldForAction(_) | Self::DataFieldForIntentBasedNavigation(_)
        )
    }

    pub fn is_statically_hidden(&self) -> bool {
        self.annotations()
            .is_some_and(FieldAnnotations::is_statically_hidden)
    }

    pub fn importance(&self) -> Option<Importance> {
        self.annotations().and_then(|annotations| annotations.importance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldGroup {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<DataFieldAbstract>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataPoint {
    #[serde(default)]
    pub title: Option<String>,
    pub value: PathExpression,
    #[serde(default)]
    pub target_value: Option<Dynamic<f64>>,
    #[serde(default)]
    pub criticality: Option<Dynamic<String>>,
    #[serde(default)]
    pub visualization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SortOrder {
    pub property: PathExpression,
    #[serde(default)]
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresentationVariant {
    #[serde(default)]
    pub sort_order: Vec<SortOrder>,
    #[serde(default)]
    pub group_by: Vec<PathExpression>,
    #[serde(default)]
    pub total: Vec<PathExpression>,
    #[serde(default)]
    pub max_items: Option<u32>,
    #[serde(default)]
    pub visualizations: Vec<AnnotationPathExpression>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_deserializes_to_unknown() {
        let json = r#"{"$Type":"com.sap.vocabularies.UI.v1.DataFieldForFutureThing","Foo":1}"#;
        let field: DataFieldAbstract = serde_json::from_str(json).unwrap();
        assert_eq!(field, DataFieldAbstract::Unknown);
        assert!(field.annotations().is_none());
    }

    #[test]
    fn data_field_with_annotations() {
        let json = r#"{
            "$Type": "UI.DataField",
            "Value": {"$Path": "Price"},
            "Label": "Net Price",
            "annotations": {"UI.Importance": "High", "UI.Hidden": {"$Path": "IsHidden"}}
        }"#;
        let field: DataFieldAbstract = serde_json::from_str(json).unwrap();
        assert_eq!(field.value_path(), Some("Price"));
        assert_eq!(field.label(), Some("Net Price"));
        assert_eq!(field.importance(), Some(Importance::High));
        assert!(!field.is_statically_hidden());
    }

    #[test]
    fn action_fields_are_actions() {
        let json = r#"{"$Type":"com.sap.vocabularies.UI.v1.DataFieldForAction","Action":"svc.Approve","Inline":true}"#;
        let field: DataFieldAbstract = serde_json::from_str(json).unwrap();
        assert!(field.is_action());
        match field {
            DataFieldAbstract::DataFieldForAction(action) => {
                assert!(action.inline);
                assert!(!action.determining);
            }
            other => panic!("unexpected field {other:?}"),
        }
    }
}
