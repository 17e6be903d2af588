//! Stable keys for columns and actions.
//!
//! Keys are derived from the source annotation only, so the same metadata
//! always yields the same keys.

use annotab_model::DataFieldAbstract;

const PROPERTY_PREFIX: &str = "Property::";

/// Replaces path separators and drops annotation markers so a path can be
/// used inside a key.
pub fn sanitize(text: &str) -> String {
    text.replace('@', "")
        .replace(['/', '#'], "::")
        .trim_start_matches("::")
        .to_string()
}

/// Key of the column or action generated for a line item record.
pub fn data_field_key(field: &DataFieldAbstract) -> Option<String> {
    let key = match field {
        DataFieldAbstract::DataFieldForAnnotation(field) => {
            format!("DataFieldForAnnotation::{}", sanitize(&field.target.value))
        }
        DataFieldAbstract::DataFieldForAction(action) => {
            format!("DataFieldForAction::{}", sanitize(&action.action))
        }
        DataFieldAbstract::DataFieldForIntentBasedNavigation(navigation) => {
            match navigation.action.as_deref() {
                Some(action) => format!(
                    "DataFieldForIntentBasedNavigation::{}::{}",
                    sanitize(&navigation.semantic_object),
                    sanitize(action)
                ),
                None => format!(
                    "DataFieldForIntentBasedNavigation::{}",
                    sanitize(&navigation.semantic_object)
                ),
            }
        }
        DataFieldAbstract::Unknown => return None,
        other => format!("{}::{}", other.type_name(), sanitize(other.value_path()?)),
    };
    Some(key)
}

/// Key of a column that stands for a bare property.
pub fn property_key(path: &str) -> String {
    format!("{PROPERTY_PREFIX}{}", sanitize(path))
}

/// Name of the duplicate created when a property name is taken by a line item column.
pub fn property_alias(name: &str) -> String {
    format!("{PROPERTY_PREFIX}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_model::{
        AnnotationPathExpression, DataField, DataFieldForAction, DataFieldForAnnotation,
        FieldAnnotations, PathExpression,
    };

    #[test]
    fn value_fields_key_on_their_path() {
        let field = DataFieldAbstract::DataField(DataField {
            value: PathExpression::new("_Customer/Name"),
            label: None,
            annotations: FieldAnnotations::default(),
        });
        assert_eq!(
            data_field_key(&field).as_deref(),
            Some("DataField::_Customer::Name")
        );
    }

    #[test]
    fn annotation_and_action_keys() {
        let group = DataFieldAbstract::DataFieldForAnnotation(DataFieldForAnnotation {
            label: None,
            target: AnnotationPathExpression::new("@UI.FieldGroup#Prices"),
            annotations: FieldAnnotations::default(),
        });
        assert_eq!(
            data_field_key(&group).as_deref(),
            Some("DataFieldForAnnotation::UI.FieldGroup::Prices")
        );

        let action = DataFieldAbstract::DataFieldForAction(DataFieldForAction {
            label: None,
            action: "sales.approve".to_string(),
            inline: false,
            determining: false,
            invocation_grouping: None,
            annotations: FieldAnnotations::default(),
        });
        assert_eq!(
            data_field_key(&action).as_deref(),
            Some("DataFieldForAction::sales.approve")
        );
        assert_eq!(data_field_key(&DataFieldAbstract::Unknown), None);
    }

    #[test]
    fn property_keys() {
        assert_eq!(property_key("Price"), "Property::Price");
        assert_eq!(property_key("_Items/Quantity"), "Property::_Items::Quantity");
        assert_eq!(property_alias("_Items/Quantity"), "Property::_Items/Quantity");
    }
}
