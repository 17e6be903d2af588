//! Column label resolution.

use annotab_model::{DataFieldAbstract, Property};

/// Where a label is rendered; field group members never fall back to the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelContext {
    Column,
    FieldGroupMember,
}

/// Label declared by the property's unqualified `UI.DataFieldDefault`.
fn default_field_label(property: &Property) -> Option<&str> {
    property
        .annotations
        .data_field_default
        .as_ref()
        .and_then(DataFieldAbstract::label)
}

/// Label of a value field.
///
/// Priority: `DataFieldDefault` label, field `Label`, property `Common.Label`,
/// then the raw property name.
pub fn field_label(
    field: &DataFieldAbstract,
    property: Option<&Property>,
    context: LabelContext,
) -> Option<String> {
    if let Some(label) = property.and_then(default_field_label) {
        return Some(label.to_string());
    }
    if let Some(label) = field.label() {
        return Some(label.to_string());
    }
    if context == LabelContext::FieldGroupMember {
        return None;
    }
    let property = property?;
    Some(property.label().unwrap_or(&property.name).to_string())
}

/// Label of a column that stands for a bare property.
pub fn property_label(property: &Property) -> String {
    default_field_label(property)
        .or_else(|| property.label())
        .unwrap_or(&property.name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_model::{DataField, FieldAnnotations, PathExpression, PropertyAnnotations};

    fn price(label: Option<&str>) -> Property {
        Property {
            name: "Price".to_string(),
            type_name: "Edm.Decimal".to_string(),
            nullable: true,
            max_length: None,
            precision: None,
            scale: None,
            is_collection: false,
            annotations: PropertyAnnotations {
                label: label.map(str::to_string),
                ..PropertyAnnotations::default()
            },
        }
    }

    fn field(label: Option<&str>) -> DataFieldAbstract {
        DataFieldAbstract::DataField(DataField {
            value: PathExpression::new("Price"),
            label: label.map(str::to_string),
            annotations: FieldAnnotations::default(),
        })
    }

    #[test]
    fn field_label_wins_over_property_label() {
        let property = price(Some("Price (net)"));
        let label = field_label(&field(Some("Net")), Some(&property), LabelContext::Column);
        assert_eq!(label.as_deref(), Some("Net"));
    }

    #[test]
    fn falls_back_to_common_label_then_name() {
        let labelled = price(Some("Price (net)"));
        assert_eq!(
            field_label(&field(None), Some(&labelled), LabelContext::Column).as_deref(),
            Some("Price (net)")
        );
        let bare = price(None);
        assert_eq!(
            field_label(&field(None), Some(&bare), LabelContext::Column).as_deref(),
            Some("Price")
        );
    }

    #[test]
    fn field_group_members_skip_property_chain() {
        let property = price(Some("Price (net)"));
        assert_eq!(
            field_label(&field(None), Some(&property), LabelContext::FieldGroupMember),
            None
        );
    }

    #[test]
    fn data_field_default_label_comes_first() {
        let mut property = price(Some("Price (net)"));
        property.annotations.data_field_default = Some(field(Some("Default Label")));
        let label = field_label(&field(Some("Net")), Some(&property), LabelContext::Column);
        assert_eq!(label.as_deref(), Some("Default Label"));
    }
}
