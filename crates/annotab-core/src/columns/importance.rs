//! Column importance.

use annotab_model::{DataFieldAbstract, EntityType, FieldGroup, Importance};

/// Importance of a column rendering the property at `path`.
///
/// Semantic keys are always `High`; otherwise the field's own importance.
pub fn value_importance(entity_type: &EntityType, field: &DataFieldAbstract, path: &str) -> Importance {
    if entity_type.is_semantic_key(path) {
        return Importance::High;
    }
    field.importance().unwrap_or(Importance::None)
}

/// Importance of a field group column.
///
/// A group containing a semantic key is `High`; otherwise the importance on
/// the referencing field, else the highest importance among the members.
pub fn field_group_importance(
    entity_type: &EntityType,
    field: &DataFieldAbstract,
    group: &FieldGroup,
    navigation_prefix: &str,
) -> Importance {
    let wraps_semantic_key = navigation_prefix.is_empty()
        && group.data.iter().any(|member| {
            member
                .value_path()
                .is_some_and(|path| entity_type.is_semantic_key(path))
        });
    if wraps_semantic_key {
        return Importance::High;
    }
    if let Some(importance) = field.importance() {
        return importance;
    }
    let mut highest: Option<Importance> = None;
    for importance in group.data.iter().filter_map(DataFieldAbstract::importance) {
        if highest.is_none_or(|current| importance.weight() > current.weight()) {
            highest = Some(importance);
        }
    }
    highest.unwrap_or(Importance::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_model::{
        DataField, EntityTypeAnnotations, FieldAnnotations, PathExpression,
    };

    fn field(path: &str, importance: Option<Importance>) -> DataFieldAbstract {
        DataFieldAbstract::DataField(DataField {
            value: PathExpression::new(path),
            label: None,
            annotations: FieldAnnotations {
                importance,
                ..FieldAnnotations::default()
            },
        })
    }

    fn order() -> EntityType {
        EntityType {
            name: "sales.Order".to_string(),
            keys: vec!["ID".to_string()],
            properties: Vec::new(),
            navigation_properties: Vec::new(),
            annotations: EntityTypeAnnotations {
                semantic_key: vec![PathExpression::new("OrderNo")],
                ..EntityTypeAnnotations::default()
            },
        }
    }

    #[test]
    fn semantic_key_is_high() {
        let order = order();
        let plain = field("OrderNo", Some(Importance::Low));
        assert_eq!(value_importance(&order, &plain, "OrderNo"), Importance::High);
        let other = field("Note", None);
        assert_eq!(value_importance(&order, &other, "Note"), Importance::None);
    }

    #[test]
    fn field_group_takes_highest_member() {
        let order = order();
        let group = FieldGroup {
            label: None,
            data: vec![
                field("A", Some(Importance::Low)),
                field("B", Some(Importance::Medium)),
                field("C", None),
            ],
        };
        let reference = field("Group", None);
        assert_eq!(
            field_group_importance(&order, &reference, &group, ""),
            Importance::Medium
        );
        let explicit = field("Group", Some(Importance::Low));
        assert_eq!(
            field_group_importance(&order, &explicit, &group, ""),
            Importance::Low
        );
    }

    #[test]
    fn field_group_with_semantic_key_is_high() {
        let order = order();
        let group = FieldGroup {
            label: None,
            data: vec![field("OrderNo", None)],
        };
        let reference = field("Group", Some(Importance::Low));
        assert_eq!(
            field_group_importance(&order, &reference, &group, ""),
            Importance::High
        );
    }
}
