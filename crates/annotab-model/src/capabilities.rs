//! Capability lookups (deletable, updatable, insertable, searchable).

use crate::annotation::DynamicBool;
use crate::metadata::{EntitySet, MetadataAccessor, RestrictedNavigation, ServiceMetadata};

/// Resolved capability: a fixed answer or a path evaluated per context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Static(bool),
    /// Boolean property path relative to the collection's entity.
    Dynamic(String),
}

impl Capability {
    pub fn is_static_false(&self) -> bool {
        matches!(self, Capability::Static(false))
    }

    pub fn is_static_true(&self) -> bool {
        matches!(self, Capability::Static(true))
    }

    fn from_annotation(value: Option<&DynamicBool>) -> Self {
        match value {
            Some(DynamicBool::Static(value)) => Capability::Static(*value),
            Some(DynamicBool::Path(path)) => Capability::Dynamic(path.path.clone()),
            None => Capability::Static(true),
        }
    }
}

/// Answers capability questions for a data-model path.
///
/// The path is an entity set name, optionally followed by a navigation path
/// (`SalesOrders` or `SalesOrders/_Items`).
pub trait CapabilityResolver {
    fn deletable(&self, path: &str) -> Capability;

    fn updatable(&self, path: &str) -> Capability;

    fn insertable(&self, path: &str) -> Capability;

    fn searchable(&self, path: &str) -> bool;
}

enum Restriction {
    Delete,
    Update,
    Insert,
}

impl ServiceMetadata {
    /// Entity set reached from `path`, following navigation property bindings.
    fn target_set(&self, path: &str) -> Option<&EntitySet> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let mut current = self.entity_set(segments.next()?)?;
        for segment in segments {
            let target = current.navigation_property_bindings.get(segment)?;
            current = self.entity_set(target)?;
        }
        Some(current)
    }

    fn restriction(&self, path: &str, restriction: &Restriction) -> Capability {
        let from_navigation = path.rsplit_once('/').and_then(|(parent, navigation)| {
            let parent_set = self.target_set(parent)?;
            let restricted = parent_set
                .annotations
                .navigation_restrictions
                .as_ref()?
                .restricted_properties
                .iter()
                .find(|restricted| restricted.navigation_property.as_str() == navigation)?;
            navigation_restriction(restricted, restriction)
        });
        if let Some(capability) = from_navigation {
            return capability;
        }
        let Some(set) = self.target_set(path) else {
            return Capability::Static(true);
        };
        let annotations = &set.annotations;
        let value = match restriction {
            Restriction::Delete => annotations
                .delete_restrictions
                .as_ref()
                .and_then(|r| r.deletable.as_ref()),
            Restriction::Update => annotations
                .update_restrictions
                .as_ref()
                .and_then(|r| r.updatable.as_ref()),
            Restriction::Insert => annotations
                .insert_restrictions
                .as_ref()
                .and_then(|r| r.insertable.as_ref()),
        };
        Capability::from_annotation(value)
    }
}

fn navigation_restriction(
    restricted: &RestrictedNavigation,
    restriction: &Restriction,
) -> Option<Capability> {
    let value = match restriction {
        Restriction::Delete => restricted.delete_restrictions.as_ref()?.deletable.as_ref(),
        Restriction::Update => restricted.update_restrictions.as_ref()?.updatable.as_ref(),
        Restriction::Insert => restricted.insert_restrictions.as_ref()?.insertable.as_ref(),
    };
    value.map(|value| Capability::from_annotation(Some(value)))
}

impl CapabilityResolver for ServiceMetadata {
    fn deletable(&self, path: &str) -> Capability {
        self.restriction(path, &Restriction::Delete)
    }

    fn updatable(&self, path: &str) -> Capability {
        self.restriction(path, &Restriction::Update)
    }

    fn insertable(&self, path: &str) -> Capability {
        self.restriction(path, &Restriction::Insert)
    }

    fn searchable(&self, path: &str) -> bool {
        self.target_set(path)
            .and_then(|set| set.annotations.search_restrictions.as_ref())
            .and_then(|restrictions| restrictions.searchable)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Dynamic, PathExpression};
    use crate::metadata::{DeleteRestrictions, EntitySetAnnotations, NavigationRestrictions};
    use std::collections::BTreeMap;

    fn metadata() -> ServiceMetadata {
        let orders = EntitySet {
            name: "Orders".to_string(),
            entity_type: "sales.Order".to_string(),
            navigation_property_bindings: BTreeMap::from([(
                "_Items".to_string(),
                "Items".to_string(),
            )]),
            annotations: EntitySetAnnotations {
                delete_restrictions: Some(DeleteRestrictions {
                    deletable: Some(Dynamic::Path(PathExpression::new("IsDeletable"))),
                }),
                navigation_restrictions: Some(NavigationRestrictions {
                    restricted_properties: vec![RestrictedNavigation {
                        navigation_property: PathExpression::new("_Items"),
                        delete_restrictions: Some(DeleteRestrictions {
                            deletable: Some(Dynamic::Static(false)),
                        }),
                        update_restrictions: None,
                        insert_restrictions: None,
                    }],
                }),
                ..EntitySetAnnotations::default()
            },
        };
        let items = EntitySet {
            name: "Items".to_string(),
            entity_type: "sales.Item".to_string(),
            navigation_property_bindings: BTreeMap::new(),
            annotations: EntitySetAnnotations::default(),
        };
        ServiceMetadata {
            entity_sets: vec![orders, items],
            ..ServiceMetadata::default()
        }
    }

    #[test]
    fn entity_set_restrictions() {
        let metadata = metadata();
        assert_eq!(
            metadata.deletable("Orders"),
            Capability::Dynamic("IsDeletable".to_string())
        );
        assert!(metadata.updatable("Orders").is_static_true());
        assert!(metadata.searchable("Orders"));
    }

    #[test]
    fn navigation_restrictions_win_over_target_set() {
        let metadata = metadata();
        assert!(metadata.deletable("Orders/_Items").is_static_false());
        assert!(metadata.insertable("Orders/_Items").is_static_true());
        assert!(metadata.deletable("Unknown").is_static_true());
    }
}
