use annotab_model::{MetadataAccessor, ServiceMetadata};

#[derive(Debug)]
pub struct EntitySetOverview {
    pub name: String,
    pub entity_type: String,
    /// Zero when the entity type cannot be resolved.
    pub properties: usize,
    /// Line item qualifiers, `""` for the unqualified one.
    pub line_items: Vec<String>,
    pub presentation_variants: Vec<String>,
    pub navigations: Vec<String>,
}

/// One row per entity set, sorted by name.
pub fn entity_set_overview(service: &ServiceMetadata) -> Vec<EntitySetOverview> {
    let mut sets: Vec<EntitySetOverview> = service
        .entity_sets
        .iter()
        .map(|set| {
            let entity_type = service.entity_type(&set.entity_type);
            EntitySetOverview {
                name: set.name.clone(),
                entity_type: set.entity_type.clone(),
                properties: entity_type.map_or(0, |entity_type| entity_type.properties.len()),
                line_items: entity_type
                    .map(|entity_type| entity_type.annotations.line_items.keys().cloned().collect())
                    .unwrap_or_default(),
                presentation_variants: entity_type
                    .map(|entity_type| {
                        entity_type
                            .annotations
                            .presentation_variants
                            .keys()
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default(),
                navigations: set.navigation_property_bindings.keys().cloned().collect(),
            }
        })
        .collect();
    sets.sort_by(|a, b| a.name.cmp(&b.name));
    sets
}
