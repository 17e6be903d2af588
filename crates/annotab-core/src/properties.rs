//! Collects the properties a column depends on.
//!
//! A column rendering `Price` may also need its currency, its timezone or its
//! text partner. Paths are relative to the table's entity type; partners
//! declared on a property reached through navigation get the same navigation
//! prefix. Partners that do not resolve are dropped.

use annotab_model::{
    AnnotationTarget, DataFieldAbstract, DataPoint, Dynamic, EntityType, FieldGroup,
    MetadataAccessor, TextArrangement,
};

/// Properties found for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedProperties {
    /// Rendered properties, in discovery order.
    pub properties: Vec<String>,
    /// Technical properties the renderer only needs to load.
    pub additional: Vec<String>,
    /// Text properties that only exist to serve a `#TextOnly` arrangement.
    pub text_only: Vec<String>,
    /// Currency and unit properties.
    pub units: Vec<String>,
    /// Export template derived from the text arrangement.
    pub export_template: Option<String>,
}

impl RelatedProperties {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.additional.is_empty()
    }

    fn add_property(&mut self, path: &str) {
        push_unique(&mut self.properties, path);
    }

    fn add_additional(&mut self, path: &str) {
        if !self.properties.iter().any(|existing| existing == path) {
            push_unique(&mut self.additional, path);
        }
    }
}

fn push_unique(list: &mut Vec<String>, path: &str) {
    if !list.iter().any(|existing| existing == path) {
        list.push(path.to_string());
    }
}

/// How the property that owns the partners is itself treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectMode {
    /// Line item column: the value joins its partners when it has any.
    Column,
    /// Member of a field group or data point: the value is always rendered.
    Member,
    /// Raw property column: the value is the column itself and never listed.
    Property,
}

struct Partners {
    units: Vec<String>,
    timezone: Option<String>,
    text: Option<String>,
    arrangement: Option<TextArrangement>,
}

impl Partners {
    fn is_empty(&self) -> bool {
        self.units.is_empty() && self.timezone.is_none() && self.text.is_none()
    }
}

pub struct PropertyCollector<'a> {
    metadata: &'a dyn MetadataAccessor,
    entity_type: &'a EntityType,
}

impl<'a> PropertyCollector<'a> {
    pub fn new(metadata: &'a dyn MetadataAccessor, entity_type: &'a EntityType) -> Self {
        Self {
            metadata,
            entity_type,
        }
    }

    /// Dependencies of the property at `path`.
    pub fn collect_property(&self, path: &str, mode: CollectMode) -> RelatedProperties {
        let mut related = RelatedProperties::default();
        self.collect_value(path, mode, &mut related);
        related
    }

    /// Dependencies of a line item record.
    pub fn collect_field(&self, field: &DataFieldAbstract) -> RelatedProperties {
        let mut related = RelatedProperties::default();
        match field {
            DataFieldAbstract::DataFieldForAnnotation(annotation) => {
                let Ok(path) = annotation.target.parse() else {
                    return related;
                };
                let Some(resolved) = self.metadata.annotations_by_term(self.entity_type, &path)
                else {
                    return related;
                };
                let prefix = resolved.navigation_prefix.as_str();
                match resolved.target {
                    AnnotationTarget::FieldGroup(group) => {
                        self.collect_field_group(prefix, group, &mut related);
                    }
                    AnnotationTarget::DataPoint(data_point) => {
                        self.collect_data_point(prefix, data_point, &mut related);
                    }
                    AnnotationTarget::LineItem(_) | AnnotationTarget::PresentationVariant(_) => {}
                }
            }
            other => {
                if let Some(path) = other.value_path() {
                    self.collect_value(path, CollectMode::Column, &mut related);
                }
            }
        }
        related
    }

    fn collect_field_group(&self, prefix: &str, group: &FieldGroup, out: &mut RelatedProperties) {
        for member in &group.data {
            match member {
                DataFieldAbstract::DataFieldForAnnotation(annotation) => {
                    let Ok(path) = annotation.target.parse() else {
                        continue;
                    };
                    let host = self
                        .metadata
                        .entity_type_at(self.entity_type, prefix.trim_end_matches('/'));
                    let resolved =
                        host.and_then(|host| self.metadata.annotations_by_term(host, &path));
                    if let Some(resolved) = resolved
                        && let AnnotationTarget::DataPoint(data_point) = resolved.target
                    {
                        let nested = format!("{prefix}{}", resolved.navigation_prefix);
                        self.collect_data_point(&nested, data_point, out);
                    }
                }
                other => {
                    if let Some(path) = other.value_path() {
                        self.collect_value(&format!("{prefix}{path}"), CollectMode::Member, out);
                    }
                }
            }
        }
    }

    fn collect_data_point(&self, prefix: &str, data_point: &DataPoint, out: &mut RelatedProperties) {
        let value = format!("{prefix}{}", data_point.value.as_str());
        self.collect_value(&value, CollectMode::Member, out);
        if let Some(Dynamic::Path(criticality)) = &data_point.criticality {
            self.add_resolved_additional(&format!("{prefix}{}", criticality.as_str()), out);
        }
        if let Some(Dynamic::Path(target)) = &data_point.target_value {
            self.add_resolved_additional(&format!("{prefix}{}", target.as_str()), out);
        }
    }

    fn add_resolved_additional(&self, path: &str, out: &mut RelatedProperties) {
        if self.metadata.property(self.entity_type, path).is_some() {
            out.add_additional(path);
        }
    }

    fn partners(&self, path: &str) -> Option<Partners> {
        let target = self.metadata.property(self.entity_type, path)?;
        let prefix = target.navigation_prefix();
        let property = target.property;
        let resolve = |partner: &str| {
            let full = format!("{prefix}{partner}");
            self.metadata
                .property(self.entity_type, &full)
                .is_some()
                .then_some(full)
        };
        let units = [property.currency_path(), property.unit_path()]
            .into_iter()
            .flatten()
            .filter_map(resolve)
            .collect();
        let text = property.text_path().and_then(resolve);
        Some(Partners {
            units,
            timezone: property.timezone_path().and_then(resolve),
            arrangement: text.as_ref().and(property.text_arrangement()),
            text,
        })
    }

    fn collect_value(&self, path: &str, mode: CollectMode, out: &mut RelatedProperties) {
        let Some(partners) = self.partners(path) else {
            return;
        };
        let text_only = partners.arrangement == Some(TextArrangement::TextOnly);
        for unit in &partners.units {
            push_unique(&mut out.units, unit);
        }
        if let Some(arrangement) = partners.arrangement {
            out.export_template = Some(arrangement.export_template().to_string());
        }

        if mode == CollectMode::Property {
            if let Some(text) = &partners.text {
                if text_only {
                    out.add_property(text);
                    push_unique(&mut out.text_only, text);
                } else {
                    out.add_additional(text);
                }
            }
            for partner in partners.units.iter().chain(&partners.timezone) {
                out.add_additional(partner);
            }
            return;
        }

        if mode == CollectMode::Column && partners.is_empty() {
            return;
        }
        if text_only {
            if let Some(text) = &partners.text {
                out.add_property(text);
                push_unique(&mut out.text_only, text);
            }
        } else {
            out.add_property(path);
            if let Some(text) = &partners.text {
                out.add_property(text);
            }
        }
        for partner in partners.units.iter().chain(&partners.timezone) {
            out.add_property(partner);
        }
        if text_only {
            out.add_additional(path);
        }
    }
}
