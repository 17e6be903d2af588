//! Service metadata snapshot and the accessor trait the compiler reads it through.
//!
//! The snapshot is a resolved, JSON-friendly view of a CSDL document: entity
//! sets, entity and complex types, bound and unbound operations, and the
//! vocabulary annotations the table compiler consumes. Annotation blocks are
//! keyed by their term alias (`UI.LineItem`, `Common.Label`, ...); qualified
//! terms are maps from qualifier to value with the unqualified entry at `""`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationPath, Dynamic, DynamicBool, PathExpression, Term};
use crate::data_field::{DataFieldAbstract, DataPoint, FieldGroup, PresentationVariant};
use crate::enums::TextArrangement;

/// Qualifier to value map; the unqualified annotation lives under `""`.
pub type Qualified<T> = BTreeMap<String, T>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,
    #[serde(default)]
    pub entity_types: Vec<EntityType>,
    #[serde(default)]
    pub complex_types: Vec<ComplexType>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
    /// Navigation property name to target entity set name.
    #[serde(default)]
    pub navigation_property_bindings: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: EntitySetAnnotations,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySetAnnotations {
    #[serde(rename = "Capabilities.DeleteRestrictions", default)]
    pub delete_restrictions: Option<DeleteRestrictions>,
    #[serde(rename = "Capabilities.UpdateRestrictions", default)]
    pub update_restrictions: Option<UpdateRestrictions>,
    #[serde(rename = "Capabilities.InsertRestrictions", default)]
    pub insert_restrictions: Option<InsertRestrictions>,
    #[serde(rename = "Capabilities.SearchRestrictions", default)]
    pub search_restrictions: Option<SearchRestrictions>,
    #[serde(rename = "Capabilities.SortRestrictions", default)]
    pub sort_restrictions: Option<SortRestrictions>,
    #[serde(rename = "Capabilities.NavigationRestrictions", default)]
    pub navigation_restrictions: Option<NavigationRestrictions>,
    #[serde(rename = "Common.DraftRoot", default)]
    pub draft_root: Option<DraftRoot>,
    #[serde(rename = "Session.StickySessionSupported", default)]
    pub sticky_session: Option<StickySessionSupported>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRestrictions {
    #[serde(default)]
    pub deletable: Option<DynamicBool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateRestrictions {
    #[serde(default)]
    pub updatable: Option<DynamicBool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InsertRestrictions {
    #[serde(default)]
    pub insertable: Option<DynamicBool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRestrictions {
    #[serde(default)]
    pub searchable: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SortRestrictions {
    #[serde(default)]
    pub sortable: Option<bool>,
    #[serde(default)]
    pub non_sortable_properties: Vec<PathExpression>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NavigationRestrictions {
    #[serde(default)]
    pub restricted_properties: Vec<RestrictedNavigation>,
}

/// Restrictions that apply when an entity set is reached through a navigation property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestrictedNavigation {
    pub navigation_property: PathExpression,
    #[serde(default)]
    pub delete_restrictions: Option<DeleteRestrictions>,
    #[serde(default)]
    pub update_restrictions: Option<UpdateRestrictions>,
    #[serde(default)]
    pub insert_restrictions: Option<InsertRestrictions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DraftRoot {
    #[serde(default)]
    pub new_action: Option<String>,
    #[serde(default)]
    pub edit_action: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StickySessionSupported {
    #[serde(default)]
    pub new_action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
    /// Fully qualified name, e.g. `sales.SalesOrderType`.
    pub name: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
    #[serde(default)]
    pub annotations: EntityTypeAnnotations,
}

impl EntityType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn navigation_property(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_properties
            .iter()
            .find(|navigation| navigation.name == name)
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.keys.iter().any(|key| key == name)
    }

    pub fn is_semantic_key(&self, path: &str) -> bool {
        self.annotations
            .semantic_key
            .iter()
            .any(|key| key.as_str() == path)
    }

    /// Short name without the namespace.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityTypeAnnotations {
    #[serde(rename = "UI.LineItem", default)]
    pub line_items: Qualified<Vec<DataFieldAbstract>>,
    #[serde(rename = "UI.FieldGroup", default)]
    pub field_groups: Qualified<FieldGroup>,
    #[serde(rename = "UI.DataPoint", default)]
    pub data_points: Qualified<DataPoint>,
    #[serde(rename = "UI.PresentationVariant", default)]
    pub presentation_variants: Qualified<PresentationVariant>,
    /// Row criticality per line item qualifier.
    #[serde(rename = "UI.LineItem@UI.Criticality", default)]
    pub line_item_criticality: Qualified<Dynamic<String>>,
    #[serde(rename = "UI.HeaderInfo", default)]
    pub header_info: Option<HeaderInfo>,
    #[serde(rename = "UI.DeleteHidden", default)]
    pub delete_hidden: Option<DynamicBool>,
    #[serde(rename = "UI.CreateHidden", default)]
    pub create_hidden: Option<DynamicBool>,
    #[serde(rename = "UI.UpdateHidden", default)]
    pub update_hidden: Option<DynamicBool>,
    #[serde(rename = "Common.SemanticKey", default)]
    pub semantic_key: Vec<PathExpression>,
    #[serde(rename = "Aggregation.ApplySupported", default)]
    pub apply_supported: Option<ApplySupported>,
    /// Keyed by the aggregated property name.
    #[serde(rename = "Aggregation.CustomAggregate", default)]
    pub custom_aggregates: Qualified<CustomAggregate>,
    #[serde(rename = "Hierarchy.RecursiveHierarchy", default)]
    pub recursive_hierarchies: Qualified<RecursiveHierarchy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeaderInfo {
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub type_name_plural: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplySupported {
    #[serde(default)]
    pub transformations: Vec<String>,
    #[serde(default)]
    pub groupable_properties: Vec<PathExpression>,
    #[serde(default)]
    pub aggregatable_properties: Vec<PathExpression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomAggregate {
    /// Result type of the aggregate, e.g. `Edm.Decimal`.
    #[serde(rename = "$Type", default)]
    pub type_name: Option<String>,
    #[serde(rename = "Common.Label", default)]
    pub label: Option<String>,
    #[serde(rename = "Aggregation.ContextDefiningProperties", default)]
    pub context_defining_properties: Vec<PathExpression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecursiveHierarchy {
    pub node_property: PathExpression,
    pub parent_navigation_property: PathExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexType {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
}

impl ComplexType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    /// `Edm.*` primitive or the qualified name of a complex type.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub is_collection: bool,
    #[serde(default)]
    pub annotations: PropertyAnnotations,
}

fn default_true() -> bool {
    true
}

impl Property {
    pub fn is_primitive(&self) -> bool {
        self.type_name.starts_with("Edm.")
    }

    pub fn label(&self) -> Option<&str> {
        self.annotations.label.as_deref()
    }

    pub fn is_statically_hidden(&self) -> bool {
        self.annotations
            .hidden
            .as_ref()
            .is_some_and(DynamicBool::is_static_true)
    }

    pub fn text_path(&self) -> Option<&str> {
        self.annotations.text.as_ref().map(PathExpression::as_str)
    }

    /// Text arrangement declared next to `Common.Text`, if any.
    pub fn text_arrangement(&self) -> Option<TextArrangement> {
        self.annotations.text.as_ref()?;
        self.annotations.text_arrangement
    }

    pub fn currency_path(&self) -> Option<&str> {
        self.annotations.iso_currency.as_ref().and_then(Dynamic::path)
    }

    pub fn unit_path(&self) -> Option<&str> {
        self.annotations.unit.as_ref().and_then(Dynamic::path)
    }

    pub fn timezone_path(&self) -> Option<&str> {
        self.annotations.timezone.as_ref().and_then(Dynamic::path)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyAnnotations {
    #[serde(rename = "Common.Label", default)]
    pub label: Option<String>,
    #[serde(rename = "Common.Text", default)]
    pub text: Option<PathExpression>,
    #[serde(rename = "Common.Text@UI.TextArrangement", default)]
    pub text_arrangement: Option<TextArrangement>,
    #[serde(rename = "Measures.ISOCurrency", default)]
    pub iso_currency: Option<Dynamic<String>>,
    #[serde(rename = "Measures.Unit", default)]
    pub unit: Option<Dynamic<String>>,
    #[serde(rename = "Common.Timezone", default)]
    pub timezone: Option<Dynamic<String>>,
    #[serde(rename = "UI.Hidden", default)]
    pub hidden: Option<DynamicBool>,
    #[serde(rename = "Common.SemanticObject", default)]
    pub semantic_object: Option<Dynamic<String>>,
    #[serde(rename = "UI.DataFieldDefault", default)]
    pub data_field_default: Option<DataFieldAbstract>,
    #[serde(rename = "Common.IsDigitSequence", default)]
    pub is_digit_sequence: bool,
    #[serde(rename = "Common.IsUpperCase", default)]
    pub is_upper_case: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProperty {
    pub name: String,
    pub target_type: String,
    #[serde(default)]
    pub is_collection: bool,
}

/// A bound or unbound action or function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Qualified name, e.g. `sales.approve`.
    pub name: String,
    #[serde(default)]
    pub is_bound: bool,
    #[serde(default)]
    pub is_function: bool,
    /// Entity type of the binding parameter for bound operations.
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub binding_parameter: Option<String>,
    /// Bound to a collection rather than a single entity.
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: ActionAnnotations,
}

impl ActionDefinition {
    /// `OperationAvailable` path with the binding parameter segment stripped.
    pub fn operation_available_path(&self) -> Option<String> {
        let path = self.annotations.operation_available.as_ref()?.path()?;
        let stripped = self
            .binding_parameter
            .as_deref()
            .and_then(|parameter| path.strip_prefix(parameter))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path);
        Some(stripped.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionAnnotations {
    #[serde(rename = "Core.OperationAvailable", default)]
    pub operation_available: Option<DynamicBool>,
}

/// A property reached from an entity type through navigation and complex segments.
#[derive(Debug, Clone, Copy)]
pub struct PropertyTarget<'a> {
    pub property: &'a Property,
    /// Entity type the last navigation segment lands on.
    pub entity_type: &'a EntityType,
    /// Full relative path as given.
    pub path: &'a str,
    /// Length of the leading navigation-only part of `path`, including the slash.
    navigation_len: usize,
    multi_value: bool,
}

impl<'a> PropertyTarget<'a> {
    /// Leading navigation segments with trailing slash, or empty.
    pub fn navigation_prefix(&self) -> &'a str {
        &self.path[..self.navigation_len]
    }

    /// Reached through a to-many navigation or itself a collection.
    pub fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    pub fn crosses_navigation(&self) -> bool {
        self.navigation_len > 0
    }
}

/// The value an annotation path resolves to.
#[derive(Debug, Clone, Copy)]
pub enum AnnotationTarget<'a> {
    LineItem(&'a [DataFieldAbstract]),
    FieldGroup(&'a FieldGroup),
    DataPoint(&'a DataPoint),
    PresentationVariant(&'a PresentationVariant),
}

#[derive(Debug, Clone)]
pub struct ResolvedAnnotation<'a> {
    pub target: AnnotationTarget<'a>,
    /// Entity type carrying the annotation.
    pub entity_type: &'a EntityType,
    /// Navigation prefix from the source entity type, with trailing slash.
    pub navigation_prefix: String,
}

/// Read access to service metadata.
///
/// Implementors provide lookups by name; path resolution is derived from those.
pub trait MetadataAccessor {
    fn entity_set(&self, name: &str) -> Option<&EntitySet>;

    fn entity_type(&self, name: &str) -> Option<&EntityType>;

    fn complex_type(&self, name: &str) -> Option<&ComplexType>;

    /// Looks up an operation by qualified name. Accepts the overload form
    /// `ns.action(ns.BindingType)`.
    fn action(&self, name: &str) -> Option<&ActionDefinition>;

    fn navigation_target<'a>(
        &'a self,
        entity_type: &'a EntityType,
        name: &str,
    ) -> Option<(&'a NavigationProperty, &'a EntityType)> {
        let navigation = entity_type.navigation_property(name)?;
        let target = self.entity_type(&navigation.target_type)?;
        Some((navigation, target))
    }

    /// Entity type reached by following `navigation_path` from `entity_type`.
    fn entity_type_at<'a>(
        &'a self,
        entity_type: &'a EntityType,
        navigation_path: &str,
    ) -> Option<&'a EntityType> {
        let mut current = entity_type;
        for segment in navigation_path.split('/').filter(|s| !s.is_empty()) {
            let (_, target) = self.navigation_target(current, segment)?;
            current = target;
        }
        Some(current)
    }

    /// Resolves a `/`-separated property path through navigation and complex properties.
    fn property<'a>(
        &'a self,
        entity_type: &'a EntityType,
        path: &'a str,
    ) -> Option<PropertyTarget<'a>> {
        let segments: Vec<&str> = path.split('/').collect();
        let (last, leading) = segments.split_last()?;
        let mut current = entity_type;
        let mut complex: Option<&ComplexType> = None;
        let mut navigation_len = 0;
        let mut multi_value = false;
        for segment in leading {
            if complex.is_none()
                && let Some((navigation, target)) = self.navigation_target(current, segment)
            {
                multi_value |= navigation.is_collection;
                current = target;
                navigation_len += segment.len() + 1;
                continue;
            }
            let host = match complex {
                Some(complex_type) => complex_type.property(segment)?,
                None => current.property(segment)?,
            };
            multi_value |= host.is_collection;
            complex = Some(self.complex_type(&host.type_name)?);
        }
        let property = match complex {
            Some(complex_type) => complex_type.property(last)?,
            None => current.property(last)?,
        };
        Some(PropertyTarget {
            property,
            entity_type: current,
            path,
            navigation_len,
            multi_value: multi_value || property.is_collection,
        })
    }

    /// True if the path names a navigation property rather than a property.
    fn is_navigation_path(&self, entity_type: &EntityType, path: &str) -> bool {
        let mut segments = path.split('/').peekable();
        let mut current = entity_type;
        while let Some(segment) = segments.next() {
            match current.navigation_property(segment) {
                Some(_) if segments.peek().is_none() => return true,
                Some(navigation) => match self.entity_type(&navigation.target_type) {
                    Some(target) => current = target,
                    None => return false,
                },
                None => return false,
            }
        }
        false
    }

    /// Resolves an annotation path relative to `entity_type`.
    fn annotations_by_term<'a>(
        &'a self,
        entity_type: &'a EntityType,
        path: &AnnotationPath,
    ) -> Option<ResolvedAnnotation<'a>> {
        let host = self.entity_type_at(entity_type, &path.navigation.join("/"))?;
        let qualifier = path.qualifier_key();
        let annotations = &host.annotations;
        let target = match path.term {
            Term::LineItem => {
                AnnotationTarget::LineItem(annotations.line_items.get(qualifier)?.as_slice())
            }
            Term::FieldGroup => AnnotationTarget::FieldGroup(annotations.field_groups.get(qualifier)?),
            Term::DataPoint => AnnotationTarget::DataPoint(annotations.data_points.get(qualifier)?),
            Term::PresentationVariant => AnnotationTarget::PresentationVariant(
                annotations.presentation_variants.get(qualifier)?,
            ),
            Term::Other(_) => return None,
        };
        Some(ResolvedAnnotation {
            target,
            entity_type: host,
            navigation_prefix: path.navigation_prefix(),
        })
    }
}

impl MetadataAccessor for ServiceMetadata {
    fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|set| set.name == name)
    }

    fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types
            .iter()
            .find(|entity_type| entity_type.name == name || entity_type.short_name() == name)
    }

    fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types
            .iter()
            .find(|complex_type| complex_type.name == name)
    }

    fn action(&self, name: &str) -> Option<&ActionDefinition> {
        let (action_name, binding) = match name.split_once('(') {
            Some((action_name, rest)) => (action_name, rest.strip_suffix(')')),
            None => (name, None),
        };
        let mut candidates = self
            .actions
            .iter()
            .filter(|action| action.name == action_name);
        match binding.filter(|binding| !binding.is_empty()) {
            Some(binding) => {
                candidates.find(|action| action.source_type.as_deref() == Some(binding))
            }
            None => candidates.next(),
        }
    }
}
