//! Column building.
//!
//! Columns are collected in a [`ColumnArena`]: line item columns first, then
//! one column per remaining property, then hidden columns for every
//! dependency that is still missing. Dependencies are stored as arena indices
//! and only turned into names when the arena is flattened, so a dependency
//! that has to move to a `Property::` duplicate is relinked everywhere at once.

mod annotation;
pub mod importance;
mod property;
pub mod visibility;

use std::collections::{BTreeSet, HashMap};

use annotab_model::{Column, FormatOptions, PropertyTarget};
use tracing::debug;

pub use annotation::line_item_columns;
pub use property::{property_columns, related_column};

use crate::context::TableScope;
use crate::keys::{property_alias, property_key};
use crate::properties::RelatedProperties;
use crate::typing::is_sortable_type;

/// Which builder produced a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    LineItem,
    Property,
    /// Hidden column created to satisfy a dependency.
    Related,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(usize);

#[derive(Debug)]
struct Entry {
    column: Column,
    origin: ColumnOrigin,
    composite: bool,
    pending: Vec<String>,
    pending_additional: Vec<String>,
    links: Vec<ColumnId>,
    additional_links: Vec<ColumnId>,
}

/// Index-linked column store for one table.
#[derive(Debug, Default)]
pub struct ColumnArena {
    entries: Vec<Entry>,
    by_name: HashMap<String, ColumnId>,
    keys: BTreeSet<String>,
    text_only: BTreeSet<String>,
    units: BTreeSet<String>,
}

impl ColumnArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Seen so far only as the text of a `#TextOnly` property.
    pub fn is_text_only(&self, path: &str) -> bool {
        self.text_only.contains(path)
    }

    /// Currency and unit properties seen while collecting dependencies.
    pub fn units(&self) -> &BTreeSet<String> {
        &self.units
    }

    /// Adds a column with its dependencies. Returns `None` when its name or
    /// key is already taken; the first column wins.
    pub fn insert(
        &mut self,
        column: Column,
        origin: ColumnOrigin,
        related: RelatedProperties,
    ) -> Option<ColumnId> {
        if self.by_name.contains_key(&column.name) || self.keys.contains(&column.key) {
            debug!(key = %column.key, name = %column.name, "skipping duplicate column");
            return None;
        }
        let id = ColumnId(self.entries.len());
        self.by_name.insert(column.name.clone(), id);
        self.keys.insert(column.key.clone());
        self.text_only.extend(related.text_only);
        self.units.extend(related.units);
        self.entries.push(Entry {
            column,
            origin,
            composite: !related.properties.is_empty(),
            pending: related.properties,
            pending_additional: related.additional,
            links: Vec::new(),
            additional_links: Vec::new(),
        });
        Some(id)
    }

    /// Resolves every pending dependency to a column, creating hidden
    /// columns through `build(path, name, key, text_only)` where needed.
    pub fn link_dependencies<F>(&mut self, mut build: F)
    where
        F: FnMut(&str, &str, String, bool) -> Option<Column>,
    {
        let mut index = 0;
        while index < self.entries.len() {
            let owner = ColumnId(index);
            let pending = std::mem::take(&mut self.entries[index].pending);
            for path in pending {
                if let Some(link) = self.resolve_link(owner, &path, &mut build)
                    && !self.entries[index].links.contains(&link)
                {
                    self.entries[index].links.push(link);
                }
            }
            let pending = std::mem::take(&mut self.entries[index].pending_additional);
            for path in pending {
                if let Some(link) = self.resolve_link(owner, &path, &mut build)
                    && !self.entries[index].additional_links.contains(&link)
                    && !self.entries[index].links.contains(&link)
                {
                    self.entries[index].additional_links.push(link);
                }
            }
            index += 1;
        }
    }

    fn resolve_link<F>(&mut self, owner: ColumnId, path: &str, build: &mut F) -> Option<ColumnId>
    where
        F: FnMut(&str, &str, String, bool) -> Option<Column>,
    {
        let name = match self.by_name.get(path).copied() {
            Some(host) if self.can_host(owner, host) => return Some(host),
            Some(_) => property_alias(path),
            None => path.to_string(),
        };
        if let Some(existing) = self.by_name.get(&name).copied() {
            return Some(existing);
        }
        let text_only = self.text_only.contains(path);
        let mut key = property_key(path);
        if self.keys.contains(&key) {
            key = property_key(&name);
        }
        let Some(column) = build(path, &name, key, text_only) else {
            debug!(path, "dependency does not resolve to a property");
            return None;
        };
        debug!(path, name = %name, "adding hidden column for dependency");
        self.insert(column, ColumnOrigin::Related, RelatedProperties::default())
    }

    /// Plain property columns other than the owner can be shared.
    fn can_host(&self, owner: ColumnId, host: ColumnId) -> bool {
        let entry = &self.entries[host.0];
        host != owner
            && !entry.composite
            && matches!(entry.origin, ColumnOrigin::Property | ColumnOrigin::Related)
    }

    /// Flattens the arena, turning links into column names.
    pub fn into_columns(self) -> Vec<Column> {
        let names: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.column.name.clone())
            .collect();
        self.entries
            .into_iter()
            .map(|entry| {
                let mut column = entry.column;
                column.property_infos = entry.links.iter().map(|id| names[id.0].clone()).collect();
                column.additional_property_infos = entry
                    .additional_links
                    .iter()
                    .map(|id| names[id.0].clone())
                    .collect();
                column
            })
            .collect()
    }
}

/// Sortable unless restricted, of a non-sortable type, or multi-valued.
pub(crate) fn is_sortable(scope: &TableScope<'_>, target: &PropertyTarget<'_>) -> bool {
    if let Some(restrictions) = &scope.target_set.annotations.sort_restrictions {
        if restrictions.sortable == Some(false) {
            return false;
        }
        if restrictions
            .non_sortable_properties
            .iter()
            .any(|path| path.as_str() == target.path)
        {
            return false;
        }
    }
    is_sortable_type(&target.property.type_name) && !target.is_multi_value()
}

/// Analytical tables group by the declared groupable properties only.
pub(crate) fn is_groupable(scope: &TableScope<'_>, path: &str, sortable: bool) -> bool {
    if !scope.is_analytics() {
        return sortable;
    }
    scope
        .entity_type
        .annotations
        .apply_supported
        .as_ref()
        .is_some_and(|apply| {
            apply
                .groupable_properties
                .iter()
                .any(|groupable| groupable.as_str() == path)
        })
}

/// Group (path up to the last slash) and its label for a navigated property.
pub(crate) fn group_of(target: &PropertyTarget<'_>) -> (Option<String>, Option<String>) {
    let Some((group, _)) = target.path.rsplit_once('/') else {
        return (None, None);
    };
    let label = target
        .crosses_navigation()
        .then(|| target.entity_type.annotations.header_info.as_ref())
        .flatten()
        .and_then(|header| header.type_name.clone());
    (Some(group.to_string()), label)
}

/// Binding to the semantic object of a property, if it declares one.
pub(crate) fn semantic_object_path(target: &PropertyTarget<'_>) -> Option<String> {
    let semantic_object = target.property.annotations.semantic_object.as_ref()?;
    Some(match semantic_object.path() {
        Some(path) => format!("{{{}{path}}}", target.navigation_prefix()),
        None => format!("{}@Common.SemanticObject", target.path),
    })
}

/// Draft indicator for columns showing a semantic key of the rows.
pub(crate) fn draft_indicator(scope: &TableScope<'_>, path: &str) -> Option<FormatOptions> {
    scope.entity_type.is_semantic_key(path).then(|| FormatOptions {
        has_draft_indicator: Some(true),
        ..FormatOptions::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotab_model::ColumnKind;

    fn column(name: &str, key: &str) -> Column {
        Column::new(key, name, ColumnKind::Default)
    }

    fn related(properties: &[&str]) -> RelatedProperties {
        RelatedProperties {
            properties: properties.iter().map(|p| (*p).to_string()).collect(),
            ..RelatedProperties::default()
        }
    }

    fn build(path: &str, name: &str, key: String, _text_only: bool) -> Option<Column> {
        (path != "Unknown").then(|| Column::new(key, name, ColumnKind::Default))
    }

    #[test]
    fn shares_property_hosts_and_duplicates_line_item_hosts() {
        let mut arena = ColumnArena::new();
        arena.insert(
            Column::new("DataField::Price", "Price", ColumnKind::Annotation),
            ColumnOrigin::LineItem,
            related(&["Price", "Currency"]),
        );
        arena.insert(
            column("Currency", "Property::Currency"),
            ColumnOrigin::Property,
            RelatedProperties::default(),
        );
        arena.link_dependencies(build);
        let columns = arena.into_columns();

        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Price", "Currency", "Property::Price"]);
        assert_eq!(columns[0].property_infos, vec!["Property::Price", "Currency"]);
        assert_eq!(columns[2].key, "Property::Price");
    }

    #[test]
    fn missing_dependency_becomes_named_hidden_column() {
        let mut arena = ColumnArena::new();
        arena.insert(
            Column::new("DataField::Name", "Name", ColumnKind::Annotation),
            ColumnOrigin::LineItem,
            related(&["Name", "_Customer/Name", "Unknown"]),
        );
        arena.link_dependencies(build);
        let columns = arena.into_columns();
        assert_eq!(columns[0].property_infos, vec!["Property::Name", "_Customer/Name"]);
        assert_eq!(columns[2].key, "Property::_Customer::Name");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut arena = ColumnArena::new();
        assert!(
            arena
                .insert(column("A", "K1"), ColumnOrigin::Property, RelatedProperties::default())
                .is_some()
        );
        assert!(
            arena
                .insert(column("A", "K2"), ColumnOrigin::Property, RelatedProperties::default())
                .is_none()
        );
        assert!(
            arena
                .insert(column("B", "K1"), ColumnOrigin::Property, RelatedProperties::default())
                .is_none()
        );
        assert_eq!(arena.into_columns().len(), 1);
    }
}
