//! Aggregation wiring for analytical tables.

use std::collections::{BTreeMap, BTreeSet};

use annotab_model::{
    AggregateDefinition, Column, ColumnExtension, CustomAggregateDefinition, IssueCategory,
    IssueSeverity,
};
use tracing::debug;

use crate::context::{CompileContext, TableScope};
use crate::keys::property_alias;

/// Aggregation switches for the descriptor.
#[derive(Debug, Clone, Default)]
pub struct Analytics {
    pub aggregates: Option<BTreeMap<String, AggregateDefinition>>,
    pub enable_analytics: Option<bool>,
    pub enable_basic_search: Option<bool>,
}

/// Column showing the bare property `name`, if any.
fn property_column<'c>(columns: &'c mut [Column], name: &str) -> Option<&'c mut Column> {
    let alias = property_alias(name);
    let index = columns
        .iter()
        .position(|column| column.name == name && !column.is_composite())
        .or_else(|| columns.iter().position(|column| column.name == alias))?;
    columns.get_mut(index)
}

/// Marks aggregatable columns and collects custom aggregate definitions.
///
/// Only analytical tables are touched. Currency and unit properties never
/// become aggregates since their values are aggregated with the amount they
/// qualify.
pub fn apply_analytics(
    ctx: &CompileContext<'_>,
    scope: &TableScope<'_>,
    units: &BTreeSet<String>,
    columns: &mut [Column],
) -> Analytics {
    if !scope.is_analytics() {
        return Analytics::default();
    }
    let annotations = &scope.entity_type.annotations;
    let mut aggregates = BTreeMap::new();

    for (name, aggregate) in &annotations.custom_aggregates {
        if units.contains(name) {
            debug!(property = %name, "skipping aggregate on unit property");
            continue;
        }
        let definition = CustomAggregateDefinition {
            context_defining_properties: aggregate
                .context_defining_properties
                .iter()
                .map(|path| path.as_str().to_string())
                .collect(),
            label: aggregate.label.clone(),
        };
        let Some(column) = property_column(columns, name) else {
            ctx.report(
                IssueCategory::Annotation,
                IssueSeverity::Low,
                &format!("custom aggregate {name} matches no column"),
                "UNMATCHED_AGGREGATE",
            );
            continue;
        };
        column.aggregatable = Some(true);
        column.extension = Some(ColumnExtension {
            custom_aggregate: Some(definition.clone()),
        });
        aggregates.insert(
            column.name.clone(),
            AggregateDefinition {
                default_aggregate: definition,
                relative_path: name.clone(),
            },
        );
    }

    let apply = annotations.apply_supported.as_ref();
    for path in apply.iter().flat_map(|apply| &apply.aggregatable_properties) {
        if units.contains(path.as_str()) {
            continue;
        }
        if let Some(column) = property_column(columns, path.as_str()) {
            column.aggregatable = Some(true);
        }
    }

    Analytics {
        aggregates: Some(aggregates),
        enable_analytics: Some(true),
        enable_basic_search: Some(apply.is_some_and(|apply| {
            apply
                .transformations
                .iter()
                .any(|transformation| transformation == "search")
        })),
    }
}
