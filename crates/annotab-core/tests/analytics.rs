mod common;

use annotab_core::TableRequest;
use annotab_model::{AnnotationPath, TableType, Term};
use serde_json::json;

use common::{Harness, assert_closed, manifest_json};

fn analytical_harness() -> Harness {
    let mut manifest = manifest_json();
    manifest["controls"] = json!({
        "@UI.LineItem": { "tableSettings": { "type": "AnalyticalTable" } }
    });
    Harness::with_manifest(manifest)
}

fn items_request() -> TableRequest {
    TableRequest::new("SalesOrderItems").with_presentation_variant(AnnotationPath::new(
        Term::PresentationVariant,
        Some("Analytics"),
    ))
}

#[test]
fn analytical_table_renders_as_grid_with_analytics() {
    let harness = analytical_harness();
    let table = harness.compile(&items_request()).expect("items table compiles");

    assert_eq!(table.control.table_type, TableType::GridTable);
    assert_eq!(table.enable_analytics, Some(true));
    assert_eq!(table.enable_basic_search, Some(true));
    assert_eq!(table.annotation.threshold, 100);
    assert_eq!(
        table.annotation.p13n_mode.as_deref(),
        Some("Sort,Column,Group,Aggregate")
    );
    assert_closed(&table);
}

#[test]
fn custom_aggregate_lands_on_plain_property_column() {
    let harness = analytical_harness();
    let table = harness.compile(&items_request()).expect("items table compiles");

    let aggregates = table.aggregates.as_ref().expect("aggregates");
    assert_eq!(aggregates.len(), 1);
    let quantity = aggregates.get("Property::Quantity").expect("quantity aggregate");
    assert_eq!(quantity.relative_path, "Quantity");
    assert_eq!(
        quantity.default_aggregate.label.as_deref(),
        Some("Total Quantity")
    );

    let column = table.column("Property::Quantity").expect("quantity column");
    assert_eq!(column.aggregatable, Some(true));
    assert!(column.extension.is_some());

    let composite = table.column("Quantity").expect("line item column");
    assert_eq!(composite.aggregatable, None);
    assert!(table.column("QuantityUnit").is_some_and(|unit| unit.aggregatable.is_none()));
}

#[test]
fn groupable_properties_drive_grouping() {
    let harness = analytical_harness();
    let table = harness.compile(&items_request()).expect("items table compiles");

    assert!(table.column("Product").is_some_and(|column| column.is_groupable));
    assert!(table.column("ID").is_some_and(|column| !column.is_groupable));

    let levels = &table
        .annotation
        .group_conditions
        .as_ref()
        .expect("group conditions")
        .group_levels;
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].name, "Product");

    let totals = table
        .annotation
        .aggregate_conditions
        .as_ref()
        .expect("aggregate conditions");
    assert!(totals.contains("Property::Quantity"));
}

#[test]
fn analytical_request_without_apply_supported_falls_back_to_grid() {
    let mut manifest = manifest_json();
    manifest["controls"] = json!({
        "@UI.LineItem": { "tableSettings": { "type": "AnalyticalTable" } }
    });
    let harness = Harness::with_manifest(manifest);
    let table = harness.compile_orders();

    assert_eq!(table.control.table_type, TableType::GridTable);
    assert_eq!(table.enable_analytics, None);
    assert_eq!(table.aggregates, None);
    assert_eq!(table.annotation.threshold, 100);
    assert!(harness.has_issue("ANALYTICS_NOT_SUPPORTED"));
    assert!(table.annotation.group_conditions.is_none());
}

#[test]
fn unresolved_presentation_variant_is_reported() {
    let harness = Harness::new();
    let table = harness
        .compile(
            &TableRequest::new("SalesOrderItems").with_presentation_variant(AnnotationPath::new(
                Term::PresentationVariant,
                Some("Nope"),
            )),
        )
        .expect("items table compiles");

    assert!(table.annotation.sort_conditions.is_none());
    assert!(harness.has_issue("UNRESOLVED_PRESENTATION_VARIANT"));
    assert_eq!(table.enable_analytics, None);
}
