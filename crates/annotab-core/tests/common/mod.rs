#![allow(dead_code)]

use std::collections::HashSet;

use annotab_core::{CompileContext, CompileOptions, Result, TableRequest, compile_table};
use annotab_model::{
    DataFieldAbstract, DiagnosticsCollector, IssueSeverity, ManifestSettings, ServiceMetadata,
    TableVisualization,
};
use serde_json::{Value, json};

pub const ORDER_TYPE: &str = "sales.SalesOrder";
pub const ITEM_TYPE: &str = "sales.SalesOrderItem";

fn data_field(path: &str) -> Value {
    json!({ "$Type": "UI.DataField", "Value": { "$Path": path } })
}

fn for_annotation(target: &str) -> Value {
    json!({ "$Type": "UI.DataFieldForAnnotation", "Target": { "$AnnotationPath": target } })
}

/// Sales order service: orders with items, a draft root, one bound action
/// with row-dependent availability and an aggregated item type.
pub fn service_json() -> Value {
    json!({
        "namespace": "sales",
        "entitySets": [
            {
                "name": "SalesOrders",
                "entityType": ORDER_TYPE,
                "navigationPropertyBindings": { "_Items": "SalesOrderItems" },
                "annotations": {
                    "Common.DraftRoot": { "NewAction": "sales.draftNew" }
                }
            },
            { "name": "SalesOrderItems", "entityType": ITEM_TYPE }
        ],
        "entityTypes": [
            {
                "name": ORDER_TYPE,
                "keys": ["ID"],
                "properties": [
                    { "name": "ID", "type": "Edm.Guid", "nullable": false },
                    { "name": "OrderNo", "type": "Edm.String", "maxLength": 10,
                      "annotations": { "Common.Label": "Order" } },
                    { "name": "CustomerID", "type": "Edm.String",
                      "annotations": {
                          "Common.Label": "Customer",
                          "Common.Text": { "$Path": "CustomerName" },
                          "Common.Text@UI.TextArrangement": "TextOnly"
                      } },
                    { "name": "CustomerName", "type": "Edm.String",
                      "annotations": { "Common.Label": "Customer Name" } },
                    { "name": "GrossAmount", "type": "Edm.Decimal", "precision": 15, "scale": 2,
                      "annotations": {
                          "Common.Label": "Gross Amount",
                          "Measures.ISOCurrency": { "$Path": "Currency" }
                      } },
                    { "name": "Currency", "type": "Edm.String",
                      "annotations": { "Common.Label": "Currency" } },
                    { "name": "Status", "type": "Edm.String",
                      "annotations": { "Common.Label": "Status" } },
                    { "name": "StatusCriticality", "type": "Edm.Byte",
                      "annotations": { "UI.Hidden": true } },
                    { "name": "CreatedAt", "type": "Edm.DateTimeOffset", "precision": 7,
                      "annotations": { "Common.Label": "Created At" } },
                    { "name": "CanApprove", "type": "Edm.Boolean",
                      "annotations": { "UI.Hidden": true } }
                ],
                "navigationProperties": [
                    { "name": "_Items", "targetType": ITEM_TYPE, "isCollection": true }
                ],
                "annotations": {
                    "UI.LineItem": {
                        "": [
                            data_field("OrderNo"),
                            data_field("CustomerID"),
                            data_field("GrossAmount"),
                            for_annotation("@UI.FieldGroup#Admin"),
                            for_annotation("@UI.DataPoint#Status"),
                            { "$Type": "UI.DataFieldForAction", "Label": "Approve",
                              "Action": "sales.approve" },
                            { "$Type": "UI.DataFieldForIntentBasedNavigation",
                              "Label": "Show Customer", "SemanticObject": "Customer",
                              "Action": "display" },
                            { "$Type": "UI.DataFieldForAction", "Action": "sales.copy",
                              "annotations": { "UI.IsCopyAction": true } }
                        ],
                        "Plain": [data_field("OrderNo"), data_field("Status")]
                    },
                    "UI.FieldGroup": {
                        "Admin": {
                            "Label": "Administration",
                            "Data": [data_field("Status"), data_field("CreatedAt")]
                        }
                    },
                    "UI.DataPoint": {
                        "Status": {
                            "Title": "Order Status",
                            "Value": { "$Path": "Status" },
                            "Criticality": { "$Path": "StatusCriticality" }
                        }
                    },
                    "UI.PresentationVariant": {
                        "": {
                            "SortOrder": [
                                { "Property": { "$Path": "CreatedAt" }, "Descending": true },
                                { "Property": { "$Path": "_Items" } }
                            ],
                            "Visualizations": [{ "$AnnotationPath": "@UI.LineItem" }]
                        }
                    },
                    "UI.LineItem@UI.Criticality": { "": { "$Path": "StatusCriticality" } },
                    "UI.HeaderInfo": { "TypeName": "Sales Order", "TypeNamePlural": "Sales Orders" },
                    "Common.SemanticKey": [{ "$Path": "OrderNo" }]
                }
            },
            {
                "name": ITEM_TYPE,
                "keys": ["ID"],
                "properties": [
                    { "name": "ID", "type": "Edm.Guid", "nullable": false },
                    { "name": "Product", "type": "Edm.String",
                      "annotations": { "Common.Label": "Product" } },
                    { "name": "Quantity", "type": "Edm.Decimal", "precision": 13, "scale": 3,
                      "annotations": {
                          "Common.Label": "Quantity",
                          "Measures.Unit": { "$Path": "QuantityUnit" }
                      } },
                    { "name": "QuantityUnit", "type": "Edm.String",
                      "annotations": { "Common.Label": "Unit" } }
                ],
                "annotations": {
                    "UI.LineItem": {
                        "": [data_field("Product"), data_field("Quantity")]
                    },
                    "UI.PresentationVariant": {
                        "Analytics": {
                            "GroupBy": [{ "$Path": "Product" }],
                            "Total": [{ "$Path": "Quantity" }]
                        }
                    },
                    "Aggregation.ApplySupported": {
                        "Transformations": ["aggregate", "groupby", "search"],
                        "GroupableProperties": [{ "$Path": "Product" }],
                        "AggregatableProperties": [{ "$Path": "Quantity" }]
                    },
                    "Aggregation.CustomAggregate": {
                        "Quantity": { "$Type": "Edm.Decimal", "Common.Label": "Total Quantity" }
                    }
                }
            }
        ],
        "actions": [
            {
                "name": "sales.approve",
                "isBound": true,
                "sourceType": ORDER_TYPE,
                "bindingParameter": "_it",
                "annotations": { "Core.OperationAvailable": { "$Path": "_it/CanApprove" } }
            },
            {
                "name": "sales.copy",
                "isBound": true,
                "sourceType": ORDER_TYPE,
                "bindingParameter": "_it"
            },
            { "name": "sales.draftNew", "isBound": true, "sourceType": ORDER_TYPE, "isStatic": true }
        ]
    })
}

pub fn service() -> ServiceMetadata {
    serde_json::from_value(service_json()).expect("fixture service deserializes")
}

/// List report manifest navigating to an object page.
pub fn manifest_json() -> Value {
    json!({
        "template": "ListReport",
        "navigation": {
            "SalesOrders": { "detail": { "route": "SalesOrderObjectPage" } },
            "_Items": { "detail": { "route": "SalesOrderItemObjectPage" } }
        }
    })
}

pub fn manifest() -> ManifestSettings {
    serde_json::from_value(manifest_json()).expect("fixture manifest deserializes")
}

/// Owns every input of one compilation.
pub struct Harness {
    pub service: ServiceMetadata,
    pub manifest: ManifestSettings,
    pub diagnostics: DiagnosticsCollector,
    pub options: CompileOptions,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(service(), manifest())
    }

    pub fn with(service: ServiceMetadata, manifest: ManifestSettings) -> Self {
        Self {
            service,
            manifest,
            diagnostics: DiagnosticsCollector::new(),
            options: CompileOptions::default(),
        }
    }

    pub fn with_manifest(manifest: Value) -> Self {
        Self::with(
            service(),
            serde_json::from_value(manifest).expect("manifest deserializes"),
        )
    }

    pub fn compile(&self, request: &TableRequest) -> Result<TableVisualization> {
        let ctx = CompileContext::new(&self.service, &self.manifest, &self.diagnostics, &self.options);
        compile_table(&ctx, request)
    }

    pub fn compile_orders(&self) -> TableVisualization {
        self.compile(&TableRequest::new("SalesOrders"))
            .expect("sales order table compiles")
    }

    pub fn issue_codes(&self) -> Vec<String> {
        self.diagnostics
            .issues()
            .into_iter()
            .filter_map(|issue| issue.code)
            .collect()
    }

    pub fn has_issue(&self, code: &str) -> bool {
        self.issue_codes().iter().any(|issued| issued == code)
    }

    pub fn low_issue_count(&self) -> usize {
        self.diagnostics.count(IssueSeverity::Low)
    }
}

/// Replaces the unqualified line item of the sales order type.
pub fn with_order_line_item(fields: Vec<DataFieldAbstract>) -> ServiceMetadata {
    let mut service = service();
    let order = service
        .entity_types
        .iter_mut()
        .find(|entity_type| entity_type.name == ORDER_TYPE)
        .expect("order type");
    order.annotations.line_items.insert(String::new(), fields);
    service
}

/// Every field of the unqualified sales order line item.
pub fn order_line_item() -> Vec<DataFieldAbstract> {
    service()
        .entity_types
        .into_iter()
        .find(|entity_type| entity_type.name == ORDER_TYPE)
        .and_then(|entity_type| entity_type.annotations.line_items.get("").cloned())
        .expect("order line item")
}

/// Every `propertyInfos` and `additionalPropertyInfos` entry names a column.
pub fn assert_closed(table: &TableVisualization) {
    let names: HashSet<&str> = table.columns.iter().map(|column| column.name.as_str()).collect();
    for column in &table.columns {
        for reference in column
            .property_infos
            .iter()
            .chain(&column.additional_property_infos)
        {
            assert!(
                names.contains(reference.as_str()),
                "column {} references missing column {reference}",
                column.key
            );
        }
    }
}

/// Column keys, column names and action keys are unique.
pub fn assert_unique_keys(table: &TableVisualization) {
    let mut keys = HashSet::new();
    let mut names = HashSet::new();
    for column in &table.columns {
        assert!(keys.insert(column.key.as_str()), "duplicate column key {}", column.key);
        assert!(names.insert(column.name.as_str()), "duplicate column name {}", column.name);
    }
    let mut actions = HashSet::new();
    for action in &table.actions {
        assert!(actions.insert(action.key.as_str()), "duplicate action key {}", action.key);
    }
}
