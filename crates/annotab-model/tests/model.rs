//! Tests for annotab-model snapshot deserialization.

use annotab_model::{
    AnnotationPath, AnnotationTarget, DataFieldAbstract, ManifestSettings, MetadataAccessor,
    SelectionModeSetting, ServiceMetadata, TableType, TextArrangement,
};

const METADATA: &str = r#"{
    "namespace": "sales",
    "entitySets": [
        {"name": "Orders", "entityType": "sales.Order"}
    ],
    "entityTypes": [
        {
            "name": "sales.Order",
            "keys": ["ID"],
            "properties": [
                {"name": "ID", "type": "Edm.Guid", "nullable": false},
                {
                    "name": "Customer",
                    "type": "Edm.String",
                    "annotations": {
                        "Common.Label": "Customer",
                        "Common.Text": {"$Path": "CustomerName"},
                        "Common.Text@UI.TextArrangement": "TextOnly"
                    }
                },
                {"name": "CustomerName", "type": "Edm.String"},
                {
                    "name": "Amount",
                    "type": "Edm.Decimal",
                    "precision": 15,
                    "scale": 2,
                    "annotations": {"Measures.ISOCurrency": {"$Path": "Currency"}}
                },
                {"name": "Currency", "type": "Edm.String", "maxLength": 5}
            ],
            "annotations": {
                "UI.LineItem": {
                    "": [
                        {"$Type": "com.sap.vocabularies.UI.v1.DataField", "Value": {"$Path": "Customer"}},
                        {"$Type": "com.sap.vocabularies.UI.v1.DataField", "Value": {"$Path": "Amount"}},
                        {"$Type": "com.sap.vocabularies.UI.v1.DataFieldForAction", "Action": "sales.approve"},
                        {"$Type": "com.sap.vocabularies.UI.v1.DataFieldForChart"}
                    ]
                },
                "Common.SemanticKey": [{"$Path": "ID"}]
            }
        }
    ]
}"#;

#[test]
fn metadata_snapshot_deserializes() {
    let metadata: ServiceMetadata = serde_json::from_str(METADATA).expect("parse metadata");
    let order = metadata.entity_type("sales.Order").expect("entity type");
    assert!(order.is_semantic_key("ID"));

    let customer = metadata.property(order, "Customer").expect("property");
    assert_eq!(
        customer.property.text_arrangement(),
        Some(TextArrangement::TextOnly)
    );
    let amount = order.property("Amount").expect("amount");
    assert_eq!(amount.currency_path(), Some("Currency"));

    let path: AnnotationPath = "@UI.LineItem".parse().expect("path");
    let resolved = metadata
        .annotations_by_term(order, &path)
        .expect("line item");
    let AnnotationTarget::LineItem(fields) = resolved.target else {
        panic!("expected a line item");
    };
    assert_eq!(fields.len(), 4);
    assert!(fields[2].is_action());
    assert_eq!(fields[3], DataFieldAbstract::Unknown);
}

#[test]
fn manifest_snapshot_deserializes() {
    let json = r#"{
        "template": "ObjectPage",
        "controls": {
            "_Items/@com.sap.vocabularies.UI.v1.LineItem": {
                "tableSettings": {"type": "GridTable", "selectionMode": "Single"},
                "columns": {"Custom": {"header": "Custom", "template": "my.Fragment"}},
                "actions": {"DataFieldForAction::sales.approve": {"enabled": "{= true}"}}
            }
        }
    }"#;
    let manifest: ManifestSettings = serde_json::from_str(json).expect("parse manifest");
    let control = manifest
        .control_configuration("_Items/@UI.LineItem")
        .expect("control");
    assert_eq!(control.table_settings.table_type, Some(TableType::GridTable));
    assert_eq!(
        control.table_settings.selection_mode,
        Some(SelectionModeSetting::Single)
    );
    assert_eq!(control.columns.len(), 1);
    assert_eq!(control.actions.len(), 1);
}

#[test]
fn records_without_type_are_kept_as_unknown() {
    let fields: Vec<DataFieldAbstract> = serde_json::from_str(
        r#"[
            {"$Type": "UI.DataField", "Value": {"$Path": "A"}},
            {"Value": {"$Path": "B"}},
            {"$Type": 7, "Value": {"$Path": "C"}}
        ]"#,
    )
    .expect("line item with untyped records");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].value_path(), Some("A"));
    assert_eq!(fields[1], DataFieldAbstract::Unknown);
    assert_eq!(fields[2], DataFieldAbstract::Unknown);
}

#[test]
fn known_record_with_missing_members_still_fails() {
    let parsed = serde_json::from_str::<DataFieldAbstract>(r#"{"$Type": "UI.DataField"}"#);
    assert!(parsed.is_err());
}

#[test]
fn manifest_ignores_device_flags() {
    let json = r#"{
        "template": "ListReport",
        "device": {"phone": true, "tablet": false},
        "hideFilterBar": true
    }"#;
    let manifest: ManifestSettings = serde_json::from_str(json).expect("parse manifest");
    assert!(manifest.hide_filter_bar);
    assert!(manifest.controls.is_empty());
}
