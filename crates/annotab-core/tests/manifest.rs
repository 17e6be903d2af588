mod common;

use annotab_model::{ActionKind, Availability, ColumnKind, SelectionMode, SelectionModeValue};
use serde_json::{Value, json};

use common::{Harness, assert_closed, assert_unique_keys, manifest_json};

fn overriding_manifest() -> Value {
    let mut manifest = manifest_json();
    manifest["controls"] = json!({
        "@com.sap.vocabularies.UI.v1.LineItem": {
            "columns": {
                "DataField::OrderNo": { "width": "12em", "header": "Order Number" },
                "CustomLink": {
                    "header": "Link",
                    "template": "sales.ext.fragment.Link",
                    "properties": ["OrderNo", "GrossAmount", "Missing"],
                    "position": { "anchor": "DataField::OrderNo", "placement": "Before" }
                },
                "Bogus": { "width": "5em" },
                "Note": {
                    "header": "Note",
                    "template": "sales.ext.fragment.Note",
                    "availability": "Adaptation"
                }
            },
            "actions": {
                "DataFieldForAction::sales.approve": {
                    "text": "Ignored",
                    "enabled": "{CanApprove}",
                    "command": "Approve"
                },
                "Refresh": { "text": "Refresh", "press": "sales.ext.controller.refresh" },
                "Export": {
                    "text": "Export",
                    "press": "sales.ext.controller.export",
                    "requiresSelection": true,
                    "position": { "anchor": "Refresh", "placement": "Before" }
                }
            },
            "tableSettings": { "selectionLimit": 50, "enableExport": false }
        }
    });
    manifest
}

#[test]
fn column_override_keeps_annotation_identity() {
    let harness = Harness::with_manifest(overriding_manifest());
    let table = harness.compile_orders();

    let order_no = table.column_by_key("DataField::OrderNo").expect("order number");
    assert_eq!(order_no.kind, ColumnKind::Annotation);
    assert_eq!(order_no.width.as_deref(), Some("12em"));
    assert_eq!(order_no.header.as_deref(), Some("Order Number"));
    assert_eq!(order_no.label.as_deref(), Some("Order"));
    assert!(table.column_by_key("Bogus").is_none());
    assert!(harness.has_issue("UNMATCHED_MANIFEST_COLUMN"));
}

#[test]
fn custom_columns_are_positioned_and_linked() {
    let harness = Harness::with_manifest(overriding_manifest());
    let table = harness.compile_orders();

    assert_eq!(table.columns[0].key, "CustomLink");
    assert_eq!(table.columns[1].key, "DataField::OrderNo");
    let link = &table.columns[0];
    assert_eq!(link.kind, ColumnKind::Slot);
    assert_eq!(link.header.as_deref(), Some("Link"));
    assert_eq!(link.template.as_deref(), Some("sales.ext.fragment.Link"));
    assert_eq!(link.property_infos, vec!["OrderNo", "Property::GrossAmount"]);
    assert!(link.sortable);
    assert!(harness.has_issue("UNKNOWN_CUSTOM_COLUMN_PROPERTY"));

    let note = table.columns.last().expect("appended column");
    assert_eq!(note.key, "Note");
    assert_eq!(note.availability, Availability::Adaptation);
    assert!(!note.sortable);

    assert_closed(&table);
    assert_unique_keys(&table);
}

#[test]
fn action_override_touches_only_mergeable_members() {
    let harness = Harness::with_manifest(overriding_manifest());
    let table = harness.compile_orders();

    let approve = table
        .action("DataFieldForAction::sales.approve")
        .expect("approve");
    assert_eq!(approve.kind, ActionKind::DataFieldForAction);
    assert_eq!(approve.text.as_deref(), Some("Approve"));
    assert_eq!(approve.enabled.as_deref(), Some("{CanApprove}"));
    assert_eq!(approve.command.as_deref(), Some("Approve"));
    assert_eq!(approve.requires_selection, Some(true));
}

#[test]
fn custom_actions_are_appended_and_anchored() {
    let harness = Harness::with_manifest(overriding_manifest());
    let table = harness.compile_orders();

    let keys: Vec<&str> = table.actions.iter().map(|action| action.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "DataFieldForAction::sales.approve",
            "DataFieldForIntentBasedNavigation::Customer::display",
            "DataFieldForAction::sales.copy",
            "Export",
            "Refresh",
        ]
    );

    let refresh = table.action("Refresh").expect("refresh");
    assert_eq!(refresh.kind, ActionKind::Default);
    assert_eq!(refresh.visible, "true");
    assert_eq!(refresh.enabled.as_deref(), Some("true"));
    assert_eq!(refresh.requires_selection, Some(false));
    assert_eq!(refresh.press.as_deref(), Some("sales.ext.controller.refresh"));

    let export = table.action("Export").expect("export");
    insta::assert_snapshot!(
        export.enabled.clone().unwrap_or_default(),
        @"{= %{internal>numberOfSelectedContexts} >= 1}"
    );
    assert_eq!(
        table.annotation.selection_mode,
        SelectionMode::Literal(SelectionModeValue::Multi)
    );
}

#[test]
fn table_settings_reach_the_control() {
    let harness = Harness::with_manifest(overriding_manifest());
    let table = harness.compile_orders();

    assert_eq!(table.control.selection_limit, 50);
    assert!(!table.control.enable_export);
    assert!(!table.control.enable_paste);
}

#[test]
fn statically_hidden_action_cannot_be_revived() {
    let mut fields = common::order_line_item();
    let approve = serde_json::from_value(json!({
        "$Type": "UI.DataFieldForAction",
        "Action": "sales.approve",
        "annotations": { "UI.Hidden": true }
    }))
    .expect("hidden action record");
    fields[5] = approve;
    let harness = Harness::with(
        common::with_order_line_item(fields),
        serde_json::from_value(overriding_manifest()).expect("manifest"),
    );
    let table = harness.compile_orders();

    assert!(table.action("DataFieldForAction::sales.approve").is_none());
    assert!(table.action("Refresh").is_some());
}
