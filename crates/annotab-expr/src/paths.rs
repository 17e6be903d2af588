//! Well-known paths of the renderer's UI and internal models.

use crate::expression::{Expression, path_in_model};

pub const UI_MODEL: &str = "ui";
pub const INTERNAL_MODEL: &str = "internal";

/// `ui>/isEditable`: the page is in edit mode.
pub fn is_editable() -> Expression {
    path_in_model("/isEditable", Some(UI_MODEL))
}

/// `internal>numberOfSelectedContexts`: rows currently selected in the table.
pub fn number_of_selected_contexts() -> Expression {
    path_in_model("numberOfSelectedContexts", Some(INTERNAL_MODEL))
}

/// Hierarchy level of the current row in grouped or tree tables.
pub fn node_level() -> Expression {
    path_in_model("@$ui5.node.level", None)
}

/// Whether the current group-header row is expanded.
pub fn node_expanded() -> Expression {
    path_in_model("@$ui5.node.isExpanded", None)
}
