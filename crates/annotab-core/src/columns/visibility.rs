//! Row-level visibility expressions for columns.

use annotab_expr::paths::{node_expanded, node_level};
use annotab_expr::{Expression, and, constant, equal, not, or, path};
use annotab_model::{DataFieldAbstract, Dynamic, DynamicBool, Property};

/// The `UI.Hidden` value as an expression; absent means not hidden.
pub fn hidden_flag(hidden: Option<&DynamicBool>, prefix: &str) -> Expression {
    match hidden {
        None => constant(false),
        Some(Dynamic::Static(value)) => constant(*value),
        Some(Dynamic::Path(hidden)) => path(format!("{prefix}{}", hidden.as_str())),
    }
}

/// True unless `UI.Hidden` evaluates to true.
pub fn shown(hidden: Option<&DynamicBool>, prefix: &str) -> Expression {
    not(equal(hidden_flag(hidden, prefix), constant(true)))
}

fn field_hidden(field: &DataFieldAbstract) -> Option<&DynamicBool> {
    field.annotations().and_then(|annotations| annotations.hidden.as_ref())
}

/// Visibility of a field rendering `property`.
///
/// In analytical tables the value is also suppressed on expanded group
/// header rows below the root.
pub fn field_visibility(
    field: &DataFieldAbstract,
    property: Option<(&Property, &str)>,
    analytics: bool,
) -> Expression {
    let mut conditions = vec![shown(field_hidden(field), "")];
    if let Some((property, prefix)) = property {
        conditions.push(shown(property.annotations.hidden.as_ref(), prefix));
    }
    if analytics {
        conditions.push(or([not(node_expanded()), equal(node_level(), constant(0u32))]));
    }
    and(conditions)
}

/// A field group is visible while any member is, unless the referencing
/// field carries its own `UI.Hidden`.
pub fn field_group_visibility(field: &DataFieldAbstract, members: &Expression) -> Expression {
    match field_hidden(field) {
        Some(hidden) => shown(Some(hidden), ""),
        None => members.clone(),
    }
}
