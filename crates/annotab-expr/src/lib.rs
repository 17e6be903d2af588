//! Binding expression construction and compilation.
//!
//! Build an [`Expression`] with the folding constructors, then [`compile`] it
//! into the string form the renderer binds against.

pub mod compile;
pub mod expression;
pub mod paths;

pub use compile::compile;
pub use expression::{
    ComparisonOperator, Expression, Value, and, binding, compare, constant, equal, format_result,
    greater_or_equal, if_else, not, not_equal, or, path, path_in_model,
};
