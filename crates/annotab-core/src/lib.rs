//! Compiles OData UI annotations and manifest overrides into a
//! [`TableVisualization`](annotab_model::TableVisualization).
//!
//! The compiler is a pure function of its inputs: a metadata snapshot, a
//! capability resolver and the manifest settings, all reached through a
//! [`CompileContext`]. Soft problems go to the context's diagnostics sink;
//! only unresolvable requests and conflicting configuration fail.
//!
//! Stages, in order:
//! - columns from the line item, then from remaining properties, then hidden
//!   columns for every dependency ([`columns`])
//! - manifest column and action overrides ([`merge`])
//! - toolbar actions ([`actions`]) and the selection mode ([`selection`])
//! - table configuration ([`config`], [`control`]) and analytics ([`analytics`])

pub mod actions;
pub mod analytics;
pub mod columns;
pub mod config;
pub mod context;
pub mod control;
pub mod error;
pub mod export;
pub mod keys;
pub mod labels;
pub mod merge;
pub mod properties;
pub mod selection;
pub mod table;
pub mod typing;

pub use context::{CompileContext, CompileOptions, TableScope};
pub use error::{CompileError, Result};
pub use table::{TableRequest, compile_table};
