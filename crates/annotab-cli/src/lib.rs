//! Library side of the annotab CLI: input loading, metadata overview and logging setup.

pub mod inputs;
pub mod logging;
pub mod overview;
