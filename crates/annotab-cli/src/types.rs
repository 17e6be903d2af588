use std::path::PathBuf;

use annotab_model::{Issue, TableVisualization};

#[derive(Debug)]
pub struct CompileReport {
    pub entity_set: String,
    pub navigation_path: Option<String>,
    pub table: TableVisualization,
    pub issues: Vec<Issue>,
    /// File the descriptor was written to; `None` when printed to stdout.
    pub output: Option<PathBuf>,
    /// A medium or high issue was raised while strict checking was on.
    pub strict_failure: bool,
}

impl CompileReport {
    pub fn exit_code(&self) -> i32 {
        i32::from(self.strict_failure)
    }
}
