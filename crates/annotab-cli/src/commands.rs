use std::fs;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use annotab_cli::inputs::{build_request, load_manifest, load_metadata, load_options};
use annotab_cli::overview::entity_set_overview;
use annotab_core::{CompileContext, compile_table};
use annotab_model::{DiagnosticsCollector, IssueSeverity};

use crate::cli::{CompileArgs, InspectArgs};
use crate::summary::print_overview;
use crate::types::CompileReport;

pub fn run_compile(args: &CompileArgs) -> Result<CompileReport> {
    let span = info_span!("compile", entity_set = %args.entity_set);
    let _guard = span.enter();

    let service = load_metadata(&args.metadata)?;
    let manifest = load_manifest(&args.manifest)?;
    let options = load_options(args.config.as_deref())?;
    let request = build_request(
        &args.entity_set,
        args.navigation_path.as_deref(),
        args.line_item.as_ref(),
        args.presentation_variant.as_ref(),
    );

    let diagnostics = DiagnosticsCollector::new();
    let ctx = CompileContext::new(&service, &manifest, &diagnostics, &options);
    let table = compile_table(&ctx, &request)
        .with_context(|| format!("compile table for {}", args.entity_set))?;

    let json = serde_json::to_string_pretty(&table).context("serialize descriptor")?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "descriptor written");
        }
        None => println!("{json}"),
    }

    let strict = args.strict || options.strict;
    let strict_failure = strict && diagnostics.has_at_least(IssueSeverity::Medium);
    info!(
        columns = table.columns.len(),
        actions = table.actions.len(),
        issues = diagnostics.issues().len(),
        "compiled table"
    );
    Ok(CompileReport {
        entity_set: args.entity_set.clone(),
        navigation_path: args.navigation_path.clone(),
        table,
        issues: diagnostics.issues(),
        output: args.output.clone(),
        strict_failure,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let service = load_metadata(&args.metadata)?;
    print_overview(&entity_set_overview(&service));
    Ok(())
}
