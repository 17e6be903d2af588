//! Reads the compiler inputs from disk.
//!
//! Metadata and manifest snapshots are JSON; compile options are TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use annotab_core::{CompileOptions, TableRequest};
use annotab_model::{AnnotationPath, ManifestSettings, ServiceMetadata};
use tracing::debug;

pub fn load_metadata(path: &Path) -> Result<ServiceMetadata> {
    let text = read(path, "metadata")?;
    parse_metadata(&text).with_context(|| format!("parse metadata {}", path.display()))
}

pub fn parse_metadata(text: &str) -> Result<ServiceMetadata> {
    let metadata: ServiceMetadata = serde_json::from_str(text)?;
    debug!(
        entity_sets = metadata.entity_sets.len(),
        entity_types = metadata.entity_types.len(),
        actions = metadata.actions.len(),
        "loaded metadata"
    );
    Ok(metadata)
}

pub fn load_manifest(path: &Path) -> Result<ManifestSettings> {
    let text = read(path, "manifest")?;
    parse_manifest(&text).with_context(|| format!("parse manifest {}", path.display()))
}

pub fn parse_manifest(text: &str) -> Result<ManifestSettings> {
    Ok(serde_json::from_str(text)?)
}

/// Options from a TOML file, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<CompileOptions> {
    let Some(path) = path else {
        return Ok(CompileOptions::default());
    };
    let text = read(path, "config")?;
    parse_options(&text).with_context(|| format!("parse config {}", path.display()))
}

pub fn parse_options(text: &str) -> Result<CompileOptions> {
    Ok(toml::from_str(text)?)
}

pub fn build_request(
    entity_set: &str,
    navigation_path: Option<&str>,
    line_item: Option<&AnnotationPath>,
    presentation_variant: Option<&AnnotationPath>,
) -> TableRequest {
    let mut request = TableRequest::new(entity_set);
    if let Some(navigation_path) = navigation_path.map(|path| path.trim_matches('/')) {
        request = request.with_navigation_path(navigation_path);
    }
    if let Some(line_item) = line_item {
        request = request.with_line_item(line_item.clone());
    }
    if let Some(presentation_variant) = presentation_variant {
        request = request.with_presentation_variant(presentation_variant.clone());
    }
    request
}

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {what} {}", path.display()))
}
