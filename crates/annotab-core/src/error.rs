use annotab_model::ModelError;
use thiserror::Error;

/// Fatal problems that abort compilation of one table.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("entity set not found: {0}")]
    UnknownEntitySet(String),
    #[error("entity type not found: {0}")]
    UnknownEntityType(String),
    #[error("navigation path '{path}' does not resolve from entity set {entity_set}")]
    UnknownNavigation { entity_set: String, path: String },
    #[error("line item {path} not found on entity type {entity_type}")]
    MissingLineItem { path: String, entity_type: String },
    #[error("creation mode CreationRow cannot be used with the custom new action {new_action}")]
    CreationRowWithNewAction { new_action: String },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to serialize descriptor member: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;
