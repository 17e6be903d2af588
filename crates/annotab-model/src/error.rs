use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid annotation path '{path}': {message}")]
    InvalidAnnotationPath { path: String, message: String },
    #[error("unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

impl ModelError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
