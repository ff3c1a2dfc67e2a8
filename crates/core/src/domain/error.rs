// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Descriptor or binding defect, detected at registration time
    #[error("Schema defect in process '{process}': {reason}")]
    SchemaDefect { process: String, reason: String },

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Input '{name}' has unexpected type: expected {expected}")]
    InputType { name: String, expected: String },

    #[error("Output '{0}' is not declared by this process")]
    UndeclaredOutput(String),

    #[error("Invalid invocation state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
