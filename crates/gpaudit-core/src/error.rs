//! Error types for core operations

use thiserror::Error;

/// Errors that can occur while handling field input and editor content
#[derive(Error, Debug)]
pub enum CoreError {
    /// A field name that is not part of the form
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A `key=value` override without the `=`
    #[error("Invalid field assignment '{0}', expected key=value")]
    InvalidAssignment(String),

    /// Field file could not be parsed
    #[error("Invalid field file: {0}")]
    FieldsDe(#[from] toml::de::Error),

    /// Field state could not be serialized
    #[error("Failed to serialize fields: {0}")]
    FieldsSer(#[from] toml::ser::Error),

    /// Edited HTML could not be read
    #[error("HTML parsing error: {0}")]
    Html(#[from] quick_xml::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
