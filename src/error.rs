//! Error types for the PET advisor
//!
//! The rule engine itself never fails: unknown answers are ignored and bad
//! wizard input turns into advisory lines. Errors only come from loading the
//! source table and from rejecting a tool that has no wizard.

use thiserror::Error;

/// Main error type for the advisor library
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Source table error: {message}")]
    Source { message: String },

    #[error("Source table is missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Unsupported wizard tool: {tool}")]
    UnsupportedTool { tool: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl AdvisorError {
    /// Canned advice shown when no wizard exists for a tool
    pub const UNSUPPORTED_TOOL_ADVICE: &'static str = "This tool is hard to give advice on implementation simply in a wizard. Please consider gain advice from a data privacy expert.";
}

impl From<std::io::Error> for AdvisorError {
    fn from(err: std::io::Error) -> Self {
        AdvisorError::Source {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for AdvisorError {
    fn from(err: csv::Error) -> Self {
        AdvisorError::Source {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        AdvisorError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
