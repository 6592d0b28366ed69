//! Workspace-wide error type using thiserror.

use std::fmt;
use std::path::PathBuf;

/// Common result type for the workspace.
pub type Result<T> = std::result::Result<T, VisualizerError>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum VisualizerError {
    /// The source dataset does not exist.
    #[error("Source file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A row could not be decoded as `(date, value)`.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the source file, header included.
        line: u64,
        /// What was wrong with the row.
        message: String,
    },

    /// The chart collaborator failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisualizerError {
    /// Creates a parse error for the given line.
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Creates a render error from anything displayable, such as a plotters
    /// drawing error.
    pub fn render(error: impl fmt::Display) -> Self {
        Self::Render(error.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error aborted loading rather than rendering.
    pub const fn is_load_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::Parse { .. })
    }
}
