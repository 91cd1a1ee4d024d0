//! Error types for gramviz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing or rendering a chart.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file output, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid dimensions for a canvas or panel.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Scale domain error (empty, degenerate, or log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// A view references a column the data frame does not carry.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A plot was requested with no views.
    #[error("Plot has no views")]
    EmptyPlot,

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_scale_domain_display() {
        let err = Error::ScaleDomain("empty merged domain".to_string());
        assert!(err.to_string().contains("empty merged domain"));
    }

    #[test]
    fn test_unknown_column_display() {
        let err = Error::UnknownColumn("speed".to_string());
        assert!(err.to_string().contains("speed"));
    }
}
