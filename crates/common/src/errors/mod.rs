//! Error types for the CiteNet pipeline
//!
//! Provides distinct error types for the failure modes of batch graph
//! analysis: empty inputs, non-converging solvers, bad configuration,
//! and snapshot I/O.

use thiserror::Error;

/// Result type alias using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AnalysisError {
    // Input validation errors
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Graph is empty: {context}")]
    EmptyGraph { context: String },

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    // Solver errors
    #[error("Eigensolver failed to produce an acceptable vector after {attempts} attempts")]
    EigenNonConvergence { attempts: usize },

    // Snapshot / artifact errors
    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Matrix I/O error: {message}")]
    MatrixIo { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    /// Whether this error indicates a defect in the input data rather than
    /// in the pipeline itself
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Validation { .. }
                | AnalysisError::EmptyGraph { .. }
                | AnalysisError::InvalidParameter { .. }
        )
    }
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        AnalysisError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph_is_input_error() {
        let err = AnalysisError::EmptyGraph {
            context: "pagerank".into(),
        };
        assert!(err.is_input_error());
    }

    #[test]
    fn test_eigen_error_message_carries_attempts() {
        let err = AnalysisError::EigenNonConvergence { attempts: 5 };
        assert!(err.to_string().contains('5'));
        assert!(!err.is_input_error());
    }
}
