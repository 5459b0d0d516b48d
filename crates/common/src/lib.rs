//! CiteNet Common Library
//!
//! Shared code for the CiteNet analysis pipeline including:
//! - Core corpus types (node ids, attribute records, edge tables)
//! - Error types and handling
//! - Configuration management

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AnalysisError, Result};
pub use types::NodeId;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
