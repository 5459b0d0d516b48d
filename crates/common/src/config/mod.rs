//! Configuration management for the CiteNet pipeline
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{env}.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Corpus snapshot locations
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// PageRank solver parameters
    #[serde(default)]
    pub pagerank: PageRankConfig,

    /// HITS solver parameters
    #[serde(default)]
    pub hits: HitsConfig,

    /// Subgraph query parameters
    #[serde(default)]
    pub query: QueryConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Seed for the run's random source (expansion sampling, eigensolver
    /// restarts); omit for a fresh entropy seed per run
    pub seed: Option<u64>,
}

/// Input tables produced by the scraping/disambiguation collaborators and
/// the output directory for persisted artifacts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// Article attribute table (id -> title/keywords/authors)
    #[serde(default = "default_attributes_path")]
    pub attributes_path: String,

    /// Resolved reference edge table (referring, referred_to)
    #[serde(default = "default_references_path")]
    pub references_path: String,

    /// Resolved citation edge table (referring, referred_to)
    #[serde(default = "default_citations_path")]
    pub citations_path: String,

    /// Directory for persisted matrices and rank tables
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageRankConfig {
    /// Damping factor theta (probability of following an edge)
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Convergence tolerance, scaled by node count
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Iteration cap
    #[serde(default = "default_pagerank_iterations")]
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HitsConfig {
    /// Power-iteration round count for full-graph runs
    #[serde(default = "default_hits_iterations")]
    pub iterations: usize,

    /// Number of principal eigenvectors to extract
    #[serde(default = "default_neigs")]
    pub neigs: usize,

    /// Attempt cap for the eigensolver stability-retry loop
    #[serde(default = "default_eigen_retries")]
    pub max_retries: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Keywords for the batch runner's topic-subgraph pass; empty
    /// disables the pass
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Predecessor cap per root during subgraph expansion
    #[serde(default = "default_expansion_bound")]
    pub max_predecessors: usize,

    /// Attribute fields searched by topic queries
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<String>,

    /// How per-field result sets are combined: "union" or "intersect"
    #[serde(default = "default_combine")]
    pub combine: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,
}

// Default value functions
fn default_attributes_path() -> String { "tables/attrs_nos.json".to_string() }
fn default_references_path() -> String { "tables/refs_ids.json".to_string() }
fn default_citations_path() -> String { "tables/cits_ids.json".to_string() }
fn default_output_dir() -> String { "tables".to_string() }
fn default_damping() -> f64 { 0.85 }
fn default_epsilon() -> f64 { 1e-3 }
fn default_pagerank_iterations() -> usize { 20 }
fn default_hits_iterations() -> usize { 1000 }
fn default_neigs() -> usize { 1 }
fn default_eigen_retries() -> usize { 5 }
fn default_expansion_bound() -> usize { 1000 }
fn default_search_fields() -> Vec<String> {
    vec!["title".to_string(), "keywords".to_string()]
}
fn default_combine() -> String { "union".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__PAGERANK__DAMPING=0.9
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot: SnapshotConfig::default(),
            pagerank: PageRankConfig::default(),
            hits: HitsConfig::default(),
            query: QueryConfig::default(),
            observability: ObservabilityConfig::default(),
            seed: None,
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            attributes_path: default_attributes_path(),
            references_path: default_references_path(),
            citations_path: default_citations_path(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            epsilon: default_epsilon(),
            max_iterations: default_pagerank_iterations(),
        }
    }
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            iterations: default_hits_iterations(),
            neigs: default_neigs(),
            max_retries: default_eigen_retries(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            max_predecessors: default_expansion_bound(),
            search_fields: default_search_fields(),
            combine: default_combine(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.pagerank.damping, 0.85);
        assert_eq!(cfg.pagerank.epsilon, 1e-3);
        assert_eq!(cfg.pagerank.max_iterations, 20);
        assert_eq!(cfg.hits.iterations, 1000);
        assert_eq!(cfg.hits.neigs, 1);
        assert_eq!(cfg.query.combine, "union");
        assert_eq!(cfg.query.search_fields, vec!["title", "keywords"]);
        assert!(cfg.query.keywords.is_empty());
    }

    #[test]
    fn test_partial_toml_deserializes_with_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[pagerank]\ndamping = 0.5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.pagerank.damping, 0.5);
        assert_eq!(cfg.pagerank.max_iterations, 20);
        assert_eq!(cfg.hits.max_retries, 5);
    }
}
