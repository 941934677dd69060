//! Configuration management for ExpertRank
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Ranking method and parameters
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Where the graph and prior are read from
    #[serde(default)]
    pub input: InputConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    /// Model id: infiniterandom, infiniterandomfull, infiniterandomweighted, pagerank
    #[serde(default = "default_method")]
    pub method: String,

    /// Teleport weight override (random-walk models)
    pub lambda: Option<f64>,

    /// Document channel mixing override (full / weighted models)
    pub md: Option<f64>,

    /// Author channel mixing override (full / weighted models)
    pub mca: Option<f64>,

    /// Damping override (PageRank)
    pub damping: Option<f64>,

    /// Convergence threshold on the aggregate author-score delta
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Hard iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Number of documents and authors to report
    #[serde(default = "default_results")]
    pub results: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Path to the graph JSON document
    #[serde(default = "default_graph_path")]
    pub graph_path: String,

    /// Path to the relevance prior JSON map (not needed for PageRank)
    pub prior_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (debug, info, expertrank_ranking=trace, ...)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name attached to log lines
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_method() -> String {
    "infiniterandom".to_string()
}

fn default_epsilon() -> f64 {
    8e-8
}

fn default_max_iterations() -> usize {
    500
}

fn default_results() -> usize {
    25
}

fn default_graph_path() -> String {
    "data/graph.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    false
}

fn default_service_name() -> String {
    "expertrank".to_string()
}


impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            lambda: None,
            md: None,
            mca: None,
            damping: None,
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            results: default_results(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            graph_path: default_graph_path(),
            prior_path: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

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
            // e.g., APP__RANKING__METHOD=pagerank
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }
}
