//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.personaforge.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Order-service settings.
    #[serde(default)]
    pub orders: OrdersConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "personaforge_report.md".to_string()
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Default model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Chat-completions API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Temperature for generation. When unset, each task uses its own
    /// default (0.8 for personas, 0.7 otherwise).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens in the reply. When unset, each task uses its own
    /// default (1500 for product suggestions, 1000 otherwise).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            api_url: default_api_url(),
            temperature: None,
            max_tokens: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

/// Order-service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// Base URL of the order service.
    #[serde(default = "default_data_url")]
    pub data_url: String,

    /// Trailing window, in days, of orders to aggregate.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Maximum number of orders to fetch.
    #[serde(default = "default_max_orders")]
    pub max_orders: usize,

    /// Seed for the deterministic prompt sample.
    #[serde(default = "default_sample_seed")]
    pub sample_seed: u64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            window_days: default_window_days(),
            max_orders: default_max_orders(),
            sample_seed: default_sample_seed(),
        }
    }
}

fn default_data_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_window_days() -> u32 {
    30
}

fn default_max_orders() -> usize {
    500
}

fn default_sample_seed() -> u64 {
    crate::insights::DEFAULT_SAMPLE_SEED
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".personaforge.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Model settings - always override since they have defaults in CLI
        self.model.name = args.model.clone();
        self.model.api_url = args.api_url.clone();

        // Optional model settings - only override if explicitly provided
        if args.temperature.is_some() {
            self.model.temperature = args.temperature;
        }
        if args.max_tokens.is_some() {
            self.model.max_tokens = args.max_tokens;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        // Order settings - always override since they have defaults in CLI
        self.orders.data_url = args.data_url.clone();
        self.orders.window_days = args.window_days;
        self.orders.max_orders = args.max_orders;
        self.orders.sample_seed = args.sample_seed;

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, "gpt-4o");
        assert_eq!(config.orders.window_days, 30);
        assert_eq!(config.orders.max_orders, 500);
        assert_eq!(config.orders.sample_seed, 42);
        assert!(config.model.temperature.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[model]
name = "gpt-4o-mini"
temperature = 0.5

[orders]
window_days = 60
data_url = "http://data.internal:9000"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.model.name, "gpt-4o-mini");
        assert_eq!(config.model.temperature, Some(0.5));
        assert_eq!(config.orders.window_days, 60);
        assert_eq!(config.orders.data_url, "http://data.internal:9000");
        // Untouched sections keep their defaults.
        assert_eq!(config.orders.max_orders, 500);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[model]"));
        assert!(toml_str.contains("[orders]"));
    }
}
