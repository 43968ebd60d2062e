//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Persona Forge - LLM-powered customer personas and insights for e-commerce stores
///
/// Aggregates a store's recent order history into statistical insights and
/// feeds them to a chat model to generate personas, "did you know" insights,
/// or product improvement suggestions.
///
/// Examples:
///   personaforge insights --domain mystore.example.com
///   personaforge personas --domain mystore.example.com --use-store-data \
///       --customer-name Ana --customer-age 34 --customer-gender F \
///       --customer-description "Buys running gear every month"
///   personaforge insights --orders-file orders.json --dry-run
///   personaforge products --domain mystore.example.com --format json
///   personaforge insights --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// What to generate
    #[arg(value_enum)]
    pub task: Task,

    /// Store domain to generate for
    ///
    /// Resolved to an internal account by the order service. Not required
    /// when reading orders from a local file or using --init-config.
    #[arg(short, long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Read orders from a local JSON file instead of the order service
    ///
    /// Accepts either a bare array of order records or the service's
    /// {"orders": [...]} envelope.
    #[arg(long, value_name = "FILE")]
    pub orders_file: Option<PathBuf>,

    /// Read the store catalog from a local JSON file (products task only)
    #[arg(long, value_name = "FILE")]
    pub products_file: Option<PathBuf>,

    /// Base URL of the order service
    #[arg(long, default_value = "http://localhost:8080", env = "PERSONAFORGE_DATA_URL")]
    pub data_url: String,

    /// Chat model to use for generation
    #[arg(short, long, default_value = "gpt-4o", env = "PERSONAFORGE_MODEL")]
    pub model: String,

    /// Chat-completions API base URL
    #[arg(long, default_value = "https://api.openai.com", env = "PERSONAFORGE_API_URL")]
    pub api_url: String,

    /// API key for the chat-completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Temperature for model replies (0.0 - 1.0)
    ///
    /// Defaults per task: 0.8 for personas, 0.7 for insights and products.
    #[arg(long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Maximum tokens in the model reply
    ///
    /// Defaults per task: 1500 for products, 1000 otherwise.
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Trailing window, in days, of orders to aggregate
    #[arg(long, default_value = "30", value_name = "DAYS")]
    pub window_days: u32,

    /// Maximum number of orders to fetch (capped at 500)
    #[arg(long, default_value = "500", value_name = "COUNT")]
    pub max_orders: usize,

    /// Seed for the deterministic prompt sample
    #[arg(long, default_value = "42", value_name = "SEED")]
    pub sample_seed: u64,

    /// Output file path for the report
    #[arg(short, long, default_value = "personaforge_report.md", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    // === Personas task ===

    /// Use the store's order history to enrich the personas
    ///
    /// Off by default; the merchant opts in to sharing store data with the
    /// model.
    #[arg(long)]
    pub use_store_data: bool,

    /// Name of a real customer the merchant knows (personas task)
    #[arg(long, value_name = "NAME")]
    pub customer_name: Option<String>,

    /// Age of the described customer (personas task)
    #[arg(long, value_name = "AGE")]
    pub customer_age: Option<String>,

    /// Gender of the described customer (personas task)
    #[arg(long, value_name = "GENDER")]
    pub customer_gender: Option<String>,

    /// Free-form description of the customer (personas task)
    #[arg(long, value_name = "TEXT")]
    pub customer_description: Option<String>,

    /// Dry run: fetch and aggregate orders without calling the model
    ///
    /// Prints the statistical summary and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .personaforge.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Task {
    /// Generate up to 3 customer personas
    Personas,
    /// Generate "did you know" store insights
    Insights,
    /// Suggest product catalog improvements
    Products,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // A domain or a local orders file is needed to scope the run
        if self.domain.is_none() && self.orders_file.is_none() {
            return Err("Provide --domain or --orders-file".to_string());
        }

        // Validate order-service URL when it will actually be used
        if self.orders_file.is_none()
            && !self.data_url.starts_with("http://")
            && !self.data_url.starts_with("https://")
        {
            return Err("Data URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate model API URL (not needed for dry-run)
        if !self.dry_run
            && !self.api_url.starts_with("http://")
            && !self.api_url.starts_with("https://")
        {
            return Err("API URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate temperature range
        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 1.0".to_string());
            }
        }

        // Validate window and fetch limits
        if self.window_days == 0 {
            return Err("Window must be at least 1 day".to_string());
        }
        if self.max_orders == 0 {
            return Err("Max orders must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // The personas task needs a described reference customer
        if self.task == Task::Personas && !self.dry_run {
            if self.customer_name.is_none()
                || self.customer_age.is_none()
                || self.customer_gender.is_none()
                || self.customer_description.is_none()
            {
                return Err(
                    "The personas task requires --customer-name, --customer-age, \
                     --customer-gender and --customer-description"
                        .to_string(),
                );
            }
        }

        // The products task needs a catalog source
        if self.task == Task::Products && self.orders_file.is_some() && self.products_file.is_none()
        {
            return Err(
                "The products task with --orders-file also requires --products-file".to_string(),
            );
        }

        // Validate local files if provided
        for path in [&self.orders_file, &self.products_file].into_iter().flatten() {
            if !path.exists() {
                return Err(format!("File does not exist: {}", path.display()));
            }
            if !path.is_file() {
                return Err(format!("Not a file: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Store domain for reporting; local runs fall back to the file name.
    pub fn store_label(&self) -> String {
        if let Some(domain) = &self.domain {
            return domain.clone();
        }
        self.orders_file
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "local".to_string())
    }

    /// Effective temperature for the task.
    pub fn effective_temperature(&self, config_value: Option<f32>) -> f32 {
        self.temperature.or(config_value).unwrap_or(match self.task {
            Task::Personas => 0.8,
            Task::Insights | Task::Products => 0.7,
        })
    }

    /// Effective reply-token budget for the task.
    pub fn effective_max_tokens(&self, config_value: Option<usize>) -> usize {
        self.max_tokens.or(config_value).unwrap_or(match self.task {
            Task::Products => 1500,
            Task::Personas | Task::Insights => 1000,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            task: Task::Insights,
            domain: Some("mystore.example.com".to_string()),
            orders_file: None,
            products_file: None,
            data_url: "http://localhost:8080".to_string(),
            model: "gpt-4o".to_string(),
            api_url: "https://api.openai.com".to_string(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            timeout: None,
            window_days: 30,
            max_orders: 500,
            sample_seed: 42,
            output: PathBuf::from("report.md"),
            format: OutputFormat::Markdown,
            verbose: false,
            quiet: false,
            use_store_data: false,
            customer_name: None,
            customer_age: None,
            customer_gender: None,
            customer_description: None,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_requires_a_scope() {
        let mut args = make_args();
        args.domain = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_data_url() {
        let mut args = make_args();
        args.data_url = "localhost:8080".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        args.temperature = Some(1.5);
        assert!(args.validate().is_err());

        args.temperature = Some(0.9);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_personas_task_requires_customer_profile() {
        let mut args = make_args();
        args.task = Task::Personas;
        assert!(args.validate().is_err());

        args.customer_name = Some("Ana".to_string());
        args.customer_age = Some("34".to_string());
        args.customer_gender = Some("F".to_string());
        args.customer_description = Some("Monthly buyer".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_task_defaults_for_temperature_and_tokens() {
        let mut args = make_args();
        assert_eq!(args.effective_temperature(None), 0.7);
        assert_eq!(args.effective_max_tokens(None), 1000);

        args.task = Task::Personas;
        assert_eq!(args.effective_temperature(None), 0.8);

        args.task = Task::Products;
        assert_eq!(args.effective_max_tokens(None), 1500);

        // Config file beats the task default, CLI beats both.
        assert_eq!(args.effective_temperature(Some(0.3)), 0.3);
        args.temperature = Some(0.1);
        assert_eq!(args.effective_temperature(Some(0.3)), 0.1);
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_store_label_falls_back_to_file() {
        let mut args = make_args();
        assert_eq!(args.store_label(), "mystore.example.com");

        args.domain = None;
        args.orders_file = Some(PathBuf::from("orders.json"));
        assert_eq!(args.store_label(), "orders.json");
    }
}
