//! Persona Forge - AI-powered customer personas for e-commerce stores
//!
//! A CLI tool that aggregates a store's recent order history into
//! statistical insights and feeds them to a chat model to generate
//! customer personas, store insights, or product suggestions.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, malformed data, etc.)
//!   2 - No data (unknown store domain, or no orders in the window)

mod cli;
mod config;
mod insights;
mod llm;
mod models;
mod prompt;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat, Task};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use insights::{aggregate, InsightError, InsightSummary};
use llm::{ChatClient, ChatConfig};
use models::{
    CustomerProfile, GenerationResult, OrderRecord, ProductRecord, ReportMetadata,
};
use std::time::{Duration, Instant};
use store::{DomainLookup, FileSource, OrderServiceClient};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Persona Forge v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the generation
    match run_generation(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .personaforge.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".personaforge.toml");

    if path.exists() {
        eprintln!("⚠️  .personaforge.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .personaforge.toml")?;

    println!("✅ Created .personaforge.toml with default settings.");
    println!("   Edit it to customize model, order service, window, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Which backend the orders came from; the products task reuses it for the
/// catalog fetch.
enum OrderBackend {
    Service(OrderServiceClient, store::AccountId),
    Local,
}

/// Run the complete generation workflow. Returns exit code (0 or 2).
async fn run_generation(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config()?;
    config.merge_with_args(&args);

    let store_label = args.store_label();

    // Step 1: Fetch the order batch
    println!("📥 Fetching orders for: {}", store_label);
    let (orders, backend) = match fetch_orders(&args, &config).await? {
        Some(fetched) => fetched,
        None => {
            println!("\n{}", prompt::DOMAIN_NOT_FOUND_MESSAGE);
            return Ok(2);
        }
    };
    info!("Fetched {} orders", orders.len());

    // Step 2: Aggregate the statistics
    let summary = match aggregate(&orders) {
        Ok(summary) => summary,
        Err(InsightError::EmptyInput) => {
            println!("\n{}", prompt::no_orders_message(config.orders.window_days));
            return Ok(2);
        }
        Err(e @ InsightError::MalformedTime { .. }) => {
            return Err(anyhow::Error::new(e).context("Order batch failed aggregation"));
        }
    };

    let sample = insights::sample_orders(&orders, insights::SAMPLE_SIZE, config.orders.sample_seed);
    let context = prompt::store_context(&summary, &sample);

    // Handle --dry-run: print the summary and exit
    if args.dry_run {
        return handle_dry_run(&summary, orders.len(), config.orders.window_days);
    }

    // Step 3: Build the prompts for the task
    let (system_prompt, user_prompt) =
        build_prompts(&args, &backend, &context).await?;

    // Step 4: Call the model
    println!("🤖 Generating with model {}...", config.model.name);
    let chat_client = ChatClient::new(ChatConfig {
        api_url: config.model.api_url.clone(),
        api_key: args.api_key.clone(),
        model_name: config.model.name.clone(),
        temperature: args.effective_temperature(config.model.temperature),
        max_tokens: args.effective_max_tokens(config.model.max_tokens),
        timeout_seconds: config.model.timeout_seconds,
    })?;

    let spinner = make_spinner(args.quiet);
    let outcome = chat_client.complete(&system_prompt, &user_prompt).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    // Step 5: Parse the model reply
    let result = parse_result(args.task, &outcome.content)?;
    info!("Model produced {} item(s)", result.item_count());

    // Step 6: Build and save the report
    println!("📝 Writing report...");
    let duration = start_time.elapsed().as_secs_f64();
    let report = report::Report {
        metadata: ReportMetadata {
            store_domain: store_label.clone(),
            generated_at: Utc::now(),
            model_used: config.model.name.clone(),
            orders_analyzed: orders.len(),
            window_days: config.orders.window_days,
            duration_seconds: duration,
        },
        summary,
        result,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    std::fs::write(&args.output, &output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    println!("\n📊 Generation Summary:");
    println!("   Store: {}", store_label);
    println!("   Orders analyzed: {}", report.metadata.orders_analyzed);
    println!("   Items generated: {}", report.result.item_count());
    if let Some(usage) = outcome.usage {
        println!(
            "   Tokens: prompt={} completion={} total={}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }
    println!("   Model time: {:.1}s", outcome.elapsed_seconds);
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Done! Report saved to: {}",
        args.output.display()
    );

    Ok(0)
}

/// Fetch the order batch from the configured backend.
///
/// Returns `None` when the store domain does not resolve to an account.
async fn fetch_orders(
    args: &Args,
    config: &Config,
) -> Result<Option<(Vec<OrderRecord>, OrderBackend)>> {
    // Use a local dump if specified
    if let Some(path) = &args.orders_file {
        info!("Reading orders from {}", path.display());
        let orders = FileSource::load_orders(path)?;
        return Ok(Some((orders, OrderBackend::Local)));
    }

    let domain = args.domain.as_deref().unwrap_or_default();
    let client = OrderServiceClient::new(&config.orders.data_url, config.model.timeout_seconds)?;

    let account_id = match client.resolve_domain(domain).await? {
        DomainLookup::Found(account_id) => account_id,
        DomainLookup::NotFound => {
            warn!("Domain {} did not resolve to an account", domain);
            return Ok(None);
        }
    };

    let orders = client
        .recent_orders(account_id, config.orders.window_days, config.orders.max_orders)
        .await?;

    Ok(Some((orders, OrderBackend::Service(client, account_id))))
}

/// Build the system and user prompts for the requested task.
async fn build_prompts(
    args: &Args,
    backend: &OrderBackend,
    context: &str,
) -> Result<(String, String)> {
    match args.task {
        Task::Personas => {
            // Validated upfront; the profile fields are present here.
            let profile = CustomerProfile {
                name: args.customer_name.clone().unwrap_or_default(),
                age: args.customer_age.clone().unwrap_or_default(),
                gender: args.customer_gender.clone().unwrap_or_default(),
                description: args.customer_description.clone().unwrap_or_default(),
            };
            let context = if args.use_store_data { context } else { "" };
            Ok((
                prompt::PERSONAS_SYSTEM_PROMPT.to_string(),
                prompt::personas_prompt(&profile, context),
            ))
        }
        Task::Insights => Ok((
            prompt::INSIGHTS_SYSTEM_PROMPT.to_string(),
            prompt::insights_prompt(context),
        )),
        Task::Products => {
            let products = fetch_products(args, backend).await?;
            if products.is_empty() {
                warn!("Store catalog is empty; suggestions will be generic");
            }
            Ok((
                prompt::PRODUCTS_SYSTEM_PROMPT.to_string(),
                prompt::products_prompt(context, &products),
            ))
        }
    }
}

/// Fetch the store catalog for the products task.
async fn fetch_products(args: &Args, backend: &OrderBackend) -> Result<Vec<ProductRecord>> {
    if let Some(path) = &args.products_file {
        return Ok(FileSource::load_products(path)?);
    }
    match backend {
        OrderBackend::Service(client, account_id) => {
            Ok(client.store_products(*account_id).await?)
        }
        // Validation rejects this combination before we get here.
        OrderBackend::Local => Ok(Vec::new()),
    }
}

/// Parse the model reply into the task's result shape.
fn parse_result(task: Task, reply: &str) -> Result<GenerationResult> {
    let result = match task {
        Task::Personas => GenerationResult::Personas(
            llm::parse_json_reply(reply).context("Model reply is not a valid persona set")?,
        ),
        Task::Insights => GenerationResult::Insights(
            llm::parse_json_reply(reply).context("Model reply is not a valid insight list")?,
        ),
        Task::Products => GenerationResult::Suggestions(
            llm::parse_json_reply(reply).context("Model reply is not a valid suggestion list")?,
        ),
    };
    Ok(result)
}

/// Handle --dry-run: print the aggregated statistics, no model call.
fn handle_dry_run(summary: &InsightSummary, order_count: usize, window_days: u32) -> Result<i32> {
    println!("\n🔍 Dry run: aggregated statistics (no model call)...\n");

    println!("   Orders: {} (last {} days)", order_count, window_days);
    println!("   Average ticket: R$ {:.2}", summary.average_ticket);

    if !summary.best_selling_products.is_empty() {
        println!("   Best-selling products:");
        for (name, count) in &summary.best_selling_products {
            println!("     📦 {} ({} units)", name, count);
        }
    }
    if !summary.top_clients.is_empty() {
        println!("   Top customers:");
        for (name, count) in &summary.top_clients {
            println!("     👤 {} ({} orders)", name, count);
        }
    }
    if !summary.sales_by_hour.is_empty() {
        let hours: Vec<String> = summary
            .sales_by_hour
            .iter()
            .map(|(hour, count)| format!("{:02}h={}", hour, count))
            .collect();
        println!("   Orders by hour: {}", hours.join(" "));
    }

    println!("\n✅ Dry run complete. No model calls were made.");
    Ok(0)
}

/// Spinner shown while waiting for the model.
fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Waiting for the model...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config() -> Result<Config> {
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded config from .personaforge.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
