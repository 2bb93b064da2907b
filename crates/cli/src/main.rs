use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use mealsync_core::{
    API_TOKEN_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, MealieClient, MealieConfig, MenuDocument, MenuProcessor,
    load_menu_file, load_menu_stdin,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{print_banner, print_detail, print_error, print_info, print_report, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sync a weekly JSON-LD menu into a Mealie server
#[derive(Parser, Debug)]
#[command(name = "mealsync")]
#[command(author = "Mealsync Contributors")]
#[command(version)]
#[command(about = "Sync a weekly menu into Mealie recipes and meal plans", long_about = None)]
struct Args {
    /// Menu JSON file, or "-" (or nothing) for stdin
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Year the menu's week number belongs to (default: current year)
    #[arg(short, long, value_name = "YEAR")]
    year: Option<i32>,

    /// Mealie base URL, overrides MEALIE_BASE_URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Env file with MEALIE_* variables; a missing file is ignored
    #[arg(long, default_value = ".env", value_name = "FILE")]
    env_file: PathBuf,

    /// Write the run report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_env_file(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    dotenv::from_path(path).with_context(|| format!("Failed to load env file: {}", path.display()))?;
    Ok(true)
}

fn load_config(args: &Args) -> mealsync_core::Result<MealieConfig> {
    let config = MealieConfig::from_env()?.with_timeout(args.timeout);
    match &args.base_url {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

fn print_config_help() {
    eprintln!();
    eprintln!("  Set the following variables in the environment or in a .env file:");
    eprintln!("    {}  Mealie server URL (default: {})", BASE_URL_VAR.bold(), DEFAULT_BASE_URL);
    eprintln!("    {}  API token from your Mealie user profile (required)", API_TOKEN_VAR.bold());
    eprintln!();
}

fn load_input(input: Option<&Path>) -> anyhow::Result<MenuDocument> {
    match input {
        Some(path) if path != Path::new("-") => {
            load_menu_file(path).with_context(|| format!("Failed to load menu from {}", path.display()))
        }
        _ => load_menu_stdin().context("Failed to load menu from stdin"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_loaded = load_env_file(&args.env_file)?;
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        if env_loaded {
            print_detail("Env file", &args.env_file.display().to_string());
        }
        eprintln!();
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            print_error(&format!("Configuration error: {err}"));
            print_config_help();
            std::process::exit(1);
        }
    };
    tracing::debug!(base_url = %config.base_url, timeout = config.timeout, "Configuration loaded");

    if args.verbose {
        print_step(1, 3, "Reading menu");
    }
    let menu = load_input(args.input.as_deref())?;
    if args.verbose {
        print_detail("Week", &menu.week_number().to_string());
        print_detail("Recipes", &menu.recipe_count().to_string());
        eprintln!();
    }

    if args.verbose {
        print_step(2, 3, &format!("Syncing with {}", config.base_url.bright_white().underline()));
    }
    let client = MealieClient::new(config).context("Failed to build HTTP client")?;
    let processor = MenuProcessor::new(client);
    let report = processor
        .process_weekly_menu(&menu, args.year)
        .await
        .context("Failed to process weekly menu")?;

    print_report(&report);
    for failure in report.failures() {
        print_warning(&failure);
    }

    if let Some(path) = &args.report {
        if args.verbose {
            print_step(3, 3, "Writing report");
        }
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
        print_success(&format!("Report written to {}", path.display().bright_white()));
    }

    if report.is_clean() {
        print_success("Weekly menu processing complete");
    } else {
        print_warning("Weekly menu processed with failures");
    }

    Ok(())
}
