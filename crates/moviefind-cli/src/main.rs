//! moviefind - search and browse TMDB movies from the terminal.

/// Application configuration (TOML).
mod config;
/// Log output for one-shot commands.
mod report;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moviefind_api::tmdb::TmdbClient;
use moviefind_browse::{FetchController, FetchMode, SearchBinding};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::report::report_section;
use crate::tui::run_browser;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show today's trending movies.
    Trending,
    /// Search movies by title (discover list when the query is empty).
    Search(SearchArgs),
    /// Show the popularity-sorted discover list.
    Discover,
    /// Browse movies interactively via TUI.
    Browse,
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search term (e.g. "Inception").
    #[arg(long, default_value = "")]
    query: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default values.
    Init,
    /// Print the effective config.
    Show,
}

/// Loads the config from `{dir}/config.toml` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` from the config and the `TMDB_API_TOKEN` environment variable.
///
/// A missing token is not fatal; requests then fail with 401.
///
/// # Errors
///
/// Returns an error if the base URL override is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN").unwrap_or_else(|_| {
        tracing::warn!("TMDB_API_TOKEN is not set; requests will be unauthorized");
        String::new()
    });

    let mut builder = TmdbClient::builder().api_token(api_token).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(base_url) = config.tmdb.parsed_base_url()? {
        builder = builder.base_url(base_url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the fetch controller for the configured locale.
fn build_controller(config: &AppConfig) -> Result<FetchController<TmdbClient>> {
    let client = build_tmdb_client(config)?;
    Ok(FetchController::new(client).with_language(&config.tmdb.language))
}

/// Runs a single fetch and logs the settled section.
///
/// # Errors
///
/// Returns an error if the client fails to build or the fetch ends with an error message.
#[instrument(skip(dir))]
async fn run_list(
    label: &str,
    query: &str,
    mode: FetchMode,
    dir: Option<&PathBuf>,
) -> Result<()> {
    let config = load_config(dir)?;
    let controller = build_controller(&config)?;

    controller.fetch(query, mode).await;

    let state = controller.state();
    report_section(label, state.section(mode.section()))
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let controller = build_controller(&config)?;
    let binding = SearchBinding::new(controller, config.search.quiet_period());

    run_browser(binding).await.context("movie browser TUI failed")
}

/// Runs the `config init` subcommand.
///
/// Keeps an existing file untouched.
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() {
        tracing::info!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let content = toml::to_string_pretty(&config).context("failed to serialize config to TOML")?;

    tracing::info!("# {}", config_path.display());
    for line in content.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Default log filter when `RUST_LOG` is unset.
///
/// The TUI owns the terminal, so it stays silent by default.
const fn default_filter(command: &Commands) -> &'static str {
    match command {
        Commands::Browse => "off",
        _ => "info",
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_directive = default_filter(&cli.command);

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_directive)),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Trending => run_list("Trending", "", FetchMode::Trending, dir).await,
        Commands::Search(args) => run_list("Search", &args.query, FetchMode::Normal, dir).await,
        Commands::Discover => run_list("Discover", "", FetchMode::Normal, dir).await,
        Commands::Browse => run_browse(dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init => run_config_init(dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}
