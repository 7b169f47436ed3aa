//! quillkey - rewrite selected text from a global hotkey
//!
//! Run with `quillkey` or `quillkey daemon` to start the daemon.
//! Use `quillkey check` to verify the rewrite service is reachable.
//! Use `quillkey rewrite <text>` to try a rewrite from the terminal.

use clap::Parser;
use quillkey::cli::{Cli, Commands};
use quillkey::config::{self, Config};
use quillkey::daemon;
use quillkey::rewrite::RewriteClient;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("quillkey={},warn", log_level))),
        )
        .with_target(false)
        .init();

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(model) = cli.model {
        config.rewrite.model = model;
    }
    if let Some(endpoint) = cli.endpoint {
        config.rewrite.endpoint = endpoint;
    }

    // The orchestrator is single-threaded; everything runs on one thread
    // with the blocking HTTP call pushed to the blocking pool.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();

    match cli.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => {
            let mut daemon = daemon::Daemon::new(config);
            local.block_on(&runtime, daemon.run())?;
        }

        Commands::Check => {
            run_check(&config)?;
        }

        Commands::Rewrite { text } => {
            let client = RewriteClient::new(&config.rewrite)?;
            let rewritten = client.try_rewrite(&text)?;
            println!("{}", rewritten);
        }

        Commands::Config { init: true } => {
            let path = cli
                .config
                .or_else(Config::default_path)
                .ok_or_else(|| anyhow::anyhow!("no config directory available"))?;
            config::write_default_config(&path)?;
            println!("Wrote default config to {}", path.display());
        }

        Commands::Config { init: false } => {
            show_config(&config, cli.config.as_deref())?;
        }
    }

    Ok(())
}

/// Probe the rewrite service and report what it has installed
fn run_check(config: &Config) -> anyhow::Result<()> {
    let client = RewriteClient::new(&config.rewrite)?;

    println!("Endpoint: {}", config.rewrite.endpoint);
    println!("Model:    {}\n", client.model());

    let models = client.probe()?;
    if models.is_empty() {
        println!("No models installed.");
    } else {
        println!("Installed models:");
        for name in &models {
            let marker = if name.contains(client.model()) { "*" } else { " " };
            println!("  {} {}", marker, name);
        }
    }

    if !client.has_model(&models) {
        anyhow::bail!(
            "model {} not found. Run: ollama pull {}",
            client.model(),
            client.model()
        );
    }

    println!("\nReady.");
    Ok(())
}

/// Print the effective configuration as TOML
fn show_config(config: &Config, explicit: Option<&Path>) -> anyhow::Result<()> {
    match explicit.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) if path.exists() => println!("# Loaded from {}", path.display()),
        Some(path) => println!("# No config file at {}, using defaults", path.display()),
        None => println!("# No config directory available, using defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
