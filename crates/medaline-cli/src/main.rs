//! medaline - Olympic athlete-event enrichment pipeline
//!
//! Joins country populations onto an athlete-event CSV and attaches
//! generated archetype/health-point attributes to a bounded row prefix.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "medaline")]
#[command(about = "Olympic athlete-event enrichment pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./medaline.toml or ~/.config/medaline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Clean the athlete table and join country populations
    Populate(cmd::populate::PopulateArgs),
    /// Attach generated archetype/health-point columns to a populated table
    Enrich(cmd::enrich::EnrichArgs),
    /// Run the full pipeline (populate + enrich) in one process
    Run(cmd::run::RunArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    // A local .env may carry DEEPSEEK_API_KEY; load it before config resolution
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(medaline_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  — progress bars show activity
    //   non-TTY: info unless --debug          — logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    medaline_core::init_logging(quiet, cli.debug, multi);

    // Load configuration
    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Populate(args) => cmd::populate::run(args, &config, &progress),
        Command::Enrich(args) => cmd::enrich::run(args, &config, &progress),
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Input paths",
                &config
                    .input
                    .paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
            table.add_row(vec![
                "Raw output",
                &config.output.raw_path.display().to_string(),
            ]);
            table.add_row(vec![
                "Enriched output",
                &config.output.enriched_path.display().to_string(),
            ]);
            table.add_row(vec!["Countries base URL", &config.countries.base_url]);
            table.add_row(vec!["DeepSeek API URL", &config.deepseek.api_url]);
            table.add_row(vec!["DeepSeek model", &config.deepseek.model]);
            table.add_row(vec![
                "DeepSeek API key",
                if config.deepseek.api_key.is_some() {
                    "configured"
                } else {
                    "not set"
                },
            ]);
            table.add_row(vec![
                "Batch size",
                &config.enrich.batch_size.to_string(),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
