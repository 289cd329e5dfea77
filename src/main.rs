use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use adsift_core::config::AppConfig;
use adsift_pipeline::{AdOptimizeInput, KeywordHarvestInput, Pipeline, TrafficCleanInput};

#[derive(Parser)]
#[command(name = "adsift", version, about = "Search-ad keyword cleaning and harvesting")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "adsift.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean traffic and harvest keywords in one run
    Optimize {
        /// Search-term report file, or `-` for stdin
        #[arg(long)]
        report: PathBuf,
        /// Product description
        #[arg(long)]
        product: String,
        /// Seed keywords for expansion
        #[arg(long, default_value = "")]
        seeds: String,
    },
    /// Produce the negative keyword list only
    Clean {
        /// Search-term report file, or `-` for stdin
        #[arg(long)]
        report: PathBuf,
        /// Product description
        #[arg(long)]
        product: String,
    },
    /// Produce scored keyword recommendations only
    Harvest {
        /// Product description
        #[arg(long)]
        product: String,
        /// Seed keywords for expansion
        #[arg(long)]
        seeds: String,
    },
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adsift=info,warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Commands::Optimize {
            report,
            product,
            seeds,
        } => {
            let output = build_pipeline(&config)?
                .optimize(AdOptimizeInput {
                    report_text: read_report(&report)?,
                    product_info: product,
                    seed_keywords: seeds,
                })
                .await?;
            print_json(&output)?;
        }
        Commands::Clean { report, product } => {
            let output = build_pipeline(&config)?
                .traffic_clean(TrafficCleanInput {
                    report_text: read_report(&report)?,
                    product_info: product,
                })
                .await?;
            print_json(&output)?;
        }
        Commands::Harvest { product, seeds } => {
            let output = build_pipeline(&config)?
                .keyword_harvest(KeywordHarvestInput {
                    product_description: product,
                    seed_keywords: seeds,
                })
                .await?;
            print_json(&output)?;
        }
    }

    Ok(())
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<Pipeline> {
    let generator = adsift_llm::create_client(&config.model)?;
    info!(
        provider = %config.model.provider,
        model = %config.model.model_id,
        "Text generator ready"
    );
    Ok(Pipeline::new(Arc::from(generator), config)?)
}

fn read_report(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading report from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading report {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
