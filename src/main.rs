use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ipl_insights::config::{AppConfig, OutputFormat, DEFAULT_CONFIG_FILE};
use ipl_insights::report::{run_reports, ReportKind, Renderer, TextRenderer, VegaLiteRenderer};
use ipl_insights::storage::{build_parquet, LakeStore};

#[derive(Parser)]
#[command(name = "ipl-insights")]
#[command(about = "IPL cricket statistics and charts from ball-by-ball data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory path
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute reports and render them
    Report {
        /// Reports to run (comma-separated slugs, default all)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Renderers to run
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Directory for chart files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// List available reports
    List,

    /// Rebuild Parquet files from JSONL
    BuildParquet,

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (plain, json) = if json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

fn select_reports(only: &[String]) -> Result<Vec<ReportKind>> {
    if only.is_empty() {
        return Ok(ReportKind::ALL.to_vec());
    }

    let mut selected = Vec::new();
    for slug in only {
        match ReportKind::from_slug(slug) {
            Some(kind) => selected.push(kind),
            None => bail!("Unknown report '{}'. Run `ipl-insights list` for names.", slug),
        }
    }
    // Catalogue order, whatever order they were given in.
    Ok(ReportKind::ALL
        .into_iter()
        .filter(|k| selected.contains(k))
        .collect())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    init_tracing(&config.log_level, cli.json_logs);

    tracing::info!("Starting ipl-insights v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Report {
            only,
            format,
            output_dir,
        } => {
            let kinds = select_reports(&only)?;
            let format = format.unwrap_or(config.output.format);
            let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());

            let store = LakeStore::open(config.storage(), config.store.backend)
                .context("Failed to open record store")?;

            let mut renderers: Vec<Box<dyn Renderer>> = Vec::new();
            if format.text() {
                renderers.push(Box::new(TextRenderer::stdout()));
            }
            if format.vega_lite() {
                renderers.push(Box::new(VegaLiteRenderer::new(output_dir)));
            }

            let summary = run_reports(&store, &kinds, &config.reports, &mut renderers)
                .context("Report run aborted")?;

            if !summary.is_success() {
                eprintln!("\n=== Failed reports ===");
                for failure in &summary.failed {
                    eprintln!("  {}", failure);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List => {
            for kind in ReportKind::ALL {
                let chart = kind.chart();
                println!("{:<24} {:<5} {}", kind.slug(), chart.kind, kind.title());
            }
        }
        Commands::BuildParquet => {
            tracing::info!("Rebuilding Parquet files...");
            let (balls, matches) =
                build_parquet(&config.storage()).context("Failed to build Parquet files")?;

            println!("\n=== Parquet Rebuilt ===");
            println!("Ball events:   {}", balls);
            println!("Match records: {}", matches);
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{:?} already exists (use --force to overwrite)", path);
            }
            let contents = AppConfig::default().to_toml()?;
            std::fs::write(&path, contents)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Wrote default configuration to {:?}", path);
        }
    }

    Ok(ExitCode::SUCCESS)
}
