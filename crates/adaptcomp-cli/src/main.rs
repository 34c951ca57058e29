//! adaptcomp - adaptive compression from the command line
//!
//! Profiles content, decides which compression algorithm and parameters suit
//! it, and compresses or decompresses files through the reference codec.

mod display;
mod json_output;

use adaptcomp_codec::{frame, ReferenceCodec};
use adaptcomp_config::{Config, ConfigFormat, ConfigLoader, LogFormat};
use adaptcomp_engine::{CompressionReport, DecisionOrchestrator, InMemoryLedger};
use adaptcomp_types::Error;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// adaptcomp - adaptive compression decision engine
#[derive(Parser)]
#[command(
    name = "adaptcomp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Adaptive compression decision engine",
    long_about = "adaptcomp profiles content, selects a compression algorithm family and\n\
                  variant suited to it, and tunes that algorithm's parameters, learning\n\
                  from the outcomes of earlier runs."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the content profile of a file
    Profile {
        /// Input file
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the compression decision for a file
    Decide {
        /// Input file
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Compress a file into a framed container
    Compress {
        /// Input file
        input: PathBuf,
        /// Output container
        output: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Restore a file from a framed container
    Decompress {
        /// Input container
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormatArg,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum ConfigFormatArg {
    Yaml,
    Toml,
    Json,
}

impl From<ConfigFormatArg> for ConfigFormat {
    fn from(format: ConfigFormatArg) -> Self {
        match format {
            ConfigFormatArg::Yaml => ConfigFormat::Yaml,
            ConfigFormatArg::Toml => ConfigFormat::Toml,
            ConfigFormatArg::Json => ConfigFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&cli, &config)?;

    info!("adaptcomp v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Profile { input, json } => profile_command(&config, &input, json).await?,
        Commands::Decide { input, json, seed } => {
            decide_command(with_seed(config, seed), &input, json).await?;
        }
        Commands::Compress {
            input,
            output,
            json,
            seed,
        } => compress_command(with_seed(config, seed), &input, &output, json, cli.quiet).await?,
        Commands::Decompress {
            input,
            output,
            json,
        } => decompress_command(&config, &input, &output, json, cli.quiet).await?,
        Commands::Config { default, format } => config_command(&config, default, format.into())?,
    }

    Ok(())
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    let format = cli.log_format.map_or(config.logging.format, Into::into);
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    Ok(())
}

fn with_seed(mut config: Config, seed: Option<u64>) -> Config {
    if seed.is_some() {
        config.engine.seed = seed;
    }
    config
}

fn orchestrator(config: &Config) -> Result<DecisionOrchestrator> {
    let ledger = Arc::new(InMemoryLedger::new());
    DecisionOrchestrator::new(config.engine.clone(), ledger)
        .context("Failed to initialize decision engine")
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Run blocking codec work on the blocking pool under the configured timeout
async fn run_codec<T, F>(config: &Config, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> adaptcomp_types::Result<T> + Send + 'static,
{
    let timeout = config.codec.timeout();
    run_with_timeout(timeout, tokio::task::spawn_blocking(work)).await
}

async fn run_with_timeout<T, F>(timeout: Duration, task: F) -> Result<T>
where
    F: Future<Output = std::result::Result<adaptcomp_types::Result<T>, tokio::task::JoinError>>,
{
    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => Ok(joined.context("Codec task panicked")??),
        Err(_) => Err(Error::Timeout {
            seconds: timeout.as_secs(),
        }
        .into()),
    }
}

async fn profile_command(config: &Config, input: &Path, json: bool) -> Result<()> {
    let content = read_input(input).await?;
    let engine = orchestrator(config)?;
    let profile = engine.profile(&content);

    if json {
        let output = json_output::ProfileJson::new(
            input.display().to_string(),
            content.len() as u64,
            &profile,
        );
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} Profiling {}",
            style("→").green().bold(),
            style(input.display()).cyan()
        );
        display::display_profile(&profile, content.len() as u64);
    }
    Ok(())
}

async fn decide_command(config: Config, input: &Path, json: bool) -> Result<()> {
    let content = read_input(input).await?;
    let engine = orchestrator(&config)?;
    let decision = engine.decide(&content);

    if json {
        let output = json_output::DecisionJson {
            metadata: json_output::OperationMetadata::new(
                "decide",
                input.display().to_string(),
                None,
            ),
            decision: &decision,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} Deciding for {}",
            style("→").green().bold(),
            style(input.display()).cyan()
        );
        display::display_decision(&decision);
    }
    Ok(())
}

async fn compress_command(
    config: Config,
    input: &Path,
    output: &Path,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let content = read_input(input).await?;
    let engine = orchestrator(&config)?;
    let verify = config.codec.verify;

    let spinner = display::create_spinner("Compressing...", quiet || json);
    let (report, framed): (CompressionReport, Vec<u8>) = run_codec(&config, move || {
        let codec = ReferenceCodec::new();
        let report = engine.compress_with_fallback(&codec, &content)?;
        let framed = frame::pack(report.variant, &report.payload);

        if verify {
            let (_, restored) = codec.decompress_framed(&framed)?;
            if restored != content {
                return Err(Error::compression_failed(
                    report.variant,
                    "round-trip verification produced different bytes",
                ));
            }
            debug!("Verified {} byte round trip", restored.len());
        }
        Ok((report, framed))
    })
    .await?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    write_output(output, &framed).await?;
    info!(
        "Wrote {} bytes to {} with {}",
        framed.len(),
        output.display(),
        report.variant
    );

    if json {
        let document = json_output::CompressionJson::new(
            input.display().to_string(),
            output.display().to_string(),
            &report,
            framed.len() as u64,
        );
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else if !quiet {
        if report.fell_back() {
            display::display_warning(&format!(
                "{} was unavailable, used {}",
                report.decision.selected_variant, report.variant
            ));
        }
        display::display_compression_report(&report, framed.len() as u64);
        display::display_success(&format!("Compressed to {}", output.display()));
    }
    Ok(())
}

async fn decompress_command(
    config: &Config,
    input: &Path,
    output: &Path,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let container = read_input(input).await?;
    let container_bytes = container.len() as u64;

    let spinner = display::create_spinner("Decompressing...", quiet || json);
    let start_time = Instant::now();
    let (variant, restored) =
        run_codec(config, move || ReferenceCodec::new().decompress_framed(&container)).await?;
    let elapsed = start_time.elapsed();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    write_output(output, &restored).await?;

    if json {
        let document = json_output::DecompressionJson::new(
            input.display().to_string(),
            output.display().to_string(),
            variant,
            container_bytes,
            restored.len() as u64,
            elapsed,
        );
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else if !quiet {
        display::display_decompression(variant, container_bytes, restored.len() as u64, elapsed);
        display::display_success(&format!("Restored {}", output.display()));
    }
    Ok(())
}

fn config_command(config: &Config, default: bool, format: ConfigFormat) -> Result<()> {
    let (label, shown) = if default {
        ("Default configuration:", Config::default())
    } else {
        ("Current configuration:", config.clone())
    };

    if shown.validate().is_err() {
        bail!("Configuration is invalid");
    }

    eprintln!("{} {}", style("⚙").blue().bold(), label);
    print!("{}", format.render(&shown)?);
    Ok(())
}
