use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use filehash_cli::config::{AppConfig, CliOverrides, ConfigManager};
use filehash_cli::output::{OutputFormat, create_formatter};
use filehash_cli::progress::{self, format_bytes, format_duration, format_throughput};
use filehash_cli::terminal;
use filehash_core::{
    AlgorithmRegistry, AlgorithmSelection, HashAlgorithm, HashEngine, StrategyHint,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Conventional exit status for a run interrupted by Ctrl-C
const EXIT_CANCELLED: i32 = 130;

#[derive(Parser)]
#[command(name = "filehash")]
#[command(author, version, about = "Single-pass multi-algorithm file hashing", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate one or more digests of a file in a single pass
    Hash {
        /// File to hash
        path: PathBuf,

        /// Algorithms to compute, comma separated (e.g. md5,sha256)
        #[arg(short, long, value_delimiter = ',', conflicts_with = "all")]
        algorithms: Vec<HashAlgorithm>,

        /// Compute every registered algorithm
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Bytes read per chunk
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<usize>,

        /// Hashing strategy (automatic, sequential, parallel)
        #[arg(long)]
        strategy: Option<StrategyHint>,

        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,
    },

    /// List the supported algorithms
    Algorithms,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., hashing.chunk_size)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., hashing.chunk_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("filehash_core", log::LevelFilter::Debug)
            .filter_module("filehash_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match cli.command {
        Commands::Hash {
            path,
            algorithms,
            all,
            format,
            chunk_size,
            strategy,
            no_progress,
        } => {
            let config = ConfigManager::new()
                .load()
                .context("Failed to load configuration")?;
            let selection = if all {
                AlgorithmSelection::all()
            } else if algorithms.is_empty() {
                config.output.default_algorithms.clone()
            } else {
                algorithms.into_iter().collect()
            };
            let overrides = CliOverrides {
                chunk_size,
                strategy,
                format,
                no_progress,
            };
            hash_command(config, overrides, path, selection).await?;
        }
        Commands::Algorithms => {
            list_algorithms(AlgorithmRegistry::global());
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

async fn hash_command(
    mut config: AppConfig,
    overrides: CliOverrides,
    path: PathBuf,
    selection: AlgorithmSelection,
) -> Result<()> {
    config.apply_cli_overrides(&overrides);
    let engine =
        HashEngine::with_config(config.hashing.clone()).context("Invalid hashing options")?;
    log::debug!(
        "Hashing {} with [{selection}] using {:?}",
        path.display(),
        config.hashing
    );

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let ctrl_c = {
        let flag = Arc::clone(&cancel_requested);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("{}", "Cancelling...".yellow());
                flag.store(true, Ordering::Relaxed);
            }
        })
    };

    let show_progress = terminal::should_show_progress(config.output.progress_enabled);
    let (mut provider, progress_rx) =
        progress::create_progress_infrastructure(show_progress, cancel_requested);
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let progress_handle = progress_rx.map(|rx| tokio::spawn(progress::render_progress(rx, label)));

    // The provider, and with it the channel sender, is dropped when the
    // blocking call returns, which lets the renderer finish.
    let hash_path = path.clone();
    let result = tokio::task::spawn_blocking(move || {
        engine.try_compute_with_progress(&hash_path, &selection, &mut provider)
    })
    .await
    .context("Hashing task failed")?;

    if let Some(handle) = progress_handle
        && let Ok(renderer) = handle.await
    {
        renderer.finish(progress::RunOutcome::of(&result));
    }
    ctrl_c.abort();

    let hash = match result {
        Ok(hash) => hash,
        Err(e) if e.is_cancelled() => {
            eprintln!("{}", format!("{e}").yellow());
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to hash {}", path.display()));
        }
    };

    let format = config.output.default_format;
    let use_color =
        format == OutputFormat::Text && terminal::should_use_color(config.output.color_enabled);
    let formatter = create_formatter(format, use_color);
    println!("{}", formatter.format_single(&path, &hash)?);

    if format == OutputFormat::Text && terminal::is_interactive() {
        eprintln!(
            "{}",
            format!(
                "Hashed {} in {} ({})",
                format_bytes(hash.bytes_processed()),
                format_duration(hash.duration()),
                format_throughput(hash.throughput_mbps())
            )
            .dimmed()
        );
    }

    Ok(())
}

fn list_algorithms(registry: &AlgorithmRegistry) {
    for algorithm in registry.list() {
        if let Some(implementation) = registry.get(algorithm) {
            println!(
                "{:<8} {:<10} {:>4} bits",
                algorithm.id(),
                implementation.display_name(),
                implementation.digest_size() * 8
            );
        }
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e:#}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e:#}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("Config file: {}", manager.get_config_path().display());

            let mut current_section = "";
            for (key, value) in &items {
                let (section, name) = key.split_once('.').unwrap_or(("general", key.as_str()));
                if section != current_section {
                    println!("[{}]", section.yellow());
                    current_section = section;
                }
                println!("  {} = {}", name.cyan(), value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
