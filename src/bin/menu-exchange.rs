// Menu Exchange - CLI
// Single entry point for running and inspecting the price exchange

use clap::{Parser, Subcommand};
use menu_exchange::{Config, ExchangeError};
use tracing::{error, info, Level};

// Load command modules from cli directory
#[path = "../cli/run_commands.rs"]
mod run_commands;
#[path = "../cli/simulate_commands.rs"]
mod simulate_commands;

#[derive(Parser)]
#[command(name = "menu-exchange")]
#[command(version = "0.1.0")]
#[command(about = "Mocktail & Food Stock Exchange", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Open the exchange with live price updates and a console
    Run {
        /// Close the exchange after this many seconds
        #[arg(short, long)]
        seconds: Option<u64>,
    },

    /// Tick the market offline as fast as possible
    Simulate {
        /// Number of ticks
        #[arg(short, long, default_value = "100")]
        ticks: u64,

        /// RNG seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Trigger a crash every N ticks
        #[arg(long)]
        crash_every: Option<u64>,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the configured catalog
    Catalog,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config may be missing (init); fall back to info level
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Config::from_file(&cli.config)
            .ok()
            .and_then(|c| c.logging.log_level.parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => {
            info!("🔧 Initializing {}", cli.config);
            Config::load_or_create(&cli.config)?;
            info!("✅ Ready. Next: menu-exchange run");
        }

        Commands::Run { seconds } => {
            let config = load_config_or_exit(&cli.config)?;
            if let Err(e) = run_commands::run_exchange(config, seconds).await {
                exit_with(e);
            }
        }

        Commands::Simulate { ticks, seed, crash_every, json } => {
            let config = load_config_or_exit(&cli.config)?;
            let result = simulate_commands::simulate(&config, ticks, seed, crash_every, json)
                .and_then(|report| simulate_commands::print_report(&report, json));
            if let Err(e) = result {
                exit_with(e);
            }
        }

        Commands::Catalog => {
            let config = load_config_or_exit(&cli.config)?;
            if let Err(e) = simulate_commands::show_catalog(&config) {
                exit_with(e);
            }
        }
    }

    Ok(())
}

/// Load config or exit with helpful error message
fn load_config_or_exit(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    if !std::path::Path::new(path).exists() {
        exit_with(ExchangeError::ConfigNotFound(path.to_string()));
    }

    match Config::from_file(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("❌ Configuration Error");
            exit_with(ExchangeError::from(e));
        }
    }
}

fn exit_with(err: ExchangeError) -> ! {
    error!("❌ [{}] {}", err.category(), err.user_message());
    std::process::exit(1);
}
