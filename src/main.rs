//! Typesim CLI - Typing Simulator
//!
//! Usage:
//!   typesim serve [OPTIONS]        Start the HTTP server
//!   typesim estimate <TEXT>        Estimate how long a message takes to type
//!   typesim events <TEXT>          Print the generated keystroke events as JSON
//!   typesim simulate <TEXT>        Play the message back in the terminal
//!
//! Examples:
//!   typesim serve --port 8080
//!   typesim serve --config typesim.yaml --json-logs
//!   typesim estimate "Thanks for waiting!" --profile fast
//!   typesim simulate "Let me check that for you." --seed 7

use clap::{Args, Parser, Subcommand};
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typesim::cli::{Config, ConfigError};
use typesim::random::source_from_seed;
use typesim::{
    estimate_duration, EventGenerator, PreviewStream, SessionKey, SimulationDriver, TracingSink,
};

#[derive(Parser)]
#[command(name = "typesim")]
#[command(author, version, about = "Typing Simulator", long_about = None)]
struct Cli {
    /// Configuration file path (YAML)
    #[arg(short, long, global = true, env = "TYPESIM_CONFIG")]
    config: Option<String>,

    /// Enable JSON logging
    #[arg(long, global = true, env = "TYPESIM_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Typing options shared by every command
#[derive(Args, Clone)]
struct TypingArgs {
    /// Typing profile (hunt-and-peck, average, fast, professional)
    #[arg(long, env = "TYPESIM_PROFILE")]
    profile: Option<String>,

    /// Words per minute
    #[arg(long)]
    wpm: Option<f64>,

    /// Per-character jitter (0.15 = ±15%)
    #[arg(long)]
    variance: Option<f64>,

    /// First-try accuracy (0.0-1.0)
    #[arg(long)]
    accuracy: Option<f64>,

    /// Seed for reproducible output
    #[arg(long, env = "TYPESIM_SEED")]
    seed: Option<u64>,

    /// Hour of day (0-23) for the speed multiplier
    #[arg(long)]
    hour: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Typesim HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "TYPESIM_PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0", env = "TYPESIM_HOST")]
        host: String,

        #[command(flatten)]
        typing: TypingArgs,
    },
    /// Estimate how long a message takes to type
    Estimate {
        text: String,

        #[command(flatten)]
        typing: TypingArgs,
    },
    /// Print the generated keystroke events as JSON
    Events {
        text: String,

        #[command(flatten)]
        typing: TypingArgs,
    },
    /// Play a message back in the terminal
    Simulate {
        text: String,

        /// Playback speed multiplier on delays (0.5 = twice as fast)
        #[arg(long, default_value = "1.0")]
        time_scale: f64,

        /// Log every indicator update instead of drawing the preview
        #[arg(long)]
        log_updates: bool,

        #[command(flatten)]
        typing: TypingArgs,
    },
}

fn build_config(config_file: Option<&str>, typing: &TypingArgs) -> Result<Config, ConfigError> {
    let mut config = if let Some(path) = config_file {
        tracing::info!("Loading configuration from {}", path);
        Config::from_file(path)?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    if let Some(ref profile) = typing.profile {
        config.typing.profile = Some(profile.clone());
    }
    if typing.wpm.is_some() {
        config.typing.words_per_minute = typing.wpm;
    }
    if typing.variance.is_some() {
        config.typing.variance_fraction = typing.variance;
    }
    if typing.accuracy.is_some() {
        config.typing.accuracy = typing.accuracy;
    }
    if typing.seed.is_some() {
        config.simulation.seed = typing.seed;
    }
    if typing.hour.is_some() {
        config.simulation.hour = typing.hour;
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "typesim=info,tower_http=info".into());

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn generator(config: &Config) -> Result<EventGenerator, Box<dyn std::error::Error>> {
    let mut generator = EventGenerator::new(config.typing_config()?)?;
    if let Some(hour) = config.simulation.hour {
        generator = generator.with_hour(hour);
    }
    Ok(generator)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Serve { port, host, typing } => {
            let mut config = build_config(config_file, &typing)?;
            config.server.port = port;
            config.server.host = host;

            typesim::cli::run_server(config).await?;
        }
        Commands::Estimate { text, typing } => {
            let config = build_config(config_file, &typing)?;
            let mut rng = source_from_seed(config.simulation.seed);
            let duration = estimate_duration(&text, &config.typing_config()?, &mut rng)?;
            println!("{}", duration.as_millis());
        }
        Commands::Events { text, typing } => {
            let config = build_config(config_file, &typing)?;
            let mut rng = source_from_seed(config.simulation.seed);
            let events = generator(&config)?.generate(&text, &mut rng);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Commands::Simulate {
            text,
            time_scale,
            log_updates,
            typing,
        } => {
            let config = build_config(config_file, &typing)?;
            let mut rng = source_from_seed(config.simulation.seed);
            let events = generator(&config)?.generate(&text, &mut rng);

            if events.is_empty() {
                tracing::warn!("Nothing to type");
            } else if log_updates {
                let driver = Arc::new(SimulationDriver::new().with_time_scale(time_scale));
                let status = driver
                    .run(
                        SessionKey::from_parts("cli", "operator"),
                        events,
                        Arc::new(TracingSink),
                    )
                    .await;
                tracing::info!(status = ?status, "Simulation finished");
            } else {
                let preview = PreviewStream::new(events).with_time_scale(time_scale);
                tracing::debug!(events = preview.len(), "Playing preview");
                let mut frames = preview.into_stream();
                let mut stdout = std::io::stdout();
                while let Some(frame) = frames.next().await {
                    // Clear the line and redraw the preview
                    write!(stdout, "\r\x1b[2K{}", frame.indicator.preview_text)?;
                    stdout.flush()?;
                }
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}
