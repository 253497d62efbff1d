use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use tg_listener::application::messaging::{observers, MessageDispatcher};
use tg_listener::application::services::RelayService;
use tg_listener::domain::entities::{Category, RoomId};
use tg_listener::infrastructure::adapters::console::{decode_update, JsonLinesSource};
use tg_listener::infrastructure::config::Config;
use tg_listener::BotError;

#[derive(Parser)]
#[command(name = "tg-listener")]
#[command(about = "Classifies chat messages and notifies per-category observers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Expected room id (overrides config)
    #[arg(short, long, allow_hyphen_values = true)]
    room_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a stream of JSON updates, one per line
    Run {
        /// Read updates from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Classify a single update or message read from a JSON file
    Classify {
        file: PathBuf,
    },
    /// Print a default config
    InitConfig,
    /// Show version
    Version,
}

fn main() {
    let cli = Cli::parse();

    let (config, load_warning) = load_config(&cli.config, cli.room_id.as_deref());

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    if let Some(warning) = load_warning {
        tracing::warn!("{}", warning);
    }

    let result = match cli.command {
        Commands::Run { input } => run_listener(config, input),
        Commands::Classify { file } => classify_file(&config, &file),
        Commands::InitConfig => init_config(config),
        Commands::Version => {
            println!("tg-listener v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// File config (if present) with env and CLI overrides applied. A broken file
/// falls back to env-only config; the reason is returned for logging.
fn load_config(path: &str, room_override: Option<&str>) -> (Config, Option<String>) {
    let (config, warning) = if Path::new(path).exists() {
        match Config::load(path) {
            Ok(config) => (config.with_env(), None),
            Err(e) => (Config::load_env(), Some(format!("Failed to load config: {}, using defaults", e))),
        }
    } else {
        (Config::load_env(), None)
    };

    let mut config = config;
    if let Some(room) = room_override.map(RoomId::from_text) {
        config.listener.room_id = Some(room);
    }
    (config, warning)
}

fn run_listener(config: Config, input: Option<PathBuf>) -> Result<(), BotError> {
    let room = config.expected_room()?;

    let mut dispatcher = MessageDispatcher::new(room.clone());
    dispatcher.subscribe_all(observers::log_notification);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        tracing::info!("Listening for room {}", room);

        let (relay, worker) = RelayService::spawn(dispatcher, config.listener.queue_capacity);
        let pumped = match input {
            Some(path) => {
                let mut source = JsonLinesSource::open(&path).await?;
                RelayService::pump(&mut source, &relay).await
            }
            None => {
                let mut source = JsonLinesSource::stdin();
                RelayService::pump(&mut source, &relay).await
            }
        };

        // Closing the queue lets the worker drain and stop.
        drop(relay);
        let stats = worker.await.map_err(|e| BotError::Internal(e.to_string()))?;
        let pumped = pumped?;

        tracing::info!(
            "Done: {} delivered, {} without message, {} rejected, {} observer failures",
            pumped.delivered,
            pumped.skipped,
            pumped.rejected,
            stats.failures
        );
        for category in Category::ALL {
            let count = stats.count(category);
            if count > 0 {
                tracing::info!("  {}: {}", category, count);
            }
        }
        Ok::<(), BotError>(())
    })
}

fn classify_file(config: &Config, file: &Path) -> Result<(), BotError> {
    let room = config.expected_room()?;
    let content = std::fs::read_to_string(file)?;
    let update = decode_update(content.trim(), 0)?;

    let Some(record) = update.into_message() else {
        println!("(no message)");
        return Ok(());
    };

    let dispatcher = MessageDispatcher::new(room);
    let notification = dispatcher.classify(&record);
    println!("{}\t{}", notification.category(), observers::summarize(&notification));
    Ok(())
}

fn init_config(config: Config) -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and set listener.room-id.");
    Ok(())
}
