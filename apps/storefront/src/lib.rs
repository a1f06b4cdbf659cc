//! # Liyana Nour Storefront Library
//!
//! Wires the pricing engine, cart store and voice interpreter into one
//! console session.
//!
//! ## Module Organization
//! ```text
//! liyana_storefront/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── storefront.toml + env overrides
//! ├── bus.rs          ◄─── Cart actor, CartAction / CartResponse
//! ├── session.rs      ◄─── Voice transcripts → cart commands
//! ├── console.rs      ◄─── stdin/stdout front-end
//! └── error.rs        ◄─── AppError / ApiError
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, so stdout stays clean for `--json`)
//! 2. Load config, apply command-line overrides
//! 3. Pick the session id (configured, or a new one remembered in the config)
//! 4. Open the cart store and resume the session's cart
//! 5. Start the cart actor
//! 6. Run the console until EOF or `/quit`
//! 7. Shut the actor down so the last write lands

pub mod bus;
pub mod config;
pub mod console;
pub mod error;
pub mod session;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use liyana_core::{PricingEngine, StaticCatalog};
use liyana_store::{CartStore, JsonFileCartStore, MemoryCartStore};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bus::CartActor;
use config::{OutputFormat, StorageBackend, StorefrontConfig};
use console::Console;
use error::AppResult;

/// Command-line flags. Each one overrides the matching config value.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "liyana-storefront", version, about = "Liyana Nour Extrait console storefront")]
pub struct StartupArgs {
    /// Config file (default: platform config dir / storefront.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Cart session to resume
    #[arg(long, short = 's')]
    pub session: Option<String>,

    /// Cart storage backend: file or memory
    #[arg(long)]
    pub storage: Option<StorageBackend>,

    /// Directory for cart files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Print responses as JSON
    #[arg(long)]
    pub json: bool,

    /// Log filter, e.g. "debug" or "liyana=trace" (default: RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}

impl StartupArgs {
    fn apply(&self, config: &mut StorefrontConfig) {
        if let Some(ref session) = self.session {
            config.cart.session_id = Some(session.clone());
        }
        if let Some(storage) = self.storage {
            config.storage.backend = storage;
        }
        if let Some(ref dir) = self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        if self.json {
            config.console.output = OutputFormat::Json;
        }
    }
}

/// Runs the storefront on stdin/stdout.
pub async fn run(args: StartupArgs) -> AppResult<()> {
    init_tracing(args.log.as_deref());

    let mut config = StorefrontConfig::load(args.config.clone())?;
    args.apply(&mut config);
    config.validate()?;

    let session_id = match config.cart.session_id.clone() {
        Some(id) => id,
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            config.cart.session_id = Some(id.clone());
            if config.storage.backend == StorageBackend::File {
                // Flags and env overrides stay out of the file
                if let Err(e) = StorefrontConfig::remember_session(args.config.clone(), &id) {
                    warn!(error = %e, "Could not remember the new session id");
                }
            }
            id
        }
    };

    let store = open_store(&config)?;
    let catalog = Arc::new(StaticCatalog::liyana_nour());

    info!(
        shop = %config.shop.name,
        %session_id,
        storage = %config.storage.backend,
        "Starting storefront"
    );

    let cart = CartActor::load(session_id, catalog.clone(), PricingEngine::standard(), store)
        .with_coupon_latency(config.coupon_latency())
        .start(config.cart.channel_capacity);

    let mut console = Console::new(catalog, cart.clone(), config);
    let result = console
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await;

    cart.shutdown().await?;
    info!("Storefront stopped");

    result
}

fn open_store(config: &StorefrontConfig) -> AppResult<Box<dyn CartStore>> {
    Ok(match config.storage.backend {
        StorageBackend::Memory => Box::new(MemoryCartStore::new()),
        StorageBackend::File => {
            let store = match config.storage.data_dir {
                Some(ref dir) => JsonFileCartStore::open(dir)?,
                None => JsonFileCartStore::open_default()?,
            };
            Box::new(store)
        }
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `--log debug` or `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=liyana=trace` - Show trace for liyana crates only
/// - Default: INFO level, DEBUG for liyana crates
fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info,liyana=debug"));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = StartupArgs::parse_from([
            "liyana-storefront",
            "--session",
            "550e8400-e29b-41d4-a716-446655440000",
            "--storage",
            "memory",
            "--json",
        ]);

        let mut config = StorefrontConfig::default();
        args.apply(&mut config);

        assert_eq!(
            config.cart.session_id.as_deref(),
            Some("550e8400-e29b-41d4-a716-446655440000")
        );
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.console.output, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_storage_is_rejected() {
        let result = StartupArgs::try_parse_from(["liyana-storefront", "--storage", "redis"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_file_store_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        config.storage.data_dir = Some(dir.path().join("carts"));

        let store = open_store(&config).unwrap();
        assert!(store.load("550e8400-e29b-41d4-a716-446655440000").unwrap().is_none());
        assert!(dir.path().join("carts").is_dir());
    }

    #[test]
    fn test_remembered_session_does_not_persist_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[shop]\nname = \"Liyana Nour Outlet\"\n").unwrap();

        let args = StartupArgs::parse_from([
            "liyana-storefront",
            "--json",
            "--data-dir",
            "/tmp/elsewhere",
        ]);
        let mut config = StorefrontConfig::load_file(Some(path.clone())).unwrap();
        args.apply(&mut config);
        assert_eq!(config.console.output, OutputFormat::Json);

        let session = "550e8400-e29b-41d4-a716-446655440000";
        StorefrontConfig::remember_session(Some(path.clone()), session).unwrap();

        let saved = StorefrontConfig::load_file(Some(path)).unwrap();
        assert_eq!(saved.cart.session_id.as_deref(), Some(session));
        assert_eq!(saved.shop.name, "Liyana Nour Outlet");
        assert_eq!(saved.console.output, OutputFormat::Text);
        assert!(saved.storage.data_dir.is_none());
    }
}
