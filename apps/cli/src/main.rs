//! # Beer Orderer
//!
//! Terminal front end: browse the beer catalog, keep an order list and
//! switch the display currency.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  parse args ─► init tracing ─► AppConfig ─► SettingsStore               │
//! │                                                │                        │
//! │        CatalogViewState::from_config ◄─────────┘ settings watch         │
//! │                │                                                        │
//! │                ├─► initialize (saved order + exchange rates)            │
//! │                ├─► run command                                          │
//! │                └─► flush (wait for orders.json)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use beer_client::{AppConfig, CatalogViewState, JsonFileOrderStore, SettingsStore};
use beer_core::{Currency, FilterOption, SortOption};

#[derive(Parser)]
#[command(name = "beer-orderer")]
#[command(about = "Browse beers and keep an order list")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the catalog
    List {
        /// Style: all, ipa, ale, stout, lager, pilsner, porter, other
        #[arg(long)]
        filter: Option<FilterOption>,
        /// Order: none, price-asc, price-desc, rating-asc, rating-desc,
        /// reviews-asc, reviews-desc
        #[arg(long)]
        sort: Option<SortOption>,
    },

    /// Show the order list and its total
    Cart,

    /// Add a catalog beer to the order
    Add {
        /// Beer id as shown by `list`
        id: i64,
    },

    /// Remove one occurrence of a beer from the order
    Remove {
        /// Beer id as shown by `cart`
        id: i64,
    },

    /// Empty the order
    Clear,

    /// Send the order
    Send,

    /// Show or change preferences
    Settings {
        /// Display currency: USD, EUR or CZK
        #[arg(long)]
        currency: Option<Currency>,
        /// Dark mode on or off
        #[arg(long, value_name = "BOOL")]
        dark_mode: Option<bool>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,beer=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load_or_default(cli.config);
    debug!(?config, "Configuration loaded");

    let settings_path = AppConfig::default_settings_path()
        .unwrap_or_else(|| config.data_dir().join("settings.toml"));
    let settings = SettingsStore::open(settings_path);
    let mut settings_rx = settings.subscribe();

    let mut state = CatalogViewState::from_config(&config)?;
    state.apply_settings(&settings_rx.borrow_and_update());
    state
        .initialize(&JsonFileOrderStore::new(config.orders_path()))
        .await;
    info!(orders = state.snapshot().order_count, "Ready");

    let outcome = match cli.command {
        Commands::List { filter, sort } => commands::list(&mut state, filter, sort).await,
        Commands::Cart => commands::cart(&state),
        Commands::Add { id } => commands::add(&mut state, id).await,
        Commands::Remove { id } => commands::remove(&mut state, id),
        Commands::Clear => commands::clear(&mut state),
        Commands::Send => commands::send(&mut state),
        Commands::Settings {
            currency,
            dark_mode,
        } => commands::settings(&mut state, &settings, &mut settings_rx, currency, dark_mode),
    };

    state.flush().await?;
    outcome
}
