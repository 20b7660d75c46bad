//! One function per subcommand. Each mutates the view state and prints
//! the resulting snapshot.

use anyhow::{anyhow, bail, Result};
use tokio::sync::watch;
use tracing::debug;

use beer_client::{CatalogViewState, Settings, SettingsStore};
use beer_core::{Currency, FilterOption, SortOption};

use crate::render;

pub async fn list(
    state: &mut CatalogViewState,
    filter: Option<FilterOption>,
    sort: Option<SortOption>,
) -> Result<()> {
    if let Some(filter) = filter {
        state.set_filter(filter);
    }
    if let Some(sort) = sort {
        state.set_sort(sort);
    }
    load(state).await?;

    let snapshot = state.snapshot();
    print!(
        "{}",
        render::catalog(&snapshot, |beer| state.converted_price_display(beer))
    );
    Ok(())
}

pub fn cart(state: &CatalogViewState) -> Result<()> {
    let snapshot = state.snapshot();
    print!(
        "{}",
        render::cart(&snapshot, |beer| state.converted_price_display(beer))
    );
    Ok(())
}

pub async fn add(state: &mut CatalogViewState, id: i64) -> Result<()> {
    load(state).await?;
    let beer = state
        .find_beer(id)
        .cloned()
        .ok_or_else(|| anyhow!("No beer with id {} in the catalog", id))?;

    println!("Added {}", beer.name);
    state.add_to_cart(beer);
    cart(state)
}

pub fn remove(state: &mut CatalogViewState, id: i64) -> Result<()> {
    let beer = state
        .find_order(id)
        .cloned()
        .ok_or_else(|| anyhow!("No beer with id {} in the order", id))?;

    state.remove_from_cart(&beer);
    println!("Removed {}", beer.name);
    cart(state)
}

pub fn clear(state: &mut CatalogViewState) -> Result<()> {
    state.clear_cart();
    println!("Order cleared");
    Ok(())
}

pub fn send(state: &mut CatalogViewState) -> Result<()> {
    if state.snapshot().order_count == 0 {
        bail!("The order is empty");
    }
    let total = state.snapshot().total_price;
    let count = state.send_order();
    println!("Sent {} beer(s), total {}", count, total);
    Ok(())
}

pub fn settings(
    state: &mut CatalogViewState,
    store: &SettingsStore,
    changes: &mut watch::Receiver<Settings>,
    currency: Option<Currency>,
    dark_mode: Option<bool>,
) -> Result<()> {
    let updated = store.update(|s| {
        if let Some(currency) = currency {
            s.currency = currency;
        }
        if let Some(dark_mode) = dark_mode {
            s.dark_mode = dark_mode;
        }
    })?;
    debug!(?updated, path = ?store.path(), "Settings stored");

    state.apply_pending_settings(changes);
    print!("{}", render::settings(&state.snapshot()));
    Ok(())
}

/// Fetches the catalog, turning a published fetch error into a failure.
async fn load(state: &mut CatalogViewState) -> Result<()> {
    state.load_catalog().await;
    match state.snapshot().error {
        Some(message) => bail!("Could not load the catalog: {}", message),
        None => Ok(()),
    }
}
