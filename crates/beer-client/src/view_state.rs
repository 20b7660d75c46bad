//! # Catalog View State
//!
//! The orchestrator behind every screen: owns the catalog, the order list,
//! the current filter/sort/currency selection and the exchange rates, and
//! publishes a [`ViewSnapshot`] after every change.
//!
//! ## Recomputation Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   CatalogViewState Recomputation                        │
//! │                                                                         │
//! │   catalog fetched ─┐                                                    │
//! │   set_filter ──────┼──► displayed beers = sort(filter(catalog))         │
//! │   set_sort ────────┘                                                    │
//! │                                                                         │
//! │   add/remove/clear ─┐                                                   │
//! │   set_currency ─────┼──► order_count, total_price (formatted)           │
//! │   rates fetched ────┘                                                   │
//! │                                                                         │
//! │   every change ─────────► watch::Sender<ViewSnapshot> ──► subscribers   │
//! │   every order change ──► PersistenceHandle ──► orders.json             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The state is owned by a single task and mutated through `&mut self`,
//! so no locks guard the order list. Network calls are the only await
//! points; subscribers only ever see complete snapshots.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use beer_core::{
    apply_filter_and_sort, BeerItem, Currency, FilterOption, OrderEventKind, OrderStore,
    PricingEngine, RateTable, SortOption,
};

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::persistence::{JsonFileOrderStore, OrderPersistence, PersistenceHandle, PersistenceWorker};
use crate::services::{build_http_client, CatalogSource, HttpCatalogService, HttpRateService, RateSource};
use crate::settings::Settings;

// =============================================================================
// Snapshot
// =============================================================================

/// Everything a view needs to render, published after every change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewSnapshot {
    /// Filtered and sorted catalog.
    pub beers: Vec<BeerItem>,

    /// A catalog fetch is in flight.
    pub loading: bool,

    /// Message of the last failed catalog fetch.
    pub error: Option<String>,

    /// Order line items in insertion order.
    pub orders: Vec<BeerItem>,

    pub order_count: usize,

    /// Order total converted to and formatted in `currency`.
    pub total_price: String,

    pub currency: Currency,
    pub filter: FilterOption,
    pub sort: SortOption,
    pub dark_mode: bool,
}

// =============================================================================
// View State
// =============================================================================

pub struct CatalogViewState {
    catalog_source: Arc<dyn CatalogSource>,
    rate_source: Arc<dyn RateSource>,
    pricing: PricingEngine,
    store: OrderStore,
    persistence: PersistenceHandle,

    catalog: Vec<BeerItem>,
    displayed: Vec<BeerItem>,
    rates: Option<RateTable>,
    filter: FilterOption,
    sort: SortOption,
    currency: Currency,
    dark_mode: bool,
    loading: bool,
    error: Option<String>,

    tx: watch::Sender<ViewSnapshot>,
}

impl CatalogViewState {
    /// Wires the view state to its sources and persistence.
    ///
    /// Every effective order mutation except a restore is queued for
    /// saving on `persistence`.
    pub fn new(
        catalog_source: Arc<dyn CatalogSource>,
        rate_source: Arc<dyn RateSource>,
        pricing: PricingEngine,
        persistence: PersistenceHandle,
    ) -> Self {
        let mut store = OrderStore::new();
        let saver = persistence.clone();
        store.subscribe(move |event| {
            if event.kind != OrderEventKind::Replaced {
                saver.save(event.items.to_vec());
            }
        });

        let state = CatalogViewState {
            catalog_source,
            rate_source,
            pricing,
            store,
            persistence,
            catalog: Vec::new(),
            displayed: Vec::new(),
            rates: None,
            filter: FilterOption::default(),
            sort: SortOption::default(),
            currency: Currency::default(),
            dark_mode: false,
            loading: false,
            error: None,
            tx: watch::channel(ViewSnapshot::default()).0,
        };
        state.publish();
        state
    }

    /// Builds HTTP sources, the JSON order file and its worker from `config`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        let client = build_http_client(config.api.timeout())?;
        let catalog = HttpCatalogService::new(client.clone(), config.api.catalog_url.clone());
        let rates = HttpRateService::new(client, config.api.rates_url.clone());
        let pricing = PricingEngine::new(config.fallback_rates()?);
        let persistence = PersistenceWorker::spawn(JsonFileOrderStore::new(config.orders_path()));

        Ok(Self::new(Arc::new(catalog), Arc::new(rates), pricing, persistence))
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Restores the saved order list and fetches exchange rates.
    pub async fn initialize(&mut self, saved: &dyn OrderPersistence) {
        let items = saved.load().await;
        if !items.is_empty() {
            info!(count = items.len(), "Restored saved order");
            self.store.replace_all(items);
        }
        self.refresh_rates().await;
    }

    /// Fetches rates against the base currency, keeping the fallback
    /// table on failure.
    pub async fn refresh_rates(&mut self) {
        let rates = match self.rate_source.fetch_rates(Currency::BASE).await {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "Exchange rates unavailable, using fallback rates");
                self.pricing.fallback().clone()
            }
        };
        self.rates = Some(rates);
        self.publish();
    }

    /// Fetches the catalog. A failure is published as the snapshot error;
    /// the previous catalog is kept.
    pub async fn load_catalog(&mut self) {
        self.loading = true;
        self.error = None;
        self.publish();

        match self.catalog_source.fetch_all().await {
            Ok(beers) => {
                self.catalog = beers;
                self.recompute_list();
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
        self.publish();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn set_filter(&mut self, filter: FilterOption) {
        self.filter = filter;
        self.recompute_list();
        self.publish();
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
        self.recompute_list();
        self.publish();
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
        self.publish();
    }

    /// Applies persisted user preferences.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.currency = settings.currency;
        self.dark_mode = settings.dark_mode;
        self.publish();
    }

    /// Applies the value on `rx` if the settings store changed it since
    /// this receiver last looked. Returns whether anything was applied.
    pub fn apply_pending_settings(&mut self, rx: &mut watch::Receiver<Settings>) -> bool {
        if !rx.has_changed().unwrap_or(false) {
            return false;
        }
        let settings = *rx.borrow_and_update();
        debug!(?settings, "Settings changed");
        self.apply_settings(&settings);
        true
    }

    /// Waits for the next settings change and applies it. Returns `false`
    /// once the settings store has been dropped.
    pub async fn watch_settings(&mut self, rx: &mut watch::Receiver<Settings>) -> bool {
        if rx.changed().await.is_err() {
            return false;
        }
        let settings = *rx.borrow_and_update();
        debug!(?settings, "Settings changed");
        self.apply_settings(&settings);
        true
    }

    // =========================================================================
    // Order
    // =========================================================================

    pub fn add_to_cart(&mut self, item: BeerItem) {
        debug!(id = item.id, name = %item.name, "Adding to order");
        self.store.add(item);
        self.publish();
    }

    /// Removes one occurrence of `item`. Returns `false` if it was not in
    /// the order.
    pub fn remove_from_cart(&mut self, item: &BeerItem) -> bool {
        let removed = self.store.remove(item);
        if removed {
            debug!(id = item.id, "Removed from order");
            self.publish();
        }
        removed
    }

    /// Empties the order and deletes the saved file.
    pub fn clear_cart(&mut self) {
        self.store.clear();
        self.persistence.clear();
        self.publish();
    }

    /// Sends the order. There is no submission endpoint, so sending
    /// empties the order. Returns the number of line items sent.
    pub fn send_order(&mut self) -> usize {
        let count = self.store.count();
        info!(count, total = %self.store.total_price(), "Order sent");
        self.clear_cart();
        count
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Price of `item` in the current currency, e.g. `"4.60€"`.
    pub fn converted_price_display(&self, item: &BeerItem) -> String {
        self.pricing
            .display(item.price, self.currency, self.rates.as_ref())
    }

    /// Full, unfiltered catalog.
    pub fn catalog(&self) -> &[BeerItem] {
        &self.catalog
    }

    /// Catalog beer with the given id.
    pub fn find_beer(&self, id: i64) -> Option<&BeerItem> {
        self.catalog.iter().find(|b| b.id == id)
    }

    /// First order line item with the given id.
    pub fn find_order(&self, id: i64) -> Option<&BeerItem> {
        self.store.items().iter().find(|b| b.id == id)
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.tx.borrow().clone()
    }

    /// A receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.tx.subscribe()
    }

    /// Waits until all queued order saves have reached the file.
    pub async fn flush(&self) -> ClientResult<()> {
        self.persistence.flush().await
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn recompute_list(&mut self) {
        self.displayed = apply_filter_and_sort(&self.catalog, self.filter, self.sort);
        debug!(
            filter = %self.filter,
            sort = %self.sort,
            shown = self.displayed.len(),
            total = self.catalog.len(),
            "Recomputed displayed beers"
        );
    }

    fn publish(&self) {
        let total = self
            .pricing
            .display(self.store.total_price(), self.currency, self.rates.as_ref());

        let snapshot = ViewSnapshot {
            beers: self.displayed.clone(),
            loading: self.loading,
            error: self.error.clone(),
            orders: self.store.items().to_vec(),
            order_count: self.store.count(),
            total_price: total,
            currency: self.currency,
            filter: self.filter,
            sort: self.sort,
            dark_mode: self.dark_mode,
        };
        self.tx.send_replace(snapshot);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::settings::SettingsStore;
    use async_trait::async_trait;
    use beer_core::Money;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeCatalog {
        result: Mutex<Result<Vec<BeerItem>, u16>>,
    }

    impl FakeCatalog {
        fn ok(beers: Vec<BeerItem>) -> Arc<Self> {
            Arc::new(FakeCatalog {
                result: Mutex::new(Ok(beers)),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(FakeCatalog {
                result: Mutex::new(Err(status)),
            })
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn fetch_all(&self) -> ClientResult<Vec<BeerItem>> {
            match &*self.result.lock().unwrap() {
                Ok(beers) => Ok(beers.clone()),
                Err(status) => Err(ClientError::Status {
                    status: *status,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    struct FakeRates(Option<RateTable>);

    #[async_trait]
    impl RateSource for FakeRates {
        async fn fetch_rates(&self, _base: Currency) -> ClientResult<RateTable> {
            self.0
                .clone()
                .ok_or_else(|| ClientError::RateStatus("error".to_string()))
        }
    }

    fn live_rates(eur: f64) -> Arc<FakeRates> {
        Arc::new(FakeRates(Some(
            RateTable::from_rates(Currency::Usd, [("USD", 1.0), ("EUR", eur)]).unwrap(),
        )))
    }

    fn fallback_engine() -> PricingEngine {
        PricingEngine::new(
            RateTable::from_rates(Currency::Usd, [("USD", 1.0), ("EUR", 0.92), ("CZK", 23.5)])
                .unwrap(),
        )
    }

    struct Harness {
        _dir: TempDir,
        path: PathBuf,
        state: CatalogViewState,
    }

    impl Harness {
        async fn new(catalog: Arc<FakeCatalog>, rates: Arc<FakeRates>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("orders.json");
            Self::with_file(dir, path, catalog, rates).await
        }

        async fn with_file(
            dir: TempDir,
            path: PathBuf,
            catalog: Arc<FakeCatalog>,
            rates: Arc<FakeRates>,
        ) -> Self {
            let file = JsonFileOrderStore::new(&path);
            let persistence = PersistenceWorker::spawn(file.clone());
            let mut state = CatalogViewState::new(catalog, rates, fallback_engine(), persistence);
            state.initialize(&file).await;
            Harness {
                _dir: dir,
                path,
                state,
            }
        }

        async fn saved(&self) -> Vec<BeerItem> {
            self.state.flush().await.unwrap();
            JsonFileOrderStore::new(&self.path).load().await
        }
    }

    fn beer(id: i64, name: &str, cents: i64, rating: f64, reviews: u32) -> BeerItem {
        BeerItem::new(id, name, Money::from_cents(cents)).with_rating(rating, reviews)
    }

    fn catalog() -> Vec<BeerItem> {
        vec![
            beer(1, "IPA Gold", 500, 4.5, 10),
            beer(2, "Dark Stout", 700, 4.1, 30),
            beer(3, "Pale Ale", 450, 3.9, 5),
            beer(4, "Mystery Brew", 900, 4.8, 2),
        ]
    }

    #[tokio::test]
    async fn test_order_scenario_end_to_end() {
        let ipa = beer(1, "IPA Gold", 500, 4.5, 10);
        let mut h = Harness::new(FakeCatalog::ok(vec![ipa.clone()]), live_rates(0.90)).await;
        let s = &mut h.state;

        s.load_catalog().await;
        s.set_filter(FilterOption::Ipa);
        s.set_sort(SortOption::None);
        assert_eq!(s.snapshot().beers, vec![ipa.clone()]);

        s.add_to_cart(ipa.clone());
        s.add_to_cart(ipa.clone());
        let snap = s.snapshot();
        assert_eq!(snap.order_count, 2);
        assert_eq!(snap.total_price, "$10.00");

        s.set_currency(Currency::Eur);
        assert_eq!(s.snapshot().total_price, "9.00€");

        s.clear_cart();
        assert_eq!(s.snapshot().order_count, 0);
        h.state.flush().await.unwrap();
        assert!(!h.path.exists());
    }

    fn ids(s: &CatalogViewState) -> Vec<i64> {
        s.snapshot().beers.iter().map(|b| b.id).collect()
    }

    #[tokio::test]
    async fn test_filter_and_sort_recompute_displayed_list() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        let s = &mut h.state;
        s.load_catalog().await;

        assert_eq!(ids(s), vec![1, 2, 3, 4]);

        s.set_sort(SortOption::PriceDesc);
        assert_eq!(ids(s), vec![4, 2, 1, 3]);

        s.set_filter(FilterOption::Other);
        assert_eq!(ids(s), vec![4]);

        s.set_filter(FilterOption::All);
        s.set_sort(SortOption::ReviewsAsc);
        assert_eq!(ids(s), vec![4, 3, 1, 2]);
        assert_eq!(s.catalog().len(), 4);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_published_as_error() {
        let mut h = Harness::new(FakeCatalog::failing(500), live_rates(0.9)).await;
        let mut rx = h.state.subscribe();

        h.state.load_catalog().await;

        assert!(rx.has_changed().unwrap());
        let snap = rx.borrow_and_update().clone();
        assert!(!snap.loading);
        assert!(snap.beers.is_empty());
        assert!(snap.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_successful_reload_clears_previous_error() {
        let source = FakeCatalog::failing(503);
        let mut h = Harness::new(Arc::clone(&source), live_rates(0.9)).await;

        h.state.load_catalog().await;
        assert!(h.state.snapshot().error.is_some());

        *source.result.lock().unwrap() = Ok(catalog());
        h.state.load_catalog().await;
        let snap = h.state.snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.beers.len(), 4);
    }

    #[tokio::test]
    async fn test_rate_failure_uses_fallback_table() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), Arc::new(FakeRates(None))).await;
        let s = &mut h.state;

        s.add_to_cart(beer(1, "IPA Gold", 1000, 4.5, 10));
        s.set_currency(Currency::Eur);
        assert_eq!(s.snapshot().total_price, "9.20€");

        s.set_currency(Currency::Czk);
        assert_eq!(s.snapshot().total_price, "235.00 Kč");
        assert_eq!(s.rates().map(|r| r.len()), Some(3));
    }

    #[tokio::test]
    async fn test_converted_price_display_follows_currency() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.8)).await;
        let s = &mut h.state;
        let stout = beer(2, "Dark Stout", 700, 4.1, 30);

        assert_eq!(s.converted_price_display(&stout), "$7.00");
        s.set_currency(Currency::Eur);
        assert_eq!(s.converted_price_display(&stout), "5.60€");
    }

    #[tokio::test]
    async fn test_order_changes_are_saved_in_order() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        let all = catalog();

        h.state.add_to_cart(all[0].clone());
        h.state.add_to_cart(all[1].clone());
        h.state.add_to_cart(all[0].clone());
        assert!(h.state.remove_from_cart(&all[0]));
        assert!(!h.state.remove_from_cart(&all[3]));

        assert_eq!(h.saved().await, vec![all[1].clone(), all[0].clone()]);
        assert_eq!(h.state.snapshot().orders, vec![all[1].clone(), all[0].clone()]);
    }

    #[tokio::test]
    async fn test_initialize_restores_saved_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        let saved = vec![catalog()[2].clone(), catalog()[2].clone()];
        JsonFileOrderStore::new(&path).save(&saved).await;

        let h = Harness::with_file(dir, path, FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        let snap = h.state.snapshot();
        assert_eq!(snap.order_count, 2);
        assert_eq!(snap.total_price, "$9.00");
        assert_eq!(h.saved().await, saved);
    }

    #[tokio::test]
    async fn test_send_order_reports_count_and_empties() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        h.state.add_to_cart(catalog()[0].clone());
        h.state.add_to_cart(catalog()[1].clone());

        assert_eq!(h.state.send_order(), 2);
        assert_eq!(h.state.snapshot().order_count, 0);
        assert_eq!(h.state.snapshot().total_price, "$0.00");
        h.state.flush().await.unwrap();
        assert!(!h.path.exists());
    }

    #[tokio::test]
    async fn test_apply_settings() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        h.state.apply_settings(&Settings {
            dark_mode: true,
            currency: Currency::Czk,
        });

        let snap = h.state.snapshot();
        assert!(snap.dark_mode);
        assert_eq!(snap.currency, Currency::Czk);
    }

    #[tokio::test]
    async fn test_settings_store_changes_reach_snapshot() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.toml"));
        let mut rx = store.subscribe();

        h.state.add_to_cart(catalog()[0].clone());
        h.state.add_to_cart(catalog()[0].clone());
        assert!(!h.state.apply_pending_settings(&mut rx));
        assert_eq!(h.state.snapshot().total_price, "$10.00");

        store.set_currency(Currency::Eur).unwrap();
        assert!(h.state.apply_pending_settings(&mut rx));
        assert_eq!(h.state.snapshot().total_price, "9.00€");
        assert!(!h.state.apply_pending_settings(&mut rx));

        store.set_dark_mode(true).unwrap();
        assert!(h.state.watch_settings(&mut rx).await);
        assert!(h.state.snapshot().dark_mode);

        drop(store);
        assert!(!h.state.watch_settings(&mut rx).await);
    }

    #[tokio::test]
    async fn test_lookups_by_id() {
        let mut h = Harness::new(FakeCatalog::ok(catalog()), live_rates(0.9)).await;
        h.state.load_catalog().await;
        h.state.add_to_cart(catalog()[3].clone());

        assert_eq!(h.state.find_beer(2).map(|b| b.name.as_str()), Some("Dark Stout"));
        assert!(h.state.find_beer(99).is_none());
        assert!(h.state.find_order(4).is_some());
        assert!(h.state.find_order(1).is_none());
    }
}
