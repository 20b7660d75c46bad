//! # Order List
//!
//! The in-memory list of beers the user intends to order.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Store Operations                               │
//! │                                                                         │
//! │  User Action             OrderStore call        Event emitted           │
//! │  ───────────             ───────────────        ─────────────           │
//! │                                                                         │
//! │  Tap "Add" ────────────► add(beer) ───────────► Added                   │
//! │                                                                         │
//! │  Tap "Remove" ─────────► remove(&beer) ───────► Removed (if present)    │
//! │                                                                         │
//! │  Clear / Send ─────────► clear() ─────────────► Cleared                 │
//! │                                                                         │
//! │  App start ────────────► replace_all(saved) ──► Replaced                │
//! │                                                                         │
//! │  Every observer is called synchronously, in subscription order,         │
//! │  with the event kind and the full list AFTER the mutation.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Insertion order is display order
//! - Duplicates are allowed: adding a beer twice yields two line items
//! - `count() == items().len()`

use std::fmt;

use crate::money::Money;
use crate::types::BeerItem;

// =============================================================================
// Events
// =============================================================================

/// What kind of mutation happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEventKind {
    Added,
    Removed,
    Cleared,
    Replaced,
}

/// Notification passed to observers after a mutation.
#[derive(Debug, Clone, Copy)]
pub struct OrderEvent<'a> {
    pub kind: OrderEventKind,
    /// The whole order list after the mutation.
    pub items: &'a [BeerItem],
}

/// Handle returned by [`OrderStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&OrderEvent<'_>) + Send>;

// =============================================================================
// Order Store
// =============================================================================

/// Ordered list of beer line items plus its observers.
#[derive(Default)]
pub struct OrderStore {
    items: Vec<BeerItem>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl OrderStore {
    /// Creates an empty order list with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a beer to the end of the list.
    pub fn add(&mut self, item: BeerItem) {
        self.items.push(item);
        self.notify(OrderEventKind::Added);
    }

    /// Removes the first structurally equal occurrence of `item`.
    ///
    /// ## Returns
    /// `true` if something was removed. Removing an absent beer is a
    /// no-op and notifies nobody.
    pub fn remove(&mut self, item: &BeerItem) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(index) => {
                self.items.remove(index);
                self.notify(OrderEventKind::Removed);
                true
            }
            None => false,
        }
    }

    /// Empties the list.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(OrderEventKind::Cleared);
    }

    /// Substitutes the entire content, e.g. when restoring a saved order.
    pub fn replace_all(&mut self, items: Vec<BeerItem>) {
        self.items = items;
        self.notify(OrderEventKind::Replaced);
    }

    /// Sum of all line item prices, in the base currency.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(|i| i.price).sum()
    }

    /// Number of line items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[BeerItem] {
        &self.items
    }

    /// Registers an observer. Any number of observers may be registered.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&OrderEvent<'_>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, kind: OrderEventKind) {
        let event = OrderEvent {
            kind,
            items: &self.items,
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

impl fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStore")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}
