//! Plain-text rendering of view snapshots.

use std::fmt::Write;

use beer_client::ViewSnapshot;
use beer_core::BeerItem;

/// Catalog table: id, name, converted price, rating.
pub fn catalog(snapshot: &ViewSnapshot, price: impl Fn(&BeerItem) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} beer(s)  filter: {}  sort: {}",
        snapshot.beers.len(),
        snapshot.filter,
        snapshot.sort
    );

    for beer in &snapshot.beers {
        let _ = writeln!(
            out,
            "{:>5}  {:<40} {:>12}  {:.1} ({} reviews)",
            beer.id,
            beer.name,
            price(beer),
            beer.rating.average,
            beer.rating.reviews
        );
    }
    out
}

/// Order lines followed by the count and total.
pub fn cart(snapshot: &ViewSnapshot, price: impl Fn(&BeerItem) -> String) -> String {
    let mut out = String::new();
    if snapshot.orders.is_empty() {
        out.push_str("The order is empty\n");
        return out;
    }

    for beer in &snapshot.orders {
        let _ = writeln!(out, "{:>5}  {:<40} {:>12}", beer.id, beer.name, price(beer));
    }
    let _ = writeln!(
        out,
        "{} item(s)  total {}",
        snapshot.order_count, snapshot.total_price
    );
    out
}

pub fn settings(snapshot: &ViewSnapshot) -> String {
    format!(
        "currency: {}\ndark mode: {}\n",
        snapshot.currency,
        if snapshot.dark_mode { "on" } else { "off" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use beer_core::{Currency, FilterOption, Money, SortOption};

    fn snapshot() -> ViewSnapshot {
        let ipa = BeerItem::new(1, "IPA Gold", Money::from_cents(500)).with_rating(4.5, 10);
        ViewSnapshot {
            beers: vec![ipa.clone()],
            orders: vec![ipa.clone(), ipa],
            order_count: 2,
            total_price: "9.00€".to_string(),
            currency: Currency::Eur,
            filter: FilterOption::Ipa,
            sort: SortOption::PriceAsc,
            ..ViewSnapshot::default()
        }
    }

    #[test]
    fn test_catalog_lists_each_beer() {
        let text = catalog(&snapshot(), |_| "4.50€".to_string());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1 beer(s)  filter: ipa  sort: price-asc");
        assert!(lines[1].contains("IPA Gold"));
        assert!(lines[1].contains("4.50€"));
        assert!(lines[1].ends_with("4.5 (10 reviews)"));
    }

    #[test]
    fn test_cart_shows_total() {
        let text = cart(&snapshot(), |_| "4.50€".to_string());
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("2 item(s)  total 9.00€\n"));
    }

    #[test]
    fn test_empty_cart() {
        let text = cart(&ViewSnapshot::default(), |_| unreachable!());
        assert_eq!(text, "The order is empty\n");
    }

    #[test]
    fn test_settings() {
        let mut snap = snapshot();
        snap.dark_mode = true;
        assert_eq!(settings(&snap), "currency: EUR\ndark mode: on\n");
    }
}
