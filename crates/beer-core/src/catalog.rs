//! # Catalog Filtering and Sorting
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  all beers ──► filter(FilterOption) ──► sort(SortOption) ──► displayed  │
//! │                                                                         │
//! │  Recomputed eagerly on every catalog, filter or sort change.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! A beer's category is the FIRST keyword (in the order below) found in
//! its name, case-insensitively. No keyword means [`FilterOption::Other`].
//!
//! ```text
//! IPA ─► Stout ─► Lager ─► Pilsner ─► Porter ─► Ale ─► Other
//! ```
//!
//! "Pale Ale IPA" is therefore an IPA and "Pale Lager" a Lager, never an
//! Ale, so the seven categories partition any catalog.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::BeerItem;

// =============================================================================
// Filter
// =============================================================================

/// Beer style filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOption {
    #[default]
    All,
    Ipa,
    Ale,
    Stout,
    Lager,
    Pilsner,
    Porter,
    Other,
}

/// Named categories in match priority order, with their name keyword.
///
/// "ale" is a substring of many other style names ("Pale Lager"), so it
/// is tried last.
const CATEGORY_KEYWORDS: [(FilterOption, &str); 6] = [
    (FilterOption::Ipa, "ipa"),
    (FilterOption::Stout, "stout"),
    (FilterOption::Lager, "lager"),
    (FilterOption::Pilsner, "pilsner"),
    (FilterOption::Porter, "porter"),
    (FilterOption::Ale, "ale"),
];

impl FilterOption {
    pub const ALL: [FilterOption; 8] = [
        FilterOption::All,
        FilterOption::Ipa,
        FilterOption::Ale,
        FilterOption::Stout,
        FilterOption::Lager,
        FilterOption::Pilsner,
        FilterOption::Porter,
        FilterOption::Other,
    ];

    /// The category a beer name falls into. Never returns `All`.
    pub fn categorize(name: &str) -> FilterOption {
        let lowered = name.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keyword)| lowered.contains(keyword))
            .map(|(category, _)| *category)
            .unwrap_or(FilterOption::Other)
    }

    /// Whether `beer` passes this filter.
    pub fn matches(&self, beer: &BeerItem) -> bool {
        match self {
            FilterOption::All => true,
            category => FilterOption::categorize(&beer.name) == *category,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FilterOption::All => "all",
            FilterOption::Ipa => "ipa",
            FilterOption::Ale => "ale",
            FilterOption::Stout => "stout",
            FilterOption::Lager => "lager",
            FilterOption::Pilsner => "pilsner",
            FilterOption::Porter => "porter",
            FilterOption::Other => "other",
        }
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FilterOption::ALL
            .into_iter()
            .find(|option| option.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownFilter(s.to_string()))
    }
}

// =============================================================================
// Sort
// =============================================================================

/// Sort order for the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Catalog fetch order.
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    RatingAsc,
    RatingDesc,
    ReviewsAsc,
    ReviewsDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 7] = [
        SortOption::None,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::RatingAsc,
        SortOption::RatingDesc,
        SortOption::ReviewsAsc,
        SortOption::ReviewsDesc,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOption::None => "none",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::RatingAsc => "rating-asc",
            SortOption::RatingDesc => "rating-desc",
            SortOption::ReviewsAsc => "reviews-asc",
            SortOption::ReviewsDesc => "reviews-desc",
        }
    }

    /// Ascending comparison for this option's key, `None` for [`SortOption::None`].
    fn ascending_key(&self) -> Option<fn(&BeerItem, &BeerItem) -> Ordering> {
        match self {
            SortOption::None => None,
            SortOption::PriceAsc | SortOption::PriceDesc => Some(by_price),
            SortOption::RatingAsc | SortOption::RatingDesc => Some(by_rating),
            SortOption::ReviewsAsc | SortOption::ReviewsDesc => Some(by_reviews),
        }
    }

    fn is_descending(&self) -> bool {
        matches!(
            self,
            SortOption::PriceDesc | SortOption::RatingDesc | SortOption::ReviewsDesc
        )
    }

    /// Stable in-place sort. Ties keep their relative order in both
    /// directions.
    pub fn sort(&self, beers: &mut [BeerItem]) {
        let Some(cmp) = self.ascending_key() else {
            return;
        };
        if self.is_descending() {
            beers.sort_by(|a, b| cmp(b, a));
        } else {
            beers.sort_by(cmp);
        }
    }
}

fn by_price(a: &BeerItem, b: &BeerItem) -> Ordering {
    a.price.cmp(&b.price)
}

fn by_rating(a: &BeerItem, b: &BeerItem) -> Ordering {
    a.rating.average.total_cmp(&b.rating.average)
}

fn by_reviews(a: &BeerItem, b: &BeerItem) -> Ordering {
    a.rating.reviews.cmp(&b.rating.reviews)
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownSort(s.to_string()))
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Computes the displayed list: `sort(filter(beers, filter), sort)`.
pub fn apply_filter_and_sort(
    beers: &[BeerItem],
    filter: FilterOption,
    sort: SortOption,
) -> Vec<BeerItem> {
    let mut shown: Vec<BeerItem> = beers.iter().filter(|b| filter.matches(b)).cloned().collect();
    sort.sort(&mut shown);
    shown
}

// =============================================================================
// Unit Tests
// =============================================================================
