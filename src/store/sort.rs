use crate::error::Error;
use crate::models::OfferSummary;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Order of the offer list on the main page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKind {
    /// Order the backend returned
    #[default]
    Popular,
    PriceLowToHigh,
    PriceHighToLow,
    TopRatedFirst,
}

impl SortKind {
    pub const ALL: [SortKind; 4] = [
        SortKind::Popular,
        SortKind::PriceLowToHigh,
        SortKind::PriceHighToLow,
        SortKind::TopRatedFirst,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKind::Popular => "Popular",
            SortKind::PriceLowToHigh => "Price: low to high",
            SortKind::PriceHighToLow => "Price: high to low",
            SortKind::TopRatedFirst => "Top rated first",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortKind::Popular => "popular",
            SortKind::PriceLowToHigh => "price-low-to-high",
            SortKind::PriceHighToLow => "price-high-to-low",
            SortKind::TopRatedFirst => "top-rated-first",
        }
    }

    fn comparator(&self) -> Option<Comparator> {
        match self {
            SortKind::Popular => None,
            SortKind::PriceLowToHigh => Some(price_ascending as Comparator),
            SortKind::PriceHighToLow => Some(price_descending as Comparator),
            SortKind::TopRatedFirst => Some(rating_descending as Comparator),
        }
    }
}

type Comparator = fn(&OfferSummary, &OfferSummary) -> Ordering;

fn price_ascending(a: &OfferSummary, b: &OfferSummary) -> Ordering {
    a.price.cmp(&b.price)
}

fn price_descending(a: &OfferSummary, b: &OfferSummary) -> Ordering {
    b.price.cmp(&a.price)
}

fn rating_descending(a: &OfferSummary, b: &OfferSummary) -> Ordering {
    b.rating.total_cmp(&a.rating)
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKind {
    type Err = Error;

    /// Accepts either the label or the kebab-case key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key().eq_ignore_ascii_case(s) || kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownSort(s.to_string()))
    }
}

/// Return a reordered copy of `offers`; ties keep their input order
pub fn sort_offers(offers: &[OfferSummary], kind: SortKind) -> Vec<OfferSummary> {
    let mut sorted = offers.to_vec();
    if let Some(compare) = kind.comparator() {
        sorted.sort_by(compare);
    }
    sorted
}
