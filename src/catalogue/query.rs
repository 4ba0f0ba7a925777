//! Typed query construction: URL parameters in, a composable predicate out.
//!
//! Both the free-text search view and the discrete facet filter view build
//! the same [`Predicate`], so listing and counting always agree and the
//! storage layer has a single lowering path.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 48;

/// A filterable attribute with a finite set of distinct values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facet {
    Category,
    Type,
    Manufacturer,
}

/// One conjunct of a predicate.
///
/// `Text` is an OR of case-insensitive substring matches over `name`,
/// `model`, `description` and the decimal rendering of `sku`. `AnyOf` is a
/// membership test; for [`Facet::Category`] it matches when any entry of the
/// item's category list has its `name` in the requested set. `Price` is an
/// inclusive range with either bound optional.
#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    Text(String),
    AnyOf(Facet, Vec<String>),
    Price { min: Option<u64>, max: Option<u64> },
}

/// Conjunction of clauses; empty matches everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

impl Predicate {
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Free-text + faceted search parameters (`/catalogue/search`).
    /// Facet values arrive comma-separated in a single parameter; empty or
    /// unparsable values never introduce a constraint.
    pub fn from_search_query(pairs: &[(String, String)]) -> Self {
        let mut clauses = Vec::new();

        if let Some(search) = first_value(pairs, "search") {
            clauses.push(Clause::Text(search.to_string()));
        }

        for (facet, key) in FACET_KEYS {
            if let Some(raw) = first_value(pairs, key) {
                let values = split_csv(raw);
                if !values.is_empty() {
                    clauses.push(Clause::AnyOf(facet, values));
                }
            }
        }

        let min = parse_price(first_value(pairs, "minPrice"));
        let max = parse_price(first_value(pairs, "maxPrice"));
        if min.is_some() || max.is_some() {
            clauses.push(Clause::Price { min, max });
        }

        Self { clauses }
    }

    /// Discrete facet filter parameters (`/catalogue/filter`). Each facet
    /// may arrive once or repeated; occurrences are taken verbatim.
    pub fn from_filter_query(pairs: &[(String, String)]) -> Self {
        let mut clauses = Vec::new();
        for (facet, key) in FACET_KEYS {
            let values = all_values(pairs, key);
            if !values.is_empty() {
                clauses.push(Clause::AnyOf(facet, values));
            }
        }
        Self { clauses }
    }
}

const FACET_KEYS: [(Facet, &str); 3] = [
    (Facet::Category, "category"),
    (Facet::Type, "type"),
    (Facet::Manufacturer, "manufacturer"),
];

/// 1-indexed page selection with the listing defaults. Any non-numeric or
/// non-positive input reverts to the default rather than being clamped, so
/// the offset can never go negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        Self {
            number: positive_or(first_value(pairs, "page"), DEFAULT_PAGE),
            limit: positive_or(first_value(pairs, "limit"), DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        // Page numbers come from the URL; saturate so an absurd page can
        // never overflow into a wrong-but-successful response.
        self.number.saturating_sub(1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero iff the collection matched nothing.
    pub fn max_page(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn all_values(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_price(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.parse::<u64>().ok())
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}
