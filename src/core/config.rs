use chrono::{DateTime, TimeZone, Utc};

use crate::query::types::SortOrder;

/// Fuzzy matching knobs for the name index.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub threshold: f64,      // Accept scores <= threshold (0.0 = exact)
    pub location: usize,     // Expected match position, in characters
    pub distance: usize,     // How far from `location` a match may drift
    pub max_edits: u8,       // Upper bound for the Levenshtein DFA
    pub case_sensitive: bool,
    pub ignore_location: bool,
    pub cache_size: usize,   // Memoized search terms
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            threshold: 0.3,
            location: 0,
            distance: 100,
            max_edits: 2,
            case_sensitive: false,
            ignore_location: false,
            cache_size: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,

    // Pagination
    pub page_sizes: Vec<usize>,
    pub default_page_size: usize,

    // Initial view state
    pub default_price_range: (f64, f64),
    pub default_date_start: DateTime<Utc>,
    pub default_sort_by: String,
    pub default_sort_order: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search: SearchConfig::default(),
            page_sizes: vec![10, 20, 30, 40, 50],
            default_page_size: 10,
            default_price_range: (0.0, 100.0),
            default_date_start: Utc
                .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            default_sort_by: "name".to_string(),
            default_sort_order: SortOrder::Asc,
        }
    }
}
