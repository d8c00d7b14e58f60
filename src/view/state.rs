use std::collections::BTreeSet;

use chrono::Utc;

use crate::core::config::Config;
use crate::core::types::Field;
use crate::query::filter::{DateRange, PriceRange};
use crate::query::types::SortOrder;

/// How the rendering layer lays out the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Table,
    Gallery,
}

impl Layout {
    pub fn toggled(self) -> Self {
        match self {
            Layout::Table => Layout::Gallery,
            Layout::Gallery => Layout::Table,
        }
    }
}

/// Every user-adjustable parameter of the view.
///
/// `hidden_columns` and `layout` are display-only: the pipeline never reads
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search_term: String,
    pub price_range: PriceRange,
    pub date_range: DateRange,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub group_keys: BTreeSet<Field>,
    pub hidden_columns: BTreeSet<Field>,
    pub layout: Layout,
    pub page_index: usize,
    pub page_size: usize,
}

impl ViewState {
    /// Initial state; the date range runs from the configured start to now.
    pub fn from_config(config: &Config) -> Self {
        let (min, max) = config.default_price_range;
        ViewState {
            search_term: String::new(),
            price_range: PriceRange::new(min, max),
            date_range: DateRange::new(config.default_date_start, Utc::now()),
            sort_by: config.default_sort_by.clone(),
            sort_order: config.default_sort_order,
            group_keys: BTreeSet::new(),
            hidden_columns: BTreeSet::new(),
            layout: Layout::default(),
            page_index: 0,
            page_size: config.default_page_size,
        }
    }

    pub fn is_hidden(&self, field: Field) -> bool {
        self.hidden_columns.contains(&field)
    }

    /// Columns to render, in display order.
    pub fn visible_columns(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !self.is_hidden(*field))
            .collect()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::from_config(&Config::default())
    }
}
