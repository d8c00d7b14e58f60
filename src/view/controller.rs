use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::store::RecordStore;
use crate::core::types::Field;
use crate::query::filter::{DateRange, PriceRange};
use crate::query::paginate::{PageInfo, PageMove};
use crate::query::pipeline::{DerivedView, derive};
use crate::query::types::SortOrder;
use crate::search::index::SearchIndex;
use crate::view::state::{Layout, ViewState};

/// Owns the view state and re-derives the page after every mutation.
///
/// Each mutator that touches a pipeline input runs the whole pipeline again
/// and writes the clamped page index back into the state, so the page is
/// clamped but never reset.
pub struct ViewController {
    store: RecordStore,
    index: SearchIndex,
    config: Config,
    state: ViewState,
    info: PageInfo,
}

impl ViewController {
    pub fn new(store: RecordStore, config: Config) -> Self {
        let state = ViewState::from_config(&config);
        Self::with_state(store, config, state)
    }

    pub fn with_state(store: RecordStore, config: Config, state: ViewState) -> Self {
        let index = SearchIndex::build(&store, &config.search);
        let mut controller = ViewController {
            store,
            index,
            config,
            state,
            info: PageInfo::default(),
        };
        controller.refresh();
        controller
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Metadata from the latest recomputation.
    pub fn page_info(&self) -> PageInfo {
        self.info
    }

    /// Current page and metadata.
    ///
    /// Runs the whole pipeline again over the current state; only the search
    /// step is served from the index cache. Use `page_info` when the metadata
    /// is enough.
    pub fn query(&self) -> DerivedView<'_> {
        derive(&self.store, &self.index, &self.state)
    }

    pub fn visible_columns(&self) -> Vec<Field> {
        self.state.visible_columns()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> PageInfo {
        self.state.search_term = term.into();
        self.refresh()
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) -> PageInfo {
        self.state.price_range = PriceRange::new(min, max);
        self.refresh()
    }

    pub fn set_date_range(&mut self, range: DateRange) -> PageInfo {
        self.state.date_range = range;
        self.refresh()
    }

    pub fn set_date_start(&mut self, start: DateTime<Utc>) -> PageInfo {
        self.state.date_range.start = start;
        self.refresh()
    }

    pub fn set_date_end(&mut self, end: DateTime<Utc>) -> PageInfo {
        self.state.date_range.end = end;
        self.refresh()
    }

    /// Unknown field names are kept; sorting then leaves rows as filtered.
    pub fn set_sort_by(&mut self, field: impl Into<String>) -> PageInfo {
        let field = field.into();
        if field.parse::<Field>().is_err() {
            warn!("Sorting by unknown field '{}' keeps the current order", field);
        }
        self.state.sort_by = field;
        self.refresh()
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> PageInfo {
        self.state.sort_order = order;
        self.refresh()
    }

    pub fn set_sort(&mut self, field: impl Into<String>, order: SortOrder) -> PageInfo {
        self.state.sort_order = order;
        self.set_sort_by(field)
    }

    pub fn set_group_keys(&mut self, fields: impl IntoIterator<Item = Field>) -> PageInfo {
        self.state.group_keys = fields.into_iter().collect::<BTreeSet<_>>();
        self.refresh()
    }

    pub fn toggle_group_key(&mut self, field: Field) -> PageInfo {
        if !self.state.group_keys.remove(&field) {
            self.state.group_keys.insert(field);
        }
        self.refresh()
    }

    /// Negative requests clamp to the first page, large ones to the last.
    pub fn set_page_index(&mut self, page_index: i64) -> PageInfo {
        self.state.page_index = page_index.max(0) as usize;
        self.refresh()
    }

    /// Only sizes from `Config::page_sizes` are accepted.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<PageInfo> {
        if !self.config.page_sizes.contains(&page_size) {
            warn!("Rejected page size {} (allowed: {:?})", page_size, self.config.page_sizes);
            return Err(Error::invalid_argument(format!(
                "page size {} is not one of {:?}",
                page_size, self.config.page_sizes
            )));
        }
        self.state.page_size = page_size;
        Ok(self.refresh())
    }

    pub fn first_page(&mut self) -> PageInfo {
        self.go(PageMove::First)
    }

    pub fn previous_page(&mut self) -> PageInfo {
        self.go(PageMove::Previous)
    }

    pub fn next_page(&mut self) -> PageInfo {
        self.go(PageMove::Next)
    }

    pub fn last_page(&mut self) -> PageInfo {
        self.go(PageMove::Last)
    }

    /// Explicit "back to page 1", e.g. after a new search term.
    pub fn reset_page(&mut self) -> PageInfo {
        self.state.page_index = 0;
        self.refresh()
    }

    /// Returns whether `field` is hidden afterwards. Display-only.
    pub fn toggle_hidden_column(&mut self, field: Field) -> bool {
        let hidden = if self.state.hidden_columns.remove(&field) {
            false
        } else {
            self.state.hidden_columns.insert(field)
        };
        debug!("Column '{}' hidden: {}", field, hidden);
        hidden
    }

    /// Display-only.
    pub fn toggle_layout(&mut self) -> Layout {
        self.state.layout = self.state.layout.toggled();
        self.state.layout
    }

    fn go(&mut self, movement: PageMove) -> PageInfo {
        self.state.page_index = self.info.target(movement);
        self.refresh()
    }

    fn refresh(&mut self) -> PageInfo {
        let info = derive(&self.store, &self.index, &self.state).info;
        self.state.page_index = info.page_index;
        self.info = info;
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::types::{Record, RecordId, Timestamp};

    fn records(n: u64) -> Vec<Record> {
        (1..=n)
            .map(|id| Record {
                id: RecordId(id),
                name: format!("Item {:03}", id),
                category: if id % 3 == 0 { "Fizz" } else { "Plain" }.to_string(),
                subcategory: "S".to_string(),
                created_at: Timestamp::parse("2022-02-02"),
                updated_at: Timestamp::parse("2022-02-03"),
                price: (id % 100) as f64,
                sale_price: 1.0,
            })
            .collect()
    }

    fn controller(n: u64) -> ViewController {
        ViewController::new(RecordStore::new(records(n)).unwrap(), Config::default())
    }

    #[test]
    fn starts_on_first_page() {
        let view = controller(23);
        let info = view.page_info();
        assert_eq!(info.page_count, 3);
        assert_eq!(info.page_index, 0);
        assert_eq!(view.query().page_rows().len(), 10);
    }

    #[test]
    fn query_rederives_from_current_state() {
        let mut view = controller(23);
        view.set_search_term("item 01");
        let misses = view.index().cache_stats().miss_count;
        let hits = view.index().cache_stats().hit_count;

        let derived = view.query();
        assert_eq!(derived.info, view.page_info());
        let stats = view.index().cache_stats();
        assert_eq!(stats.miss_count, misses);
        assert_eq!(stats.hit_count, hits + 1);
    }

    #[test]
    fn page_index_clamps_into_range() {
        let mut view = controller(23);
        assert_eq!(view.set_page_index(5).page_index, 2);
        assert_eq!(view.state().page_index, 2);
        assert_eq!(view.query().page_rows().len(), 3);
        assert_eq!(view.set_page_index(-3).page_index, 0);
    }

    #[test]
    fn growing_page_size_clamps_instead_of_resetting() {
        let mut view = controller(45);
        view.set_page_index(3);
        assert_eq!(view.page_info().page_count, 5);

        let info = view.set_page_size(50).unwrap();
        assert_eq!(info.page_count, 1);
        assert_eq!(info.page_index, 0);

        let mut view = controller(45);
        view.set_page_index(1);
        let info = view.set_page_size(20).unwrap();
        assert_eq!(info.page_index, 1);
        assert_eq!(info.page_count, 3);
    }

    #[test]
    fn rejects_page_sizes_outside_allowed_set() {
        let mut view = controller(45);
        let err = view.set_page_size(7).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(view.state().page_size, 10);
    }

    #[test]
    fn filters_do_not_reset_page() {
        let mut view = controller(45);
        view.set_page_index(2);
        // Still 45 rows in 0..=100, page stays
        assert_eq!(view.set_price_range(0.0, 100.0).page_index, 2);
        // Prices 1..=10 fit on a single page
        let info = view.set_price_range(0.0, 10.0);
        assert_eq!(info.total, 10);
        assert_eq!(info.page_index, 0);
    }

    #[test]
    fn navigation_walks_pages() {
        let mut view = controller(23);
        assert_eq!(view.next_page().page_index, 1);
        assert_eq!(view.next_page().page_index, 2);
        assert_eq!(view.next_page().page_index, 2);
        assert_eq!(view.previous_page().page_index, 1);
        assert_eq!(view.last_page().page_index, 2);
        assert_eq!(view.first_page().page_index, 0);
        assert_eq!(view.previous_page().page_index, 0);
    }

    #[test]
    fn reset_page_returns_to_start() {
        let mut view = controller(23);
        view.set_page_index(2);
        view.set_search_term("item");
        assert_eq!(view.state().page_index, 2);
        assert_eq!(view.reset_page().page_index, 0);
    }

    #[test]
    fn unknown_sort_field_is_kept_but_inert() {
        let mut view = controller(5);
        view.set_sort("price", SortOrder::Desc);
        let by_price: Vec<u64> = view.query().page_rows().iter().map(|r| r.id.0).collect();
        assert_eq!(by_price, vec![5, 4, 3, 2, 1]);

        view.set_sort_by("colour");
        assert_eq!(view.state().sort_by, "colour");
        let unsorted: Vec<u64> = view.query().page_rows().iter().map(|r| r.id.0).collect();
        assert_eq!(unsorted, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn group_keys_toggle() {
        let mut view = controller(9);
        view.toggle_group_key(Field::Category);
        assert!(view.state().group_keys.contains(&Field::Category));
        let derived = view.query();
        let groups = derived.rows.groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.label(), "Plain");

        view.toggle_group_key(Field::Category);
        assert!(view.query().rows.groups().is_none());
    }

    #[test]
    fn hidden_columns_and_layout_are_display_only() {
        let mut view = controller(12);
        let before = view.page_info();
        assert!(view.toggle_hidden_column(Field::SalePrice));
        assert!(!view.visible_columns().contains(&Field::SalePrice));
        assert_eq!(view.toggle_layout(), Layout::Gallery);
        assert_eq!(view.page_info(), before);
        assert!(!view.toggle_hidden_column(Field::SalePrice));
        assert_eq!(view.visible_columns().len(), Field::ALL.len());
    }

    #[test]
    fn date_bounds_can_be_moved_separately() {
        let mut view = controller(4);
        let cutoff = DateRange::parse("2022-02-03", "2022-12-31").unwrap();
        assert_eq!(view.set_date_start(cutoff.start).total, 0);
        assert_eq!(view.set_date_range(DateRange::parse("2022-01-01", "2022-12-31").unwrap()).total, 4);
        assert_eq!(view.set_date_end(cutoff.start).total, 4);
    }
}
