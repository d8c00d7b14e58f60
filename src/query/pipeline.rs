use std::time::Instant;

use tracing::{debug, trace};

use crate::core::store::RecordStore;
use crate::core::types::Record;
use crate::query::filter::apply_filters;
use crate::query::group::{Rows, group_rows};
use crate::query::paginate::{PageInfo, paginate};
use crate::query::sort::sort_rows;
use crate::search::index::SearchIndex;
use crate::view::state::ViewState;

/// Row counts after each stage of one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub matched: usize,  // After search
    pub filtered: usize, // After price and date filters
    pub groups: usize,   // 0 when grouping is off
}

/// The rows to display plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a> {
    pub rows: Rows<'a>,
    pub info: PageInfo,
    pub stats: PipelineStats,
}

impl<'a> DerivedView<'a> {
    /// Records on the current page, bucket by bucket when grouped.
    pub fn page_rows(&self) -> Vec<&'a Record> {
        self.rows.records()
    }

    pub fn total(&self) -> usize {
        self.info.total
    }

    pub fn page_index(&self) -> usize {
        self.info.page_index
    }

    pub fn page_count(&self) -> usize {
        self.info.page_count
    }

    pub fn can_previous(&self) -> bool {
        self.info.can_previous
    }

    pub fn can_next(&self) -> bool {
        self.info.can_next
    }
}

/// Search → filter → sort → group → paginate.
///
/// Pure over its inputs: the same store, index and state always produce the
/// same view. `index` must have been built from `store`.
pub fn derive<'a>(store: &'a RecordStore, index: &SearchIndex, state: &ViewState) -> DerivedView<'a> {
    let start = Instant::now();

    let matched = index.search_records(store, &state.search_term);
    let matched_count = matched.len();
    trace!("Search '{}' kept {} of {} records", state.search_term, matched_count, store.len());

    let mut rows = apply_filters(matched, &[&state.price_range, &state.date_range]);
    let filtered_count = rows.len();

    sort_rows(&mut rows, &state.sort_by, state.sort_order);

    let grouped = group_rows(rows, &state.group_keys);
    let groups = grouped.groups().map_or(0, |groups| groups.len());

    let requested = i64::try_from(state.page_index).unwrap_or(i64::MAX);
    let page = paginate(&grouped, requested, state.page_size);

    debug!(
        "Derived page {}/{} ({} rows, {} total, {} groups) in {}us",
        page.info.page_index + 1,
        page.info.page_count,
        page.rows.len(),
        page.info.total,
        groups,
        start.elapsed().as_micros()
    );

    DerivedView {
        rows: page.rows,
        info: page.info,
        stats: PipelineStats {
            matched: matched_count,
            filtered: filtered_count,
            groups,
        },
    }
}
