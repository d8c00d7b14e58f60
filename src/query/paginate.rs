use std::ops::Range;

use serde::Serialize;

use crate::query::group::{Group, Rows};

/// Navigation metadata for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageInfo {
    pub page_index: usize, // Clamped, 0-based
    pub page_count: usize,
    pub page_size: usize,
    pub total: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

/// Page navigation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    First,
    Previous,
    Next,
    Last,
}

impl PageInfo {
    /// Clamp `requested` into the valid pages for `total` rows.
    ///
    /// A zero page size is treated as one row per page.
    pub fn compute(total: usize, requested: i64, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page_count = total.div_ceil(page_size);
        let page_index = if page_count == 0 {
            0
        } else {
            requested.clamp(0, (page_count - 1) as i64) as usize
        };

        PageInfo {
            page_index,
            page_count,
            page_size,
            total,
            can_previous: page_index > 0,
            can_next: page_index + 1 < page_count,
        }
    }

    /// Row offsets covered by this page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Index a navigation request lands on; stays put at the boundaries.
    pub fn target(&self, movement: PageMove) -> usize {
        match movement {
            PageMove::First => 0,
            PageMove::Previous => self.page_index.saturating_sub(1),
            PageMove::Next if self.can_next => self.page_index + 1,
            PageMove::Next => self.page_index,
            PageMove::Last => self.page_count.saturating_sub(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub rows: Rows<'a>,
    pub info: PageInfo,
}

/// Cut one page out of `rows`.
///
/// Grouped rows are paginated by record; a bucket crossing a page boundary
/// shows up on both pages with the members that fall on each.
pub fn paginate<'a>(rows: &Rows<'a>, page_index: i64, page_size: usize) -> Page<'a> {
    let info = PageInfo::compute(rows.len(), page_index, page_size);
    let range = info.range();

    let rows = match rows {
        Rows::Flat(records) => Rows::Flat(records[range].to_vec()),
        Rows::Grouped(groups) => Rows::Grouped(slice_groups(groups, range)),
    };

    Page { rows, info }
}

fn slice_groups<'a>(groups: &[Group<'a>], range: Range<usize>) -> Vec<Group<'a>> {
    let mut page = Vec::new();
    let mut offset = 0;

    for group in groups {
        let group_start = offset;
        let group_end = offset + group.rows.len();
        offset = group_end;

        if group_end <= range.start {
            continue;
        }
        if group_start >= range.end {
            break;
        }

        let from = range.start.max(group_start) - group_start;
        let to = range.end.min(group_end) - group_start;
        page.push(Group {
            key: group.key.clone(),
            rows: group.rows[from..to].to_vec(),
        });
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Record, RecordId, Timestamp};
    use crate::query::group::GroupKey;

    fn records(n: u64) -> Vec<Record> {
        (1..=n)
            .map(|id| Record {
                id: RecordId(id),
                name: format!("Item {}", id),
                category: if id % 2 == 0 { "Even" } else { "Odd" }.to_string(),
                subcategory: "S".to_string(),
                created_at: Timestamp::parse("2021-01-01"),
                updated_at: Timestamp::parse("2021-01-01"),
                price: id as f64,
                sale_price: id as f64,
            })
            .collect()
    }

    fn ids(rows: &Rows) -> Vec<u64> {
        rows.records().iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(PageInfo::compute(23, 0, 10).page_count, 3);
        assert_eq!(PageInfo::compute(20, 0, 10).page_count, 2);
        assert_eq!(PageInfo::compute(1, 0, 50).page_count, 1);
        assert_eq!(PageInfo::compute(0, 0, 10).page_count, 0);
    }

    #[test]
    fn out_of_range_index_clamps_to_last_page() {
        let data = records(23);
        let rows = Rows::Flat(data.iter().collect());
        let page = paginate(&rows, 5, 10);
        assert_eq!(page.info.page_index, 2);
        assert_eq!(ids(&page.rows), vec![21, 22, 23]);
        assert!(page.info.can_previous);
        assert!(!page.info.can_next);
    }

    #[test]
    fn negative_index_clamps_to_first_page() {
        let data = records(23);
        let rows = Rows::Flat(data.iter().collect());
        let page = paginate(&rows, -4, 10);
        assert_eq!(page.info.page_index, 0);
        assert_eq!(page.rows.len(), 10);
        assert!(!page.info.can_previous);
        assert!(page.info.can_next);
    }

    #[test]
    fn empty_input_has_no_pages() {
        let rows = Rows::Flat(Vec::new());
        let page = paginate(&rows, 3, 10);
        assert_eq!(
            page.info,
            PageInfo {
                page_index: 0,
                page_count: 0,
                page_size: 10,
                total: 0,
                can_previous: false,
                can_next: false,
            }
        );
        assert!(page.rows.is_empty());
    }

    #[test]
    fn page_length_matches_remaining_rows() {
        let data = records(45);
        let rows = Rows::Flat(data.iter().collect());
        for index in 0..5 {
            let page = paginate(&rows, index, 10);
            let expected = 10.min(45 - index as usize * 10);
            assert_eq!(page.rows.len(), expected);
        }
    }

    #[test]
    fn grouped_pages_split_buckets_at_boundaries() {
        let data = records(5);
        let odd: Vec<&Record> = data.iter().filter(|r| r.id.0 % 2 == 1).collect();
        let even: Vec<&Record> = data.iter().filter(|r| r.id.0 % 2 == 0).collect();
        let rows = Rows::Grouped(vec![
            Group { key: GroupKey(vec!["Odd".to_string()]), rows: odd },
            Group { key: GroupKey(vec!["Even".to_string()]), rows: even },
        ]);

        let first = paginate(&rows, 0, 2);
        assert_eq!(first.info.page_count, 3);
        assert_eq!(first.rows.groups().unwrap().len(), 1);
        assert_eq!(ids(&first.rows), vec![1, 3]);

        let second = paginate(&rows, 1, 2);
        let groups = second.rows.groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.label(), "Odd");
        assert_eq!(ids(&second.rows), vec![5, 2]);

        let third = paginate(&rows, 2, 2);
        assert_eq!(third.rows.groups().unwrap()[0].key.label(), "Even");
        assert_eq!(ids(&third.rows), vec![4]);
    }

    #[test]
    fn navigation_targets_stop_at_boundaries() {
        let info = PageInfo::compute(23, 0, 10);
        assert_eq!(info.target(PageMove::Previous), 0);
        assert_eq!(info.target(PageMove::Next), 1);
        assert_eq!(info.target(PageMove::Last), 2);

        let last = PageInfo::compute(23, 2, 10);
        assert_eq!(last.target(PageMove::Next), 2);
        assert_eq!(last.target(PageMove::First), 0);

        let empty = PageInfo::compute(0, 0, 10);
        assert_eq!(empty.target(PageMove::Last), 0);
    }
}
