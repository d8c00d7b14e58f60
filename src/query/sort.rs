use tracing::trace;

use crate::core::types::{Field, Record};
use crate::query::types::SortOrder;

/// Stable sort of `rows` by a field name.
///
/// Unknown field names leave the input order untouched. Equal keys keep
/// their incoming order in both directions.
pub fn sort_rows(rows: &mut [&Record], field: &str, order: SortOrder) {
    match field.parse::<Field>() {
        Ok(field) => sort_by_field(rows, field, order),
        Err(_) => trace!("Sort on unknown field '{}' skipped", field),
    }
}

pub fn sort_by_field(rows: &mut [&Record], field: Field, order: SortOrder) {
    // slice::sort_by is stable, so reversing the comparator keeps ties in place
    rows.sort_by(|a, b| order.apply(a.value(field).compare(&b.value(field))));
}
