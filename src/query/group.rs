use std::collections::{BTreeSet, HashMap};

use crate::core::types::{Field, Record};

/// Values of the grouping fields, in column order.
///
/// Kept as a tuple rather than one joined string so that `("ab", "c")` and
/// `("a", "bc")` stay distinct buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    pub fn of(record: &Record, fields: &BTreeSet<Field>) -> Self {
        GroupKey(fields.iter().map(|&field| record.value(field).to_string()).collect())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn label(&self) -> String {
        self.0.join(" / ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub key: GroupKey,
    pub rows: Vec<&'a Record>,
}

/// Ordered rows, either as one flat sequence or as buckets.
#[derive(Debug, Clone, PartialEq)]
pub enum Rows<'a> {
    Flat(Vec<&'a Record>),
    Grouped(Vec<Group<'a>>),
}

impl<'a> Rows<'a> {
    /// Number of records, not buckets.
    pub fn len(&self) -> usize {
        match self {
            Rows::Flat(rows) => rows.len(),
            Rows::Grouped(groups) => groups.iter().map(|g| g.rows.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in display order; buckets are visited one after another.
    pub fn records(&self) -> Vec<&'a Record> {
        match self {
            Rows::Flat(rows) => rows.clone(),
            Rows::Grouped(groups) => groups.iter().flat_map(|g| g.rows.iter().copied()).collect(),
        }
    }

    pub fn groups(&self) -> Option<&[Group<'a>]> {
        match self {
            Rows::Flat(_) => None,
            Rows::Grouped(groups) => Some(groups),
        }
    }
}

/// Bucket sorted rows by `fields`.
///
/// Buckets appear in first-seen order and keep the incoming order of their
/// members. No fields means no grouping.
pub fn group_rows<'a>(rows: Vec<&'a Record>, fields: &BTreeSet<Field>) -> Rows<'a> {
    if fields.is_empty() {
        return Rows::Flat(rows);
    }

    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();

    for record in rows {
        let key = GroupKey::of(record, fields);
        match slots.get(&key) {
            Some(&slot) => groups[slot].rows.push(record),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    rows: vec![record],
                });
            }
        }
    }

    Rows::Grouped(groups)
}
