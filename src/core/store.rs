use std::collections::HashMap;
use std::io::Read;

use tracing::{info, warn};

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Record, RecordId};

/// Immutable dataset, loaded once.
///
/// Records keep their load order; that order is the "original order" every
/// stable stage falls back to.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    positions: HashMap<RecordId, usize>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if let Some(previous) = positions.insert(record.id, position) {
                return Err(Error::new(
                    ErrorKind::DuplicateRecord,
                    format!(
                        "record id {} appears at positions {} and {}",
                        record.id, previous, position
                    ),
                ));
            }
        }

        let invalid_dates = records.iter().filter(|r| !r.created_at.is_valid()).count();
        if invalid_dates > 0 {
            warn!("{} record(s) have an unparseable createdAt and will never pass the date filter", invalid_dates);
        }
        info!("Loaded record store with {} records", records.len());

        Ok(RecordStore { records, positions })
    }

    /// Parse a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Self::new(records)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_reader(reader)?;
        Self::new(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn find(&self, id: RecordId) -> Option<&Record> {
        self.positions.get(&id).map(|&position| &self.records[position])
    }

    /// Like `find`, but a missing id is an error.
    pub fn require(&self, id: RecordId) -> Result<&Record> {
        self.find(id)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no record with id {}", id)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = r#"[
        {"id": 1, "name": "Alpha", "category": "A", "subcategory": "x",
         "createdAt": "2021-01-01T00:00:00Z", "updatedAt": "2021-02-01T00:00:00Z",
         "price": 10, "sale_price": 8.5},
        {"id": 2, "name": "Beta", "category": "B", "subcategory": "y",
         "createdAt": "bogus", "updatedAt": 1612137600000,
         "price": 20.25, "sale_price": 19}
    ]"#;

    #[test]
    fn loads_records_in_order() {
        let store = RecordStore::from_json_str(TWO_RECORDS).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().name, "Alpha");
        assert_eq!(store.find(RecordId(2)).unwrap().price, 20.25);
        assert!(!store.get(1).unwrap().created_at.is_valid());
        assert!(store.get(1).unwrap().updated_at.is_valid());
    }

    #[test]
    fn missing_field_fails_at_load() {
        let err = RecordStore::from_json_str(r#"[{"id": 1, "name": "Alpha"}]"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(err.context.contains("category"));
    }

    #[test]
    fn require_reports_missing_ids() {
        let store = RecordStore::from_json_str(TWO_RECORDS).unwrap();
        assert_eq!(store.require(RecordId(1)).unwrap().name, "Alpha");
        assert_eq!(store.require(RecordId(9)).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut records: Vec<Record> = serde_json::from_str(TWO_RECORDS).unwrap();
        records[1].id = RecordId(1);
        let err = RecordStore::new(records).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateRecord);
    }

    #[test]
    fn reader_and_string_agree() {
        let from_reader = RecordStore::from_reader(TWO_RECORDS.as_bytes()).unwrap();
        let from_str = RecordStore::from_json_str(TWO_RECORDS).unwrap();
        assert_eq!(from_reader.records(), from_str.records());
    }

    #[test]
    fn empty_array_is_an_empty_store() {
        let store = RecordStore::from_json_str("[]").unwrap();
        assert!(store.is_empty());
    }
}
