use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A timestamp as it appeared in the source data.
///
/// The raw text is always kept; `instant` is `None` when the text could not
/// be parsed. Such records still load, they are only rejected by the date
/// filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl Timestamp {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(&raw);
        Timestamp { raw, instant }
    }

    pub fn from_millis(millis: i64) -> Self {
        Timestamp {
            raw: millis.to_string(),
            instant: DateTime::<Utc>::from_timestamp_millis(millis),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }
}

/// Parse the textual timestamp formats found in record data.
///
/// Accepts RFC 3339, naive date-times (read as UTC) and bare dates (UTC
/// midnight).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    // null, bools, fractional or out-of-range numbers
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => Timestamp::parse(text),
            RawTimestamp::Millis(millis) => Timestamp::from_millis(millis),
            RawTimestamp::Other(value) => Timestamp {
                raw: value.to_string(),
                instant: None,
            },
        })
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    pub price: f64,
    pub sale_price: f64,
}

impl Record {
    /// Typed value of one column.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Id => FieldValue::Integer(self.id.0),
            Field::Name => FieldValue::Text(&self.name),
            Field::Category => FieldValue::Text(&self.category),
            Field::Subcategory => FieldValue::Text(&self.subcategory),
            Field::CreatedAt => FieldValue::Timestamp(&self.created_at),
            Field::UpdatedAt => FieldValue::Timestamp(&self.updated_at),
            Field::Price => FieldValue::Number(self.price),
            Field::SalePrice => FieldValue::Number(self.sale_price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Timestamp,
    Text,
}

/// Record columns, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "subcategory")]
    Subcategory,
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "sale_price")]
    SalePrice,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Id,
        Field::Name,
        Field::Category,
        Field::Subcategory,
        Field::CreatedAt,
        Field::UpdatedAt,
        Field::Price,
        Field::SalePrice,
    ];

    /// Key used in record data and view state.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Category => "category",
            Field::Subcategory => "subcategory",
            Field::CreatedAt => "createdAt",
            Field::UpdatedAt => "updatedAt",
            Field::Price => "price",
            Field::SalePrice => "sale_price",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Category => "Category",
            Field::Subcategory => "Subcategory",
            Field::CreatedAt => "Created At",
            Field::UpdatedAt => "Updated At",
            Field::Price => "Price",
            Field::SalePrice => "Sale Price",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Id | Field::Price | Field::SalePrice => FieldKind::Numeric,
            Field::CreatedAt | Field::UpdatedAt => FieldKind::Timestamp,
            Field::Name | Field::Category | Field::Subcategory => FieldKind::Text,
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(Field::Id),
            "name" => Ok(Field::Name),
            "category" => Ok(Field::Category),
            "subcategory" => Ok(Field::Subcategory),
            "createdAt" | "created_at" => Ok(Field::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Field::UpdatedAt),
            "price" => Ok(Field::Price),
            "sale_price" | "salePrice" => Ok(Field::SalePrice),
            other => Err(Error::invalid_argument(format!("unknown field '{}'", other))),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw typed cell value handed to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Integer(u64),
    Number(f64),
    Text(&'a str),
    Timestamp(&'a Timestamp),
}

impl FieldValue<'_> {
    /// Compare two values of the same column.
    ///
    /// Timestamps without an instant order before every valid one. Values of
    /// different variants never come from the same column and compare equal.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.instant().cmp(&b.instant()),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Timestamp(ts) => f.write_str(ts.raw()),
        }
    }
}
