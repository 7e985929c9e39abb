//! Canonical extended JSON rendering of parsed values.
//!
//! Scalars map to plain JSON; every extended type becomes a `$`-prefixed
//! marker object (`{"$oid": ...}`, `{"$timestamp": {"t": .., "i": ..}}`).

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::value::{Document, Value};

#[derive(Serialize)]
struct TimestampBody {
    t: u32,
    i: u32,
}

/// Single-key wrapper object: `{"<key>": value}`
fn marker<S, T>(serializer: S, key: &str, value: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

/// Dates inside 1970..=9999 render as ISO-8601 with millisecond precision;
/// anything else keeps the raw millisecond count.
fn serialize_date<S: Serializer>(millis: i64, serializer: S) -> Result<S::Ok, S::Error> {
    let iso = DateTime::<Utc>::from_timestamp_millis(millis)
        .filter(|dt| (1970..=9999).contains(&dt.year()))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));

    match iso {
        Some(iso) => marker(serializer, "$date", &iso),
        None => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("$date", &NumberLong(millis))?;
            map.end()
        }
    }
}

struct NumberLong(i64);

impl Serialize for NumberLong {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        marker(serializer, "$numberLong", &self.0.to_string())
    }
}

fn serialize_double<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_finite() {
        return serializer.serialize_f64(n);
    }
    let text = if n.is_nan() {
        "NaN"
    } else if n.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    };
    marker(serializer, "$numberDouble", text)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int64(n) => serializer.serialize_i64(*n),
            Value::Float64(n) => serialize_double(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::ObjectId(hex) => marker(serializer, "$oid", hex),
            Value::Date(millis) => serialize_date(*millis, serializer),
            Value::BinData { subtype, base64 } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$binary", base64)?;
                map.serialize_entry("$type", &format!("{:02x}", subtype))?;
                map.end()
            }
            Value::Regex { pattern, options } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$regex", pattern)?;
                map.serialize_entry("$options", options)?;
                map.end()
            }
            Value::Timestamp { seconds, increment } => marker(
                serializer,
                "$timestamp",
                &TimestampBody { t: *seconds, i: *increment },
            ),
            Value::NumberLong(n) => NumberLong(*n).serialize(serializer),
            Value::MinKey => marker(serializer, "$minKey", &1),
            Value::MaxKey => marker(serializer, "$maxKey", &1),
            Value::Undefined => marker(serializer, "$undefined", &true),
            Value::Document(doc) => doc.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Render one value as a single JSON text (one line unless `pretty`).
pub fn to_json_string(value: &Value, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
