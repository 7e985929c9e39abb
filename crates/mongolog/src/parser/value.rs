//! Typed value tree produced by the grammars.
//!
//! `Value` mirrors the shell representation of BSON: plain JSON scalars plus
//! the extended types the server prints (`ObjectId(...)`, `Timestamp(...)`,
//! ...). Rendering to extended JSON lives in `extjson.rs`.

use indexmap::IndexMap;

/// Ordered sequence of values (`[ ... ]`).
pub type List = Vec<Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    /// Raw text between the quotes; escape sequences are kept as written.
    String(String),
    /// Hex text exactly as captured.
    ObjectId(String),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    BinData { subtype: u8, base64: String },
    Regex { pattern: String, options: String },
    Timestamp { seconds: u32, increment: u32 },
    NumberLong(i64),
    MinKey,
    MaxKey,
    Undefined,
    Document(Document),
    List(List),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::ObjectId(_) => "objectId",
            Value::Date(_) => "date",
            Value::BinData { .. } => "binData",
            Value::Regex { .. } => "regex",
            Value::Timestamp { .. } => "timestamp",
            Value::NumberLong(_) => "numberLong",
            Value::MinKey => "minKey",
            Value::MaxKey => "maxKey",
            Value::Undefined => "undefined",
            Value::Document(_) => "document",
            Value::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(n) | Value::NumberLong(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Field-name to value mapping.
///
/// Keeps first-insertion order for output. Writing an existing name replaces
/// the value in its original slot (last write wins), and two documents are
/// equal when they hold the same fields regardless of order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field. Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut doc = Document::new();
        doc.insert("a", Value::Int64(1));
        doc.insert("b", Value::Int64(2));
        let previous = doc.insert("a", Value::Int64(3));

        assert_eq!(previous, Some(Value::Int64(1)));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("a"), Some(&Value::Int64(3)));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_equality_ignores_field_order() {
        let left: Document = vec![("x", Value::Bool(true)), ("y", Value::Null)]
            .into_iter()
            .collect();
        let right: Document = vec![("y", Value::Null), ("x", Value::Bool(true))]
            .into_iter()
            .collect();
        assert_eq!(left, right);

        let shorter: Document = vec![("x", Value::Bool(true))].into_iter().collect();
        assert_ne!(left, shorter);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::NumberLong(7).as_i64(), Some(7));
        assert_eq!(Value::String("s".into()).as_str(), Some("s"));
        assert_eq!(Value::Float64(1.5).as_i64(), None);
        assert_eq!(Value::MinKey.type_name(), "minKey");
    }
}
