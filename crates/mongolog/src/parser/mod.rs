//! Shell-syntax value and server log line parsing
//!
//! Turns the text form of MongoDB values (`{ _id: ObjectId("..."), n:
//! NumberLong(5) }`) and mongod text log lines into a typed [`Value`] tree.
//!
//! # Architecture
//!
//! - `cursor.rs`: byte cursor with furthest-failure tracking
//! - `grammar/`: ordered-choice rules for values and log lines
//! - `builder.rs`: stack accumulator the rules build results on
//! - `convert.rs`: matched text to typed scalar conversion
//! - `formats/`: `LineParser` implementations with input guards
//! - `extjson.rs`: extended JSON output
//! - `metrics.rs`: parsing counters
//!
//! Every parse call owns its cursor and accumulator, so parsers are
//! `Send + Sync` and can be shared across tasks.

pub mod builder;
pub mod convert;
pub mod detector;
pub mod extjson;
pub mod formats;
pub mod metrics;
pub mod model;
pub mod traits;
pub mod value;
mod cursor;
pub(crate) mod grammar;

// Re-export commonly used types
pub use formats::{DocumentParser, LogLineParser, ParserLimits};
pub use model::{InputFormat, ParseError, ParsedLine};
pub use traits::LineParser;
pub use value::{Document, List, Value};

pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB

/// Parse one shell value such as `{ foo: [ 42, 43, 44 ] }`.
pub fn parse_document(text: &str) -> Result<Value, ParseError> {
    grammar::parse_value(text, builder::DEFAULT_MAX_DEPTH)
}

/// Parse one mongod log line into its field mapping.
pub fn parse_log_line(text: &str) -> Result<Document, ParseError> {
    grammar::parse_line(text, builder::DEFAULT_MAX_DEPTH)
}

/// Like [`parse_document`], but the root must be a `{ ... }` document.
pub fn parse_object(text: &str) -> Result<Document, ParseError> {
    DocumentParser::new().parse_object(text)
}
