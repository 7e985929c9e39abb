// Module structure for mongolog.

// Core
pub mod parser;

// Process surface
pub mod cli;
pub mod conf;
pub mod io;
pub mod runtime;

pub use parser::{
    parse_document, parse_log_line, parse_object, Document, DocumentParser, InputFormat,
    LineParser, LogLineParser, ParseError, ParsedLine, Value,
};
