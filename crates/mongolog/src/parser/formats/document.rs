use crate::parser::formats::{decode, ParserLimits};
use crate::parser::grammar;
use crate::parser::traits::*;
use crate::parser::value::{Document, Value};

/// Parser for standalone shell values such as
/// `{ _id: ObjectId("..."), ts: Timestamp(1420000000, 1) }`.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    limits: ParserLimits,
}

impl DocumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ParserLimits) -> Self {
        Self { limits }
    }

    /// Parse text that must hold a `{ ... }` document at the root.
    pub fn parse_object(&self, text: &str) -> Result<Document, ParseError> {
        match grammar::parse_value(text, self.limits.max_depth)? {
            Value::Document(doc) => Ok(doc),
            other => Err(ParseError::UnexpectedRootType {
                expected: "document",
                found: other.type_name(),
            }),
        }
    }
}

impl LineParser for DocumentParser {
    fn parse(&self, raw: &[u8]) -> Result<ParsedLine, ParseError> {
        let text = decode(raw, &self.limits)?;
        let value = grammar::parse_value(text, self.limits.max_depth)?;
        Ok(ParsedLine::new(InputFormat::Document, value))
    }

    fn format(&self) -> InputFormat {
        InputFormat::Document
    }
}
