use thiserror::Error;
use serde::{Serialize, Deserialize};

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Full mongod server log line (timestamp, thread, op, ns, fields...)
    LogLine,
    /// Standalone shell-syntax value, usually a `{ ... }` document
    Document,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::LogLine => "log_line",
            InputFormat::Document => "document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Grammar mismatch at line {line}, column {column} (offset {offset}): expected {rule}")]
    GrammarMismatch {
        offset: usize,
        line: usize,
        column: usize,
        rule: &'static str,
    },

    /// The grammar matched but left nothing on the pending-value stack.
    #[error("Parse produced no value")]
    IncompleteValue,

    #[error("Unexpected root type: expected {expected}, found {found}")]
    UnexpectedRootType {
        expected: &'static str,
        found: &'static str,
    },

    /// Accumulator invariant violated; always a grammar defect.
    #[error("Accumulator stack underflow: {stack}")]
    StackUnderflow { stack: &'static str },

    #[error("Nesting too deep: {depth} (max: {max})")]
    TooDeep { depth: usize, max: usize },

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),

    #[error("Non-UTF8 content")]
    NonUtf8,
}

impl ParseError {
    /// Errors that point at a defect in the parser rather than the input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ParseError::IncompleteValue
                | ParseError::UnexpectedRootType { .. }
                | ParseError::StackUnderflow { .. }
        )
    }
}

/// Result of parsing one input atom.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub format: InputFormat,
    /// The parsed tree. Log lines always produce a `Value::Document`.
    pub value: Value,
}

impl ParsedLine {
    pub fn new(format: InputFormat, value: Value) -> Self {
        Self { format, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_mismatch_message() {
        let err = ParseError::GrammarMismatch {
            offset: 12,
            line: 1,
            column: 13,
            rule: "'}'",
        };
        assert_eq!(
            err.to_string(),
            "Grammar mismatch at line 1, column 13 (offset 12): expected '}'"
        );
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_errors() {
        assert!(ParseError::IncompleteValue.is_internal());
        assert!(ParseError::StackUnderflow { stack: "values" }.is_internal());
        assert!(!ParseError::NonUtf8.is_internal());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(InputFormat::LogLine.as_str(), "log_line");
        assert_eq!(InputFormat::Document.as_str(), "document");
    }
}
