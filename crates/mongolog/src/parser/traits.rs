pub use super::model::{InputFormat, ParseError, ParsedLine};

pub trait LineParser: Send + Sync {
    /// parse one raw input atom (a log line or a value expression)
    fn parse(&self, raw: &[u8]) -> Result<ParsedLine, ParseError>;
    fn format(&self) -> InputFormat;
}
