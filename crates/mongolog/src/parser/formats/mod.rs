//! Parsers for the two supported input shapes

pub mod document;
pub mod log_line;

pub use document::DocumentParser;
pub use log_line::LogLineParser;

use super::builder::DEFAULT_MAX_DEPTH;
use super::traits::ParseError;
use super::MAX_LINE_SIZE;

/// Limits shared by both parsers
#[derive(Debug, Clone, Copy)]
pub struct ParserLimits {
    /// Maximum input size in bytes (default: 1MB)
    pub max_line_size: usize,
    /// Maximum number of simultaneously open documents/lists
    pub max_depth: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_line_size: MAX_LINE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Size and encoding checks at the byte boundary, then drop one trailing
/// line terminator.
pub(crate) fn decode<'a>(raw: &'a [u8], limits: &ParserLimits) -> Result<&'a str, ParseError> {
    if raw.len() > limits.max_line_size {
        return Err(ParseError::LineTooLarge(raw.len(), limits.max_line_size));
    }
    let text = std::str::from_utf8(raw).map_err(|_| ParseError::NonUtf8)?;
    let text = text.strip_suffix('\n').unwrap_or(text);
    Ok(text.strip_suffix('\r').unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_one_terminator() {
        let limits = ParserLimits::default();
        assert_eq!(decode(b"abc\r\n", &limits).unwrap(), "abc");
        assert_eq!(decode(b"abc\n\n", &limits).unwrap(), "abc\n");
        assert_eq!(decode(b"abc", &limits).unwrap(), "abc");
    }

    #[test]
    fn test_decode_guards() {
        let limits = ParserLimits { max_line_size: 4, ..ParserLimits::default() };
        assert_eq!(decode(b"12345", &limits), Err(ParseError::LineTooLarge(5, 4)));
        assert_eq!(decode(b"\xFF\xFE", &limits), Err(ParseError::NonUtf8));
    }
}
