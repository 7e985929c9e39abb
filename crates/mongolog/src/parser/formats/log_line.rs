use crate::parser::formats::{decode, ParserLimits};
use crate::parser::grammar;
use crate::parser::traits::*;
use crate::parser::value::Value;

/// Parser for mongod text log lines, e.g.
///
/// `Mon Feb 23 03:20:19.670 [conn1] query test.foo query: { a: 1 } ntoreturn:0 1ms`
#[derive(Debug, Clone, Default)]
pub struct LogLineParser {
    limits: ParserLimits,
}

impl LogLineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ParserLimits) -> Self {
        Self { limits }
    }
}

impl LineParser for LogLineParser {
    fn parse(&self, raw: &[u8]) -> Result<ParsedLine, ParseError> {
        let text = decode(raw, &self.limits)?;
        let doc = grammar::parse_line(text, self.limits.max_depth)?;
        Ok(ParsedLine::new(InputFormat::LogLine, Value::Document(doc)))
    }

    fn format(&self) -> InputFormat {
        InputFormat::LogLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line_parser_basic() {
        let parser = LogLineParser::new();
        let parsed = parser
            .parse(b"Mon Feb 23 03:20:19.670 [conn7] getmore test.foo cursorid:12345 ntoreturn:0 nreturned:101 2ms\r\n")
            .unwrap();

        assert_eq!(parsed.format, InputFormat::LogLine);
        let doc = parsed.value.as_document().unwrap();
        assert_eq!(doc.get("op"), Some(&Value::String("getmore".into())));
        assert_eq!(doc.get("cursorid"), Some(&Value::Int64(12345)));
        assert_eq!(doc.get("nreturned"), Some(&Value::Int64(101)));
        assert_eq!(doc.get("duration_ms"), Some(&Value::String("2".into())));
    }

    #[test]
    fn test_log_line_parser_rejects_garbage() {
        let parser = LogLineParser::new();
        assert!(matches!(
            parser.parse(b"{ a: 1 }"),
            Err(ParseError::GrammarMismatch { offset: 0, .. })
        ));
        assert_eq!(parser.parse(b"\xFF"), Err(ParseError::NonUtf8));
    }

    #[test]
    fn test_log_line_parser_size_limit() {
        let parser = LogLineParser::with_limits(ParserLimits {
            max_line_size: 16,
            ..ParserLimits::default()
        });
        let oversized = vec![b'X'; 17];
        assert!(matches!(parser.parse(&oversized), Err(ParseError::LineTooLarge(17, 16))));
    }
}
