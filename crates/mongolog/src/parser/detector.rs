use super::model::InputFormat;

/// Pick the parser for one input line.
///
/// A line whose first non-blank byte opens a document is a shell value;
/// server log lines always start with a timestamp.
pub fn detect_format(sample: &[u8]) -> InputFormat {
    match sample.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => InputFormat::Document,
        _ => InputFormat::LogLine,
    }
}
