use super::model::ParseError;

/// Byte-offset scanner over one input atom.
///
/// All grammar delimiters are ASCII, so every offset the cursor stops at is
/// also a valid `str` boundary. Besides the position it remembers the
/// furthest offset at which any rule failed, which is what gets reported
/// when the whole parse fails.
#[derive(Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    failure: Option<(usize, &'static str)>,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failure: None,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + ahead).copied()
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Everything from the current position to the end.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn eat_literal(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds; may return an empty slice.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && pred(bytes[self.pos]) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Like `take_while` but requires at least one byte.
    pub fn take_while1(&mut self, pred: impl Fn(u8) -> bool) -> Option<&'a str> {
        let taken = self.take_while(pred);
        if taken.is_empty() {
            None
        } else {
            Some(taken)
        }
    }

    /// Consume exactly `n` bytes matching `pred`, or nothing.
    pub fn take_exact(&mut self, n: usize, pred: impl Fn(u8) -> bool) -> Option<&'a str> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        if start + n > bytes.len() || !bytes[start..start + n].iter().all(|&b| pred(b)) {
            return None;
        }
        self.pos += n;
        Some(&self.input[start..self.pos])
    }

    /// Skip spaces and tabs; returns how many bytes were skipped.
    pub fn skip_ws(&mut self) -> usize {
        self.take_while(|b| b == b' ' || b == b'\t').len()
    }

    /// Record that `rule` failed at the current position.
    ///
    /// Only a failure strictly further into the input replaces the recorded
    /// one, so the innermost rule that got the furthest wins.
    pub fn fail(&mut self, rule: &'static str) {
        self.fail_at(self.pos, rule);
    }

    pub fn fail_at(&mut self, offset: usize, rule: &'static str) {
        match self.failure {
            Some((furthest, _)) if furthest >= offset => {}
            _ => self.failure = Some((offset, rule)),
        }
    }

    /// Build the user-facing error for the furthest recorded failure.
    pub fn mismatch(&self) -> ParseError {
        let (offset, rule) = self.failure.unwrap_or((self.pos, "end of input"));
        let (line, column) = line_column(self.input, offset);
        ParseError::GrammarMismatch {
            offset,
            line,
            column,
            rule,
        }
    }
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = &input.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_while_and_literals() {
        let mut cur = Cursor::new("abc123 rest");
        assert_eq!(cur.take_while(|b| b.is_ascii_alphabetic()), "abc");
        assert_eq!(cur.take_while1(|b| b.is_ascii_digit()), Some("123"));
        assert_eq!(cur.take_while1(|b| b.is_ascii_digit()), None);
        assert_eq!(cur.skip_ws(), 1);
        assert!(!cur.eat_literal("rust"));
        assert!(cur.eat_literal("rest"));
        assert!(cur.is_eof());
    }

    #[test]
    fn test_take_exact() {
        let mut cur = Cursor::new("2015-02");
        assert_eq!(cur.take_exact(4, |b| b.is_ascii_digit()), Some("2015"));
        assert_eq!(cur.take_exact(2, |b| b.is_ascii_digit()), None);
        assert_eq!(cur.pos(), 4);
    }

    #[test]
    fn test_furthest_failure_wins() {
        let mut cur = Cursor::new("{ a: }");
        cur.fail_at(5, "value");
        cur.fail_at(2, "'}'");
        cur.fail_at(5, "other");
        assert_eq!(
            cur.mismatch(),
            ParseError::GrammarMismatch { offset: 5, line: 1, column: 6, rule: "value" }
        );
    }

    #[test]
    fn test_line_column_counts_chars() {
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
        assert_eq!(line_column("é x", 3), (1, 3));
        assert_eq!(line_column("", 0), (1, 1));
    }
}
