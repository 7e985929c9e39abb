//! Ordered-choice grammars for shell values and server log lines.
//!
//! Rules are plain functions over a [`Cursor`] and an [`Accumulator`]. Each
//! returns `Ok(true)` when it matched (cursor advanced, result pushed onto the
//! accumulator), `Ok(false)` when it did not (cursor and accumulator back
//! where they started, so the caller can try the next alternative), or `Err`
//! for conditions no alternative can recover from.

pub mod line;
pub mod value;

use super::builder::{Accumulator, Checkpoint};
use super::cursor::Cursor;
use super::model::ParseError;
use super::value::{Document, Value};

pub(crate) type Matched = Result<bool, ParseError>;

/// Position to rewind to when an alternative fails part-way.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    pos: usize,
    checkpoint: Checkpoint,
}

impl Mark {
    pub(crate) fn new(cur: &Cursor<'_>, acc: &Accumulator) -> Self {
        Self {
            pos: cur.pos(),
            checkpoint: acc.checkpoint(),
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Restore cursor and accumulator, then report "no match".
    pub(crate) fn rewind(self, cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
        cur.reset(self.pos);
        acc.restore(self.checkpoint);
        Ok(false)
    }
}

/// Parse one complete shell value (surrounding whitespace allowed).
pub fn parse_value(input: &str, max_depth: usize) -> Result<Value, ParseError> {
    let mut cur = Cursor::new(input);
    let mut acc = Accumulator::with_max_depth(max_depth);

    cur.skip_ws();
    if !value::value(&mut cur, &mut acc)? {
        return Err(cur.mismatch());
    }
    cur.skip_ws();
    if !cur.is_eof() {
        cur.fail("end of input");
        return Err(cur.mismatch());
    }
    acc.finish_value()
}

/// Parse one complete server log line into its field mapping.
pub fn parse_line(input: &str, max_depth: usize) -> Result<Document, ParseError> {
    let mut cur = Cursor::new(input);
    let mut acc = Accumulator::with_max_depth(max_depth);

    if !line::log_line(&mut cur, &mut acc)? {
        return Err(cur.mismatch());
    }
    acc.take_document()
}
