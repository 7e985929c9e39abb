//! Server log line grammar.
//!
//! ```text
//! line      <- timestamp ws thread op ns lineField* locks? lineField*
//!              duration? extra? EOI
//! timestamp <- Day ' ' Mon ' ' DD ' ' HH:MM:SS.mmm
//!            / YYYY-MM-DDTHH:MM:SS.mmm offset?
//! thread    <- '[' ident+ '] '
//! op        <- ('command' / 'getmore' / 'remove' / 'update' / 'insert' / 'query') ' '
//! ns        <- nsChar+ ' '
//! lineField <- 'command: ' word value / 'planSummary: ' word value? / fieldName ':' value
//! locks     <- 'locks(micros)' (ws [rRwW] ':' digit+)*
//! duration  <- digit+ 'ms'
//! ```
//!
//! The fixed parts are stored as raw strings straight into the root
//! document; line fields go through the accumulator like document pairs.

use super::value;
use super::{Mark, Matched};
use crate::parser::builder::Accumulator;
use crate::parser::cursor::Cursor;
use crate::parser::model::ParseError;
use crate::parser::value::Value;

const OPERATIONS: [&str; 6] = ["command", "getmore", "remove", "update", "insert", "query"];

pub fn log_line(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    acc.open_document()?;

    let Some(timestamp) = timestamp(cur) else {
        cur.fail("timestamp");
        return Ok(false);
    };
    acc.set_field("timestamp", raw(timestamp))?;
    if cur.skip_ws() == 0 {
        cur.fail("' '");
        return Ok(false);
    }

    let Some(thread) = thread(cur) else {
        return Ok(false);
    };
    acc.set_field("thread", raw(thread))?;

    let Some(op) = operation(cur) else {
        cur.fail("operation");
        return Ok(false);
    };
    acc.set_field("op", raw(op))?;

    let Some(ns) = namespace(cur) else {
        return Ok(false);
    };
    acc.set_field("ns", raw(ns))?;

    line_fields(cur, acc)?;
    locks(cur);
    line_fields(cur, acc)?;

    if let Some(millis) = duration(cur) {
        acc.set_field("duration_ms", raw(millis))?;
    }

    let extra = cur.rest();
    if !extra.is_empty() {
        acc.set_field("xextra", raw(extra))?;
        cur.advance(extra.len());
    }

    if !cur.is_eof() {
        cur.fail("end of input");
        return Ok(false);
    }
    Ok(true)
}

fn raw(text: &str) -> Value {
    Value::String(text.to_string())
}

fn timestamp<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cur.pos();
    if legacy_timestamp(cur) {
        return Some(cur.slice(start, cur.pos()));
    }
    cur.reset(start);
    if iso_timestamp(cur) {
        return Some(cur.slice(start, cur.pos()));
    }
    cur.reset(start);
    None
}

/// `Mon Feb 23 03:20:19.670`
fn legacy_timestamp(cur: &mut Cursor<'_>) -> bool {
    let alpha = |b: u8| b.is_ascii_alphabetic();
    cur.take_exact(3, alpha).is_some()
        && cur.skip_ws() > 0
        && cur.take_exact(3, alpha).is_some()
        && cur.skip_ws() > 0
        && cur
            .take_while1(|b| b.is_ascii_digit())
            .is_some_and(|day| day.len() <= 2)
        && cur.skip_ws() > 0
        && clock(cur)
}

/// `2015-02-23T03:20:19.670+0000`
fn iso_timestamp(cur: &mut Cursor<'_>) -> bool {
    let digit = |b: u8| b.is_ascii_digit();
    let date = cur.take_exact(4, digit).is_some()
        && cur.eat(b'-')
        && cur.take_exact(2, digit).is_some()
        && cur.eat(b'-')
        && cur.take_exact(2, digit).is_some()
        && cur.eat(b'T')
        && clock(cur);
    if !date {
        return false;
    }

    if cur.eat(b'Z') {
        return true;
    }
    let before_offset = cur.pos();
    if (cur.eat(b'+') || cur.eat(b'-'))
        && cur.take_while1(|b| b.is_ascii_digit() || b == b':').is_none()
    {
        cur.reset(before_offset);
    }
    true
}

/// `HH:MM:SS.mmm`
fn clock(cur: &mut Cursor<'_>) -> bool {
    let digit = |b: u8| b.is_ascii_digit();
    cur.take_exact(2, digit).is_some()
        && cur.eat(b':')
        && cur.take_exact(2, digit).is_some()
        && cur.eat(b':')
        && cur.take_exact(2, digit).is_some()
        && cur.eat(b'.')
        && cur.take_exact(3, digit).is_some()
}

fn thread<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cur.pos();
    let name = cur.eat(b'[').then(|| cur.take_while1(is_ident_char)).flatten();
    match name {
        Some(name) if cur.eat(b']') && cur.eat(b' ') => {
            cur.skip_ws();
            Some(name)
        }
        _ => {
            cur.fail("thread");
            cur.reset(start);
            None
        }
    }
}

fn operation(cur: &mut Cursor<'_>) -> Option<&'static str> {
    let start = cur.pos();
    for op in OPERATIONS {
        if cur.eat_literal(op) {
            if cur.eat(b' ') {
                cur.skip_ws();
                return Some(op);
            }
            cur.reset(start);
        }
    }
    None
}

fn namespace<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cur.pos();
    match cur.take_while1(is_namespace_char) {
        Some(ns) if cur.eat(b' ') => Some(ns),
        _ => {
            cur.fail("namespace");
            cur.reset(start);
            None
        }
    }
}

fn line_fields(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Result<(), ParseError> {
    loop {
        cur.skip_ws();
        if !line_field(cur, acc)? {
            return Ok(());
        }
    }
}

fn line_field(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    if typed_field(cur, acc, "command: ", "command", "commandType", true)? {
        return Ok(true);
    }
    if typed_field(cur, acc, "planSummary: ", "planSummary", "planSummaryType", false)? {
        return Ok(true);
    }
    plain_field(cur, acc)
}

/// `command: find { ... }` stores `commandType: "find"` and the parsed
/// value under `command`. For `planSummary` the value is optional
/// (`planSummary: COLLSCAN`).
fn typed_field(
    cur: &mut Cursor<'_>,
    acc: &mut Accumulator,
    prefix: &str,
    field: &'static str,
    type_field: &str,
    value_required: bool,
) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat_literal(prefix) {
        return Ok(false);
    }
    let Some(kind) = cur.take_while1(is_word_char) else {
        return mark.rewind(cur, acc);
    };
    let kind_end = cur.pos();

    cur.skip_ws();
    acc.push_field_name(field);
    if line_value(cur, acc)? {
        acc.set_map_value()?;
    } else if value_required {
        return mark.rewind(cur, acc);
    } else {
        mark.rewind(cur, acc)?;
        cur.reset(kind_end);
    }

    acc.set_field(type_field, raw(kind))?;
    Ok(true)
}

fn plain_field(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    let Some(name) = value::field_name(cur) else {
        return Ok(false);
    };
    if !cur.eat(b':') {
        return mark.rewind(cur, acc);
    }
    cur.skip_ws();
    acc.push_field_name(name);
    if !line_value(cur, acc)? {
        return mark.rewind(cur, acc);
    }
    acc.set_map_value()?;
    Ok(true)
}

/// Line field values are limited to strings, documents and numbers; other
/// extended types only appear nested inside a document.
fn line_value(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    if value::string(cur, acc)? || value::document(cur, acc)? || value::numeric(cur, acc)? {
        return Ok(true);
    }
    cur.fail("string, document or number");
    Ok(false)
}

/// `locks(micros) r:86 w:12`; entries are recognised and dropped.
fn locks(cur: &mut Cursor<'_>) {
    if !cur.eat_literal("locks(micros)") {
        return;
    }
    loop {
        cur.skip_ws();
        let entry = cur.pos();
        let matched = cur.take_exact(1, |b| matches!(b, b'r' | b'R' | b'w' | b'W')).is_some()
            && cur.eat(b':')
            && cur.take_while1(|b| b.is_ascii_digit()).is_some();
        if !matched {
            cur.reset(entry);
            return;
        }
    }
}

fn duration<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    cur.skip_ws();
    let start = cur.pos();
    match cur.take_while1(|b| b.is_ascii_digit()) {
        Some(millis) if cur.eat_literal("ms") => Some(millis),
        _ => {
            cur.reset(start);
            None
        }
    }
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_namespace_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':' | b'$' | b'_')
}
