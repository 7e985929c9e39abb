//! Shell value grammar.
//!
//! ```text
//! value    <- Null / MinKey / MaxKey / Undefined / NumberLong / Regex
//!           / Timestamp / BinData / Date / ObjectId / String / Boolean
//!           / List / Document / Numeric
//! document <- '{' ws (pair (ws ',' ws pair)*)? ws '}'
//! pair     <- fieldName ws ':' ws value
//! list     <- '[' ws (value (ws ',' ws value)*)? ws ']'
//! ```
//!
//! After `Null` and `MinKey` the remaining alternatives start with distinct
//! characters, so the dispatcher jumps straight to the one candidate instead
//! of trying each in turn.

use super::{Mark, Matched};
use crate::parser::builder::Accumulator;
use crate::parser::convert;
use crate::parser::cursor::Cursor;
use crate::parser::value::Value;

pub fn value(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    if keyword(cur, acc, "null", Value::Null) || keyword(cur, acc, "MinKey", Value::MinKey) {
        return Ok(true);
    }

    let matched = match cur.peek() {
        Some(b'M') => keyword(cur, acc, "MaxKey", Value::MaxKey),
        Some(b'u') => keyword(cur, acc, "undefined", Value::Undefined),
        Some(b'N') => number_long(cur, acc)?,
        Some(b'/') => regex(cur, acc)?,
        Some(b'T') => timestamp(cur, acc)?,
        Some(b'B') => bin_data(cur, acc)?,
        Some(b'D') | Some(b'n') => date(cur, acc)?,
        Some(b'O') => object_id(cur, acc)?,
        Some(b'"') => string(cur, acc)?,
        Some(b't') => keyword(cur, acc, "true", Value::Bool(true)),
        Some(b'f') => keyword(cur, acc, "false", Value::Bool(false)),
        Some(b'[') => list(cur, acc)?,
        Some(b'{') => document(cur, acc)?,
        Some(b'-') | Some(b'0'..=b'9') => numeric(cur, acc)?,
        _ => false,
    };

    if !matched {
        cur.fail("value");
    }
    Ok(matched)
}

pub(super) fn document(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat(b'{') {
        return Ok(false);
    }
    acc.open_document()?;
    cur.skip_ws();

    if pair(cur, acc)? {
        loop {
            let before = cur.pos();
            cur.skip_ws();
            if !cur.eat(b',') {
                cur.reset(before);
                break;
            }
            cur.skip_ws();
            if !pair(cur, acc)? {
                cur.reset(before);
                break;
            }
        }
    }

    cur.skip_ws();
    if !cur.eat(b'}') {
        cur.fail("'}'");
        return mark.rewind(cur, acc);
    }
    acc.close_document()?;
    Ok(true)
}

fn pair(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    let Some(name) = field_name(cur) else {
        cur.fail("field name");
        return mark.rewind(cur, acc);
    };
    acc.push_field_name(name);

    cur.skip_ws();
    if !cur.eat(b':') {
        cur.fail("':'");
        return mark.rewind(cur, acc);
    }
    cur.skip_ws();
    if !value(cur, acc)? {
        return mark.rewind(cur, acc);
    }
    acc.set_map_value()?;
    Ok(true)
}

fn list(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat(b'[') {
        return Ok(false);
    }
    acc.open_list()?;
    cur.skip_ws();

    if value(cur, acc)? {
        acc.set_list_value()?;
        loop {
            let before = cur.pos();
            cur.skip_ws();
            if !cur.eat(b',') {
                cur.reset(before);
                break;
            }
            cur.skip_ws();
            if !value(cur, acc)? {
                cur.reset(before);
                break;
            }
            acc.set_list_value()?;
        }
    }

    cur.skip_ws();
    if !cur.eat(b']') {
        cur.fail("']'");
        return mark.rewind(cur, acc);
    }
    acc.close_list()?;
    Ok(true)
}

/// Bare field name (letters, digits, `_ $ . *`) or a double-quoted one.
pub(super) fn field_name<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    if cur.peek() == Some(b'"') {
        let start = cur.pos();
        let name = quoted(cur);
        if name.is_none() {
            cur.reset(start);
        }
        return name;
    }
    cur.take_while1(is_field_char)
}

fn is_field_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b'*') || !b.is_ascii()
}

pub(super) fn string(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    match quoted(cur) {
        Some(text) => {
            acc.push_value(Value::String(text.to_string()));
            Ok(true)
        }
        None => mark.rewind(cur, acc),
    }
}

/// Raw text between double quotes. Only `\"` and `\\` are escapes; the
/// returned slice keeps them as written.
fn quoted<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    if !cur.eat(b'"') {
        return None;
    }
    let start = cur.pos();
    loop {
        match cur.peek() {
            None => {
                cur.fail("closing '\"'");
                return None;
            }
            Some(b'\\') if matches!(cur.peek_at(1), Some(b'"') | Some(b'\\')) => cur.advance(2),
            Some(b'"') => break,
            Some(_) => cur.advance(1),
        }
    }
    let text = cur.slice(start, cur.pos());
    cur.advance(1);
    Some(text)
}

pub(super) fn numeric(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    let start = cur.pos();
    cur.eat(b'-');
    if cur.take_while1(|b| b.is_ascii_digit()).is_none() {
        if cur.pos() > start {
            cur.fail("digit");
        }
        return mark.rewind(cur, acc);
    }
    if cur.eat(b'.') {
        cur.take_while(|b| b.is_ascii_digit());
    }
    let text = cur.slice(start, cur.pos());
    converted(cur, acc, mark, "number", convert::numeric(text))
}

fn number_long(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat_literal("NumberLong(") {
        return Ok(false);
    }
    let Some(text) = call_args(cur) else {
        return mark.rewind(cur, acc);
    };
    converted(cur, acc, mark, "NumberLong", convert::number_long(text))
}

fn regex(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat(b'/') {
        return Ok(false);
    }
    let start = cur.pos();
    loop {
        match cur.peek() {
            None | Some(b'\n') => {
                cur.fail("closing '/'");
                return mark.rewind(cur, acc);
            }
            Some(b'\\') => cur.advance(2),
            Some(b'/') => break,
            Some(_) => cur.advance(1),
        }
    }
    if cur.pos() == start {
        cur.fail("regex pattern");
        return mark.rewind(cur, acc);
    }
    cur.advance(1);
    cur.take_while(|b| matches!(b, b'g' | b'i' | b'm' | b's'));

    let text = cur.slice(start, cur.pos());
    converted(cur, acc, mark, "regex", convert::regex(text))
}

fn timestamp(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    let text = if cur.eat_literal("Timestamp(") {
        match call_args(cur) {
            Some(text) => text,
            None => return mark.rewind(cur, acc),
        }
    } else if cur.eat_literal("Timestamp ") {
        match cur.take_while1(|b| b.is_ascii_digit() || b == b'|') {
            Some(text) => text,
            None => {
                cur.fail("Timestamp seconds|increment");
                return mark.rewind(cur, acc);
            }
        }
    } else {
        return Ok(false);
    };

    acc.push_value(convert::timestamp(text));
    Ok(true)
}

fn bin_data(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat_literal("BinData(") {
        return Ok(false);
    }
    let Some(text) = call_args(cur) else {
        return mark.rewind(cur, acc);
    };
    converted(cur, acc, mark, "BinData", convert::bin_data(text))
}

fn date(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    cur.eat_literal("new ");
    if !cur.eat_literal("Date(") {
        return mark.rewind(cur, acc);
    }
    let Some(digits) = cur.take_while1(|b| b.is_ascii_digit()) else {
        cur.fail("Date milliseconds");
        return mark.rewind(cur, acc);
    };
    if !cur.eat(b')') {
        cur.fail("')'");
        return mark.rewind(cur, acc);
    }
    converted(cur, acc, mark, "Date", convert::date(digits))
}

fn object_id(cur: &mut Cursor<'_>, acc: &mut Accumulator) -> Matched {
    let mark = Mark::new(cur, acc);
    if !cur.eat_literal("ObjectId(") {
        return Ok(false);
    }
    let quote = match cur.peek() {
        Some(q @ (b'"' | b'\'')) => q,
        _ => {
            cur.fail("ObjectId quote");
            return mark.rewind(cur, acc);
        }
    };
    cur.advance(1);
    let hex = cur.take_while(|b| b.is_ascii_hexdigit());
    if !cur.eat(quote) {
        cur.fail("ObjectId hex digit or closing quote");
        return mark.rewind(cur, acc);
    }
    if !cur.eat(b')') {
        cur.fail("')'");
        return mark.rewind(cur, acc);
    }
    acc.push_value(convert::object_id(hex));
    Ok(true)
}

/// Fixed literal mapped to a fixed value.
fn keyword(cur: &mut Cursor<'_>, acc: &mut Accumulator, text: &str, value: Value) -> bool {
    if cur.eat_literal(text) {
        acc.push_value(value);
        true
    } else {
        false
    }
}

/// Text up to the next `)`, consuming the parenthesis.
fn call_args<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    let text = cur.take_while(|b| b != b')');
    if cur.eat(b')') {
        Some(text)
    } else {
        cur.fail("')'");
        None
    }
}

/// Push a converter result, or fail the rule at its start offset.
fn converted(
    cur: &mut Cursor<'_>,
    acc: &mut Accumulator,
    mark: Mark,
    rule: &'static str,
    value: Option<Value>,
) -> Matched {
    match value {
        Some(value) => {
            acc.push_value(value);
            Ok(true)
        }
        None => {
            tracing::trace!("{} converter rejected {:?}", rule, cur.slice(mark.pos(), cur.pos()));
            cur.fail_at(mark.pos(), rule);
            mark.rewind(cur, acc)
        }
    }
}
