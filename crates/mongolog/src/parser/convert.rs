//! Converters from captured grammar text to typed scalar values.
//!
//! Each function receives exactly the text a grammar rule captured (without
//! the surrounding `Name(` and `)`) and returns the typed value, or `None`
//! when the text cannot be represented. The grammar turns `None` into a rule
//! failure at the rule's start offset.

use super::value::Value;

/// Integer first, float when the literal has a fraction or overflows i64.
pub fn numeric(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Int64(n));
    }
    text.parse::<f64>().ok().map(Value::Float64)
}

/// `Date(<digits>)`: the digits are epoch milliseconds.
pub fn date(digits: &str) -> Option<Value> {
    digits.parse::<i64>().ok().map(Value::Date)
}

/// The hex text is kept as captured; the grammar already restricted it to
/// hex characters.
pub fn object_id(hex: &str) -> Value {
    Value::ObjectId(hex.to_string())
}

/// `BinData(<subtype>, "<base64>")`, split on the first comma.
pub fn bin_data(text: &str) -> Option<Value> {
    let (subtype, payload) = text.split_once(',')?;
    let subtype = subtype.trim().parse::<u8>().ok()?;
    let base64 = strip_quotes(payload.trim()).to_string();
    Some(Value::BinData { subtype, base64 })
}

/// `pattern/options` as captured after the opening slash. The pattern ends
/// at the last slash so escaped slashes inside it survive untouched.
pub fn regex(text: &str) -> Option<Value> {
    let (pattern, options) = text.rsplit_once('/')?;
    Some(Value::Regex {
        pattern: pattern.to_string(),
        options: options.to_string(),
    })
}

/// `Timestamp(<t>, <i>)` or `Timestamp <t>|<i>`.
///
/// Text that does not split into two unsigned 32-bit parts yields a zero
/// timestamp instead of failing the parse.
pub fn timestamp(text: &str) -> Value {
    let parts = two_parts(text, ',').or_else(|| two_parts(text, '|'));

    let parsed = parts.and_then(|(seconds, increment)| {
        Some((seconds.parse::<u32>().ok()?, increment.parse::<u32>().ok()?))
    });

    match parsed {
        Some((seconds, increment)) => Value::Timestamp { seconds, increment },
        None => {
            tracing::trace!("Timestamp text {:?} has no valid two-part split, using zero", text);
            Value::Timestamp { seconds: 0, increment: 0 }
        }
    }
}

/// `NumberLong(<n>)`; newer shells quote the number, so quotes are tolerated.
pub fn number_long(text: &str) -> Option<Value> {
    strip_quotes(text.trim())
        .parse::<i64>()
        .ok()
        .map(Value::NumberLong)
}

fn two_parts(text: &str, delimiter: char) -> Option<(&str, &str)> {
    let mut parts = text.split(delimiter);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => Some((left.trim(), right.trim())),
        _ => None,
    }
}

fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_prefers_integers() {
        assert_eq!(numeric("42"), Some(Value::Int64(42)));
        assert_eq!(numeric("-7"), Some(Value::Int64(-7)));
        assert_eq!(numeric("9223372036854775807"), Some(Value::Int64(i64::MAX)));
    }

    #[test]
    fn test_numeric_falls_back_to_float() {
        assert_eq!(numeric("1.5"), Some(Value::Float64(1.5)));
        assert_eq!(numeric("3."), Some(Value::Float64(3.0)));
        // One past i64::MAX overflows the integer parse
        assert_eq!(
            numeric("9223372036854775808"),
            Some(Value::Float64(9223372036854775808.0))
        );
    }

    #[test]
    fn test_date_millis() {
        assert_eq!(date("1424661619670"), Some(Value::Date(1424661619670)));
        assert_eq!(date("99999999999999999999"), None);
    }

    #[test]
    fn test_object_id_unchanged() {
        assert_eq!(
            object_id("54e792daf1845f045f4c000e"),
            Value::ObjectId("54e792daf1845f045f4c000e".to_string())
        );
        assert_eq!(object_id(""), Value::ObjectId(String::new()));
    }

    #[test]
    fn test_bin_data() {
        assert_eq!(
            bin_data("0,\"aGVsbG8K\""),
            Some(Value::BinData { subtype: 0, base64: "aGVsbG8K".to_string() })
        );
        assert_eq!(
            bin_data(" 4 , 'AAECAw==' "),
            Some(Value::BinData { subtype: 4, base64: "AAECAw==".to_string() })
        );
        assert_eq!(bin_data("256,\"AA==\""), None);
        assert_eq!(bin_data("no comma"), None);
    }

    #[test]
    fn test_regex_splits_on_last_slash() {
        assert_eq!(
            regex(r"a\/b/i"),
            Some(Value::Regex { pattern: r"a\/b".to_string(), options: "i".to_string() })
        );
        assert_eq!(
            regex("ese/"),
            Some(Value::Regex { pattern: "ese".to_string(), options: String::new() })
        );
    }

    #[test]
    fn test_timestamp_both_syntaxes() {
        assert_eq!(
            timestamp("1420000000, 1"),
            Value::Timestamp { seconds: 1420000000, increment: 1 }
        );
        assert_eq!(
            timestamp("1420000000|7"),
            Value::Timestamp { seconds: 1420000000, increment: 7 }
        );
    }

    #[test]
    fn test_timestamp_permissive_zero() {
        let zero = Value::Timestamp { seconds: 0, increment: 0 };
        assert_eq!(timestamp("1420000000"), zero);
        assert_eq!(timestamp("1,2,3"), zero);
        assert_eq!(timestamp("a, b"), zero);
    }

    #[test]
    fn test_number_long_full_range() {
        assert_eq!(
            number_long("-9223372036854775808"),
            Some(Value::NumberLong(i64::MIN))
        );
        assert_eq!(number_long("\"123\""), Some(Value::NumberLong(123)));
        assert_eq!(number_long("9223372036854775808"), None);
    }
}
