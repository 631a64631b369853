//! Count coercion for scraped metric fields.
//!
//! Platforms report the same metric as a bare integer, a float, or a display
//! string (`"1.5M"`, `"2 тыс"`, `"N/A"`) depending on which endpoint
//! answered. Everything funnels through [`coerce_count`] before any
//! arithmetic, and nothing in here can fail: unusable input coerces to 0.

use clipwatch_core::RawCount;

/// Coerce a raw count field to an integer.
///
/// Absent values, sentinels, and unparseable strings all become 0. Floats
/// truncate toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_count(value: Option<&RawCount>) -> i64 {
    match value {
        None => 0,
        Some(RawCount::Number(n)) => *n,
        Some(RawCount::Float(f)) => *f as i64,
        Some(RawCount::Text(s)) => parse_count_str(s),
    }
}

/// Parse a display-formatted count string.
///
/// The numeric token starts at the first ASCII digit; separators inside it
/// are resolved by [`numeric_value`]. An abbreviation suffix after the token
/// scales the result: K/к/тыс ×10³, M/м/млн ×10⁶, B/б/млрд ×10⁹.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn parse_count_str(s: &str) -> i64 {
    let lower = s.trim().to_lowercase();
    let Some(start) = lower.find(|c: char| c.is_ascii_digit()) else {
        // Sentinel ("N/A"), empty, or no digits at all.
        return 0;
    };

    let tail = &lower[start..];
    let mut token = String::new();
    let mut suffix_at = tail.len();
    let mut chars = tail.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let next_is_digit = matches!(chars.peek(), Some(&(_, d)) if d.is_ascii_digit());
        if c.is_ascii_digit() {
            token.push(c);
        } else if (c == '.' || c == ',') && next_is_digit {
            token.push(c);
        } else if c == ' ' && next_is_digit {
            // Digit-group space, e.g. "1 234 567".
        } else {
            suffix_at = idx;
            break;
        }
    }

    let Some(value) = numeric_value(&token) else {
        return 0;
    };

    let suffix: String = tail[suffix_at..]
        .trim_start_matches(|c: char| !c.is_alphabetic())
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();

    (value * suffix_multiplier(&suffix)).round() as i64
}

/// Interpret separators inside a numeric token and parse it.
///
/// A comma followed by exactly three digits is a grouping separator
/// (`"1,234,567"`); any other comma is a decimal separator (`"2,5"`). Dots
/// are always decimal. Tokens that still fail to parse (`"1.234.567"`) fall
/// back to their digits alone.
fn numeric_value(token: &str) -> Option<f64> {
    let chars: Vec<char> = token.chars().collect();
    let mut cleaned = String::with_capacity(token.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ',' {
            let digits_after = chars[i + 1..]
                .iter()
                .take_while(|d| d.is_ascii_digit())
                .count();
            if digits_after == 3 {
                continue;
            }
            cleaned.push('.');
        } else {
            cleaned.push(c);
        }
    }

    if let Ok(v) = cleaned.parse::<f64>() {
        return Some(v);
    }
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<f64>().ok()
}

/// Multiplier implied by the abbreviation suffix following a count.
///
/// Single-letter forms only count when they are the entire suffix word, so
/// that "12 комментариев" is not read as 12 thousand.
fn suffix_multiplier(suffix: &str) -> f64 {
    if suffix.starts_with("млрд") {
        return 1e9;
    }
    if suffix.starts_with("млн") {
        return 1e6;
    }
    if suffix.starts_with("тыс") {
        return 1e3;
    }
    match suffix {
        "k" | "к" => 1e3,
        "m" | "м" => 1e6,
        "b" | "б" => 1e9,
        _ => 1.0,
    }
}
