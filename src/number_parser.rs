//! Parse user-provided numbers and ranges (comma/space separated, `a-b` spans) into a set.

use std::collections::HashSet;
use std::ops::RangeInclusive;

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// Parse one `a-b` token. Split happens on the first dash; both halves must be positive.
fn parse_span(token: &str) -> Option<RangeInclusive<u64>> {
    let (a, b) = token.split_once('-')?;
    let a = a.parse::<u64>().ok()?;
    let b = b.parse::<u64>().ok()?;
    if a == 0 || b == 0 {
        return None;
    }
    Some(a.min(b)..=a.max(b))
}

fn parse_single(token: &str) -> Option<u64> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match token.parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}

/// Tokenize `input` into inclusive spans without expanding them.
/// Single numbers come back as one-element spans. Malformed tokens are skipped.
pub fn parse_spans(input: &str) -> Vec<RangeInclusive<u64>> {
    let mut spans = Vec::new();
    for token in input.split(is_separator) {
        if token.is_empty() {
            continue;
        }
        let span = if token.contains('-') {
            parse_span(token)
        } else {
            parse_single(token).map(|n| n..=n)
        };
        if let Some(span) = span {
            spans.push(span);
        }
    }
    spans
}

/// Parses a string such as `1,3 5-7` into the set of positive numbers it names.
/// Reversed spans are normalized; invalid tokens are skipped.
///
/// Spans are expanded in full. Callers that only need membership against a
/// bounded range should use [`parse_spans`].
pub fn parse_numbers(input: &str) -> HashSet<u64> {
    let mut set = HashSet::new();
    for span in parse_spans(input) {
        set.extend(span);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(values: &[u64]) -> HashSet<u64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_numbers("").is_empty());
        assert!(parse_numbers("  , ,\n").is_empty());
    }

    #[test]
    fn test_parse_mixed_separators_and_span() {
        assert_eq!(parse_numbers("1,3 5-7"), set(&[1, 3, 5, 6, 7]));
        assert_eq!(parse_numbers("1,,3\t\n5-7 ,"), set(&[1, 3, 5, 6, 7]));
    }

    #[test]
    fn test_parse_reversed_span() {
        assert_eq!(parse_numbers("7-5"), set(&[5, 6, 7]));
    }

    #[test]
    fn test_parse_invalid_skipped() {
        assert_eq!(parse_numbers("0,-3,abc,5"), set(&[5]));
    }

    #[test]
    fn test_parse_dedupe() {
        assert_eq!(parse_numbers("4, 4 3-5"), set(&[3, 4, 5]));
    }

    #[test]
    fn test_parse_span_with_bad_half_dropped() {
        assert!(parse_numbers("0-3").is_empty());
        assert!(parse_numbers("a-3").is_empty());
        assert!(parse_numbers("3-").is_empty());
        // split on the first dash only, so the second half is "-3"
        assert!(parse_numbers("1--3").is_empty());
        assert!(parse_numbers("1-2-3").is_empty());
    }

    #[test]
    fn test_parse_single_requires_plain_digits() {
        assert!(parse_numbers("+5").is_empty());
        assert!(parse_numbers("5.0").is_empty());
        assert!(parse_numbers("99999999999999999999999").is_empty());
    }

    #[test]
    fn test_parse_spans_keeps_large_span_compact() {
        let spans = parse_spans("1-999999999 12");
        assert_eq!(spans, vec![1..=999_999_999, 12..=12]);
    }

    proptest! {
        #[test]
        fn prop_span_order_does_not_matter(a in 1u64..500, b in 1u64..500) {
            let forward = parse_numbers(&format!("{a}-{b}"));
            let backward = parse_numbers(&format!("{b}-{a}"));
            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(forward.len() as u64, a.abs_diff(b) + 1);
        }

        #[test]
        fn prop_never_yields_zero(input in "[0-9, \\-a-z]{0,40}") {
            prop_assert!(!parse_numbers(&input).contains(&0));
        }
    }
}
