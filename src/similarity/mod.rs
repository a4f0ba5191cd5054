//! String and numeric similarity primitives shared by the merger and the comparator.


use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{ADDITIVE_COUNT, COUNTRY_PREFIXES};
use crate::label::AdditiveFlags;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("static regex is valid"));

/// Lowercases, strips punctuation and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / longer length` over normalized strings, in `[0, 1]`.
///
/// Two strings that both normalize to empty are identical (`1.0`).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    ratio_of_normalized(&a, &b)
}

pub(crate) fn ratio_of_normalized(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// First `\d+(\.\d+)?` in `text`, or `None` when there is no number to compare.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Fraction of the five additive flags on which the two records agree.
pub fn additive_similarity(expected: &AdditiveFlags, disclosed: &AdditiveFlags) -> f64 {
    expected.agreements(disclosed) as f64 / ADDITIVE_COUNT as f64
}

/// Removes a leading "made in" / "product of" style prefix from a normalized country string.
pub fn strip_country_prefix(normalized: &str) -> &str {
    for prefix in COUNTRY_PREFIXES {
        match normalized.strip_prefix(prefix) {
            Some("") => return "",
            Some(rest) if rest.starts_with(' ') => return rest.trim_start(),
            _ => {}
        }
    }
    normalized
}
