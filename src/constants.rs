//! Cross-cutting, shared constants.
//!
//! Thresholds used by the deterministic comparator live here so the comparator, the merger and
//! the tests agree on the same numbers.

use std::time::Duration;

/// Number of independent extraction attempts issued per image.
pub const EXTRACTION_ATTEMPTS: usize = 2;

/// Number of comparable field keys in a [`FieldAccuracy`](crate::label::FieldAccuracy).
pub const FIELD_COUNT: usize = 8;

/// Number of additive disclosure flags.
pub const ADDITIVE_COUNT: usize = 5;

/// Wine below this ABV is outside the alcohol-content check.
pub const WINE_ABV_EXEMPTION_BELOW: f64 = 7.0;

/// Text similarity above which a name-like field passes.
pub const TEXT_PASS_RATIO: f64 = 0.85;
/// Text similarity above which a name-like field warns.
pub const TEXT_WARN_RATIO: f64 = 0.6;

/// Absolute ABV difference below which alcohol content passes.
pub const ABV_PASS_DELTA: f64 = 0.1;
/// Absolute ABV difference below which alcohol content warns.
pub const ABV_WARN_DELTA: f64 = 1.0;

/// Absolute difference below which net contents pass.
pub const NET_CONTENTS_PASS_DELTA: f64 = 0.1;
/// Relative difference (of the expected quantity) below which net contents warn.
pub const NET_CONTENTS_WARN_FRACTION: f64 = 0.05;

/// Country similarity above which a non-matching country warns instead of failing.
pub const COUNTRY_WARN_RATIO: f64 = 0.9;

/// Maximum character edits tolerated between an extracted and an expected warning.
pub const WARNING_EDIT_TOLERANCE: usize = 1;

/// Canonical upper-case TTB health warning.
pub const STANDARD_WARNING_UPPER: &str = "GOVERNMENT WARNING: (1) ACCORDING TO THE SURGEON GENERAL, WOMEN SHOULD NOT DRINK ALCOHOLIC BEVERAGES DURING PREGNANCY BECAUSE OF THE RISK OF BIRTH DEFECTS. (2) CONSUMPTION OF ALCOHOLIC BEVERAGES IMPAIRS YOUR ABILITY TO DRIVE A CAR OR OPERATE MACHINERY, AND MAY CAUSE HEALTH PROBLEMS.";

/// Canonical mixed-case TTB health warning.
pub const STANDARD_WARNING_MIXED: &str = "GOVERNMENT WARNING: (1) According to the Surgeon General, women should not drink alcoholic beverages during pregnancy because of the risk of birth defects. (2) Consumption of alcoholic beverages impairs your ability to drive a car or operate machinery, and may cause health problems.";

/// All warning texts recognised as standard.
pub const STANDARD_WARNINGS: [&str; 2] = [STANDARD_WARNING_UPPER, STANDARD_WARNING_MIXED];

/// Boilerplate prefixes stripped from country-of-origin statements before matching.
pub const COUNTRY_PREFIXES: [&str; 5] = [
    "produced in",
    "made in",
    "product of",
    "imported from",
    "origin",
];

/// Class/type keywords that identify a malt beverage.
pub const BEER_KEYWORDS: [&str; 12] = [
    "beer",
    "ale",
    "lager",
    "porter",
    "stout",
    "pilsner",
    "pilsener",
    "ipa",
    "malt liquor",
    "malt beverage",
    "hefeweizen",
    "bock",
];

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODELS: [&str; 2] = ["gpt-4o", "gpt-4o-mini"];
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(1_000);
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_millis(16_000);
pub const DEFAULT_RETRY_MAX_ROUNDS: u32 = 4;
pub const DEFAULT_CONTENT_POLICY_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

pub const LABEL_STATUS_HEADER: &str = "X-Label-Status";
pub const LABEL_STATUS_UNVERIFIED: &str = "UNVERIFIED";
pub const LABEL_STATUS_ERROR: &str = "ERROR";
pub const PROVIDER_MODE_MOCK: &str = "mock";
pub const PROVIDER_MODE_REAL: &str = "real";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_warnings_differ_only_in_case() {
        assert_ne!(STANDARD_WARNING_UPPER, STANDARD_WARNING_MIXED);
        assert_eq!(
            STANDARD_WARNING_UPPER.to_lowercase(),
            STANDARD_WARNING_MIXED.to_lowercase()
        );
    }

    #[test]
    fn test_thresholds_are_ordered() {
        assert!(TEXT_PASS_RATIO > TEXT_WARN_RATIO);
        assert!(ABV_PASS_DELTA < ABV_WARN_DELTA);
        assert!(DEFAULT_RETRY_INITIAL_DELAY <= DEFAULT_RETRY_MAX_DELAY);
    }
}
