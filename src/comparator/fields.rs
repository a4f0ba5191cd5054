//! Per-field comparison rules.

use std::sync::LazyLock;

use crate::constants::{
    ABV_PASS_DELTA, ABV_WARN_DELTA, COUNTRY_WARN_RATIO, NET_CONTENTS_PASS_DELTA,
    NET_CONTENTS_WARN_FRACTION, STANDARD_WARNINGS, TEXT_PASS_RATIO, TEXT_WARN_RATIO,
    WARNING_EDIT_TOLERANCE,
};
use crate::label::{ExpectedLabel, ExtractedLabel, FieldKey};
use crate::similarity::{
    levenshtein, normalize, parse_leading_number, ratio_of_normalized, similarity_ratio,
    strip_country_prefix,
};

use super::types::{VerificationResult, VerificationStatus};

const NOT_FOUND: &str = "Not found on label";

static NORMALIZED_STANDARD_WARNINGS: LazyLock<Vec<String>> =
    LazyLock::new(|| STANDARD_WARNINGS.iter().map(|w| normalize(w)).collect());

fn missing(key: FieldKey, expected: &str) -> VerificationResult {
    VerificationResult::new(key.display_name(), "", expected, VerificationStatus::Fail)
        .with_message(NOT_FOUND)
}

fn texts<'a>(
    key: FieldKey,
    extracted: &'a ExtractedLabel,
    expected: &'a ExpectedLabel,
) -> (Option<&'a str>, &'a str) {
    (extracted.text(key), expected.text(key).unwrap_or_default())
}

/// Brand name, class/type and bottler/producer: fuzzy text similarity.
pub fn compare_name_field(
    key: FieldKey,
    extracted: &ExtractedLabel,
    expected: &ExpectedLabel,
) -> VerificationResult {
    let (found, wanted) = texts(key, extracted, expected);
    let Some(found) = found else {
        return missing(key, wanted);
    };

    let ratio = similarity_ratio(found, wanted);
    let status = if ratio > TEXT_PASS_RATIO {
        VerificationStatus::Pass
    } else if ratio > TEXT_WARN_RATIO {
        VerificationStatus::Warn
    } else {
        VerificationStatus::Fail
    };

    let result = VerificationResult::new(key.display_name(), found, wanted, status);
    match status {
        VerificationStatus::Pass => result,
        _ => result.with_message(format!("Similarity {:.0}%", ratio * 100.0)),
    }
}

/// Leading numeric ABV on both sides, compared by absolute difference.
pub fn compare_alcohol_content(
    extracted: &ExtractedLabel,
    expected: &ExpectedLabel,
) -> VerificationResult {
    let key = FieldKey::AlcoholContent;
    let (found, wanted) = texts(key, extracted, expected);
    let Some(found) = found else {
        return missing(key, wanted);
    };

    let (Some(found_abv), Some(wanted_abv)) =
        (parse_leading_number(found), parse_leading_number(wanted))
    else {
        return VerificationResult::new(key.display_name(), found, wanted, VerificationStatus::Fail)
            .with_message("Could not read a numeric alcohol content");
    };

    let delta = (found_abv - wanted_abv).abs();
    let status = if delta < ABV_PASS_DELTA {
        VerificationStatus::Pass
    } else if delta < ABV_WARN_DELTA {
        VerificationStatus::Warn
    } else {
        VerificationStatus::Fail
    };

    let result = VerificationResult::new(key.display_name(), found, wanted, status);
    match status {
        VerificationStatus::Pass => result,
        _ => result.with_message(format!("Differs by {:.2} percentage points", delta)),
    }
}

/// Splits a net-contents statement into its unit (digits stripped) and leading quantity.
pub fn split_quantity(text: &str) -> (String, Option<f64>) {
    let unit: String = normalize(
        &text
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != '.' && *c != ',')
            .collect::<String>(),
    )
    .split_whitespace()
    .collect();
    let quantity = parse_leading_number(&text.replace(',', ""));
    (unit, quantity)
}

/// Units must match exactly; quantities are then compared absolutely and relatively.
pub fn compare_net_contents(extracted: &ExtractedLabel, expected: &ExpectedLabel) -> VerificationResult {
    let key = FieldKey::NetContents;
    let (found, wanted) = texts(key, extracted, expected);
    let Some(found) = found else {
        return missing(key, wanted);
    };

    let (found_unit, found_qty) = split_quantity(found);
    let (wanted_unit, wanted_qty) = split_quantity(wanted);

    if found_unit != wanted_unit {
        return VerificationResult::new(key.display_name(), found, wanted, VerificationStatus::Fail)
            .with_message(format!(
                "Unit mismatch: '{}' vs '{}'",
                found_unit, wanted_unit
            ));
    }

    let (Some(found_qty), Some(wanted_qty)) = (found_qty, wanted_qty) else {
        return VerificationResult::new(key.display_name(), found, wanted, VerificationStatus::Fail)
            .with_message("Could not read a numeric quantity");
    };

    let delta = (found_qty - wanted_qty).abs();
    let status = if delta < NET_CONTENTS_PASS_DELTA {
        VerificationStatus::Pass
    } else if delta < wanted_qty.abs() * NET_CONTENTS_WARN_FRACTION {
        VerificationStatus::Warn
    } else {
        VerificationStatus::Fail
    };

    let result = VerificationResult::new(key.display_name(), found, wanted, status);
    match status {
        VerificationStatus::Pass => result,
        _ => result.with_message(format!("Quantity differs by {}", delta)),
    }
}

fn is_standard_warning(normalized: &str) -> bool {
    NORMALIZED_STANDARD_WARNINGS.iter().any(|w| w == normalized)
}

/// Whether an extracted warning is textually acceptable against the expected wording.
///
/// Accepted: equal after normalization, the extracted text contains the expected text, both are
/// a recognised standard wording, or they differ by at most one character edit.
pub fn warning_text_matches(found: &str, wanted: &str) -> bool {
    let found = normalize(found);
    let wanted = normalize(wanted);

    found == wanted
        || (!wanted.is_empty() && found.contains(&wanted))
        || (is_standard_warning(&found) && is_standard_warning(&wanted))
        || levenshtein(&found, &wanted) <= WARNING_EDIT_TOLERANCE
}

pub fn compare_government_warning(
    extracted: &ExtractedLabel,
    expected: &ExpectedLabel,
) -> VerificationResult {
    let key = FieldKey::GovernmentWarning;
    let wanted = expected.text(key).unwrap_or_default();
    let Some(warning) = extracted.government_warning.as_ref() else {
        return missing(key, wanted);
    };

    if !warning_text_matches(&warning.text, wanted) {
        return VerificationResult::new(
            key.display_name(),
            warning.text.as_str(),
            wanted,
            VerificationStatus::Fail,
        )
        .with_message("Warning text does not match the required wording");
    }

    let result = VerificationResult::new(
        key.display_name(),
        warning.text.as_str(),
        wanted,
        VerificationStatus::Pass,
    );

    let mut notes = Vec::new();
    if !warning.is_all_caps {
        notes.push("heading not in capital letters");
    }
    if !warning.is_bold {
        notes.push("heading not reported as bold");
    }
    if notes.is_empty() {
        result
    } else {
        result.with_message(format!("Typography: {}", notes.join(", ")))
    }
}

pub fn compare_country_of_origin(
    extracted: &ExtractedLabel,
    expected: &ExpectedLabel,
) -> VerificationResult {
    let key = FieldKey::CountryOfOrigin;
    let (found, wanted) = texts(key, extracted, expected);
    let Some(found) = found else {
        return missing(key, wanted);
    };

    let found_norm = normalize(found);
    let wanted_norm = normalize(wanted);

    let found_country = strip_country_prefix(&found_norm);
    let accepted = found_norm == wanted_norm
        || (!found_country.is_empty() && found_country == strip_country_prefix(&wanted_norm))
        || (!wanted_norm.is_empty() && found_norm.contains(&wanted_norm));

    if accepted {
        return VerificationResult::new(key.display_name(), found, wanted, VerificationStatus::Pass);
    }

    let ratio = ratio_of_normalized(&found_norm, &wanted_norm);
    let status = if ratio > COUNTRY_WARN_RATIO {
        VerificationStatus::Warn
    } else {
        VerificationStatus::Fail
    };
    VerificationResult::new(key.display_name(), found, wanted, status)
        .with_message(format!("Similarity {:.0}%", ratio * 100.0))
}

/// One Fail per detected additive that the label does not disclose.
pub fn additive_disclosure_rules(
    extracted: &ExtractedLabel,
    expected: &ExpectedLabel,
) -> Vec<VerificationResult> {
    let disclosed = extracted.additives_disclosed.unwrap_or_default();
    expected
        .additives_detected
        .present()
        .filter(|kind| !disclosed.get(*kind))
        .map(|kind| {
            VerificationResult::new(
                format!("{} Disclosure", kind.display_name()),
                "",
                kind.display_name(),
                VerificationStatus::Fail,
            )
            .with_message(format!(
                "{} detected but not disclosed on label",
                kind.display_name()
            ))
        })
        .collect()
}

/// Fail when an imported product shows no country of origin at all.
pub fn import_origin_rule(
    extracted: &ExtractedLabel,
    expected: &ExpectedLabel,
) -> Option<VerificationResult> {
    if !expected.is_imported || extracted.text(FieldKey::CountryOfOrigin).is_some() {
        return None;
    }
    Some(
        VerificationResult::new(
            "Country of Origin Statement",
            "",
            expected.text(FieldKey::CountryOfOrigin).unwrap_or("Required for imports"),
            VerificationStatus::Fail,
        )
        .with_message("Imported products must state the country of origin"),
    )
}
