//! Deterministic (model-free) comparison of an extracted label against the reference record.
//!
//! Produces one [`VerificationResult`] per compared field plus standalone results for the
//! regulatory rules (required additive disclosures, country of origin on imports). The output is
//! a pure function of its inputs, so running it twice yields identical rows.

pub mod fields;
pub mod types;


pub use types::{VerificationResult, VerificationStatus};

use tracing::debug;

use crate::label::{ExpectedLabel, ExtractedLabel, FieldKey};
use crate::policy::FieldScope;

/// Compares every in-scope field and appends the regulatory rule results.
pub fn compare_label(extracted: &ExtractedLabel, expected: &ExpectedLabel) -> Vec<VerificationResult> {
    let scope = FieldScope::for_expected(expected);
    let mut results = Vec::with_capacity(10);

    results.push(fields::compare_name_field(FieldKey::BrandName, extracted, expected));
    results.push(fields::compare_name_field(FieldKey::ClassType, extracted, expected));

    if scope.alcohol_content {
        results.push(fields::compare_alcohol_content(extracted, expected));
    }

    results.push(fields::compare_net_contents(extracted, expected));
    results.push(fields::compare_name_field(FieldKey::BottlerProducer, extracted, expected));

    if scope.country_of_origin {
        results.push(fields::compare_country_of_origin(extracted, expected));
    }

    results.push(fields::compare_government_warning(extracted, expected));

    results.extend(fields::additive_disclosure_rules(extracted, expected));

    if !scope.country_of_origin
        && let Some(rule) = fields::import_origin_rule(extracted, expected)
    {
        results.push(rule);
    }

    debug!(
        rows = results.len(),
        failures = results.iter().filter(|r| r.status == VerificationStatus::Fail).count(),
        "Deterministic comparison complete"
    );

    results
}
