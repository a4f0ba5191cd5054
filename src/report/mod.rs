//! Verification report builder.
//!
//! Turns comparator rows into the report the review UI renders: applies the government-warning
//! downgrade and computes the overall label status.


use serde::Serialize;
use tracing::debug;

use crate::comparator::{VerificationResult, VerificationStatus, compare_label};
use crate::label::{ExpectedLabel, ExtractedLabel, FieldKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    results: Vec<VerificationResult>,
    overall: VerificationStatus,
}

impl VerificationReport {
    /// Compares `extracted` against `expected` and builds the report.
    pub fn build(extracted: &ExtractedLabel, expected: &ExpectedLabel) -> Self {
        Self::from_results(compare_label(extracted, expected))
    }

    pub fn from_results(mut results: Vec<VerificationResult>) -> Self {
        if downgrade_lone_warning_failure(&mut results) {
            debug!("Government warning was the only failure; downgraded to warn");
        }
        let overall = overall_status(&results);
        Self { results, overall }
    }

    pub fn results(&self) -> &[VerificationResult] {
        &self.results
    }

    pub fn overall(&self) -> VerificationStatus {
        self.overall
    }

    pub fn count(&self, status: VerificationStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// One-line summary, e.g. `"✓ 6 pass, 1 warn, 0 fail"`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} pass, {} warn, {} fail",
            self.overall.glyph(),
            self.count(VerificationStatus::Pass),
            self.count(VerificationStatus::Warn),
            self.count(VerificationStatus::Fail)
        )
    }
}

/// Fail if anything failed, otherwise Warn if anything warned, otherwise Pass.
pub fn overall_status(results: &[VerificationResult]) -> VerificationStatus {
    results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(VerificationStatus::Pass)
}

/// When the government warning is the only failing row, it becomes a warning.
///
/// Returns `true` if a row was changed.
pub fn downgrade_lone_warning_failure(results: &mut [VerificationResult]) -> bool {
    let warning_field = FieldKey::GovernmentWarning.display_name();
    let mut failures = results.iter_mut().filter(|r| r.is_fail());

    let (Some(only), None) = (failures.next(), failures.next()) else {
        return false;
    };
    if only.field != warning_field {
        return false;
    }

    only.status = VerificationStatus::Warn;
    let note = "Only failing field; downgraded to warning";
    only.message = Some(match only.message.take() {
        Some(existing) => format!("{}. {}", existing, note),
        None => note.to_string(),
    });
    true
}
