//! Per-field consensus merge of scored extraction candidates.


use serde::Serialize;
use tracing::debug;

use crate::label::{
    AccuracyDecision, ExpectedLabel, ExtractedLabel, ExtractionCandidate, FieldAccuracy, FieldKey,
};
use crate::policy::FieldScope;
use crate::similarity::{additive_similarity, similarity_ratio};

/// Which candidate supplied one merged field, and why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelection {
    pub field: FieldKey,
    pub candidate: usize,
    pub similarity: f64,
    pub accurate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub label: ExtractedLabel,
    pub decision: AccuracyDecision,
    pub selections: Vec<FieldSelection>,
}

/// Similarity in `[0, 1]` between a candidate's value for `key` and the expected value.
///
/// A missing text value scores `0`; a missing disclosure reads as all five flags false.
pub fn field_similarity(key: FieldKey, extracted: &ExtractedLabel, expected: &ExpectedLabel) -> f64 {
    match key {
        FieldKey::AdditivesDisclosed => additive_similarity(
            &expected.additives_detected,
            &extracted.additives_disclosed.unwrap_or_default(),
        ),
        _ => extracted.text(key).map_or(0.0, |found| {
            similarity_ratio(found, expected.text(key).unwrap_or_default())
        }),
    }
}

/// A candidate's score for `key`; unevaluated candidates only get forced-pass fields.
fn candidate_score(candidate: &ExtractionCandidate, key: FieldKey, scope: &FieldScope) -> bool {
    match &candidate.evaluation {
        Some(decision) => decision.is_accurate(key),
        None => !scope.is_in_scope(key),
    }
}

/// Merges candidates field by field. Returns `None` for an empty candidate list.
///
/// For each field the pool is narrowed to candidates that scored it accurate (when any did),
/// then the most similar value wins, preferring present values, then the lowest attempt index.
pub fn merge_candidates(
    candidates: &[ExtractionCandidate],
    expected: &ExpectedLabel,
    scope: &FieldScope,
) -> Option<MergeOutcome> {
    if candidates.is_empty() {
        return None;
    }

    let mut label = ExtractedLabel::default();
    let mut accuracy = FieldAccuracy::all_failed();
    let mut selections = Vec::with_capacity(FieldKey::ALL.len());

    for key in FieldKey::ALL {
        let scored: Vec<(&ExtractionCandidate, bool)> = candidates
            .iter()
            .map(|c| (c, candidate_score(c, key, scope)))
            .collect();
        let any_accurate = scored.iter().any(|(_, accurate)| *accurate);

        let winner = scored
            .iter()
            .filter(|(_, accurate)| *accurate || !any_accurate)
            .map(|(c, _)| (*c, field_similarity(key, &c.extracted, expected)))
            .max_by(|(a, sim_a), (b, sim_b)| {
                sim_a
                    .total_cmp(sim_b)
                    .then_with(|| a.extracted.is_present(key).cmp(&b.extracted.is_present(key)))
                    .then_with(|| b.index.cmp(&a.index))
            });

        let Some((winner, similarity)) = winner else {
            continue;
        };

        label.copy_field(key, &winner.extracted);
        accuracy.set(key, any_accurate);
        selections.push(FieldSelection {
            field: key,
            candidate: winner.index,
            similarity,
            accurate: any_accurate,
        });
    }

    let decision = AccuracyDecision::new(accuracy);
    debug!(
        candidates = candidates.len(),
        passed = decision.passed(),
        failed = ?decision.fields().failed_fields(),
        "Candidates merged"
    );

    Some(MergeOutcome {
        label,
        decision,
        selections,
    })
}

/// Without a reference record: the candidate with the fewest missing fields, lowest index on ties.
pub fn select_most_complete(candidates: &[ExtractionCandidate]) -> Option<&ExtractionCandidate> {
    candidates
        .iter()
        .min_by_key(|c| (c.extracted.null_count(), c.index))
}
