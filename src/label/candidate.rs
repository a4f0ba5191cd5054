use serde::Serialize;

use super::accuracy::AccuracyDecision;
use super::types::ExtractedLabel;

/// One extraction attempt's output, optionally scored.
///
/// Created by the orchestrator with no evaluation, scored at most once by the evaluator, then
/// read by the merger. `index` is the zero-based attempt order and the final tie-break.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionCandidate {
    pub extracted: ExtractedLabel,
    pub evaluation: Option<AccuracyDecision>,
    pub index: usize,
}

impl ExtractionCandidate {
    pub fn new(index: usize, extracted: ExtractedLabel) -> Self {
        Self {
            extracted,
            evaluation: None,
            index,
        }
    }

    pub fn with_evaluation(mut self, evaluation: Option<AccuracyDecision>) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }
}
