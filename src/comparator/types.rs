use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Outcome of a single field check. Ordered by severity.
pub enum VerificationStatus {
    Pass,
    Warn,
    Fail,
}

impl VerificationStatus {
    /// Glyph shown next to the field in the review UI.
    pub fn glyph(&self) -> &'static str {
        match self {
            VerificationStatus::Pass => "✓",
            VerificationStatus::Warn => "⚠",
            VerificationStatus::Fail => "✗",
        }
    }

    pub fn as_header_value(&self) -> &'static str {
        match self {
            VerificationStatus::Pass => "PASS",
            VerificationStatus::Warn => "WARN",
            VerificationStatus::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_header_value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One compared field (or regulatory rule) for a label.
pub struct VerificationResult {
    pub field: String,
    pub extracted: String,
    pub expected: String,
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerificationResult {
    pub fn new(
        field: impl Into<String>,
        extracted: impl Into<String>,
        expected: impl Into<String>,
        status: VerificationStatus,
    ) -> Self {
        Self {
            field: field.into(),
            extracted: extracted.into(),
            expected: expected.into(),
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_fail(&self) -> bool {
        self.status == VerificationStatus::Fail
    }
}
