//! Instruction texts sent with extraction and scoring calls.

pub const EXTRACTION_SYSTEM: &str = "You are a compliance analyst reading alcohol beverage labels. \
Transcribe exactly what is printed on the label. Never guess or fill in values that are not \
visible. Use null for any field that does not appear on the label.";

pub const EXTRACTION_USER: &str = "Extract the following from this label image: brand name, \
class/type designation, alcohol content statement, net contents, bottler/producer statement, \
country of origin statement, and the full government health warning. For the warning, report \
whether the 'GOVERNMENT WARNING' heading is printed in bold and in capital letters. Also report \
which of these additives the label discloses: FD&C Yellow No. 5, cochineal extract or carmine, \
sulfites, aspartame, saccharin. If the label discloses no additives, use null for additives.";

pub const EVALUATION_SYSTEM: &str = "You are a strict label compliance reviewer. Compare the \
extracted label fields against the expected values. Score each field 1 if the extracted value \
conveys the same information as the expected value (ignoring case, punctuation and formatting), \
otherwise 0. A field that is null in both records scores 1. A field that is null in only one \
record scores 0.";

/// User prompt for one scoring call.
pub fn evaluation_user(expected: &serde_json::Value, extracted: &serde_json::Value) -> String {
    format!(
        "Expected values:\n{}\n\nExtracted values:\n{}\n\nScore every field.",
        serde_json::to_string_pretty(expected).unwrap_or_default(),
        serde_json::to_string_pretty(extracted).unwrap_or_default()
    )
}
