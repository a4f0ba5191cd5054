use super::*;
use serde_json::json;

fn sample_expected_json() -> serde_json::Value {
    json!({
        "brandName": "Old Tom Distillery",
        "classType": "Kentucky Straight Bourbon Whiskey",
        "alcoholContent": "45% Alc./Vol. (90 Proof)",
        "netContents": "750 mL",
        "bottlerProducer": "Bottled by Old Tom Distillery, Bardstown, KY",
        "governmentWarning": crate::constants::STANDARD_WARNING_UPPER,
        "productType": "whiskey",
        "additivesDetected": { "fdcYellow5": true }
    })
}

#[test]
fn test_expected_label_deserializes_with_defaults() {
    let expected: ExpectedLabel =
        serde_json::from_value(sample_expected_json()).expect("valid expected label");

    assert_eq!(expected.product_type, Some(ProductType::Whiskey));
    assert!(!expected.is_imported);
    assert!(expected.country_of_origin.is_none());
    assert!(expected.additives_detected.fdc_yellow_5);
    assert!(!expected.additives_detected.sulfites);
    assert!(expected.is_well_formed());
}

#[test]
fn test_expected_label_blank_required_field_is_not_well_formed() {
    let mut expected: ExpectedLabel =
        serde_json::from_value(sample_expected_json()).expect("valid expected label");
    expected.net_contents = "   ".to_string();

    assert_eq!(expected.missing_required(), Some(FieldKey::NetContents));
    assert!(!expected.is_well_formed());
}

#[test]
fn test_expected_label_blank_optional_reads_as_none() {
    let expected = ExpectedLabel {
        country_of_origin: Some(" ".to_string()),
        ..Default::default()
    };
    assert_eq!(expected.text(FieldKey::CountryOfOrigin), None);
}

#[test]
fn test_unknown_product_type_is_rejected() {
    let mut value = sample_expected_json();
    value["productType"] = json!("cider");
    assert!(serde_json::from_value::<ExpectedLabel>(value).is_err());
}

#[test]
fn test_extracted_label_parses_model_output() {
    let extracted: ExtractedLabel = serde_json::from_value(json!({
        "brandName": { "text": "OLD TOM" },
        "classType": null,
        "alcoholContent": { "text": "45% ALC/VOL" },
        "netContents": { "text": "750 ML" },
        "bottlerProducer": null,
        "countryOfOrigin": null,
        "governmentWarning": { "text": "GOVERNMENT WARNING: ...", "isBold": true, "isAllCaps": true },
        "additivesDisclosed": null
    }))
    .expect("valid extraction");

    assert_eq!(extracted.text(FieldKey::BrandName), Some("OLD TOM"));
    assert_eq!(extracted.text(FieldKey::ClassType), None);
    assert!(extracted.government_warning.as_ref().is_some_and(|w| w.is_bold));
    assert_eq!(extracted.null_count(), 4);
}

#[test]
fn test_extracted_label_normalized_drops_blank_fields() {
    let extracted = ExtractedLabel {
        brand_name: Some(LabelField::new("  ")),
        net_contents: Some(LabelField::new("750 mL")),
        government_warning: Some(WarningField::new("")),
        ..Default::default()
    }
    .normalized();

    assert!(extracted.brand_name.is_none());
    assert!(extracted.government_warning.is_none());
    assert_eq!(extracted.text(FieldKey::NetContents), Some("750 mL"));
}

#[test]
fn test_copy_field_takes_raw_value() {
    let source = ExtractedLabel {
        country_of_origin: Some(LabelField::new("Product of France")),
        additives_disclosed: Some(AdditiveFlags {
            sulfites: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut merged = ExtractedLabel::default();
    merged.copy_field(FieldKey::CountryOfOrigin, &source);
    merged.copy_field(FieldKey::AdditivesDisclosed, &source);

    assert_eq!(merged.country_of_origin, source.country_of_origin);
    assert_eq!(merged.additives_disclosed, source.additives_disclosed);
    assert!(merged.brand_name.is_none());
}

#[test]
fn test_additive_flags_agreements() {
    let expected = AdditiveFlags {
        sulfites: true,
        aspartame: true,
        ..Default::default()
    };
    let disclosed = AdditiveFlags {
        sulfites: true,
        ..Default::default()
    };

    assert_eq!(expected.agreements(&disclosed), 4);
    assert_eq!(expected.agreements(&expected), 5);
    assert_eq!(
        expected.present().collect::<Vec<_>>(),
        vec![AdditiveKind::Sulfites, AdditiveKind::Aspartame]
    );
}

#[test]
fn test_field_key_round_trips_through_wire_name() {
    for key in FieldKey::ALL {
        assert_eq!(key.as_str().parse::<FieldKey>(), Ok(key));
    }
    assert!("vintage".parse::<FieldKey>().is_err());
}

#[test]
fn test_field_accuracy_canonical_shape() {
    let accuracy = FieldAccuracy::all_passed().with(FieldKey::NetContents, false);
    let value = serde_json::to_value(accuracy).expect("serializes");

    assert_eq!(value["netContents"], json!(0));
    assert_eq!(value["brandName"], json!(1));
    assert_eq!(value.as_object().map(|o| o.len()), Some(8));
}

#[test]
fn test_field_accuracy_accepts_boolean_and_wrapped_variants() {
    let booleans = json!({
        "brandName": true, "classType": true, "alcoholContent": false,
        "netContents": true, "bottlerProducer": true, "countryOfOrigin": true,
        "governmentWarning": "pass", "additivesDisclosed": 1.0
    });
    let wrapped = json!({ "fields": booleans.clone(), "passed": true });

    let a = FieldAccuracy::from_value(&booleans).expect("boolean variant");
    let b = FieldAccuracy::from_value(&wrapped).expect("wrapped variant");

    assert_eq!(a, b);
    assert!(!a.is_accurate(FieldKey::AlcoholContent));
    assert!(a.is_accurate(FieldKey::GovernmentWarning));
    assert_eq!(a.failed_fields(), vec![FieldKey::AlcoholContent]);
}

#[test]
fn test_field_accuracy_rejects_incomplete_response() {
    let partial = json!({ "brandName": 1, "classType": 1 });
    let err = FieldAccuracy::from_value(&partial).unwrap_err();
    assert!(err.contains("alcoholContent"));

    let garbage = json!({
        "brandName": 7, "classType": 1, "alcoholContent": 1, "netContents": 1,
        "bottlerProducer": 1, "countryOfOrigin": 1, "governmentWarning": 1,
        "additivesDisclosed": 1
    });
    assert!(FieldAccuracy::from_value(&garbage).is_err());
}

#[test]
fn test_accuracy_decision_passed_is_conjunction() {
    let passing = AccuracyDecision::new(FieldAccuracy::all_passed());
    assert!(passing.passed());

    let failing = AccuracyDecision::new(FieldAccuracy::all_passed().with(FieldKey::BrandName, false));
    assert!(!failing.passed());
}

#[test]
fn test_accuracy_decision_ignores_wire_passed_flag() {
    let decision: AccuracyDecision = serde_json::from_value(json!({
        "fields": {
            "brandName": 0, "classType": 1, "alcoholContent": 1, "netContents": 1,
            "bottlerProducer": 1, "countryOfOrigin": 1, "governmentWarning": 1,
            "additivesDisclosed": 1
        },
        "passed": true
    }))
    .expect("decision parses");

    assert!(!decision.passed());
}

#[test]
fn test_candidate_starts_unevaluated() {
    let candidate = ExtractionCandidate::new(1, ExtractedLabel::default());
    assert_eq!(candidate.index, 1);
    assert!(!candidate.is_evaluated());

    let scored = candidate.with_evaluation(Some(AccuracyDecision::new(FieldAccuracy::all_passed())));
    assert!(scored.is_evaluated());
}
