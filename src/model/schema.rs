//! Strict JSON schemas enforced on model responses.

use serde_json::{Map, Value, json};

use crate::label::{AdditiveKind, FieldKey};

pub const EXTRACTION_SCHEMA_NAME: &str = "extracted_label";
pub const SCORING_SCHEMA_NAME: &str = "field_accuracy";

/// A named JSON schema for structured model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

fn nullable(schema: Value) -> Value {
    json!({ "anyOf": [schema, { "type": "null" }] })
}

fn text_field() -> Value {
    nullable(json!({
        "type": "object",
        "properties": { "text": { "type": "string" } },
        "required": ["text"],
        "additionalProperties": false
    }))
}

fn warning_field() -> Value {
    nullable(json!({
        "type": "object",
        "properties": {
            "text": { "type": "string" },
            "isBold": { "type": "boolean" },
            "isAllCaps": { "type": "boolean" }
        },
        "required": ["text", "isBold", "isAllCaps"],
        "additionalProperties": false
    }))
}

fn additive_wire_key(kind: AdditiveKind) -> &'static str {
    match kind {
        AdditiveKind::FdcYellow5 => "fdcYellow5",
        AdditiveKind::CochinealCarmine => "cochinealCarmine",
        AdditiveKind::Sulfites => "sulfites",
        AdditiveKind::Aspartame => "aspartame",
        AdditiveKind::Saccharin => "saccharin",
    }
}

fn additives_field() -> Value {
    let properties: Map<String, Value> = AdditiveKind::ALL
        .into_iter()
        .map(|k| (additive_wire_key(k).to_string(), json!({ "type": "boolean" })))
        .collect();
    let required: Vec<&str> = AdditiveKind::ALL.into_iter().map(additive_wire_key).collect();
    nullable(json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    }))
}

/// Schema for one label transcription.
pub fn extraction_schema() -> ResponseSchema {
    let properties: Map<String, Value> = FieldKey::ALL
        .into_iter()
        .map(|key| {
            let schema = match key {
                FieldKey::GovernmentWarning => warning_field(),
                FieldKey::AdditivesDisclosed => additives_field(),
                _ => text_field(),
            };
            (key.as_str().to_string(), schema)
        })
        .collect();
    let required: Vec<&str> = FieldKey::ALL.into_iter().map(|k| k.as_str()).collect();

    ResponseSchema {
        name: EXTRACTION_SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        }),
    }
}

/// Schema for a 0/1 score on each of the eight fields.
pub fn scoring_schema() -> ResponseSchema {
    let properties: Map<String, Value> = FieldKey::ALL
        .into_iter()
        .map(|k| (k.as_str().to_string(), json!({ "type": "integer", "enum": [0, 1] })))
        .collect();
    let required: Vec<&str> = FieldKey::ALL.into_iter().map(|k| k.as_str()).collect();

    ResponseSchema {
        name: SCORING_SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        }),
    }
}
