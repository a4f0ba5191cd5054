//! Canned model used when `LABELCHECK_MOCK_PROVIDER` is set.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use labelcheck::constants::{PROVIDER_MODE_MOCK, STANDARD_WARNING_UPPER};
use labelcheck::model::{EXTRACTION_SCHEMA_NAME, ModelError, ModelRequest, VisionModel};
use labelcheck::FieldKey;

/// Returns one fixed bourbon label for every extraction and scores every field accurate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedVisionModel;

impl CannedVisionModel {
    pub fn extraction() -> Value {
        json!({
            "brandName": { "text": "Old Tom Distillery" },
            "classType": { "text": "Kentucky Straight Bourbon Whiskey" },
            "alcoholContent": { "text": "45% Alc./Vol. (90 Proof)" },
            "netContents": { "text": "750 mL" },
            "bottlerProducer": { "text": "Bottled by Old Tom Distillery, Bardstown, KY" },
            "countryOfOrigin": null,
            "governmentWarning": {
                "text": STANDARD_WARNING_UPPER,
                "isBold": true,
                "isAllCaps": true
            },
            "additivesDisclosed": null
        })
    }

    pub fn scores() -> Value {
        let fields: Map<String, Value> = FieldKey::ALL
            .into_iter()
            .map(|k| (k.as_str().to_string(), json!(1)))
            .collect();
        Value::Object(fields)
    }
}

#[async_trait]
impl VisionModel for CannedVisionModel {
    async fn complete(&self, _model: &str, request: &ModelRequest) -> Result<String, ModelError> {
        let body = if request.schema.name == EXTRACTION_SCHEMA_NAME {
            Self::extraction()
        } else {
            Self::scores()
        };
        Ok(body.to_string())
    }

    fn provider_mode(&self) -> &'static str {
        PROVIDER_MODE_MOCK
    }
}
