use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::constants::PROVIDER_MODE_MOCK;

use super::error::ModelError;
use super::{ModelRequest, VisionModel};

type Responder = dyn Fn(&str, &ModelRequest) -> Result<String, ModelError> + Send + Sync;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub model: String,
    pub schema: String,
    pub has_image: bool,
}

/// Scripted or closure-driven model for tests.
pub struct MockVisionModel {
    script: Mutex<VecDeque<Result<String, ModelError>>>,
    responder: Option<Box<Responder>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockVisionModel {
    /// Answers every call with `f(model, request)`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &ModelRequest) -> Result<String, ModelError> + Send + Sync + 'static,
    {
        Self {
            script: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(f)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers calls in order from `responses`; further calls fail.
    pub fn scripted(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            responder: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always returns the same response.
    pub fn always(response: Result<String, ModelError>) -> Self {
        Self::from_fn(move |_, _| response.clone())
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn calls_for_schema(&self, schema: &str) -> usize {
        self.calls().iter().filter(|c| c.schema == schema).count()
    }
}

impl std::fmt::Debug for MockVisionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockVisionModel")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    async fn complete(&self, model: &str, request: &ModelRequest) -> Result<String, ModelError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                model: model.to_string(),
                schema: request.schema.name.clone(),
                has_image: request.image.is_some(),
            });
        }

        if let Some(responder) = &self.responder {
            return responder(model, request);
        }

        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| {
                Err(ModelError::InvalidResponse(
                    "mock script exhausted".to_string(),
                ))
            })
    }

    fn provider_mode(&self) -> &'static str {
        PROVIDER_MODE_MOCK
    }
}
