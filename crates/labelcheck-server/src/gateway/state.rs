use std::sync::Arc;

use labelcheck::image::DataUrlPreparer;
use labelcheck::{Config, LabelVerifier, VerifierSettings};

use crate::gateway::error::GatewayError;
use crate::gateway::mock_provider::CannedVisionModel;

#[derive(Clone)]
pub struct HandlerState {
    verifier: Result<Arc<LabelVerifier>, String>,

    pub models: Vec<String>,

    pub batch_concurrency: usize,

    pub mock_provider: bool,
}

impl HandlerState {
    /// Builds the verifier described by `config`.
    ///
    /// A missing credential does not fail start-up; verification requests report it instead.
    pub fn from_config(config: &Config) -> Self {
        if config.mock_provider {
            let verifier = LabelVerifier::new(
                Arc::new(CannedVisionModel),
                Arc::new(DataUrlPreparer),
                VerifierSettings::from_config(config),
            );
            return Self::new(Arc::new(verifier), config);
        }

        match LabelVerifier::from_config(config) {
            Ok(verifier) => Self::new(Arc::new(verifier), config),
            Err(e) => {
                tracing::warn!(error = %e, "Model provider unavailable; verification disabled");
                Self::unconfigured(e.to_string(), config)
            }
        }
    }

    pub fn new(verifier: Arc<LabelVerifier>, config: &Config) -> Self {
        Self {
            mock_provider: verifier.provider_mode() == labelcheck::constants::PROVIDER_MODE_MOCK,
            verifier: Ok(verifier),
            models: config.models.clone(),
            batch_concurrency: config.batch_concurrency,
        }
    }

    pub fn unconfigured(reason: impl Into<String>, config: &Config) -> Self {
        Self {
            verifier: Err(reason.into()),
            models: config.models.clone(),
            batch_concurrency: config.batch_concurrency,
            mock_provider: false,
        }
    }

    pub fn verifier(&self) -> Result<&Arc<LabelVerifier>, GatewayError> {
        self.verifier
            .as_ref()
            .map_err(|reason| GatewayError::NotConfigured(reason.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.verifier.is_ok()
    }

    pub fn provider_mode(&self) -> &'static str {
        match &self.verifier {
            Ok(verifier) => verifier.provider_mode(),
            Err(_) => labelcheck::constants::PROVIDER_MODE_REAL,
        }
    }
}
