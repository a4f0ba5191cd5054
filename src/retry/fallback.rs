use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::ModelError;

use super::policy::{RetryPolicy, Sleeper};

/// A successful call together with what it took to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome<T> {
    pub value: T,
    /// Model that produced `value`.
    pub model: String,
    /// Backoff rounds slept before the successful call.
    pub rate_limit_rounds: u32,
    pub content_policy_retried: bool,
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("all models rate limited after {rounds} backoff rounds")]
    CapacityExhausted { rounds: u32 },

    #[error("model '{model}' failed: {source}")]
    Model {
        model: String,
        #[source]
        source: ModelError,
    },

    #[error("no models configured")]
    NoModels,
}

impl FallbackError {
    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(self, FallbackError::CapacityExhausted { .. })
    }

    pub fn is_content_policy(&self) -> bool {
        matches!(
            self,
            FallbackError::Model {
                source: ModelError::ContentPolicy(_),
                ..
            }
        )
    }
}

/// Calls `call` with each model in priority order until one succeeds.
///
/// Rate-limited models fall through to the next one; once every model has been rate limited the
/// loop sleeps for the next backoff delay and restarts from the primary model, until the policy's
/// round ceiling is reached. A content-policy rejection is retried once per loop, on the same
/// model, after the policy's fixed delay. Any other error ends the loop immediately.
pub async fn call_with_fallback<T, F, Fut>(
    models: &[String],
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut call: F,
) -> Result<FallbackOutcome<T>, FallbackError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, ModelError>>,
{
    if models.is_empty() {
        return Err(FallbackError::NoModels);
    }

    let mut backoff = policy.backoff();
    let mut content_policy_retried = false;

    loop {
        for model in models {
            let mut result = call(model.clone()).await;

            if matches!(result, Err(ModelError::ContentPolicy(_))) && !content_policy_retried {
                content_policy_retried = true;
                debug!(model = %model, "Content policy rejection, retrying once");
                sleeper.sleep(policy.content_policy_delay).await;
                result = call(model.clone()).await;
            }

            match result {
                Ok(value) => {
                    return Ok(FallbackOutcome {
                        value,
                        model: model.clone(),
                        rate_limit_rounds: backoff.rounds_taken(),
                        content_policy_retried,
                    });
                }
                Err(ModelError::RateLimited(message)) => {
                    debug!(model = %model, message = %message, "Model rate limited, trying next");
                }
                Err(source) => {
                    return Err(FallbackError::Model {
                        model: model.clone(),
                        source,
                    });
                }
            }
        }

        match backoff.next_delay() {
            Some(delay) => {
                warn!(
                    round = backoff.rounds_taken(),
                    delay_ms = delay.as_millis() as u64,
                    "All models rate limited, backing off"
                );
                sleeper.sleep(delay).await;
            }
            None => {
                return Err(FallbackError::CapacityExhausted {
                    rounds: backoff.rounds_taken(),
                });
            }
        }
    }
}
