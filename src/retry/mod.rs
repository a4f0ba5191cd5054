//! Rate-limit aware model fallback with capped exponential backoff.
//!
//! All retry state lives in a [`Backoff`] built from a [`RetryPolicy`] and threaded through
//! [`call_with_fallback`]; sleeping goes through the [`Sleeper`] seam so tests can substitute a
//! recording clock.

pub mod fallback;
pub mod policy;


pub use fallback::{FallbackError, FallbackOutcome, call_with_fallback};
pub use policy::{Backoff, RetryPolicy, Sleeper, TokioSleeper};
#[cfg(any(test, feature = "mock"))]
pub use policy::RecordingSleeper;
