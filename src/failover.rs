//! Retry policy, prompt truncation and failure classification
//!
//! Shared by every backend adapter: one `generate` call runs
//! [`generate_with_retry`] against the adapter's transport.

use std::time::Duration;
use log::{debug, warn};

use crate::error::Error;
use crate::providers::Transport;

/// Marker appended by the pre-flight length check
pub const LENGTH_TRUNCATION_MARKER: &str
  = "\n[Note: Prompt was truncated due to length.]";

/// Marker appended when a timeout forces a shorter prompt
pub const TIMEOUT_TRUNCATION_MARKER: &str
  = "\n[Note: Prompt was truncated due to timeout issues.]";

/// Retry policy for one generate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy
{   pub max_retries: usize
  , pub backoff_unit: Duration
  , pub max_prompt_chars: usize
  , pub timeout_prompt_chars: usize
}

impl RetryPolicy
{   /// Create a new retry policy with the default prompt limits
    pub fn new(
      max_retries: usize
    , backoff_unit_ms: u64
    ) -> Self
    {   let defaults = crate::config::RetryConfig::default();
        RetryPolicy
        {   max_retries: max_retries.max(1)
          , backoff_unit: Duration::from_millis(backoff_unit_ms)
          , max_prompt_chars: defaults.max_prompt_chars
          , timeout_prompt_chars: defaults.timeout_prompt_chars
        }
    }

    /// Rate-limit sleep after a failed 1-indexed attempt
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   debug!("Calculating backoff for attempt {}", attempt);
        self.backoff_unit
          .saturating_mul(attempt.min(u32::MAX as usize) as u32)
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::from(&crate::config::RetryConfig::default())
    }
}

impl From<&crate::config::RetryConfig> for RetryPolicy
{   fn from(config: &crate::config::RetryConfig) -> Self
    {   RetryPolicy
        {   max_retries: config.max_retries.max(1)
          , backoff_unit: Duration::from_millis(
              config.backoff_unit_ms
            )
          , max_prompt_chars: config.max_prompt_chars
          , timeout_prompt_chars: config.timeout_prompt_chars
        }
    }
}

/// Coarse class of a backend failure.
///
/// Status codes are trusted when the backend returned one. Everything
/// else falls back to the failure's text, so it depends on how a given
/// backend version words its errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass
{   Timeout
  , RateLimit
  , Other
}

impl ErrorClass
{   /// Classify a failure returned by a transport
    pub fn of(error: &Error) -> Self
    {   match error
        {   Error::Timeout => ErrorClass::Timeout
          , Error::Api { status: 408 | 504, .. } => ErrorClass::Timeout
          , Error::Api { status: 429, .. } => ErrorClass::RateLimit
          , Error::Api { message, .. } => ErrorClass::of_message(message)
          , other => ErrorClass::of_message(&other.to_string())
        }
    }

    /// Classify by wording only. Bare status numbers are not matched
    /// here: they also turn up in URLs and ports.
    pub fn of_message(message: &str) -> Self
    {   let lower = message.to_lowercase();
        if message.contains("Deadline Exceeded")
          || lower.contains("timed out")
        {   ErrorClass::Timeout
        } else if lower.contains("quota")
          || lower.contains("resource_exhausted")
          || lower.contains("too many requests")
        {   ErrorClass::RateLimit
        } else
        {   ErrorClass::Other
        }
    }
}

/// Cut `prompt` to its first `limit` characters and append `marker`.
/// Returns `None` when the prompt already fits.
pub fn truncate_chars(
  prompt: &str
, limit: usize
, marker: &str
) -> Option<String>
{   let (cut, _) = prompt.char_indices().nth(limit)?;
    let mut truncated
      = String::with_capacity(cut + marker.len());
    truncated.push_str(&prompt[..cut]);
    truncated.push_str(marker);
    Some(truncated)
}

/// Per-call state, dropped when the call returns
#[derive(Debug)]
struct RetryState
{   attempt: usize
  , prompt: String
}

impl RetryState
{   fn new(
      prompt: String
    , policy: &RetryPolicy
    ) -> Self
    {   let prompt = match truncate_chars(
          &prompt
        , policy.max_prompt_chars
        , LENGTH_TRUNCATION_MARKER
        )
        {   Some(truncated) => {
              warn!(
                "Prompt is very long, truncating to {} characters",
                policy.max_prompt_chars
              );
              truncated
            }
          , None => prompt
        };
        RetryState
        {   attempt: 0
          , prompt
        }
    }

    /// Never grows the prompt: a prompt already at or under the
    /// limit is left alone.
    fn shrink_after_timeout(&mut self, policy: &RetryPolicy)
    {   if let Some(shorter) = truncate_chars(
          &self.prompt
        , policy.timeout_prompt_chars
        , TIMEOUT_TRUNCATION_MARKER
        )
        {   if shorter.len() < self.prompt.len()
            {   self.prompt = shorter;
                warn!(
                  "Prompt truncated to {} characters after timeout",
                  self.prompt.chars().count()
                );
            }
        }
    }
}

/// Run one generate call against `transport` under `policy`.
///
/// Success on any attempt returns at once. Exhausting every attempt
/// yields [`Error::GenerationFailed`] carrying the last failure text.
pub async fn generate_with_retry(
  transport: &dyn Transport
, model: &str
, prompt: String
, policy: &RetryPolicy
) -> crate::GenerationResult
{   let max_retries = policy.max_retries.max(1);
    let mut state = RetryState::new(prompt, policy);

    loop
    {   state.attempt += 1;
        debug!(
          "Attempt {}/{} for model {} ({} chars)",
          state.attempt,
          max_retries,
          model,
          state.prompt.chars().count()
        );

        let error = match transport
          .generate(model, &state.prompt)
          .await
        {   Ok(text) => {
              debug!("Attempt {} succeeded", state.attempt);
              return Ok(text);
            }
          , Err(e) => e
        };

        let message = error.to_string();
        warn!(
          "Attempt {}/{} failed: {}",
          state.attempt, max_retries, message
        );

        if state.attempt >= max_retries
        {   return Err(Error::GenerationFailed
            {   attempts: state.attempt
              , last_error: message
            });
        }

        match ErrorClass::of(&error)
        {   ErrorClass::Timeout => {
              warn!("Timeout detected, retrying with a shorter prompt");
              state.shrink_after_timeout(policy);
            }
          , ErrorClass::RateLimit => {
              let wait = policy.backoff_for_attempt(state.attempt);
              warn!(
                "Rate limit or quota exceeded, waiting {:?}",
                wait
              );
              tokio::time::sleep(wait).await;
            }
          , ErrorClass::Other => {
              if message.contains("Unknown field")
              {   warn!("Backend rejected a request parameter");
              }
            }
        }
    }
}
