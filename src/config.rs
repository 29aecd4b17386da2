//! Configuration for model clients: sampling, safety, transport and retry

use serde::{Deserialize, Serialize};

/// Content-safety category understood by the cloud backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory
{   #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment
  , #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech
  , #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit
  , #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent
}

impl HarmCategory
{   /// Every category, in the order they are sent
    pub const ALL: [HarmCategory; 4] = [
      HarmCategory::Harassment
    , HarmCategory::HateSpeech
    , HarmCategory::SexuallyExplicit
    , HarmCategory::DangerousContent
    ];
}

/// Level at which the backend blocks a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmBlockThreshold
{   #[serde(rename = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove
  , #[serde(rename = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove
  , #[serde(rename = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh
  , #[serde(rename = "BLOCK_NONE")]
    BlockNone
}

/// One category/threshold pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting
{   pub category: HarmCategory
  , pub threshold: HarmBlockThreshold
}

/// Sampling parameters and safety thresholds applied to every call
/// made by one client. Never mutated once the client is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig
{   /// Sampling temperature
    pub temperature: f32
  , /// Nucleus-sampling threshold
    pub top_p: f32
  , /// Top-k cutoff
    pub top_k: u32
  , /// Maximum output length in tokens
    pub max_output_tokens: u32
  , /// Per-category safety thresholds
    pub safety_settings: Vec<SafetySetting>
}

impl Default for GenerationConfig
{   fn default() -> Self
    {   GenerationConfig
        {   temperature: 0.7
          , top_p: 0.95
          , top_k: 40
          , max_output_tokens: 8192
          , safety_settings: HarmCategory::ALL
              .iter()
              .map(|category| SafetySetting
              {   category: *category
                , threshold: HarmBlockThreshold::BlockMediumAndAbove
              })
              .collect()
        }
    }
}

/// Transport configuration for one backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig
{   /// API base URL (if custom)
    pub api_base: Option<String>
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

/// Retry and truncation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig
{   /// Max attempts per generate call
    pub max_retries: usize
  , /// Rate-limit backoff unit in milliseconds, multiplied by attempt
    pub backoff_unit_ms: u64
  , /// Pre-flight prompt limit in characters
    pub max_prompt_chars: usize
  , /// Prompt limit applied after a timeout, in characters
    pub timeout_prompt_chars: usize
}

impl Default for RetryConfig
{   fn default() -> Self
    {   RetryConfig
        {   max_retries: 3
          , backoff_unit_ms: 5_000
          , max_prompt_chars: 30_000
          , timeout_prompt_chars: 15_000
        }
    }
}

/// Full client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig
{   /// Transport settings
    pub provider: ProviderConfig
  , /// Sampling and safety
    pub generation: GenerationConfig
  , /// Retry policy
    pub retry: RetryConfig
}
