use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, trace, error, warn};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::failover::RetryPolicy;
use crate::providers::Transport;

const OLLAMA_API_BASE: &str = "http://localhost:11434";

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "llama3";

/// Catalog returned when the daemon cannot be reached
pub const FALLBACK_MODELS: [&str; 4] = [
  "llama3"
, "mistral"
, "gemma"
, "codellama"
];

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize)]
pub struct OllamaGenerateRequest<'a>
{   pub model: &'a str
  , pub prompt: &'a str
  , pub stream: bool
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaGenerateResponse
{   #[serde(default)]
    pub response: String
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse
{   #[serde(default)]
    pub models: Vec<OllamaModel>
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel
{   pub name: String
}

// ===== HTTP Transport =====

/// HTTP transport to a local Ollama daemon. No credential.
pub struct OllamaTransport
{   api_base: String
  , http_client: reqwest::Client
}

impl OllamaTransport
{   pub fn new(config: &ClientConfig) -> Self
    {   debug!("Creating OllamaTransport");
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.provider.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().unwrap_or_else(|e| {
          warn!("Falling back to default HTTP client: {}", e);
          reqwest::Client::new()
        });

        OllamaTransport
        {   api_base: config.provider.api_base.clone()
              .unwrap_or_else(|| OLLAMA_API_BASE.to_string())
              .trim_end_matches('/')
              .to_string()
          , http_client
        }
    }
}

#[async_trait]
impl Transport for OllamaTransport
{   async fn generate(
      &self
    , model: &str
    , prompt: &str
    ) -> Result<String, Error>
    {   let request = OllamaGenerateRequest
        {   model
          , prompt
          , stream: false
        };
        trace!("Ollama request for model {}", model);

        let response = self.http_client
          .post(format!("{}/api/generate", self.api_base))
          .json(&request)
          .send()
          .await?;

        let status = response.status();
        if !status.is_success()
        {   let message = response.text().await
              .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Ollama error {}: {}", status, message);
            return Err(Error::Api
            {   status: status.as_u16()
              , message
            });
        }

        let body: OllamaGenerateResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::Parse(e.to_string())
          })?;
        Ok(body.response)
    }

    async fn list_models(&self) -> Result<Vec<String>, Error>
    {   let response = self.http_client
          .get(format!("{}/api/tags", self.api_base))
          .send()
          .await?;

        let status = response.status();
        if !status.is_success()
        {   return Err(Error::Api
            {   status: status.as_u16()
              , message: response.text().await.unwrap_or_default()
            });
        }

        let body: OllamaTagsResponse
          = response.json().await.map_err(|e| {
            Error::Parse(e.to_string())
          })?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }
}

// ===== Client =====

/// Local daemon adapter
pub struct OllamaClient
{   handle: crate::ModelHandle
  , policy: RetryPolicy
  , transport: Arc<dyn Transport>
}

impl OllamaClient
{   pub fn new(model: impl Into<String>) -> Self
    {   OllamaClient::with_config(model, ClientConfig::default())
    }

    pub fn with_config(
      model: impl Into<String>
    , config: ClientConfig
    ) -> Self
    {   let transport = OllamaTransport::new(&config);
        OllamaClient::with_transport(
          model
        , RetryPolicy::from(&config.retry)
        , Arc::new(transport)
        )
    }

    /// Client over any transport; used to inject a scripted backend
    pub fn with_transport(
      model: impl Into<String>
    , policy: RetryPolicy
    , transport: Arc<dyn Transport>
    ) -> Self
    {   OllamaClient
        {   handle: crate::ModelHandle::new(
              crate::Backend::Ollama, model
            )
          , policy
          , transport
        }
    }
}

#[async_trait]
impl crate::providers::ModelBackend for OllamaClient
{   fn handle(&self) -> &crate::ModelHandle
    {   &self.handle
    }

    async fn generate(&self, prompt: String)
      -> crate::GenerationResult
    {   crate::failover::generate_with_retry(
          self.transport.as_ref()
        , &self.handle.model
        , prompt
        , &self.policy
        ).await
    }

    async fn list_available_models(&self) -> Vec<String>
    {   match self.transport.list_models().await
        {   Ok(models) => {
              debug!("Retrieved {} Ollama models", models.len());
              models
            }
          , Err(e) => {
              let e = Error::CatalogUnavailable(e.to_string());
              warn!("{}", e);
              FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
            }
        }
    }
}
