use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, trace, error, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, GenerationConfig, SafetySetting};
use crate::error::Error;
use crate::failover::RetryPolicy;
use crate::providers::Transport;

const GOOGLE_API_BASE: &str
  = "https://generativelanguage.googleapis.com";

/// Upper bound on catalog pages followed in one listing
const MAX_CATALOG_PAGES: usize = 20;

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro-exp-03-25";

/// Catalog returned when the real one cannot be fetched
pub const FALLBACK_MODELS: [&str; 3] = [
  "gemini-2.5-pro-exp-03-25"
, "gemini-pro"
, "gemini-pro-vision"
];

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGenerationConfig
{   pub temperature: f32
  , pub top_p: f32
  , pub top_k: u32
  , pub max_output_tokens: u32
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: WireGenerationConfig
  , pub safety_settings: Vec<SafetySetting>
}

impl GenerateContentRequest
{   /// Single-turn request carrying the client's fixed knobs
    pub fn new(prompt: &str, config: &GenerationConfig) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![Part { text: prompt.to_string() }]
              }
            ]
          , generation_config: WireGenerationConfig
            {   temperature: config.temperature
              , top_p: config.top_p
              , top_k: config.top_k
              , max_output_tokens: config.max_output_tokens
            }
          , safety_settings: config.safety_settings.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
  , #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>
}

impl GenerateContentResponse
{   /// Concatenated text of the first candidate
    pub fn into_text(self) -> Result<String, Error>
    {   let candidate = match self.candidates.into_iter().next()
        {   Some(c) => c
          , None => {
              if let Some(reason) = self.prompt_feedback
                .and_then(|f| f.block_reason)
              {   error!("Prompt blocked: {}", reason);
                  return Err(Error::Other(
                    format!("Prompt blocked by safety filter: {}", reason)
                  ));
              }
              return Err(Error::EmptyResponse);
            }
        };

        let text: String = candidate.content
          .map(|c| c.parts.into_iter().map(|p| p.text).collect())
          .unwrap_or_default();

        if text.is_empty()
        {   warn!(
              "Empty candidate, finish reason: {:?}",
              candidate.finish_reason
            );
            return Err(Error::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback
{   #[serde(default)]
    pub block_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse
{   #[serde(default)]
    pub models: Vec<ModelData>
  , #[serde(default)]
    pub next_page_token: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelData
{   pub name: String
}

/// Strip the `models/` style prefix from a catalog name
pub fn short_model_name(name: &str) -> &str
{   name.rsplit('/').next().unwrap_or(name)
}

/// Move [`DEFAULT_MODEL`] to the front of `models` if present
pub fn promote_default_model(mut models: Vec<String>) -> Vec<String>
{   if let Some(pos) = models.iter().position(|m| m == DEFAULT_MODEL)
    {   let model = models.remove(pos);
        models.insert(0, model);
    }
    models
}

// ===== HTTP Transport =====

/// HTTP transport to Google AI Studio
pub struct GoogleTransport
{   api_key: Option<String>
  , api_base: String
  , generation: GenerationConfig
  , http_client: reqwest::Client
}

impl GoogleTransport
{   pub fn new(
      api_key: Option<String>
    , config: &ClientConfig
    ) -> Self
    {   debug!("Creating GoogleTransport");
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.provider.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().unwrap_or_else(|e| {
          warn!("Falling back to default HTTP client: {}", e);
          reqwest::Client::new()
        });

        GoogleTransport
        {   api_key
          , api_base: config.provider.api_base.clone()
              .unwrap_or_else(|| GOOGLE_API_BASE.to_string())
              .trim_end_matches('/')
              .to_string()
          , generation: config.generation.clone()
          , http_client
        }
    }

    fn api_key(&self) -> Result<&str, Error>
    {   self.api_key.as_deref().ok_or_else(|| {
          error!("No Google API key");
          Error::Configuration(
            "Google API key not found".to_string()
          )
        })
    }

    async fn error_from_response(response: reqwest::Response) -> Error
    {   let status = response.status().as_u16();
        let message = response.text().await
          .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Google API error {}: {}", status, message);
        Error::Api { status, message }
    }
}

#[async_trait]
impl Transport for GoogleTransport
{   async fn generate(
      &self
    , model: &str
    , prompt: &str
    ) -> Result<String, Error>
    {   let api_key = self.api_key()?;
        let request = GenerateContentRequest::new(
          prompt, &self.generation
        );
        trace!("Google request: {:?}", request);

        let response = self.http_client
          .post(format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, model
          ))
          .header("x-goog-api-key", api_key)
          .json(&request)
          .send()
          .await?;

        trace!("Google response status: {}", response.status());
        if !response.status().is_success()
        {   return Err(Self::error_from_response(response).await);
        }

        let body: GenerateContentResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::Parse(e.to_string())
          })?;
        body.into_text()
    }

    async fn list_models(&self) -> Result<Vec<String>, Error>
    {   let api_key = self.api_key()?;
        let mut models = vec![];
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_CATALOG_PAGES
        {   let mut request = self.http_client
              .get(format!("{}/v1beta/models", self.api_base))
              .header("x-goog-api-key", api_key);
            if let Some(token) = &page_token
            {   request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            if !response.status().is_success()
            {   return Err(Self::error_from_response(response).await);
            }

            let body: ModelsResponse
              = response.json().await.map_err(|e| {
                Error::Parse(e.to_string())
              })?;
            trace!(
              "Catalog page {} had {} models",
              page, body.models.len()
            );
            models.extend(
              body.models
                .iter()
                .map(|m| short_model_name(&m.name).to_string())
            );

            page_token = body.next_page_token
              .filter(|token| !token.is_empty());
            if page_token.is_none()
            {   return Ok(models);
            }
        }

        warn!(
          "Catalog still paging after {} pages, keeping {} models",
          MAX_CATALOG_PAGES, models.len()
        );
        Ok(models)
    }
}

// ===== Client =====

/// Cloud backend adapter. Refuses to generate without a credential.
pub struct GoogleClient
{   handle: crate::ModelHandle
  , credential: Option<String>
  , policy: RetryPolicy
  , transport: Arc<dyn Transport>
}

impl GoogleClient
{   /// Client with default configuration
    pub fn new(
      model: impl Into<String>
    , credential: Option<String>
    ) -> Self
    {   GoogleClient::with_config(
          model, credential, ClientConfig::default()
        )
    }

    pub fn with_config(
      model: impl Into<String>
    , credential: Option<String>
    , config: ClientConfig
    ) -> Self
    {   let transport = GoogleTransport::new(
          credential.clone(), &config
        );
        GoogleClient::with_transport(
          model
        , credential
        , RetryPolicy::from(&config.retry)
        , Arc::new(transport)
        )
    }

    /// Client over any transport; used to inject a scripted backend
    pub fn with_transport(
      model: impl Into<String>
    , credential: Option<String>
    , policy: RetryPolicy
    , transport: Arc<dyn Transport>
    ) -> Self
    {   let credential = credential.filter(|k| !k.trim().is_empty());
        GoogleClient
        {   handle: crate::ModelHandle::new(
              crate::Backend::Google, model
            )
          , credential
          , policy
          , transport
        }
    }

    pub fn has_credential(&self) -> bool
    {   self.credential.is_some()
    }

    fn fallback_models() -> Vec<String>
    {   FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
    }
}

#[async_trait]
impl crate::providers::ModelBackend for GoogleClient
{   fn handle(&self) -> &crate::ModelHandle
    {   &self.handle
    }

    async fn generate(&self, prompt: String)
      -> crate::GenerationResult
    {   if !self.has_credential()
        {   error!("Refusing to call Google AI without an API key");
            return Err(Error::Configuration(
              "Google API key not found. Please set the \
               GOOGLE_API_KEY environment variable.".to_string()
            ));
        }
        crate::failover::generate_with_retry(
          self.transport.as_ref()
        , &self.handle.model
        , prompt
        , &self.policy
        ).await
    }

    async fn list_available_models(&self) -> Vec<String>
    {   if !self.has_credential()
        {   debug!("No Google API key, using fallback models");
            return GoogleClient::fallback_models();
        }
        match self.transport.list_models().await
        {   Ok(models) if !models.is_empty() => {
              debug!("Retrieved {} Google models", models.len());
              models
            }
          , Ok(_) => {
              warn!("Google catalog was empty, using fallback models");
              GoogleClient::fallback_models()
            }
          , Err(e) => {
              let e = Error::CatalogUnavailable(e.to_string());
              warn!("{}", e);
              GoogleClient::fallback_models()
            }
        }
    }
}
