//! Backend adapters and the contract they share

pub mod google;
pub mod ollama;

use async_trait::async_trait;
use log::debug;

// Re-export for convenience
pub use google::{GoogleClient, GoogleTransport};
pub use ollama::{OllamaClient, OllamaTransport};

/// Raw transport to a generation backend. One request per call,
/// no retry; policy lives in [`crate::failover`].
#[async_trait]
pub trait Transport: Send + Sync
{   /// Generate text for `prompt` with `model`
    async fn generate(
      &self
    , model: &str
    , prompt: &str
    ) -> Result<String, crate::error::Error>;

    /// Fetch the backend's model catalog
    async fn list_models(&self)
      -> Result<Vec<String>, crate::error::Error>;
}

/// The contract every backend adapter exposes, so callers can swap
/// backends without branching on which one they hold.
#[async_trait]
pub trait ModelBackend: Send + Sync
{   /// Which model and backend this client is bound to
    fn handle(&self) -> &crate::ModelHandle;

    /// Generate text, absorbing transient failures behind the
    /// client's retry policy
    async fn generate(&self, prompt: String)
      -> crate::GenerationResult;

    /// Model catalog; degrades to a fixed list instead of failing
    async fn list_available_models(&self) -> Vec<String>;
}

/// Build the adapter for `handle` with default configuration.
/// `credential` is only consulted by backends that need one.
pub fn connect(
  handle: crate::ModelHandle
, credential: Option<String>
) -> Box<dyn ModelBackend>
{   connect_with_config(
      handle
    , credential
    , crate::config::ClientConfig::default()
    )
}

/// Build the adapter for `handle` with an explicit configuration
pub fn connect_with_config(
  handle: crate::ModelHandle
, credential: Option<String>
, config: crate::config::ClientConfig
) -> Box<dyn ModelBackend>
{   debug!(
      "Connecting {} model {}",
      handle.backend, handle.model
    );
    match handle.backend
    {   crate::Backend::Google => {
          Box::new(GoogleClient::with_config(
            handle.model, credential, config
          ))
        }
      , crate::Backend::Ollama => {
          Box::new(OllamaClient::with_config(
            handle.model, config
          ))
        }
    }
}
