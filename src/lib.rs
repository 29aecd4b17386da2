pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod failover;
pub mod prompts;
pub mod agents;
pub mod pipeline;

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

pub use error::Error;
pub use providers::{connect, ModelBackend, Transport};

/*

interview-prep: a resilient model client plus the three-step pipeline
that drives it (company research -> role analysis -> questions).

interview-prep/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Backend selector, ModelHandle, re-exports
│   ├── main.rs         # Command line front end
│   ├── error.rs        # Error type shared by every layer
│   ├── config.rs       # Sampling, safety, transport and retry settings
│   ├── failover.rs     # Truncation, classification and retry loop
│   ├── providers/
│   │   ├── mod.rs      # Transport + ModelBackend traits, connect()
│   │   ├── google.rs   # Google AI Studio (credential gated)
│   │   └── ollama.rs   # Local Ollama daemon
│   ├── prompts.rs      # Prompt templates
│   ├── agents.rs       # Research and interview agents
│   ├── request.rs      # Interview request / guide types
│   └── pipeline.rs     # research -> analysis -> questions, with fallback
└── tests/

*/

/// Outcome of one generate call: text, or the terminal failure
pub type GenerationResult = Result<String, crate::error::Error>;

/// Backend adapters the client can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
pub enum Backend
{   /// Google AI Studio (Gemini models), needs an API key
    Google
  , /// Local Ollama daemon
    Ollama
}

impl Backend
{   /// Model picked when the caller names none
    pub fn default_model(&self) -> &'static str
    {   match self
        {   Backend::Google => providers::google::DEFAULT_MODEL
          , Backend::Ollama => providers::ollama::DEFAULT_MODEL
        }
    }

    /// Whether generate refuses to run without a credential
    pub fn requires_credential(&self) -> bool
    {   matches!(self, Backend::Google)
    }
}

impl fmt::Display for Backend
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   Backend::Google => write!(f, "google")
          , Backend::Ollama => write!(f, "ollama")
        }
    }
}

impl FromStr for Backend
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_lowercase().as_str()
        {   "google" => Ok(Backend::Google)
          , "ollama" => Ok(Backend::Ollama)
          , _ => Err(crate::error::Error::UnsupportedBackend(
              s.to_string()
            ))
        }
    }
}

/// Which model, on which backend, a client targets
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Hash)]
pub struct ModelHandle
{   pub backend: Backend
  , pub model: String
}

impl ModelHandle
{   pub fn new(backend: Backend, model: impl Into<String>) -> Self
    {   ModelHandle
        {   backend
          , model: model.into()
        }
    }

    /// Handle for the backend's default model
    pub fn default_for(backend: Backend) -> Self
    {   ModelHandle::new(backend, backend.default_model())
    }
}

impl fmt::Display for ModelHandle
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "{}:{}", self.backend, self.model)
    }
}
