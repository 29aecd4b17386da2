use std::fmt;

/// Error type for model client operations
/// Implements Clone so results can be compared and replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Client is missing something it needs before any call (credential)
    Configuration(String)
  , /// Every retry attempt failed
    GenerationFailed
    {   attempts: usize
      , last_error: String
    }
  , /// Model catalog could not be fetched
    CatalogUnavailable(String)
  , /// Backend name not recognised
    UnsupportedBackend(String)
  , /// HTTP transport error
    Http(String)
  , /// Backend answered with a non-success status
    Api
    {   status: u16
      , message: String
    }
  , /// Failed to parse a backend response
    Parse(String)
  , /// Backend answered but produced no text
    EmptyResponse
  , /// Request timed out
    Timeout
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Configuration(msg) => {
              write!(f, "Configuration error: {}", msg)
            }
          , Error::GenerationFailed { attempts, last_error } => {
              write!(f,
                "Could not generate response after {} attempts. \
                 Last error: {}",
                attempts, last_error
              )
            }
          , Error::CatalogUnavailable(msg) => {
              write!(f, "Model catalog unavailable: {}", msg)
            }
          , Error::UnsupportedBackend(name) => {
              write!(f, "Unsupported model provider: {}", name)
            }
          , Error::Http(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::Api { status, message } => {
              write!(f, "API error {}: {}", status, message)
            }
          , Error::Parse(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::EmptyResponse => {
              write!(f, "API response contained no text")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::Http(e.to_string())
        }
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
