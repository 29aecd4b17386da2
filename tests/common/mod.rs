//! Scripted transport shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use interview_prep::error::Error;
use interview_prep::failover::RetryPolicy;
use interview_prep::Transport;

/// Replays queued results; once the queue is empty every call
/// gets `exhausted`.
pub struct ScriptedTransport
{   script: Mutex<VecDeque<Result<String, Error>>>
  , exhausted: Result<String, Error>
  , catalog: Result<Vec<String>, Error>
  , prompts: Mutex<Vec<String>>
  , catalog_calls: Mutex<usize>
}

impl ScriptedTransport
{   pub fn new(
      script: Vec<Result<String, Error>>
    , exhausted: Result<String, Error>
    ) -> Arc<Self>
    {   Arc::new(ScriptedTransport
        {   script: Mutex::new(script.into())
          , exhausted
          , catalog: Err(Error::Http("connection refused".to_string()))
          , prompts: Mutex::new(vec![])
          , catalog_calls: Mutex::new(0)
        })
    }

    pub fn always(result: Result<String, Error>) -> Arc<Self>
    {   ScriptedTransport::new(vec![], result)
    }

    pub fn with_catalog(
      catalog: Result<Vec<String>, Error>
    ) -> Arc<Self>
    {   Arc::new(ScriptedTransport
        {   script: Mutex::new(VecDeque::new())
          , exhausted: Ok(String::new())
          , catalog
          , prompts: Mutex::new(vec![])
          , catalog_calls: Mutex::new(0)
        })
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String>
    {   self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize
    {   self.prompts.lock().unwrap().len()
    }

    pub fn catalog_calls(&self) -> usize
    {   *self.catalog_calls.lock().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport
{   async fn generate(
      &self
    , _model: &str
    , prompt: &str
    ) -> Result<String, Error>
    {   self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.exhausted.clone())
    }

    async fn list_models(&self) -> Result<Vec<String>, Error>
    {   *self.catalog_calls.lock().unwrap() += 1;
        self.catalog.clone()
    }
}

/// Three attempts, 1ms backoff unit
pub fn fast_policy() -> RetryPolicy
{   RetryPolicy::new(3, 1)
}

pub fn timeout_error() -> Error
{   Error::Api
    {   status: 504
      , message: "Deadline Exceeded".to_string()
    }
}

pub fn rate_limit_error() -> Error
{   Error::Api
    {   status: 429
      , message: "Resource has been exhausted (e.g. check quota).".to_string()
    }
}

/// Minimal HTTP server answering GET requests with canned JSON, keyed
/// by request target. Returns its base URL and the targets requested.
pub async fn serve_json(
  routes: Vec<(String, String)>
) -> (String, Arc<Mutex<Vec<String>>>)
{   let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(vec![]));
    let seen_by_server = seen.clone();

    tokio::spawn(async move {
      loop
      {   let (mut socket, _) = match listener.accept().await
          {   Ok(conn) => conn
            , Err(_) => return
          };

          let mut request = Vec::new();
          let mut chunk = [0u8; 1024];
          loop
          {   let n = socket.read(&mut chunk).await.unwrap_or(0);
              if n == 0
              {   break;
              }
              request.extend_from_slice(&chunk[..n]);
              if request.windows(4).any(|w| w == b"\r\n\r\n")
              {   break;
              }
          }

          let target = String::from_utf8_lossy(&request)
            .split_whitespace()
            .nth(1)
            .unwrap_or("")
            .to_string();
          seen_by_server.lock().unwrap().push(target.clone());

          let (status, body) = routes
            .iter()
            .find(|(route, _)| *route == target)
            .map(|(_, body)| ("200 OK", body.clone()))
            .unwrap_or(("404 Not Found", "{}".to_string()));
          let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status, body.len(), body
          );
          let _ = socket.write_all(response.as_bytes()).await;
          let _ = socket.shutdown().await;
      }
    });

    (base, seen)
}
