//! HTTP transport abstraction.
//!
//! The [`Transport`] trait is the only place the client touches the network:
//! one GET with a URL and flat query pairs, returning the decoded JSON body.
//! [`HttpTransport`] is the production implementation on top of `reqwest`;
//! tests substitute a recording mock.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl TransportError {
    /// HTTP status for non-2xx responses.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Issues GET requests and decodes JSON bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError> {
        (**self).get(url, query).await
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError> {
        tracing::debug!(url, params = query.len(), "GET");
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, message });
        }

        Ok(response.json().await?)
    }
}
