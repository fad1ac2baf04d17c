//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Optional request timeout and a fixed User-Agent
//! - A single attempt per request; failures surface immediately
//! - Status code mapping into transfer errors

use super::PageSource;
use crate::error::{ConfigError, TransferError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("kernup/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings (no timeout)
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(None, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Option<Duration>, user_agent: &str) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::HttpClient {
            message: e.to_string(),
        })?;

        Ok(Self { client, timeout })
    }

    /// Create a client with the default User-Agent and the given timeout
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ConfigError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Perform a GET request
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, TransferError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransferError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransferError::request(url, e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(TransferError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    /// Perform a GET request and read the body as text
    pub async fn get_text(&self, url: &str) -> Result<String, TransferError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransferError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransferError::request(url, format!("failed to read response body: {}", e))
            }
        })
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String, TransferError> {
        self.get_text(url).await
    }
}
