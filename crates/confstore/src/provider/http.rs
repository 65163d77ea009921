//! HTTP/HTTPS provider.

use crate::codec::{Accept, Codec, Document};
use crate::config::ClientConfig;
use crate::error::{ConfStoreError, Result};
use crate::path::is_remote_url;
use crate::provider::Provider;
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads documents with `GET` and saves them with `POST`.
///
/// Any status outside 2xx fails with [`ConfStoreError::Status`] carrying the
/// code and body text; the body is never decoded in that case. Requests are
/// bounded by the client timeout (30 seconds unless configured otherwise).
#[derive(Clone)]
pub struct HttpProvider {
    codec: Arc<dyn Codec>,
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    /// Create a provider with the default client configuration.
    pub fn new(codec: Arc<dyn Codec>) -> Result<Self> {
        Self::with_config(codec, &ClientConfig::default())
    }

    /// Create a provider whose client is built from `config`.
    pub fn with_config(codec: Arc<dyn Codec>, config: &ClientConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self::with_client(codec, client))
    }

    /// Create a provider using a prebuilt client.
    pub fn with_client(codec: Arc<dyn Codec>, client: reqwest::blocking::Client) -> Self {
        Self { codec, client }
    }

    fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ConfStoreError {
        ConfStoreError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

impl Provider for HttpProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    fn is_valid(&self, path: &str) -> bool {
        is_remote_url(path)
    }

    fn load_with(&self, path: &str, accept: &mut Accept<'_>) -> Result<()> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(path)
            .send()
            .map_err(|e| ConfStoreError::transport(path, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| ConfStoreError::transport(path, e))?;

        if !status.is_success() {
            warn!("GET {} returned {}", path, status);
            return Err(Self::status_error(status, &body));
        }

        debug!("GET {} returned {} bytes", path, body.len());
        self.codec.decode_with(&body, accept)?;
        Ok(())
    }

    fn save_document(&self, path: &str, document: &Document) -> Result<()> {
        let data = self.codec.encode(document)?;

        debug!("POST {} ({} bytes)", path, data.len());
        let response = self
            .client
            .post(path)
            .body(data)
            .send()
            .map_err(|e| ConfStoreError::transport(path, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("POST {} returned {}", path, status);
            let body = response.bytes().unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        Ok(())
    }
}
