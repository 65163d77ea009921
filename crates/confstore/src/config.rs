//! Configuration for providers and the facade.
//!
//! [`StoreConfig`] can be read from a TOML (or JSON) file:
//!
//! ```toml
//! format = "json"
//! pretty = true
//!
//! [network]
//! timeoutMs = 5000
//! userAgent = "my-app/1.0"
//!
//! [network.headers]
//! Content-Type = "application/json"
//! ```
//!
//! [`StoreOptions`] is the in-memory form consumed when building a provider
//! group. It is applied once and never mutated afterwards.

use crate::codec::{Codec, Format};
use crate::error::{ConfStoreError, Result};
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection timeout in milliseconds.
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// HTTP proxy URL.
    #[serde(default)]
    pub http_proxy: Option<String>,

    /// HTTPS proxy URL.
    #[serde(default)]
    pub https_proxy: Option<String>,

    /// Headers sent with every request.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: None,
            max_redirects: default_max_redirects(),
            user_agent: None,
            http_proxy: None,
            https_proxy: None,
            headers: IndexMap::new(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_redirects() -> u32 {
    10
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build a blocking HTTP client from this configuration.
    pub fn build_client(&self) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout())
            .redirect(reqwest::redirect::Policy::limited(
                self.max_redirects as usize,
            ));

        if let Some(ms) = self.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }

        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua);
        } else {
            builder = builder.user_agent(format!("confstore/{}", env!("CARGO_PKG_VERSION")));
        }

        if let Some(ref proxy_url) = self.http_proxy {
            let proxy = reqwest::Proxy::http(proxy_url)
                .map_err(|e| ConfStoreError::Client(format!("invalid HTTP proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        if let Some(ref proxy_url) = self.https_proxy {
            let proxy = reqwest::Proxy::https(proxy_url)
                .map_err(|e| ConfStoreError::Client(format!("invalid HTTPS proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        if !self.headers.is_empty() {
            builder = builder.default_headers(self.header_map()?);
        }

        builder
            .build()
            .map_err(|e| ConfStoreError::Client(e.to_string()))
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfStoreError::Client(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfStoreError::Client(format!("invalid value for {}: {}", name, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// File-backed store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Serialization format bound to every provider.
    #[serde(default)]
    pub format: Format,

    /// Pretty-print encoded output.
    #[serde(default)]
    pub pretty: bool,

    /// HTTP client settings.
    #[serde(default)]
    pub network: ClientConfig,
}

impl StoreConfig {
    /// Load configuration from a file path.
    ///
    /// `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfStoreError::io(path, e))?;

        let invalid = |message: String| ConfStoreError::Config {
            path: path.to_path_buf(),
            message,
        };

        if path.extension().is_some_and(|ext| ext == "json") {
            return serde_json::from_str(&content).map_err(|e| invalid(e.to_string()));
        }

        toml::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    /// Facade options equivalent to this configuration.
    pub fn to_options(&self) -> StoreOptions {
        StoreOptions::new()
            .with_client_config(self.network.clone())
            .with_codec_arc(self.format.codec(self.pretty))
    }
}

/// Options applied when building the default provider group.
#[derive(Clone, Default)]
pub struct StoreOptions {
    /// Configuration for the HTTP provider's client.
    pub client: Option<ClientConfig>,

    /// Prebuilt HTTP client; takes precedence over `client`.
    pub http_client: Option<reqwest::blocking::Client>,

    /// Codec bound to every provider instead of compact JSON.
    pub codec: Option<Arc<dyn Codec>>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client = Some(config);
        self
    }

    pub fn with_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_codec(self, codec: impl Codec + 'static) -> Self {
        self.with_codec_arc(Arc::new(codec))
    }

    pub fn with_codec_arc(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("client", &self.client)
            .field("http_client", &self.http_client.is_some())
            .field("codec", &self.codec.as_ref().map(|c| c.name()))
            .finish()
    }
}
