//! Load and save typed configuration from local files or HTTP(S) endpoints.
//!
//! # Usage
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct AppConfig {
//!     name: String,
//! }
//!
//! # fn main() -> confstore::Result<()> {
//! let config: AppConfig = confstore::load("https://config.example.com/app.json")?;
//! confstore::save("/etc/app/config.json", &config)?;
//! # Ok(())
//! # }
//! ```
//!
//! The default group checks the HTTP provider before the local one and binds
//! both to compact JSON. Use [`StoreOptions`] with [`load_with`]/[`save_with`]
//! to swap the codec or the HTTP client.

pub mod codec;
pub mod config;
pub mod error;
pub mod path;
pub mod provider;

pub use codec::{Codec, CodecExt, CodecGroup, Document, Format, JsonCodec, TomlCodec};
pub use config::{ClientConfig, StoreConfig, StoreOptions};
pub use error::{CodecError, ConfStoreError, Result};
pub use provider::{HttpProvider, LocalProvider, Provider, ProviderExt, ProviderGroup};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Build a fresh provider group with the default options.
pub fn default_provider() -> Result<ProviderGroup> {
    provider_group(StoreOptions::default())
}

/// Build a provider group: HTTP first, then local, both bound to the same codec.
pub fn provider_group(options: StoreOptions) -> Result<ProviderGroup> {
    let StoreOptions {
        client,
        http_client,
        codec,
    } = options;

    let codec: Arc<dyn Codec> = codec.unwrap_or_else(|| Arc::new(JsonCodec::new()));

    let http = match (http_client, client) {
        (Some(http_client), _) => HttpProvider::with_client(Arc::clone(&codec), http_client),
        (None, Some(config)) => HttpProvider::with_config(Arc::clone(&codec), &config)?,
        (None, None) => HttpProvider::new(Arc::clone(&codec))?,
    };

    Ok(ProviderGroup::default()
        .with(http)
        .with(LocalProvider::new(codec)))
}

/// Load the configuration at `path`.
pub fn load<T: DeserializeOwned>(path: &str) -> Result<T> {
    default_provider()?.load(path)
}

/// Save `value` to `path`.
pub fn save<T: Serialize + ?Sized>(path: &str, value: &T) -> Result<()> {
    default_provider()?.save(path, value)
}

/// Load the configuration at `path` with custom options.
pub fn load_with<T: DeserializeOwned>(path: &str, options: StoreOptions) -> Result<T> {
    provider_group(options)?.load(path)
}

/// Save `value` to `path` with custom options.
pub fn save_with<T: Serialize + ?Sized>(path: &str, value: &T, options: StoreOptions) -> Result<()> {
    provider_group(options)?.save(path, value)
}
