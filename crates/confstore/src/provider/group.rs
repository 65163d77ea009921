//! First-match dispatch over an ordered list of providers.

use crate::codec::{Accept, Document};
use crate::error::{ConfStoreError, Result};
use crate::provider::Provider;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Ordered collection of providers.
///
/// For each call the first member whose [`Provider::is_valid`] accepts the path
/// handles it, and its result is returned as is. A failing member does not
/// hand over to a later one, even if that one would also accept the path:
/// local and remote classification are meant to be disjoint, and order only
/// breaks ties.
#[derive(Clone, Default)]
pub struct ProviderGroup {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderGroup {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Append a provider with the lowest precedence so far.
    pub fn with(mut self, provider: impl Provider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// The provider that would handle `path`.
    pub fn provider_for(&self, path: &str) -> Option<&dyn Provider> {
        self.providers
            .iter()
            .find(|provider| provider.is_valid(path))
            .map(|provider| provider.as_ref())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn select(&self, path: &str) -> Result<&dyn Provider> {
        let provider = self
            .provider_for(path)
            .ok_or_else(|| ConfStoreError::NoProvider {
                path: path.to_string(),
            })?;
        debug!("{} provider selected for {}", provider.name(), path);
        Ok(provider)
    }
}

impl fmt::Debug for ProviderGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

impl Provider for ProviderGroup {
    fn name(&self) -> &'static str {
        "group"
    }

    fn is_valid(&self, path: &str) -> bool {
        self.providers.iter().any(|provider| provider.is_valid(path))
    }

    fn load_with(&self, path: &str, accept: &mut Accept<'_>) -> Result<()> {
        self.select(path)?.load_with(path, accept)
    }

    fn save_document(&self, path: &str, document: &Document) -> Result<()> {
        self.select(path)?.save_document(path, document)
    }
}
