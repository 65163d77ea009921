//! Storage backends.
//!
//! A [`Provider`] fetches and stores the raw bytes of a configuration document
//! for the paths it recognises, and runs them through the [`Codec`] it is bound
//! to. Two backends exist:
//!
//! - [`LocalProvider`]: local files and `file://` URIs
//! - [`HttpProvider`]: `http://` and `https://` URLs (GET to load, POST to save)
//!
//! [`ProviderGroup`] dispatches a path to the first member that claims it.
//!
//! [`Codec`]: crate::codec::Codec

pub mod group;
pub mod http;
pub mod local;

pub use group::ProviderGroup;
pub use http::HttpProvider;
pub use local::LocalProvider;

use crate::codec::{Accept, Document};
use crate::error::{CodecError, ConfStoreError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A backend that can load and save documents for the paths it accepts.
///
/// # Contract
///
/// - **`is_valid(path)`**: pure classification of the path text; no I/O.
/// - **`load_with(path, accept)`**: reads the bytes at `path`, decodes them with
///   the bound codec and hands the document to `accept`.
/// - **`save_document(path, document)`**: encodes first, so a codec failure is
///   reported before any storage is touched, then writes the bytes.
///
/// Implementations hold no mutable state and may be shared across threads.
pub trait Provider: Send + Sync {
    /// Short backend name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Check whether this provider handles `path`.
    fn is_valid(&self, path: &str) -> bool;

    /// Load the document at `path` and pass it to `accept`.
    fn load_with(&self, path: &str, accept: &mut Accept<'_>) -> Result<()>;

    /// Store `document` at `path`.
    fn save_document(&self, path: &str, document: &Document) -> Result<()>;
}

/// Typed load/save on top of [`Provider`].
pub trait ProviderExt: Provider {
    /// Load the document at `path` as a value of type `T`.
    fn load<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut loaded = None;
        self.load_with(path, &mut |document: Document| -> std::result::Result<(), CodecError> {
            loaded = Some(serde_json::from_value::<T>(document)?);
            Ok(())
        })?;
        loaded.ok_or(ConfStoreError::Codec(CodecError::Exhausted("decode")))
    }

    /// Load the document at `path` without converting it.
    fn load_document(&self, path: &str) -> Result<Document> {
        self.load(path)
    }

    /// Save a serializable value to `path`.
    fn save<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<()> {
        let document = serde_json::to_value(value).map_err(CodecError::from)?;
        self.save_document(path, &document)
    }
}

impl<P: Provider + ?Sized> ProviderExt for P {}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_valid(&self, path: &str) -> bool {
        (**self).is_valid(path)
    }

    fn load_with(&self, path: &str, accept: &mut Accept<'_>) -> Result<()> {
        (**self).load_with(path, accept)
    }

    fn save_document(&self, path: &str, document: &Document) -> Result<()> {
        (**self).save_document(path, document)
    }
}
