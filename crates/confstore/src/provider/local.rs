//! Local filesystem provider.

use crate::codec::{Accept, Codec, Document};
use crate::error::{ConfStoreError, Result};
use crate::path::{is_local_path, to_filesystem_path};
use crate::provider::Provider;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Reads and writes documents on the local filesystem.
///
/// Accepts plain paths and `file://` URIs. Saving creates missing parent
/// directories and truncates an existing file.
#[derive(Clone)]
pub struct LocalProvider {
    codec: Arc<dyn Codec>,
}

impl LocalProvider {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }
}

impl Provider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_valid(&self, path: &str) -> bool {
        is_local_path(path)
    }

    fn load_with(&self, path: &str, accept: &mut Accept<'_>) -> Result<()> {
        let fs_path = to_filesystem_path(path);
        let data = fs::read(&fs_path).map_err(|e| ConfStoreError::io(&fs_path, e))?;
        debug!("Read {} bytes from {:?}", data.len(), fs_path);

        self.codec.decode_with(&data, accept)?;
        Ok(())
    }

    fn save_document(&self, path: &str, document: &Document) -> Result<()> {
        let fs_path = to_filesystem_path(path);
        let data = self.codec.encode(document)?;

        if let Some(parent) = fs_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating directory {:?}", parent);
                fs::create_dir_all(parent).map_err(|e| ConfStoreError::io(parent, e))?;
            }
        }

        let mut file = fs::File::create(&fs_path).map_err(|e| ConfStoreError::io(&fs_path, e))?;
        file.write_all(&data)
            .map_err(|e| ConfStoreError::io(&fs_path, e))?;

        debug!("Wrote {} bytes to {:?}", data.len(), fs_path);
        Ok(())
    }
}
