//! Path classification.
//!
//! Pure predicates deciding whether a path string names a local file or a
//! remote HTTP(S) resource. Nothing here touches the filesystem or network.
//!
//! Supported forms:
//! - Local path: `config.json`, `./conf/app.toml`, `/etc/app/config.json`
//! - File URI: `file:///etc/app/config.json`
//! - HTTP/HTTPS: `https://config.example.com/app.json` (scheme is case-insensitive)
//!
//! # Known limitation
//!
//! Any string that does not parse with a scheme is treated as local. UNC-style
//! paths such as `\\server\share\config.json` therefore classify as local even
//! though they address a network share.

use std::path::{Path, PathBuf};
use url::Url;

/// Check whether `path` is an `http` or `https` URL with a host.
///
/// `http://` without a host is not remote.
pub fn is_remote_url(path: &str) -> bool {
    let Ok(url) = Url::parse(path) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https") && has_authority(path) && has_host(&url)
}

/// Check whether `path` names a local file.
///
/// Empty strings are never local. Absolute paths are always local. A string
/// that parses with a scheme is local only when the scheme is `file`; any
/// other scheme, recognised or not, is not local. Everything else is treated
/// as a relative local path.
pub fn is_local_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if Path::new(path).is_absolute() {
        return true;
    }
    match Url::parse(path) {
        Ok(url) => url.scheme() == "file",
        Err(_) => true,
    }
}

/// Resolve a `file://` URI to a filesystem path.
///
/// Paths without the `file` scheme are returned unchanged.
pub fn to_filesystem_path(path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        return PathBuf::from(path);
    }
    match Url::parse(path) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(url.path())),
        _ => PathBuf::from(path),
    }
}

// WHATWG parsing invents a host for `http:example.com` and `http:///a.json`
// from the path. Only a non-empty authority written after `//` counts.
fn has_authority(path: &str) -> bool {
    path.split_once(':')
        .and_then(|(_, rest)| rest.strip_prefix("//"))
        .is_some_and(|rest| {
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            end > 0
        })
}

fn has_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| !host.is_empty())
}
