//! Asset path resolution module
//!
//! Turns untrusted `{folder}/{file}` URL segments into a path that is
//! guaranteed to be a regular file inside an asset root.

use std::io;
use std::path::{Path, PathBuf};

/// Asset fetch failure, each variant maps to one HTTP status
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Segment is not a single plain path component (400)
    #[error("invalid path segment: {0:?}")]
    BadRequest(String),
    /// Resolved path escapes the asset root (403)
    #[error("path escapes asset root: {}", .0.display())]
    Forbidden(PathBuf),
    /// Nothing servable at the resolved path (404)
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The asset root itself cannot be resolved (500)
    #[error("asset root '{}' unavailable: {source}", path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading a resolved file failed (500)
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    pub const fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::RootUnavailable { .. } | Self::Io { .. } => 500,
        }
    }
}

/// Which file a fetch request addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// The file named in the request
    Verbatim,
    /// The `.mtl` material next to the named model file
    Material,
}

impl FetchKind {
    /// File name actually looked up for a requested name
    pub fn target_name(self, filename: &str) -> String {
        match self {
            Self::Verbatim => filename.to_string(),
            Self::Material => material_name(filename),
        }
    }
}

/// Swap the extension of `filename` for `.mtl` (`statue.glb` -> `statue.mtl`)
pub fn material_name(filename: &str) -> String {
    Path::new(filename)
        .with_extension("mtl")
        .to_string_lossy()
        .into_owned()
}

/// Percent-decode one URL segment and check it is a single plain component
pub fn decode_segment(raw: &str) -> Result<String, AssetError> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| AssetError::BadRequest(raw.to_string()))?
        .into_owned();

    let plain = !decoded.is_empty()
        && decoded != "."
        && !decoded.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
        && !Path::new(&decoded).is_absolute();
    if plain {
        Ok(decoded)
    } else {
        Err(AssetError::BadRequest(decoded))
    }
}

/// Resolve `root/folder/filename` to a regular file inside `root`.
///
/// The joined path is canonicalized (following `..` and symlinks) and must
/// still start with the canonical root.
pub async fn resolve(root: &Path, folder: &str, filename: &str) -> Result<PathBuf, AssetError> {
    let canonical_root =
        tokio::fs::canonicalize(root)
            .await
            .map_err(|source| AssetError::RootUnavailable {
                path: root.to_path_buf(),
                source,
            })?;

    let candidate = root.join(folder).join(filename);
    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AssetError::NotFound(candidate));
        }
        Err(source) => {
            return Err(AssetError::Io {
                path: candidate,
                source,
            })
        }
    };

    if !canonical.starts_with(&canonical_root) {
        return Err(AssetError::Forbidden(canonical));
    }

    match tokio::fs::metadata(&canonical).await {
        Ok(m) if m.is_file() => Ok(canonical),
        Ok(_) => Err(AssetError::NotFound(candidate)),
        Err(source) => Err(AssetError::Io {
            path: canonical,
            source,
        }),
    }
}
