//! QR artifact store.
//!
//! Every live access code has exactly one companion artifact: a PNG of the
//! QR-encoded code, named `<code>.png` under the static-serving root so the
//! web collaborator can hand it to the customer. The store creates parent
//! directories on demand and marks written files world-readable so the
//! static file host can serve them.
//!
//! Removal is strictly best-effort. A missing file is logged and reported as
//! `false`, never as an error — retirement of the database record must not
//! be blocked by artifact cleanup.

use cellkey_core::AccessCode;
use image::Luma;
use qrcode::QrCode;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while rendering or writing a QR artifact.
///
/// Removal never raises; see [`QrArtifactStore::remove`].
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The payload could not be QR-encoded.
    #[error("Failed to encode QR payload: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// The rendered image could not be written.
    #[error("Failed to write QR image {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    /// Filesystem operation around the artifact failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Filesystem store for QR code images under a static-serving root.
#[derive(Debug, Clone)]
pub struct QrArtifactStore {
    root: PathBuf,
}

impl QrArtifactStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on the first write, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The static root this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the artifact for `code` lives (whether or not it exists yet).
    pub fn path_for(&self, code: &AccessCode) -> PathBuf {
        self.root.join(format!("{}.png", code.as_str()))
    }

    /// Render the QR image for `code` and write it under the static root.
    ///
    /// Creates parent directories as needed and sets the file
    /// world-readable so the static host can serve it. Returns the path of
    /// the written artifact.
    pub fn write(&self, code: &AccessCode) -> Result<PathBuf, ArtifactError> {
        fs::create_dir_all(&self.root).map_err(|e| ArtifactError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let qr = QrCode::new(code.as_str().as_bytes())?;
        let img = qr.render::<Luma<u8>>().build();

        let path = self.path_for(code);
        img.save(&path).map_err(|e| ArtifactError::Write {
            path: path.clone(),
            source: e,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).map_err(|e| {
                ArtifactError::Io {
                    path: path.clone(),
                    source: e,
                }
            })?;
        }

        debug!(path = %path.display(), "QR artifact written");
        Ok(path)
    }

    /// Remove the artifact for `code`, best-effort.
    ///
    /// Returns `true` when the file existed and was removed, `false` when
    /// it did not exist or could not be removed. Failures are logged but
    /// never propagated; cleanup must not reverse an already-successful
    /// unlock.
    pub fn remove(&self, code: &AccessCode) -> bool {
        let path = self.path_for(code);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "QR artifact did not exist");
                false
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unable to remove QR artifact");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> AccessCode {
        AccessCode::new(s).unwrap()
    }

    #[test]
    fn write_creates_png_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = QrArtifactStore::new(dir.path().join("static"));

        let path = store.write(&code("123456789012")).unwrap();

        assert!(path.exists());
        assert_eq!(path, dir.path().join("static").join("123456789012.png"));
        // PNG magic bytes
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[cfg(unix)]
    #[test]
    fn written_artifact_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = QrArtifactStore::new(dir.path());
        let path = store.write(&code("222233334444")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o004, 0o004, "artifact not world-readable");
    }

    #[test]
    fn remove_handles_existing_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = QrArtifactStore::new(dir.path());
        let c = code("555566667777");

        store.write(&c).unwrap();
        assert!(store.remove(&c));
        assert!(!store.path_for(&c).exists());

        // Subsequent removals quietly report the missing file.
        assert!(!store.remove(&c));
    }
}
