//! Evidence storage for invoice images
//!
//! Validates that a submitted file is a well-formed raster image and
//! persists a copy under the evidence directory. Stored files are never
//! overwritten; name collisions are resolved per the configured policy.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// What to do when the destination name is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append a numeric suffix before the extension until a free name is found
    #[default]
    Suffix,
    /// Refuse the append with a duplicate-evidence error
    Reject,
}

/// Directory-backed store for evidence images
#[derive(Debug, Clone)]
pub struct EvidenceStore {
    dir: PathBuf,
    policy: CollisionPolicy,
}

impl EvidenceStore {
    /// Open the store, creating the directory if absent
    pub fn open<P: Into<PathBuf>>(dir: P, policy: CollisionPolicy) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, policy })
    }

    /// Directory the store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate `source` as an image and persist a copy
    ///
    /// Returns the stored base name, which may carry a numeric suffix if
    /// the source name was already taken and the policy allows retrying.
    pub fn validate_and_store(&self, source: &Path) -> Result<String> {
        verify_image(source)?;

        let base = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::InvalidEvidence(format!("'{}' has no usable file name", source.display()))
            })?;

        let mut attempt = 0u32;
        loop {
            let candidate = if attempt == 0 {
                base.to_string()
            } else {
                suffixed_name(base, attempt)
            };
            let dest = self.dir.join(&candidate);

            match OpenOptions::new().write(true).create_new(true).open(&dest) {
                Ok(mut out) => {
                    let mut input = File::open(source).map_err(|e| {
                        Error::InvalidEvidence(format!(
                            "cannot reopen '{}': {e}",
                            source.display()
                        ))
                    })?;
                    if let Err(err) = io::copy(&mut input, &mut out) {
                        // a half-written copy must not survive
                        drop(out);
                        let _ = fs::remove_file(&dest);
                        return Err(Error::PersistenceFailure(format!(
                            "writing '{candidate}': {err}"
                        )));
                    }
                    tracing::debug!(file = %candidate, "stored evidence copy");
                    return Ok(candidate);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => match self.policy {
                    CollisionPolicy::Suffix => attempt += 1,
                    CollisionPolicy::Reject => return Err(Error::DuplicateEvidence(candidate)),
                },
                Err(err) => {
                    return Err(Error::PersistenceFailure(format!(
                        "creating '{candidate}': {err}"
                    )));
                }
            }
        }
    }

    /// Best-effort removal of a stored file (append rollback only)
    pub fn remove(&self, name: &str) {
        let _ = fs::remove_file(self.dir.join(name));
    }
}

/// Insert `_n` before the extension: `receipt.jpg` becomes `receipt_1.jpg`
fn suffixed_name(base: &str, n: u32) -> String {
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{n}.{ext}"),
        _ => format!("{base}_{n}"),
    }
}

/// Structural image check: decodes only the header, never the pixel data
fn verify_image(path: &Path) -> Result<()> {
    let reader = image::io::Reader::open(path).map_err(|e| {
        Error::InvalidEvidence(format!("cannot open '{}': {e}", path.display()))
    })?;
    let reader = reader.with_guessed_format().map_err(|e| {
        Error::InvalidEvidence(format!("cannot probe '{}': {e}", path.display()))
    })?;
    reader.into_dimensions().map_err(|e| {
        Error::InvalidEvidence(format!("'{}' is not a valid image: {e}", path.display()))
    })?;
    Ok(())
}
