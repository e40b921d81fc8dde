//! Per-file editing sessions.
//!
//! The core never touches the filesystem; a collaborator reads the header
//! region, opens an [`EditSession`] with those bytes and later persists what
//! [`HeaderModel::encode`] returns. The session keeps a SHA-256 fingerprint
//! of the header bytes taken at open so the collaborator can skip the
//! write-back when nothing would change on disk.
//!
//! [`SessionManager`] holds one session per open file, addressed by path.
//! Sessions are single-writer like the models they own.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{DecodeError, EncodeError};
use crate::model::HeaderModel;

/// One open header, plus the fingerprint of its on-disk bytes.
pub struct EditSession {
    model: HeaderModel,
    disk_fingerprint: String,
}

impl EditSession {
    /// Decodes the supplied header bytes and fingerprints the header region
    /// as it currently exists on disk. A header whose recording
    /// identification field is missing is shorter on disk than its repaired
    /// encoding, so the region is capped at the supplied length.
    pub fn open(bytes: &[u8]) -> Result<Self, DecodeError> {
        let model = HeaderModel::decode(bytes)?;
        let region = model.header().header_bytes().min(bytes.len());
        Ok(Self {
            disk_fingerprint: sha256_hex(&bytes[..region]),
            model,
        })
    }

    pub fn model(&self) -> &HeaderModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut HeaderModel {
        &mut self.model
    }

    /// Whether writing back would change the bytes on disk. This also turns
    /// true when decoding merely normalized a loosely formatted header, since
    /// a write-back would rewrite those bytes too.
    pub fn is_dirty(&self) -> Result<bool, EncodeError> {
        let encoded = self.model.encode()?;
        Ok(sha256_hex(&encoded) != self.disk_fingerprint)
    }

    /// Refreshes the fingerprint after the collaborator persisted the encoded
    /// header, so the session reads as clean again.
    pub fn mark_saved(&mut self) -> Result<(), EncodeError> {
        self.disk_fingerprint = sha256_hex(&self.model.encode()?);
        Ok(())
    }
}

/// Open-file table: one [`EditSession`] per path.
#[derive(Default)]
pub struct SessionManager {
    sessions: HashMap<PathBuf, EditSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `path` from the supplied header bytes. An already
    /// open session for the same path is replaced.
    pub fn open(
        &mut self,
        path: impl Into<PathBuf>,
        bytes: &[u8],
    ) -> Result<&mut EditSession, DecodeError> {
        let path = path.into();
        let session = EditSession::open(bytes)?;
        log::info!(
            "opened {} ({} channels, {} header bytes)",
            path.display(),
            session.model().header().channel_count(),
            session.model().header().header_bytes()
        );
        Ok(self.sessions.entry(path).insert_entry(session).into_mut())
    }

    pub fn get(&self, path: &Path) -> Option<&EditSession> {
        self.sessions.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut EditSession> {
        self.sessions.get_mut(path)
    }

    /// Discards the session for `path`; the header dies with it.
    pub fn close(&mut self, path: &Path) -> Option<EditSession> {
        let session = self.sessions.remove(path);
        if session.is_some() {
            log::info!("closed {}", path.display());
        }
        session
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sessions.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
