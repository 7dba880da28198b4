//! Ephemeral staging of submitted audio clips.
//!
//! [`AudioStager::stage`] writes decoded bytes to a uniquely named file in
//! the staging directory and size-gates it.  The returned [`StagedClip`]
//! owns the file: dropping it deletes the file, so every exit path of the
//! pipeline (success, error or panic unwinding) releases the clip exactly
//! once.
//!
//! ```text
//! bytes ──stage()──▶ StagedClip ──transcribe──▶ drop ──▶ file removed
//!          │
//!          ├─ 0 bytes          → AudioError::Empty         (nothing written)
//!          └─ < min_bytes      → AudioError::TooShort      (written, then released)
//! ```
//!
//! Staging and release counts are kept in a shared [`ClipLedger`] so tests
//! (and shutdown logging) can verify that no clip leaks.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::NamedTempFile;

use super::decode::decode_audio;
use super::AudioError;
use crate::config::{AppPaths, AudioConfig};

// ---------------------------------------------------------------------------
// ClipLedger
// ---------------------------------------------------------------------------

/// Running totals of staged and released clips.
#[derive(Debug, Default)]
pub struct ClipLedger {
    staged: AtomicUsize,
    released: AtomicUsize,
}

impl ClipLedger {
    /// Clips ever written to the staging directory.
    pub fn staged(&self) -> usize {
        self.staged.load(Ordering::SeqCst)
    }

    /// Clips released (file deleted) so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Clips currently alive.
    pub fn live(&self) -> usize {
        self.staged().saturating_sub(self.released())
    }
}

// ---------------------------------------------------------------------------
// StagedClip
// ---------------------------------------------------------------------------

/// One submitted clip on disk.  Valid only until dropped.
pub struct StagedClip {
    file: NamedTempFile,
    len: usize,
    ledger: Arc<ClipLedger>,
}

impl std::fmt::Debug for StagedClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedClip")
            .field("path", &self.file.path())
            .field("len", &self.len)
            .finish()
    }
}

impl StagedClip {
    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name including extension, used as the upload name.
    pub fn file_name(&self) -> String {
        self.file
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.webm".to_string())
    }

    /// Size of the clip in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the clip back into memory.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.file.path()).await
    }
}

impl Drop for StagedClip {
    fn drop(&mut self) {
        // The temp file itself is removed when `file` drops right after this.
        self.ledger.released.fetch_add(1, Ordering::SeqCst);
        log::debug!("audio: released clip {} ({} bytes)", self.file.path().display(), self.len);
    }
}

// ---------------------------------------------------------------------------
// AudioStager
// ---------------------------------------------------------------------------

/// Materialises audio submissions as short-lived files.
///
/// Cheap to clone; clones share the same [`ClipLedger`].
#[derive(Debug, Clone)]
pub struct AudioStager {
    dir: PathBuf,
    min_bytes: usize,
    extension: String,
    ledger: Arc<ClipLedger>,
}

impl AudioStager {
    /// Create a stager writing into `dir`, rejecting clips under `min_bytes`.
    pub fn new(dir: impl Into<PathBuf>, min_bytes: usize, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            min_bytes,
            extension: extension.into(),
            ledger: Arc::new(ClipLedger::default()),
        }
    }

    /// Build from [`AudioConfig`], defaulting to the platform temp directory.
    pub fn from_config(config: &AudioConfig) -> Self {
        let dir = config
            .staging_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().staging_dir);
        Self::new(dir, config.min_audio_bytes, config.clip_extension.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn min_bytes(&self) -> usize {
        self.min_bytes
    }

    pub fn ledger(&self) -> &ClipLedger {
        &self.ledger
    }

    /// Write `bytes` to a new staged clip and size-gate it.
    ///
    /// # Errors
    ///
    /// - [`AudioError::Empty`] — `bytes` is empty; nothing is written.
    /// - [`AudioError::TooShort`] — the written clip is under `min_bytes`;
    ///   it has already been released when this returns.
    /// - [`AudioError::Io`] — the staging directory or file could not be written.
    pub fn stage(&self, bytes: &[u8]) -> Result<StagedClip, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::Empty);
        }

        std::fs::create_dir_all(&self.dir)?;
        let suffix = format!(".{}", self.extension.trim_start_matches('.'));
        let mut file = tempfile::Builder::new()
            .prefix("answer-")
            .suffix(&suffix)
            .tempfile_in(&self.dir)?;

        // A failed write drops `file`, which removes it before it is counted.
        file.write_all(bytes)?;
        file.flush()?;

        self.ledger.staged.fetch_add(1, Ordering::SeqCst);
        let clip = StagedClip {
            file,
            len: bytes.len(),
            ledger: Arc::clone(&self.ledger),
        };

        if clip.len < self.min_bytes {
            let got = clip.len;
            drop(clip);
            return Err(AudioError::TooShort {
                got,
                min: self.min_bytes,
            });
        }

        log::debug!("audio: staged {} ({} bytes)", clip.path().display(), clip.len);
        Ok(clip)
    }

    /// Decode a base64 payload and [`stage`](Self::stage) it.
    pub fn stage_base64(&self, payload: &str) -> Result<StagedClip, AudioError> {
        let bytes = decode_audio(payload)?;
        self.stage(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
