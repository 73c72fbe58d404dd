use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::app::{Result, TributaryError};

type Downloaded = BTreeMap<String, BTreeSet<String>>;

/// Durable record of which entries were already downloaded, keyed by feed id.
///
/// Stored on disk as a JSON object mapping feed ids to arrays of entry ids.
/// Shared by reference across all feed pipelines of a run; every access goes
/// through the lock.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    downloaded: RwLock<Downloaded>,
    /// Held for the whole snapshot, temp write and rename of a flush.
    flush: Mutex<()>,
}

impl Ledger {
    /// Load the ledger at `path`. A missing file yields an empty ledger.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let downloaded = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Downloaded>(&bytes).map_err(|e| {
                TributaryError::LedgerDecode {
                    path: path.clone(),
                    source: e,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No ledger at {}, starting empty", path.display());
                Downloaded::new()
            }
            Err(e) => {
                return Err(TributaryError::LedgerIo { path, source: e });
            }
        };

        Ok(Self {
            path,
            downloaded: RwLock::new(downloaded),
            flush: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, feed_id: &str, entry_id: &str) -> bool {
        let downloaded = self.downloaded.read().unwrap_or_else(PoisonError::into_inner);
        downloaded
            .get(feed_id)
            .is_some_and(|entries| entries.contains(entry_id))
    }

    /// Record `entry_id` as downloaded for `feed_id`. Idempotent.
    pub fn add(&self, feed_id: &str, entry_id: &str) {
        let mut downloaded = self.downloaded.write().unwrap_or_else(PoisonError::into_inner);
        let entries = downloaded.entry(feed_id.to_string()).or_default();
        if !entries.contains(entry_id) {
            entries.insert(entry_id.to_string());
        }
    }

    /// Number of entries recorded for `feed_id`.
    pub fn count(&self, feed_id: &str) -> usize {
        let downloaded = self.downloaded.read().unwrap_or_else(PoisonError::into_inner);
        downloaded.get(feed_id).map_or(0, BTreeSet::len)
    }

    /// Serialize the whole ledger and atomically replace the file on disk.
    ///
    /// Concurrent flushes are serialized, so the last one to finish always
    /// writes the newest snapshot.
    pub fn write(&self) -> Result<()> {
        let _flush = self.flush.lock().unwrap_or_else(PoisonError::into_inner);

        let bytes = {
            let downloaded = self.downloaded.write().unwrap_or_else(PoisonError::into_inner);
            serde_json::to_vec(&*downloaded)?
        };

        let io_err = |e| TributaryError::LedgerIo {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, &bytes).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        tracing::debug!("Wrote ledger to {}", self.path.display());
        Ok(())
    }
}
