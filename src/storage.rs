// File: ./src/storage.rs
// File-level primitives for local persistence: advisory locking, atomic
// writes and the on-disk waiver map.
//
// The waiver file is a flat JSON object, key -> record. It is shared with
// other processes, so every read-modify-write happens under the lock.
use crate::model::WaiverRecord;
use anyhow::{Context, Result};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub type WaiverMap = BTreeMap<String, WaiverRecord>;

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut name = file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        file_path.with_file_name(name)
    }

    /// Runs `f` while holding an exclusive lock on a sibling `.lock` file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Reads the waiver map without locking. A missing file is an empty
    /// map; an unreadable or corrupt file is an error.
    fn load_waivers_internal(path: &Path) -> Result<WaiverMap> {
        if !path.exists() {
            return Ok(WaiverMap::new());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read waiver store {:?}", path))?;
        if json.trim().is_empty() {
            return Ok(WaiverMap::new());
        }
        let mut map: WaiverMap = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse waiver store {:?}", path))?;
        for (key, record) in map.iter_mut() {
            record.key = key.clone();
        }
        Ok(map)
    }

    pub fn load_waivers(path: &Path) -> Result<WaiverMap> {
        Self::with_lock(path, || Self::load_waivers_internal(path))
    }

    /// Lock, load, apply `f`, write back if `f` reports a change.
    /// Nothing is written when loading fails, so a corrupt file is never
    /// replaced by a partial map.
    pub fn modify_waivers<F>(path: &Path, f: F) -> Result<bool>
    where
        F: FnOnce(&mut WaiverMap) -> bool,
    {
        Self::with_lock(path, || {
            let mut map = Self::load_waivers_internal(path)?;
            if !f(&mut map) {
                return Ok(false);
            }
            let json = serde_json::to_string_pretty(&map)?;
            Self::atomic_write(path, json)?;
            Ok(true)
        })
    }
}
