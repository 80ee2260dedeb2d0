//! Timestamp-based staleness of generated files.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::{Error, Result};

/// How a generated file relates to the sources it is derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// The target does not exist yet.
    Missing,
    /// This source was modified after the target.
    Stale(PathBuf),
    /// The target is at least as new as every source.
    Fresh,
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// Compare `target` against `sources`.
///
/// Only a source whose mtime is strictly greater than the target's makes it
/// stale; equal timestamps count as fresh.
pub fn check<P: AsRef<Path>>(target: &Path, sources: &[P]) -> Result<Freshness> {
    let target_time = match modified(target) {
        Ok(t) => t,
        Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            return Ok(Freshness::Missing);
        }
        Err(e) => return Err(e),
    };

    for src in sources {
        let src = src.as_ref();
        if modified(src)? > target_time {
            return Ok(Freshness::Stale(src.to_path_buf()));
        }
    }
    Ok(Freshness::Fresh)
}

/// `true` when `target` exists and no source is newer.
pub fn is_fresh<P: AsRef<Path>>(target: &Path, sources: &[P]) -> Result<bool> {
    check(target, sources).map(|f| f.is_fresh())
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Error::io(path, e))
}
