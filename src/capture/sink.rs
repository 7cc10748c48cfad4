use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::capture::snapshot::{Snapshot, file_stem};
use crate::foundation::error::TryOnResult;

/// Receives encoded snapshots on export (download, archive, share, ...).
pub trait SnapshotSink {
    /// Store or forward one snapshot.
    fn accept(&mut self, snapshot: &Snapshot) -> TryOnResult<()>;
}

impl SnapshotSink for Vec<Snapshot> {
    fn accept(&mut self, snapshot: &Snapshot) -> TryOnResult<()> {
        self.push(snapshot.clone());
        Ok(())
    }
}

/// Writes each snapshot as `<dir>/<file_name>`, suffixing repeated names with `_2`, `_3`, ...
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    used: HashSet<String>,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create `dir` if needed.
    pub fn create(dir: impl Into<PathBuf>) -> TryOnResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        Ok(Self {
            dir,
            used: HashSet::new(),
            written: Vec::new(),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn unique_name(&mut self, file_name: &str) -> String {
        let mut name = file_name.to_string();
        let mut n = 2;
        while !self.used.insert(name.clone()) {
            name = format!("{}_{n}.png", file_stem(file_name));
            n += 1;
        }
        name
    }
}

impl SnapshotSink for DirectorySink {
    fn accept(&mut self, snapshot: &Snapshot) -> TryOnResult<()> {
        let name = self.unique_name(&snapshot.file_name);
        let path = self.dir.join(name);
        std::fs::write(&path, snapshot.png.as_slice())
            .with_context(|| format!("write snapshot '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "snapshot written");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sink.rs"]
mod tests;
