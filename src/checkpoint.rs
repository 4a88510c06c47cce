//! Checkpoint directory lifecycle: one `ckpt-<steps>` directory per
//! snapshot, FIFO retention capped at a configured count. What goes inside a
//! snapshot directory is the caller's business; this module only owns naming
//! and eviction.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::TrainError;

pub struct CheckpointManager {
    dir: PathBuf,
    max_to_keep: usize,
    kept: VecDeque<PathBuf>,
}

impl CheckpointManager {
    /// Open a manager over `dir`, creating it if needed. Snapshots already on
    /// disk are rediscovered in step order so retention keeps working across
    /// process restarts.
    pub fn new(dir: PathBuf, max_to_keep: usize) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;

        let mut existing: Vec<(u64, PathBuf)> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| Some((parse_step(&path)?, path)))
            .collect();
        existing.sort();

        Ok(Self {
            dir,
            max_to_keep,
            kept: existing.into_iter().map(|(_, path)| path).collect(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Most recently saved snapshot, if any.
    pub fn latest(&self) -> Option<&Path> {
        self.kept.back().map(PathBuf::as_path)
    }

    pub fn kept(&self) -> impl Iterator<Item = &Path> {
        self.kept.iter().map(PathBuf::as_path)
    }

    /// Create the snapshot directory for `steps`, hand it to `write`, then
    /// evict the oldest snapshots beyond the retention cap.
    pub fn save<F>(&mut self, steps: u64, write: F) -> Result<PathBuf, TrainError>
    where
        F: FnOnce(&Path) -> Result<(), TrainError>,
    {
        let path = self.dir.join(format!("ckpt-{steps}"));
        fs::create_dir_all(&path)?;
        write(&path)?;

        if !self.kept.contains(&path) {
            self.kept.push_back(path.clone());
        }
        while self.kept.len() > self.max_to_keep {
            if let Some(old) = self.kept.pop_front() {
                info!("evicting checkpoint {}", old.display());
                if let Err(err) = fs::remove_dir_all(&old) {
                    warn!("could not remove {}: {err}", old.display());
                }
            }
        }

        Ok(path)
    }
}

fn parse_step(path: &Path) -> Option<u64> {
    path.file_name()?
        .to_str()?
        .strip_prefix("ckpt-")?
        .parse()
        .ok()
}
