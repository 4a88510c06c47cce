//! File-backed dataset adapters. Each adapter turns a directory of dumped
//! per-utterance files into a deterministic, filterable, lazily-evaluated
//! sequence of [`Example`]s.

pub mod audio;
pub mod audio_mel;
pub mod mel;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::warn;
use walkdir::WalkDir;

pub use audio::AudioDataset;
pub use audio_mel::AudioMelDataset;
pub use mel::MelDataset;

use crate::data::{Example, OutputDType};
use crate::error::LoaderError;

/// Iteration contract shared by the adapter variants.
///
/// `generator` yields one example per supplied id, loading files on demand at
/// yield time. Calling it again with the same ids reproduces the same
/// sequence, in the sorted-path order fixed at construction.
pub trait ExampleDataset {
    /// Utterance ids in iteration order.
    fn utt_ids(&self) -> &[String];

    /// Ids are paired with the backing files positionally, so the slice must
    /// be exactly `len()` long (usually the slice returned by `utt_ids`).
    fn generator<'a>(
        &'a self,
        utt_ids: &'a [String],
    ) -> Box<dyn Iterator<Item = Result<Example, LoaderError>> + 'a>;

    /// Element types of the yielded tuples, for the downstream batching layer.
    fn output_dtypes(&self) -> Vec<OutputDType>;

    fn len(&self) -> usize {
        self.utt_ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name(&self) -> &'static str;
}

/// Recursively list files under `root` whose name matches `query`, sorted
/// lexicographically by path. The sort is what makes iteration order stable
/// across runs.
pub(crate) fn find_files(root: &Path, query: &str) -> Vec<PathBuf> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(OsStr::to_str)
                .map_or(false, |name| query_matches(query, name))
        })
        .collect_vec();
    files.sort();

    files
}

/// Glob-style filename match supporting `*` wildcards, as used by the dump
/// queries ("*.h5", "*-wave.npy"). Two-pointer greedy scan: on mismatch the
/// most recent `*` re-expands by one byte, so runtime stays linear-ish in
/// `name.len()` no matter how many wildcards the query carries.
pub(crate) fn query_matches(query: &str, name: &str) -> bool {
    let (query, name) = (query.as_bytes(), name.as_bytes());
    let (mut q, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        if q < query.len() && query[q] == b'*' {
            star = Some((q, n));
            q += 1;
        } else if q < query.len() && query[q] == name[n] {
            q += 1;
            n += 1;
        } else if let Some((star_q, star_n)) = star {
            q = star_q + 1;
            n = star_n + 1;
            star = Some((star_q, star_n + 1));
        } else {
            return false;
        }
    }
    while q < query.len() && query[q] == b'*' {
        q += 1;
    }

    q == query.len()
}

/// Derive utterance ids from file paths. Legacy flat-array dumps (queries
/// containing ".npy") carry a fixed suffix token that is stripped; anything
/// else uses the file stem.
pub(crate) fn derive_utt_ids(files: &[PathBuf], query: &str, legacy_suffix: &str) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            if query.contains(".npy") {
                file.file_name()
                    .and_then(OsStr::to_str)
                    .unwrap_or_default()
                    .replace(legacy_suffix, "")
            } else {
                file.file_stem()
                    .and_then(OsStr::to_str)
                    .unwrap_or_default()
                    .to_string()
            }
        })
        .collect()
}

/// Indices of entries whose leading-dimension length strictly exceeds
/// `threshold`. This is the one eager pass over the data: every candidate is
/// realized once to learn its length.
pub(crate) fn indices_over_threshold<F>(
    files: &[PathBuf],
    threshold: usize,
    load_len: F,
    what: &str,
) -> Result<Vec<usize>, LoaderError>
where
    F: Fn(&Path) -> Result<usize, LoaderError> + Sync,
{
    let lengths = files
        .par_iter()
        .map(|file| load_len(file))
        .collect::<Result<Vec<_>, _>>()?;

    let idxs = lengths
        .iter()
        .positions(|len| *len > threshold)
        .collect_vec();

    if idxs.len() != files.len() {
        warn!(
            "some files are filtered by {what} length threshold ({} -> {})",
            files.len(),
            idxs.len()
        );
    }

    Ok(idxs)
}

/// Apply a retained-index set to one of the parallel file lists.
pub(crate) fn select(files: Vec<PathBuf>, idxs: &[usize]) -> Vec<PathBuf> {
    idxs.iter()
        .filter_map(|&idx| files.get(idx).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_queries() {
        assert!(query_matches("*.h5", "utt1.h5"));
        assert!(query_matches("*-wave.npy", "utt1-wave.npy"));
        assert!(!query_matches("*-wave.npy", "utt1-feats.npy"));
        assert!(query_matches("*", "anything"));
        assert!(query_matches("utt*", "utt1.h5"));
        assert!(!query_matches("*.h5", "utt1.h5.bak"));
    }

    #[test]
    fn wildcard_heavy_query_stays_fast() {
        // the classic worst case for a backtracking matcher
        let name = "a".repeat(512);
        let query = format!("{}b", "*a".repeat(64));
        assert!(!query_matches(&query, &name));
        assert!(query_matches(&format!("{}a", "*a".repeat(64)), &name));
    }

    #[test]
    fn utt_id_rules() {
        let files = vec![PathBuf::from("/dump/utt1-wave.npy")];
        assert_eq!(derive_utt_ids(&files, "*-wave.npy", "-wave.npy"), vec!["utt1"]);

        let files = vec![PathBuf::from("/dump/utt2.h5")];
        assert_eq!(derive_utt_ids(&files, "*.h5", "-wave.npy"), vec!["utt2"]);
    }

    #[test]
    fn find_files_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.h5"), b"x").unwrap();
        std::fs::write(dir.path().join("sub/a.h5"), b"x").unwrap();
        std::fs::write(dir.path().join("skip.txt"), b"x").unwrap();

        let files = find_files(dir.path(), "*.h5");
        assert_eq!(files.len(), 2);
        // lexicographic by full path, twice in a row
        assert_eq!(files, find_files(dir.path(), "*.h5"));
        assert!(files[0] < files[1]);
    }

    #[test]
    fn threshold_is_strictly_greater() {
        let files = vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")];
        let lens = [100usize, 150, 200];
        let idxs = indices_over_threshold(
            &files,
            150,
            |p| {
                let i = ["a", "b", "c"].iter().position(|n| p.ends_with(n)).unwrap();
                Ok(lens[i])
            },
            "audio",
        )
        .unwrap();

        assert_eq!(idxs, vec![2]);
    }
}
