use std::path::{Path, PathBuf};

use crate::data::{Example, OutputDType};
use crate::dataset::{derive_utt_ids, find_files, indices_over_threshold, select, ExampleDataset};
use crate::error::{DataIntegrityError, DatasetError, LoaderError};
use crate::io::MelLoadFn;

/// Mel-only adapter over a dump directory.
pub struct MelDataset {
    utt_ids: Vec<String>,
    mel_files: Vec<PathBuf>,
    mel_load_fn: MelLoadFn,
    return_utt_id: bool,
}

impl MelDataset {
    pub fn new(
        root_dir: &Path,
        mel_query: &str,
        mel_load_fn: MelLoadFn,
        mel_length_threshold: Option<usize>,
        return_utt_id: bool,
    ) -> Result<Self, DatasetError> {
        let mut mel_files = find_files(root_dir, mel_query);

        if let Some(threshold) = mel_length_threshold {
            let idxs = indices_over_threshold(
                &mel_files,
                threshold,
                |path| mel_load_fn(path).map(|mel| mel.shape()[0]),
                "mel",
            )?;
            mel_files = select(mel_files, &idxs);
        }

        if mel_files.is_empty() {
            return Err(DataIntegrityError::NoFiles {
                root: root_dir.to_owned(),
                query: mel_query.to_string(),
            }
            .into());
        }

        let utt_ids = derive_utt_ids(&mel_files, mel_query, "-feats.npy");

        Ok(Self {
            utt_ids,
            mel_files,
            mel_load_fn,
            return_utt_id,
        })
    }
}

impl ExampleDataset for MelDataset {
    fn utt_ids(&self) -> &[String] {
        &self.utt_ids
    }

    fn generator<'a>(
        &'a self,
        utt_ids: &'a [String],
    ) -> Box<dyn Iterator<Item = Result<Example, LoaderError>> + 'a> {
        debug_assert_eq!(utt_ids.len(), self.mel_files.len());
        Box::new(
            utt_ids
                .iter()
                .zip(&self.mel_files)
                .map(move |(utt_id, mel_file)| {
                    let mel = (self.mel_load_fn)(mel_file)?;
                    let utt_id = self.return_utt_id.then(|| utt_id.clone());

                    Ok(Example::mel(utt_id, mel))
                }),
        )
    }

    fn output_dtypes(&self) -> Vec<OutputDType> {
        let mut dtypes = vec![OutputDType::F32];
        if self.return_utt_id {
            dtypes.insert(0, OutputDType::Str);
        }
        dtypes
    }

    fn name(&self) -> &'static str {
        "MelDataset"
    }
}
