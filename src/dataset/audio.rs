use std::path::{Path, PathBuf};

use crate::data::{Example, OutputDType};
use crate::dataset::{derive_utt_ids, find_files, indices_over_threshold, select, ExampleDataset};
use crate::error::{DataIntegrityError, DatasetError, LoaderError};
use crate::io::AudioLoadFn;

/// Audio-only adapter over a dump directory.
pub struct AudioDataset {
    utt_ids: Vec<String>,
    audio_files: Vec<PathBuf>,
    audio_load_fn: AudioLoadFn,
    return_utt_id: bool,
}

impl std::fmt::Debug for AudioDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDataset")
            .field("utt_ids", &self.utt_ids)
            .field("audio_files", &self.audio_files)
            .field("return_utt_id", &self.return_utt_id)
            .finish_non_exhaustive()
    }
}

impl AudioDataset {
    pub fn new(
        root_dir: &Path,
        audio_query: &str,
        audio_load_fn: AudioLoadFn,
        audio_length_threshold: Option<usize>,
        return_utt_id: bool,
    ) -> Result<Self, DatasetError> {
        let mut audio_files = find_files(root_dir, audio_query);

        if let Some(threshold) = audio_length_threshold {
            let idxs = indices_over_threshold(
                &audio_files,
                threshold,
                |path| audio_load_fn(path).map(|audio| audio.len()),
                "audio",
            )?;
            audio_files = select(audio_files, &idxs);
        }

        if audio_files.is_empty() {
            return Err(DataIntegrityError::NoFiles {
                root: root_dir.to_owned(),
                query: audio_query.to_string(),
            }
            .into());
        }

        let utt_ids = derive_utt_ids(&audio_files, audio_query, "-wave.npy");

        Ok(Self {
            utt_ids,
            audio_files,
            audio_load_fn,
            return_utt_id,
        })
    }
}

impl ExampleDataset for AudioDataset {
    fn utt_ids(&self) -> &[String] {
        &self.utt_ids
    }

    fn generator<'a>(
        &'a self,
        utt_ids: &'a [String],
    ) -> Box<dyn Iterator<Item = Result<Example, LoaderError>> + 'a> {
        debug_assert_eq!(utt_ids.len(), self.audio_files.len());
        Box::new(utt_ids.iter().zip(&self.audio_files).map(
            move |(utt_id, audio_file)| {
                let audio = (self.audio_load_fn)(audio_file)?;
                let utt_id = self.return_utt_id.then(|| utt_id.clone());

                Ok(Example::audio(utt_id, audio))
            },
        ))
    }

    fn output_dtypes(&self) -> Vec<OutputDType> {
        let mut dtypes = vec![OutputDType::F32];
        if self.return_utt_id {
            dtypes.insert(0, OutputDType::Str);
        }
        dtypes
    }

    fn name(&self) -> &'static str {
        "AudioDataset"
    }
}
