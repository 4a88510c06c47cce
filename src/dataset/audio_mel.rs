use std::path::{Path, PathBuf};

use itertools::izip;

use crate::data::{Example, OutputDType};
use crate::dataset::{derive_utt_ids, find_files, indices_over_threshold, select, ExampleDataset};
use crate::error::{DataIntegrityError, DatasetError, LoaderError};
use crate::io::{AudioLoadFn, MelLoadFn};

/// Paired audio/mel adapter over a dump directory. Audio and mel files are
/// matched positionally after both lists are sorted; length filtering applies
/// the same retained-index set to both sides so the pairing never
/// desynchronizes.
pub struct AudioMelDataset {
    utt_ids: Vec<String>,
    audio_files: Vec<PathBuf>,
    mel_files: Vec<PathBuf>,
    audio_load_fn: AudioLoadFn,
    mel_load_fn: MelLoadFn,
    return_utt_id: bool,
}

impl std::fmt::Debug for AudioMelDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioMelDataset")
            .field("utt_ids", &self.utt_ids)
            .field("audio_files", &self.audio_files)
            .field("mel_files", &self.mel_files)
            .field("return_utt_id", &self.return_utt_id)
            .finish_non_exhaustive()
    }
}

impl AudioMelDataset {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root_dir: &Path,
        audio_query: &str,
        mel_query: &str,
        audio_load_fn: AudioLoadFn,
        mel_load_fn: MelLoadFn,
        audio_length_threshold: Option<usize>,
        mel_length_threshold: Option<usize>,
        return_utt_id: bool,
    ) -> Result<Self, DatasetError> {
        let mut audio_files = find_files(root_dir, audio_query);
        let mut mel_files = find_files(root_dir, mel_query);

        if let Some(threshold) = audio_length_threshold {
            let idxs = indices_over_threshold(
                &audio_files,
                threshold,
                |path| audio_load_fn(path).map(|audio| audio.len()),
                "audio",
            )?;
            audio_files = select(audio_files, &idxs);
            mel_files = select(mel_files, &idxs);
        }
        if let Some(threshold) = mel_length_threshold {
            let idxs = indices_over_threshold(
                &mel_files,
                threshold,
                |path| mel_load_fn(path).map(|mel| mel.shape()[0]),
                "mel",
            )?;
            audio_files = select(audio_files, &idxs);
            mel_files = select(mel_files, &idxs);
        }

        if audio_files.is_empty() {
            return Err(DataIntegrityError::NoFiles {
                root: root_dir.to_owned(),
                query: audio_query.to_string(),
            }
            .into());
        }
        if audio_files.len() != mel_files.len() {
            return Err(DataIntegrityError::CountMismatch {
                audio: audio_files.len(),
                mel: mel_files.len(),
            }
            .into());
        }

        let utt_ids = derive_utt_ids(&audio_files, audio_query, "-wave.npy");

        Ok(Self {
            utt_ids,
            audio_files,
            mel_files,
            audio_load_fn,
            mel_load_fn,
            return_utt_id,
        })
    }
}

impl ExampleDataset for AudioMelDataset {
    fn utt_ids(&self) -> &[String] {
        &self.utt_ids
    }

    fn generator<'a>(
        &'a self,
        utt_ids: &'a [String],
    ) -> Box<dyn Iterator<Item = Result<Example, LoaderError>> + 'a> {
        debug_assert_eq!(utt_ids.len(), self.audio_files.len());
        Box::new(
            izip!(utt_ids, &self.audio_files, &self.mel_files).map(
                move |(utt_id, audio_file, mel_file)| {
                    let audio = (self.audio_load_fn)(audio_file)?;
                    let mel = (self.mel_load_fn)(mel_file)?;
                    let utt_id = self.return_utt_id.then(|| utt_id.clone());

                    Ok(Example::audio_mel(utt_id, audio, mel))
                },
            ),
        )
    }

    fn output_dtypes(&self) -> Vec<OutputDType> {
        let mut dtypes = vec![OutputDType::F32, OutputDType::F32];
        if self.return_utt_id {
            dtypes.insert(0, OutputDType::Str);
        }
        dtypes
    }

    fn name(&self) -> &'static str {
        "AudioMelDataset"
    }
}
