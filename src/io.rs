//! Bundled loader strategies. An adapter takes any function with the right
//! signature; these cover the formats the crate ships support for. Container
//! formats (hdf5, npy) are left to external loaders.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::error::LoaderError;

/// Strategy loading a 1-D waveform from a file.
pub type AudioLoadFn = Arc<dyn Fn(&Path) -> Result<Array1<f32>, LoaderError> + Send + Sync>;

/// Strategy loading a frames x channels feature matrix from a file.
pub type MelLoadFn = Arc<dyn Fn(&Path) -> Result<Array2<f32>, LoaderError> + Send + Sync>;

pub fn read_wav(path: &Path) -> Result<Array1<f32>, LoaderError> {
    let mut wav = wavers::Wav::<f32>::from_path(path).map_err(|e| decode(path, e))?;
    let samples = wav.read().map_err(|e| decode(path, e))?;

    Ok(Array1::from_vec(samples.to_vec()))
}

pub fn read_audio_json(path: &Path) -> Result<Array1<f32>, LoaderError> {
    let raw = read_to_string(path)?;
    let samples: Vec<f32> = serde_json::from_str(&raw).map_err(|e| decode(path, e))?;

    Ok(Array1::from_vec(samples))
}

pub fn read_mel_json(path: &Path) -> Result<Array2<f32>, LoaderError> {
    let raw = read_to_string(path)?;
    let rows: Vec<Vec<f32>> = serde_json::from_str(&raw).map_err(|e| decode(path, e))?;

    let frames = rows.len();
    let channels = rows.first().map_or(0, Vec::len);

    let mut flat = Vec::with_capacity(frames * channels);
    for row in &rows {
        if row.len() != channels {
            return Err(LoaderError::Decode {
                path: path.to_owned(),
                message: format!("ragged mel matrix ({} vs {} channels)", row.len(), channels),
            });
        }
        flat.extend_from_slice(row);
    }

    Array2::from_shape_vec((frames, channels), flat).map_err(|e| decode(path, e))
}

pub fn wav_audio_loader() -> AudioLoadFn {
    Arc::new(read_wav)
}

pub fn json_audio_loader() -> AudioLoadFn {
    Arc::new(read_audio_json)
}

pub fn json_mel_loader() -> MelLoadFn {
    Arc::new(read_mel_json)
}

fn read_to_string(path: &Path) -> Result<String, LoaderError> {
    fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_owned(),
        source,
    })
}

fn decode(path: &Path, err: impl std::fmt::Display) -> LoaderError {
    LoaderError::Decode {
        path: path.to_owned(),
        message: err.to_string(),
    }
}
