use std::path::PathBuf;

use thiserror::Error;

/// Construction-time integrity failures. Fatal: no partial dataset is ever
/// returned.
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    #[error("not found any files matching {query:?} in {root}")]
    NoFiles { root: PathBuf, query: String },

    #[error("number of audio and mel files are different ({audio} vs {mel})")]
    CountMismatch { audio: usize, mel: usize },
}

/// Failures raised by an injected loader function while reading or decoding
/// a single file. Propagated unchanged, never retried.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),

    #[error(transparent)]
    Loader(#[from] LoaderError),
}

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("train data loader is not set")]
    MissingTrainLoader,

    #[error("eval data loader is not set")]
    MissingEvalLoader,

    #[error("invalid trainer config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Record(#[from] burn::record::RecorderError),

    #[error(transparent)]
    State(#[from] serde_json::Error),

    #[error("checkpoint at {path} is not restorable: {message}")]
    Checkpoint { path: PathBuf, message: String },

    #[error("task error: {0}")]
    Task(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TrainError {
    pub fn task<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Task(Box::new(err))
    }
}
