use ndarray::{Array1, Array2};

/// One training unit: a waveform, its mel features, or both, optionally
/// tagged with the utterance id it came from. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub utt_id: Option<String>,
    pub audio: Option<Array1<f32>>,
    pub mel: Option<Array2<f32>>,
}

impl Example {
    pub fn audio_mel(utt_id: Option<String>, audio: Array1<f32>, mel: Array2<f32>) -> Self {
        Self {
            utt_id,
            audio: Some(audio),
            mel: Some(mel),
        }
    }

    pub fn audio(utt_id: Option<String>, audio: Array1<f32>) -> Self {
        Self {
            utt_id,
            audio: Some(audio),
            mel: None,
        }
    }

    pub fn mel(utt_id: Option<String>, mel: Array2<f32>) -> Self {
        Self {
            utt_id,
            audio: None,
            mel: Some(mel),
        }
    }

    /// Leading-dimension length of the audio, if present.
    pub fn audio_len(&self) -> Option<usize> {
        self.audio.as_ref().map(Array1::len)
    }

    /// Number of mel frames, if present.
    pub fn mel_frames(&self) -> Option<usize> {
        self.mel.as_ref().map(|m| m.shape()[0])
    }
}

/// Declared element types of the tuples an adapter yields, in yield order.
/// Lets a downstream batching layer type-check its inputs up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDType {
    Str,
    F32,
}
