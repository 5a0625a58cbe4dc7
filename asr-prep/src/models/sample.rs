//! Training samples and corpus layouts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One (audio, transcript) training unit
///
/// `duration` is unset when produced by a parser and may be filled in later by a
/// duration pass. Duplicate audio paths across roots are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub audio_path: PathBuf,
    pub transcript: String,
    /// Duration in seconds
    pub duration: Option<f64>,
}

impl Sample {
    pub fn new(audio_path: impl Into<PathBuf>, transcript: impl Into<String>) -> Self {
        Self {
            audio_path: audio_path.into(),
            transcript: transcript.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Supported speech-corpus layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorpusFormat {
    Vystadial2013,
    Tedlium,
    Shtooka,
    LibriSpeech,
}

impl CorpusFormat {
    /// Detection priority: the first layout whose marker file is present wins
    pub const DETECTION_ORDER: [CorpusFormat; 4] = [
        CorpusFormat::Vystadial2013,
        CorpusFormat::Tedlium,
        CorpusFormat::Shtooka,
        CorpusFormat::LibriSpeech,
    ];

    /// File-name suffix whose presence identifies the layout
    pub fn marker_suffix(self) -> &'static str {
        match self {
            CorpusFormat::Vystadial2013 => ".trn",
            CorpusFormat::Tedlium => ".stm",
            CorpusFormat::Shtooka => "index.tags.txt",
            CorpusFormat::LibriSpeech => ".trans.txt",
        }
    }
}

impl fmt::Display for CorpusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorpusFormat::Vystadial2013 => "Vystadial_2013",
            CorpusFormat::Tedlium => "TEDLIUM",
            CorpusFormat::Shtooka => "Shtooka",
            CorpusFormat::LibriSpeech => "LibriSpeech",
        };
        f.write_str(name)
    }
}
