//! Corpus fixture builders
//!
//! Each builder lays out a minimal on-disk corpus of one layout under a root directory.
//! Audio files are empty unless a test needs real headers (see [`write_wav`]).

use asr_prep::types::{ExtractOutcome, SegmentExtractor};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// LibriSpeech chapter `<root>/19/198` with one `.flac` per utterance
pub fn librispeech(root: &Path, utterances: &[&str]) -> PathBuf {
    let chapter = root.join("19").join("198");
    fs::create_dir_all(&chapter).unwrap();

    let mut transcript = String::new();
    for (i, text) in utterances.iter().enumerate() {
        let id = format!("19-198-{:04}", i);
        transcript.push_str(&format!("{} {}\n", id, text));
        fs::write(chapter.join(format!("{}.flac", id)), b"").unwrap();
    }
    fs::write(chapter.join("19-198.trans.txt"), transcript).unwrap();
    chapter
}

/// Vystadial directory with `<name>.wav` plus `<name>.wav.trn`; WAVs are left to the caller
pub fn vystadial_transcripts(root: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();
    for (name, text) in entries {
        fs::write(data.join(format!("{}.wav.trn", name)), format!("{}\n", text)).unwrap();
    }
    data
}

/// TEDLIUM root with `stm/<talk>.stm` and an empty `sph/` directory
pub fn tedlium(root: &Path, talk: &str, stm_lines: &[&str]) -> PathBuf {
    let stm = root.join("stm");
    let sph = root.join("sph");
    fs::create_dir_all(&stm).unwrap();
    fs::create_dir_all(&sph).unwrap();
    fs::write(sph.join(format!("{}.sph", talk)), b"").unwrap();
    fs::write(stm.join(format!("{}.stm", talk)), stm_lines.join("\n")).unwrap();
    sph
}

/// Mono 16-bit WAV of `seconds` at `sample_rate`
pub fn write_wav(path: &Path, seconds: f64, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (seconds * f64::from(sample_rate)).round() as usize;
    for i in 0..frames {
        let t = i as f64 / f64::from(sample_rate);
        let value = (t * 440.0 * 2.0 * std::f64::consts::PI).sin() * 0.3;
        writer.write_sample((value * f64::from(i16::MAX)) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Records every extraction request; starts at or after `fail_from` fail
pub struct RecordingExtractor {
    pub fail_from: f64,
    pub calls: Mutex<Vec<(PathBuf, PathBuf, f64, f64)>>,
}

impl RecordingExtractor {
    pub fn new(fail_from: f64) -> Self {
        Self {
            fail_from,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf, f64, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SegmentExtractor for RecordingExtractor {
    fn extract_segment(&self, source: &Path, destination: &Path, start: f64, end: f64) -> ExtractOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), destination.to_path_buf(), start, end));
        if start >= self.fail_from {
            ExtractOutcome::Failed
        } else {
            ExtractOutcome::Extracted
        }
    }
}
