//! Audio duration probing
//!
//! Reads the frame count and sample rate from the container header; nothing is decoded.

use crate::types::DurationProvider;
use crate::{PrepError, PrepResult};
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDurationProvider;

impl SymphoniaDurationProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DurationProvider for SymphoniaDurationProvider {
    fn duration_seconds(&self, audio_path: &Path) -> PrepResult<f64> {
        let file = std::fs::File::open(audio_path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = audio_path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| PrepError::Audio(format!("{}: {}", audio_path.display(), e)))?;

        let track = probed
            .format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| PrepError::Audio(format!("{}: no audio track", audio_path.display())))?;

        let params = &track.codec_params;
        match (params.n_frames, params.sample_rate) {
            (Some(frames), Some(rate)) if rate > 0 => Ok(frames as f64 / f64::from(rate)),
            _ => Err(PrepError::Audio(format!(
                "{}: frame count or sample rate unknown",
                audio_path.display()
            ))),
        }
    }
}
