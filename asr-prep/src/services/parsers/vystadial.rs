//! Vystadial 2013 layout
//!
//! Every `<name>.wav` may have a `<name>.wav.trn` sibling whose first line is the
//! transcript. WAV files without one are not samples.

use super::{read_text, CorpusParser, ParseContext};
use crate::models::Sample;
use crate::services::label_normalizer::normalize_label;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct VystadialParser;

/// `<audio>.trn` next to `audio`
fn transcript_path(audio: &Path) -> PathBuf {
    let mut name = audio.as_os_str().to_owned();
    name.push(".trn");
    PathBuf::from(name)
}

impl CorpusParser for VystadialParser {
    fn parse(&self, root: &Path, ctx: &ParseContext<'_>) -> Vec<Sample> {
        let mut samples = Vec::new();

        for audio_file in ctx.scanner.find(root, ".wav") {
            let trn_file = transcript_path(&audio_file);
            if !trn_file.exists() {
                continue;
            }
            let Some(content) = read_text(&trn_file) else {
                continue;
            };
            let first_line = content.lines().next().unwrap_or_default();
            samples.push(Sample::new(audio_file, normalize_label(first_line)));
        }

        tracing::info!(root = %root.display(), count = samples.len(), "Parsed Vystadial 2013 corpus");
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::path_scanner::PathScanner;
    use crate::types::{ExtractOutcome, SegmentExtractor};
    use std::fs;
    use tempfile::TempDir;

    struct NoExtract;

    impl SegmentExtractor for NoExtract {
        fn extract_segment(&self, _: &Path, _: &Path, _: f64, _: f64) -> ExtractOutcome {
            ExtractOutcome::Failed
        }
    }

    #[test]
    fn test_first_line_of_trn_is_transcript() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("data").join("train");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("jurcic-001.wav"), "").unwrap();
        fs::write(data.join("jurcic-001.wav.trn"), "DOBRÝ DEN\nsecond line\n").unwrap();
        fs::write(data.join("jurcic-002.wav"), "").unwrap();

        let scanner = PathScanner::new();
        let ctx = ParseContext {
            scanner: &scanner,
            extractor: &NoExtract,
        };
        let samples = VystadialParser.parse(temp_dir.path(), &ctx);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].audio_path, data.join("jurcic-001.wav"));
        assert_eq!(samples[0].transcript, "dobrý den");
    }

    #[test]
    fn test_transcript_path_appends_suffix() {
        assert_eq!(
            transcript_path(Path::new("/a/b.wav")),
            PathBuf::from("/a/b.wav.trn")
        );
    }
}
