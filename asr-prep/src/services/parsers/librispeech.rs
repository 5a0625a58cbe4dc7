//! LibriSpeech layout
//!
//! `<speaker>/<chapter>/<speaker>-<chapter>.trans.txt` files list one utterance per line:
//! `<utterance-id> <TRANSCRIPT>`, with the audio at `<utterance-id>.flac` beside it.

use super::{read_text, CorpusParser, ParseContext};
use crate::models::Sample;
use crate::services::label_normalizer::normalize_label;
use std::path::Path;

/// Shorter leading tokens are not utterance ids; parsing of the file stops there
pub const MIN_UTTERANCE_ID_LEN: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct LibriSpeechParser;

impl LibriSpeechParser {
    fn parse_transcript_file(&self, text_file: &Path, samples: &mut Vec<Sample>) {
        let Some(content) = read_text(text_file) else {
            return;
        };
        let directory = text_file.parent().unwrap_or_else(|| Path::new(""));

        for line in content.split('\n') {
            let head = line.split(' ').next().unwrap_or_default();
            if head.chars().count() < MIN_UTTERANCE_ID_LEN {
                // Not an utterance line: the rest of this file is ignored
                break;
            }

            let audio_file = directory.join(format!("{}.flac", head));
            if audio_file.exists() {
                samples.push(Sample::new(audio_file, normalize_label(&line[head.len()..])));
            }
        }
    }
}

impl CorpusParser for LibriSpeechParser {
    fn parse(&self, root: &Path, ctx: &ParseContext<'_>) -> Vec<Sample> {
        let mut samples = Vec::new();
        for text_file in ctx.scanner.find(root, ".txt") {
            self.parse_transcript_file(&text_file, &mut samples);
        }
        tracing::info!(root = %root.display(), count = samples.len(), "Parsed LibriSpeech corpus");
        samples
    }
}
