//! TEDLIUM layout
//!
//! Talks live in `sph/<talk>.sph` with segment lists in `stm/<talk>.stm`. Each STM line:
//!
//! ```text
//! <talk> <channel> <speaker> <start> <end> <label> <transcript...>
//! ```
//!
//! Every kept segment is carved into `sph/<talk>_<start>.wav` (once; existing files are
//! reused) and becomes one sample.

use super::{read_text, CorpusParser, ParseContext};
use crate::models::Sample;
use crate::services::label_normalizer::normalize_label;
use crate::types::ExtractOutcome;
use std::path::{Path, PathBuf};

/// Speaker field of non-speech gaps
pub const INTER_SEGMENT_GAP: &str = "inter_segment_gap";
/// Transcript of segments excluded from scoring
pub const IGNORE_SEGMENT: &str = "ignore_time_segment_in_scoring";

const STM_FIELDS: usize = 7;

/// One parsed STM line
#[derive(Debug, Clone, PartialEq)]
struct StmSegment<'a> {
    talk: &'a str,
    speaker: &'a str,
    start: &'a str,
    end: &'a str,
    transcript: &'a str,
}

/// Split into at most seven whitespace-separated fields; the last keeps inner spacing
fn split_stm_line(line: &str) -> Option<StmSegment<'_>> {
    let mut fields = Vec::with_capacity(STM_FIELDS);
    let mut rest = line.trim_start();
    while fields.len() < STM_FIELDS - 1 {
        let end = rest.find(char::is_whitespace)?;
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    let transcript = rest.trim_end();
    if transcript.is_empty() {
        return None;
    }

    Some(StmSegment {
        talk: fields[0],
        speaker: fields[2],
        start: fields[3],
        end: fields[4],
        transcript,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TedliumParser;

impl TedliumParser {
    fn parse_stm_file(&self, stm_file: &Path, ctx: &ParseContext<'_>, samples: &mut Vec<Sample>) {
        let Some(content) = read_text(stm_file) else {
            return;
        };
        let sph_dir = sph_directory(stm_file);

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some(segment) = split_stm_line(line) else {
                tracing::warn!(
                    stm = %stm_file.display(),
                    line = line_no + 1,
                    "Malformed STM line skipped"
                );
                continue;
            };
            if segment.speaker == INTER_SEGMENT_GAP || segment.transcript == IGNORE_SEGMENT {
                continue;
            }

            let (Ok(start), Ok(end)) = (segment.start.parse::<f64>(), segment.end.parse::<f64>())
            else {
                tracing::warn!(
                    stm = %stm_file.display(),
                    line = line_no + 1,
                    "Invalid segment timestamps skipped"
                );
                continue;
            };

            let sph_file = sph_dir.join(format!("{}.sph", segment.talk));
            let wav_file = sph_dir.join(format!("{}_{}.wav", segment.talk, segment.start));

            let outcome = if wav_file.exists() {
                ExtractOutcome::AlreadyExists
            } else {
                ctx.extractor.extract_segment(&sph_file, &wav_file, start, end)
            };

            if outcome.is_usable() {
                samples.push(Sample::new(wav_file, normalize_label(segment.transcript)));
            } else {
                tracing::warn!(
                    source = %sph_file.display(),
                    start,
                    end,
                    "Segment extraction failed, sample dropped"
                );
            }
        }
    }
}

/// `sph/` directory that sits next to the directory holding `stm_file`
fn sph_directory(stm_file: &Path) -> PathBuf {
    let stm_dir = stm_file.parent().unwrap_or_else(|| Path::new(""));
    stm_dir.parent().unwrap_or(stm_dir).join("sph")
}

impl CorpusParser for TedliumParser {
    fn parse(&self, root: &Path, ctx: &ParseContext<'_>) -> Vec<Sample> {
        let mut samples = Vec::new();
        for stm_file in ctx.scanner.find(root, ".stm") {
            self.parse_stm_file(&stm_file, ctx, &mut samples);
        }
        tracing::info!(root = %root.display(), count = samples.len(), "Parsed TEDLIUM corpus");
        samples
    }
}
