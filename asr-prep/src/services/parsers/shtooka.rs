//! Shtooka layout
//!
//! Each pack directory holds an `index.tags.txt` descriptor. Every section names an
//! audio file relative to the descriptor; its `SWAC_TEXT` tag is the transcript.

use super::tags_index::TagsIndex;
use super::{read_text, CorpusParser, ParseContext};
use crate::models::Sample;
use crate::services::label_normalizer::normalize_label;
use std::path::{Component, Path};

pub const DESCRIPTOR_FILENAME: &str = "index.tags.txt";
pub const TEXT_TAG: &str = "SWAC_TEXT";

#[derive(Debug, Clone, Copy, Default)]
pub struct ShtookaParser;

impl ShtookaParser {
    fn parse_descriptor(&self, descriptor: &Path, samples: &mut Vec<Sample>) {
        let Some(content) = read_text(descriptor) else {
            return;
        };
        let index = TagsIndex::parse(&content);
        let directory = descriptor.parent().unwrap_or_else(|| Path::new(""));

        for section in index.sections() {
            if !is_pack_relative(section) {
                tracing::warn!(
                    descriptor = %descriptor.display(),
                    section,
                    "Section names a file outside the pack, skipped"
                );
                continue;
            }
            let audio_file = directory.join(section);
            // Sections such as [GENERAL] name no file and fall out here
            if !audio_file.exists() {
                continue;
            }
            match index.get(section, TEXT_TAG) {
                Some(text) => samples.push(Sample::new(audio_file, normalize_label(text))),
                None => tracing::warn!(
                    descriptor = %descriptor.display(),
                    section,
                    "Audio entry without SWAC_TEXT skipped"
                ),
            }
        }
    }
}

/// Plain relative path that stays inside the descriptor's directory
fn is_pack_relative(section: &str) -> bool {
    Path::new(section)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl CorpusParser for ShtookaParser {
    fn parse(&self, root: &Path, ctx: &ParseContext<'_>) -> Vec<Sample> {
        let mut samples = Vec::new();
        for descriptor in ctx.scanner.find(root, DESCRIPTOR_FILENAME) {
            self.parse_descriptor(&descriptor, &mut samples);
        }
        tracing::info!(root = %root.display(), count = samples.len(), "Parsed Shtooka corpus");
        samples
    }
}
