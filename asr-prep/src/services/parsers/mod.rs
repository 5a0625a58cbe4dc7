//! Per-layout corpus parsers
//!
//! Each parser turns one corpus root into samples with unset duration. Transcripts
//! pass through [`normalize_label`](crate::services::label_normalizer::normalize_label)
//! before packaging. Missing sibling files (audio, transcript) drop the sample silently;
//! unreadable files are logged and skipped.

pub mod librispeech;
pub mod shtooka;
pub mod tags_index;
pub mod tedlium;
pub mod vystadial;

pub use librispeech::LibriSpeechParser;
pub use shtooka::ShtookaParser;
pub use tedlium::TedliumParser;
pub use vystadial::VystadialParser;

use crate::models::{CorpusFormat, Sample};
use crate::services::path_scanner::PathScanner;
use crate::types::SegmentExtractor;
use std::path::Path;

/// Shared collaborators handed to every parser call
pub struct ParseContext<'a> {
    pub scanner: &'a PathScanner,
    pub extractor: &'a dyn SegmentExtractor,
}

/// Extracts samples from one corpus root of a known layout
pub trait CorpusParser: Send + Sync {
    fn parse(&self, root: &Path, ctx: &ParseContext<'_>) -> Vec<Sample>;
}

/// Fixed dispatch from layout tag to parser
pub struct ParserTable {
    vystadial: Box<dyn CorpusParser>,
    tedlium: Box<dyn CorpusParser>,
    shtooka: Box<dyn CorpusParser>,
    librispeech: Box<dyn CorpusParser>,
}

impl ParserTable {
    /// Table with the built-in parser for every layout
    pub fn standard() -> Self {
        Self {
            vystadial: Box::new(VystadialParser),
            tedlium: Box::new(TedliumParser),
            shtooka: Box::new(ShtookaParser),
            librispeech: Box::new(LibriSpeechParser),
        }
    }

    /// Replace the parser used for `format`
    pub fn with_parser(mut self, format: CorpusFormat, parser: Box<dyn CorpusParser>) -> Self {
        *self.slot_mut(format) = parser;
        self
    }

    pub fn parser_for(&self, format: CorpusFormat) -> &dyn CorpusParser {
        match format {
            CorpusFormat::Vystadial2013 => self.vystadial.as_ref(),
            CorpusFormat::Tedlium => self.tedlium.as_ref(),
            CorpusFormat::Shtooka => self.shtooka.as_ref(),
            CorpusFormat::LibriSpeech => self.librispeech.as_ref(),
        }
    }

    fn slot_mut(&mut self, format: CorpusFormat) -> &mut Box<dyn CorpusParser> {
        match format {
            CorpusFormat::Vystadial2013 => &mut self.vystadial,
            CorpusFormat::Tedlium => &mut self.tedlium,
            CorpusFormat::Shtooka => &mut self.shtooka,
            CorpusFormat::LibriSpeech => &mut self.librispeech,
        }
    }
}

impl Default for ParserTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Read a text file, replacing invalid UTF-8; `None` (with a warning) if unreadable
pub(crate) fn read_text(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Cannot read transcript file: {}", e);
            None
        }
    }
}
