//! Transcript to label-index encoding
//!
//! The acoustic model predicts over a fixed alphabet. Each character maps to its
//! position in [`ALPHABET`]; an end-of-sequence marker is appended to every label.

use crate::{PrepError, PrepResult};

/// Output alphabet, index = label id
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz .'-_";

/// Appended to every encoded transcript
pub const END_OF_SEQUENCE: char = '_';

const REMOVED: [char; 6] = ['.', ',', '?', '\'', '!', ':'];

/// Encodes transcripts into label ids
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelEncoder;

impl LabelEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Number of distinct labels
    pub fn num_labels(&self) -> usize {
        ALPHABET.chars().count()
    }

    /// Label ids for `transcript`, ending with the end-of-sequence id
    ///
    /// Fails with [`PrepError::MalformedLabel`] on the first character outside the alphabet.
    pub fn encode(&self, transcript: &str) -> PrepResult<Vec<usize>> {
        transcript
            .chars()
            .filter(|c| !REMOVED.contains(c))
            .chain(std::iter::once(END_OF_SEQUENCE))
            .map(|c| {
                ALPHABET
                    .chars()
                    .position(|a| a == c)
                    .ok_or_else(|| PrepError::MalformedLabel {
                        transcript: transcript.to_string(),
                        character: c,
                    })
            })
            .collect()
    }

    /// Inverse of [`encode`](Self::encode), stopping at the end-of-sequence marker
    pub fn decode(&self, labels: &[usize]) -> String {
        labels
            .iter()
            .filter_map(|&id| ALPHABET.chars().nth(id))
            .take_while(|&c| c != END_OF_SEQUENCE)
            .collect()
    }
}
