//! Transcript text canonicalization
//!
//! Applied to every raw transcript before it becomes a [`Sample`](crate::Sample):
//! 1. Trim surrounding whitespace
//! 2. Lower-case
//! 3. Remove `.` `,` `?` `!` `:`
//! 4. Replace `-` and `_` with a space
//! 5. Replace each non-overlapping double space with one space, in a single pass
//!
//! Step 5 is not repeated, so runs of three or more spaces keep some extra spacing
//! (`"a   b"` becomes `"a  b"`). Existing cached sample lists depend on this exact output.

const STRIPPED: [char; 5] = ['.', ',', '?', '!', ':'];

/// Canonical form of a transcript
pub fn normalize_label(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let spaced: String = lowered
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    spaced.replace("  ", " ")
}
