//! Concrete audio capabilities backed by symphonia and the `sox` tool

pub mod duration;
pub mod sox_extractor;

pub use duration::SymphoniaDurationProvider;
pub use sox_extractor::SoxSegmentExtractor;
