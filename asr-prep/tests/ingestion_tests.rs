//! Corpus ingestion through the filesystem
//!
//! Covers:
//! - File list cache hits, misses on changed root order, and cache writes
//! - Fatal errors for unknown layouts and empty corpora
//! - TEDLIUM segment extraction outcomes
//! - Duration ordering with real WAV headers

mod helpers;

use asr_prep::audio::SymphoniaDurationProvider;
use asr_prep::models::{CorpusFormat, Sample};
use asr_prep::services::parsers::{CorpusParser, LibriSpeechParser, ParseContext, ParserTable};
use asr_prep::services::{CorpusIngestor, IngestOptions};
use asr_prep::types::DurationProvider;
use asr_prep::{PrepError, PrepResult};
use helpers::corpus::{self, RecordingExtractor};
use helpers::log_capture::capture_logs;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// LibriSpeech parser that counts how often it runs
struct CountingParser {
    calls: Arc<AtomicUsize>,
}

impl CorpusParser for CountingParser {
    fn parse(&self, root: &Path, ctx: &ParseContext<'_>) -> Vec<Sample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LibriSpeechParser.parse(root, ctx)
    }
}

fn counting_ingestor() -> (CorpusIngestor, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let parsers = ParserTable::standard().with_parser(
        CorpusFormat::LibriSpeech,
        Box::new(CountingParser {
            calls: Arc::clone(&calls),
        }),
    );
    let ingestor = CorpusIngestor::new(Arc::new(RecordingExtractor::new(f64::MAX))).with_parsers(parsers);
    (ingestor, calls)
}

fn paths(samples: &[Sample]) -> HashSet<PathBuf> {
    samples.iter().map(|s| s.audio_path.clone()).collect()
}

#[test]
fn test_cache_hit_skips_parsing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("libri");
    corpus::librispeech(&root, &["HELLO WORLD", "GOOD MORNING", "THANK YOU"]);
    let options = IngestOptions {
        size_ordering: false,
        file_cache: Some(temp_dir.path().join("train_cache.json")),
    };
    let (ingestor, calls) = counting_ingestor();

    let (first, capture) = capture_logs(|| ingestor.run(&[root.clone()], &options).unwrap());
    assert_eq!(first.len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    capture.assert_contains("Saving audio files list to cache file");
    assert!(temp_dir.path().join("train_cache.json").exists());

    let (second, capture) = capture_logs(|| ingestor.run(&[root.clone()], &options).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    capture.assert_contains("Using audio files list from cache file");
    // Cached order is returned verbatim, not reshuffled
    assert_eq!(second, first);
}

#[test]
fn test_cache_miss_on_reordered_roots() {
    let temp_dir = TempDir::new().unwrap();
    let first_root = temp_dir.path().join("libri-a");
    let second_root = temp_dir.path().join("libri-b");
    corpus::librispeech(&first_root, &["ONE", "TWO"]);
    corpus::librispeech(&second_root, &["THREE"]);
    let options = IngestOptions {
        size_ordering: false,
        file_cache: Some(temp_dir.path().join("cache.json")),
    };
    let (ingestor, calls) = counting_ingestor();

    let forward = ingestor
        .run(&[first_root.clone(), second_root.clone()], &options)
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let reversed = ingestor.run(&[second_root, first_root], &options).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(paths(&forward), paths(&reversed));
}

#[test]
fn test_unknown_layout_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let libri = temp_dir.path().join("libri");
    corpus::librispeech(&libri, &["HELLO"]);
    let notes = temp_dir.path().join("notes");
    std::fs::create_dir_all(&notes).unwrap();
    std::fs::write(notes.join("readme.md"), "not a corpus").unwrap();

    let (ingestor, _) = counting_ingestor();
    let result = ingestor.run(&[libri, notes.clone()], &IngestOptions::default());

    match result {
        Err(PrepError::UnknownFormat(root)) => assert_eq!(root, notes),
        other => panic!("expected UnknownFormat, got {:?}", other),
    }
}

#[test]
fn test_corpus_without_audio_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("libri");
    let chapter = corpus::librispeech(&root, &["HELLO", "WORLD"]);
    for entry in std::fs::read_dir(&chapter).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "flac") {
            std::fs::remove_file(path).unwrap();
        }
    }
    let options = IngestOptions {
        size_ordering: false,
        file_cache: Some(temp_dir.path().join("cache.json")),
    };

    let (ingestor, _) = counting_ingestor();
    match ingestor.run(&[root.clone()], &options) {
        Err(PrepError::EmptyCorpus { roots }) => assert_eq!(roots, vec![root]),
        other => panic!("expected EmptyCorpus, got {:?}", other),
    }
    assert!(!temp_dir.path().join("cache.json").exists());
}

#[test]
fn test_tedlium_extraction_outcomes() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("tedlium");
    let sph = corpus::tedlium(
        &root,
        "Talk_2010",
        &[
            "Talk_2010 1 inter_segment_gap 0.00 1.00 <o,,unknown> ignore_time_segment_in_scoring",
            "Talk_2010 1 Talk_2010 1.00 2.50 <o,f0,male> hello there",
            "Talk_2010 1 Talk_2010 3.00 4.00 <o,f0,male> ignore_time_segment_in_scoring",
            "Talk_2010 1 Talk_2010 5.00 6.75 <o,f0,male> already carved",
            "Talk_2010 1 Talk_2010 9.00 9.90 <o,f0,male> sox chokes here",
        ],
    );
    std::fs::write(sph.join("Talk_2010_5.00.wav"), b"").unwrap();

    let extractor = Arc::new(RecordingExtractor::new(9.0));
    let ingestor = CorpusIngestor::new(extractor.clone());
    let samples = ingestor.run(&[root], &IngestOptions::default()).unwrap();

    let expected: HashSet<PathBuf> = [sph.join("Talk_2010_1.00.wav"), sph.join("Talk_2010_5.00.wav")]
        .into_iter()
        .collect();
    assert_eq!(paths(&samples), expected);
    assert!(samples
        .iter()
        .any(|s| s.transcript == "hello there" && s.duration.is_none()));

    let calls = extractor.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, sph.join("Talk_2010.sph"));
    assert_eq!(calls[0].1, sph.join("Talk_2010_1.00.wav"));
    assert_eq!((calls[0].2, calls[0].3), (1.0, 2.5));
    assert_eq!(calls[1].1, sph.join("Talk_2010_9.00.wav"));
}

#[test]
fn test_size_ordering_sorts_by_duration() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("vystadial");
    let data = corpus::vystadial_transcripts(
        &root,
        &[
            ("a-long", "dlouhá věta"),
            ("b-broken", "rozbitý"),
            ("c-short", "krátká"),
            ("d-broken", "také rozbitý"),
            ("e-medium", "střední"),
        ],
    );
    corpus::write_wav(&data.join("a-long.wav"), 1.0, 8000);
    corpus::write_wav(&data.join("c-short.wav"), 0.25, 8000);
    corpus::write_wav(&data.join("e-medium.wav"), 0.5, 8000);
    std::fs::write(data.join("b-broken.wav"), b"not audio").unwrap();
    std::fs::write(data.join("d-broken.wav"), b"not audio either").unwrap();

    let ingestor = CorpusIngestor::new(Arc::new(RecordingExtractor::new(0.0)))
        .with_duration_provider(Arc::new(SymphoniaDurationProvider::new()));
    let options = IngestOptions {
        size_ordering: true,
        file_cache: None,
    };
    let samples = ingestor.run(&[root], &options).unwrap();

    let names: Vec<_> = samples
        .iter()
        .map(|s| s.audio_path.file_stem().unwrap().to_string_lossy().into_owned())
        .collect();
    // Unknown durations keep their discovery order at the end
    assert_eq!(names, vec!["c-short", "e-medium", "a-long", "b-broken", "d-broken"]);
    assert!((samples[0].duration.unwrap() - 0.25).abs() < 1e-6);
    assert!((samples[2].duration.unwrap() - 1.0).abs() < 1e-6);
    assert!(samples[3].duration.is_none());
}

/// Durations looked up by file stem
struct FixedDurations(HashMap<&'static str, f64>);

impl DurationProvider for FixedDurations {
    fn duration_seconds(&self, audio_path: &Path) -> PrepResult<f64> {
        let stem = audio_path.file_stem().unwrap().to_string_lossy();
        self.0
            .get(stem.as_ref())
            .copied()
            .ok_or_else(|| PrepError::Audio(format!("no duration for {}", stem)))
    }
}

#[test]
fn test_size_ordering_keeps_input_order_for_equal_durations() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("vystadial");
    let names = ["a-two", "b-one", "c-two", "d-one", "e-three"];
    let entries: Vec<(&str, &str)> = names.iter().map(|n| (*n, "ahoj")).collect();
    let data = corpus::vystadial_transcripts(&root, &entries);
    for name in names {
        std::fs::write(data.join(format!("{}.wav", name)), b"").unwrap();
    }
    let durations = FixedDurations(HashMap::from([
        ("a-two", 2.0),
        ("b-one", 1.0),
        ("c-two", 2.0),
        ("d-one", 1.0),
        ("e-three", 3.0),
    ]));

    let ingestor = CorpusIngestor::new(Arc::new(RecordingExtractor::new(0.0)))
        .with_duration_provider(Arc::new(durations));
    let options = IngestOptions {
        size_ordering: true,
        file_cache: None,
    };
    let samples = ingestor.run(&[root], &options).unwrap();

    let ordered: Vec<_> = samples
        .iter()
        .map(|s| s.audio_path.file_stem().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(ordered, vec!["b-one", "d-one", "a-two", "c-two", "e-three"]);
}

#[test]
fn test_shuffle_keeps_every_sample() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("libri");
    let utterances: Vec<String> = (0..40).map(|i| format!("UTTERANCE NUMBER {}", i)).collect();
    let refs: Vec<&str> = utterances.iter().map(String::as_str).collect();
    corpus::librispeech(&root, &refs);

    let (ingestor, _) = counting_ingestor();
    let samples = ingestor.run(&[root], &IngestOptions::default()).unwrap();

    assert_eq!(samples.len(), 40);
    let transcripts: HashSet<_> = samples.iter().map(|s| s.transcript.clone()).collect();
    assert_eq!(transcripts.len(), 40);
    assert!(transcripts.contains("utterance number 7"));
}

#[test]
fn test_duration_of_generated_wav() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tone.wav");
    corpus::write_wav(&path, 1.5, 16000);

    let duration = SymphoniaDurationProvider::new().duration_seconds(&path).unwrap();
    assert!((duration - 1.5).abs() < 1e-6);
}
