//! Thread-scoped tracing capture for assertions on emitted events

use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// Layer that stores the message of every event it sees
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.events().iter().any(|e| e.message.contains(pattern))
    }

    /// Messages at `level` or more severe
    pub fn at_least(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level <= level)
            .map(|e| e.message)
            .collect()
    }

    pub fn assert_contains(&self, pattern: &str) {
        assert!(
            self.contains(pattern),
            "no event matching '{}' among:\n{}",
            pattern,
            self.dump()
        );
    }

    pub fn assert_no_match(&self, pattern: &str) {
        assert!(
            !self.contains(pattern),
            "unexpected event matching '{}' among:\n{}",
            pattern,
            self.dump()
        );
    }

    fn dump(&self) -> String {
        self.events()
            .iter()
            .map(|e| format!("{} {}", e.level, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct MessageField(String);

impl Visit for MessageField {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageField(String::new());
        event.record(&mut message);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: message.0,
        });
    }
}

/// Run `f` with only a fresh capture subscribed on this thread
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn test_capture_is_scoped() {
        let (_, capture) = capture_logs(|| {
            info!("Reading corpus");
            warn!(path = "/x", "Cannot read transcript file");
        });
        info!("outside the capture");

        assert_eq!(capture.events().len(), 2);
        capture.assert_contains("Reading corpus");
        assert_eq!(capture.at_least(Level::WARN), vec!["Cannot read transcript file"]);
        capture.assert_no_match("outside");
    }

    #[test]
    #[should_panic(expected = "no event matching")]
    fn test_assert_contains_fails() {
        LogCapture::default().assert_contains("nonexistent pattern");
    }
}
