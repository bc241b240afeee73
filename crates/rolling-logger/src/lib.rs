//! Rolling in-memory log buffer.
//!
//! `init_logger` installs a `tracing` subscriber whose only layer formats each
//! event into one line, keeps the last `capacity` lines and forwards every line
//! to a caller-supplied sink (the browser console, stderr, or nothing).

use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

pub type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,

    #[error("capacity must be positive")]
    ZeroCapacity,

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Bounded line buffer; the oldest line is dropped when full.
pub struct RollingBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Buffered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Default)]
struct LineVisitor {
    message: Option<String>,
    fields: BTreeMap<&'static str, String>,
}

impl LineVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name(), value);
        }
    }
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record(field, value.to_string());
    }
}

/// `<timestamp> <LEVEL> <target>: <message> key=value...`
fn format_line(event: &Event<'_>) -> String {
    let mut visitor = LineVisitor::default();
    event.record(&mut visitor);

    let metadata = event.metadata();
    let mut line = format!(
        "{} {} {}: {}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        metadata.level(),
        metadata.target(),
        visitor.message.unwrap_or_default(),
    );
    for (key, value) in visitor.fields {
        let _ = write!(line, " {key}={value}");
    }
    line
}

pub struct RollingLayer {
    buffer: Arc<RollingBuffer>,
    sink: Sink,
}

impl RollingLayer {
    pub fn new(buffer: Arc<RollingBuffer>, sink: Sink) -> Self {
        Self { buffer, sink }
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = format_line(event);
        (self.sink)(*event.metadata().level(), &line);
        self.buffer.push(line);
    }
}

static BUFFER: OnceLock<Arc<RollingBuffer>> = OnceLock::new();

/// Install the global subscriber. Events at `DEBUG` and above are kept.
pub fn init_logger(app_name: &str, capacity: usize, sink: Sink) -> Result<(), LoggerError> {
    if capacity == 0 {
        return Err(LoggerError::ZeroCapacity);
    }
    if BUFFER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let buffer = Arc::new(RollingBuffer::new(capacity));
    tracing_subscriber::registry()
        .with(RollingLayer::new(buffer.clone(), sink).with_filter(LevelFilter::DEBUG))
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;
    BUFFER
        .set(buffer)
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    tracing::info!(app = app_name, capacity, "logger initialized");
    Ok(())
}

/// Lines currently held by the global buffer, oldest first.
pub fn recent() -> Vec<String> {
    BUFFER.get().map(|buffer| buffer.lines()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(capacity: usize) -> (Arc<RollingBuffer>, Arc<Mutex<Vec<(Level, String)>>>, impl Subscriber + Send + Sync) {
        let buffer = Arc::new(RollingBuffer::new(capacity));
        let forwarded = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = forwarded.clone();
        let sink: Sink = Box::new(move |level: Level, line: &str| {
            sink_lines.lock().unwrap().push((level, line.to_string()));
        });
        let subscriber = tracing_subscriber::registry().with(RollingLayer::new(buffer.clone(), sink));
        (buffer, forwarded, subscriber)
    }

    #[test]
    fn test_buffer_drops_oldest() {
        let buffer = RollingBuffer::new(2);
        buffer.push("one".into());
        buffer.push("two".into());
        buffer.push("three".into());
        assert_eq!(buffer.lines(), vec!["two".to_string(), "three".to_string()]);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_layer_formats_fields() {
        let (buffer, forwarded, subscriber) = capture(10);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(list = "co_z1", count = 3, "resolution failed");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" WARN "));
        assert!(lines[0].ends_with("resolution failed count=3 list=co_z1"));

        let forwarded = forwarded.lock().unwrap();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0], (Level::WARN, lines[0].clone()));
    }

    #[test]
    fn test_layer_keeps_capacity() {
        let (buffer, _, subscriber) = capture(3);
        tracing::subscriber::with_default(subscriber, || {
            for i in 0..5 {
                tracing::info!("line {i}");
            }
        });
        let lines = buffer.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("line 2"));
        assert!(lines[2].ends_with("line 4"));
    }

    // The only test that installs the global subscriber.
    #[test]
    fn test_init_fills_recent() {
        assert!(recent().is_empty());
        init_logger("test", 4, Box::new(|_: Level, _: &str| {})).unwrap();
        assert!(recent().iter().any(|line| line.contains("logger initialized") && line.ends_with("app=test capacity=4")));

        let again = init_logger("test", 4, Box::new(|_: Level, _: &str| {}));
        assert!(matches!(again, Err(LoggerError::AlreadyInitialized)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = init_logger("test", 0, Box::new(|_: Level, _: &str| {}));
        assert!(matches!(result, Err(LoggerError::ZeroCapacity)));
    }
}
