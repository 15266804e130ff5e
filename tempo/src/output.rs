//! Labeled output lines and where they go.
//!
//! Lessons never print directly. They write [`Line`]s through an
//! [`Output`], which forwards to a [`Sink`]: the [`Console`] in the
//! binary, or a [`Transcript`] that records lines for inspection.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// The stream a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

/// One line of lesson output, shown as `label: text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: String,
    pub channel: Channel,
    pub text: String,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.text)
    }
}

/// Destination for output lines.
pub trait Sink: Send + Sync {
    fn emit(&self, line: Line);
}

/// Writes stdout lines to standard output and stderr lines to standard
/// error, one locked write per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl Sink for Console {
    fn emit(&self, line: Line) {
        // Write errors, such as a closed pipe, are ignored.
        let _ = match line.channel {
            Channel::Stdout => writeln!(io::stdout().lock(), "{line}"),
            Channel::Stderr => writeln!(io::stderr().lock(), "{line}"),
        };
    }
}

/// Records every line with the instant it was emitted.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<(Instant, Line)>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<Line> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Lines with the time each was emitted.
    pub fn timed_lines(&self) -> Vec<(Instant, Line)> {
        self.lines.lock().unwrap().clone()
    }

    /// Rendered `label: text` strings of one channel, in emission order.
    pub fn rendered(&self, channel: Channel) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, line)| line.channel == channel)
            .map(|(_, line)| line.to_string())
            .collect()
    }
}

impl Sink for Transcript {
    fn emit(&self, line: Line) {
        self.lines.lock().unwrap().push((Instant::now(), line));
    }
}

/// Cheap, cloneable handle lessons write through.
#[derive(Clone)]
pub struct Output {
    sink: Arc<dyn Sink>,
}

impl Output {
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    pub fn console() -> Self {
        Self::new(Console)
    }

    /// Emits `label: text` on stdout.
    pub fn say(&self, label: impl Into<String>, text: impl fmt::Display) {
        self.emit(label.into(), Channel::Stdout, text);
    }

    /// Emits `label: text` on stderr.
    pub fn error(&self, label: impl Into<String>, text: impl fmt::Display) {
        self.emit(label.into(), Channel::Stderr, text);
    }

    fn emit(&self, label: String, channel: Channel, text: impl fmt::Display) {
        self.sink.emit(Line {
            label,
            channel,
            text: text.to_string(),
        });
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}
