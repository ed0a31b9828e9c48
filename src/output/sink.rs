use std::sync::{Arc, Mutex, PoisonError};

use console::Term;
use tracing::{debug, info};

use super::style::FieldStyle;

/// Placeholder marking where the next style applies.
pub const STYLE_MARKER: &str = "%c";

/// One log line: text segments, each carrying its own style.
///
/// The `%c` template form is derived on demand, so text that happens to
/// contain `%c` never desynchronizes markers and styles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledLine {
    segments: Vec<(FieldStyle, String)>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, style: FieldStyle, text: impl Into<String>) -> Self {
        self.segments.push((style, text.into()));
        self
    }

    pub fn segments(&self) -> &[(FieldStyle, String)] {
        &self.segments
    }

    /// Template with one `%c` per segment.
    pub fn template(&self) -> String {
        self.segments
            .iter()
            .map(|(_, text)| format!("{}{}", STYLE_MARKER, text))
            .collect()
    }

    /// One style per marker in `template()`.
    pub fn styles(&self) -> Vec<FieldStyle> {
        self.segments.iter().map(|(style, _)| *style).collect()
    }

    /// The line with markers and styles dropped.
    pub fn plain(&self) -> String {
        self.segments.iter().map(|(_, text)| text.as_str()).collect()
    }

    pub fn render_ansi(&self) -> String {
        self.segments
            .iter()
            .map(|(style, text)| {
                style
                    .to_console()
                    .force_styling(true)
                    .apply_to(text)
                    .to_string()
            })
            .collect()
    }
}

/// Where formatted lines end up.
pub trait ConsoleSink: Send + Sync {
    fn write_line(&self, line: &StyledLine);
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Arc<S> {
    fn write_line(&self, line: &StyledLine) {
        (**self).write_line(line)
    }
}

/// Terminal output, colored when the terminal supports it.
#[derive(Debug, Clone)]
pub struct AnsiConsole {
    term: Term,
    colors: bool,
}

impl AnsiConsole {
    pub fn stdout() -> Self {
        let term = Term::stdout();
        let colors = term.features().colors_supported();
        Self { term, colors }
    }

    pub fn stderr() -> Self {
        let term = Term::stderr();
        let colors = term.features().colors_supported();
        Self { term, colors }
    }

    pub fn without_colors(mut self) -> Self {
        self.colors = false;
        self
    }

    pub fn colors_enabled(&self) -> bool {
        self.colors
    }
}

impl ConsoleSink for AnsiConsole {
    fn write_line(&self, line: &StyledLine) {
        let rendered = if self.colors { line.render_ansi() } else { line.plain() };
        if let Err(e) = self.term.write_line(&rendered) {
            debug!("console write failed: {}", e);
        }
    }
}

/// Forwards the plain line as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn write_line(&self, line: &StyledLine) {
        info!(target: "spylog", "{}", line.plain());
    }
}

/// Keeps every line in memory.
#[derive(Debug, Clone, Default)]
pub struct CaptureConsole {
    lines: Arc<Mutex<Vec<StyledLine>>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<StyledLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn plain_lines(&self) -> Vec<String> {
        self.lines().iter().map(StyledLine::plain).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConsoleSink for CaptureConsole {
    fn write_line(&self, line: &StyledLine) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.clone());
    }
}
