//! Plain-text rendering of diagnostics.
//!
//! ```text
//! error[E2001]: `x` is already declared in this class
//!   --> shapes.pd:4:9
//!   = note: first declaration kept
//! ```

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Severity};

/// Sink for rendered diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()>;

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) -> io::Result<()> {
        for diag in diagnostics {
            self.emit(diag)?;
        }
        Ok(())
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> io::Result<()>;
}

/// A named source text, used to turn spans into `path:line:col`.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub path: String,
    pub text: String,
    lines: LineOffsetTable,
}

impl SourceInfo {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineOffsetTable::build(&text);
        SourceInfo {
            path: path.into(),
            text,
            lines,
        }
    }
}

/// Uncolored, line-oriented emitter.
///
/// `sources[i]` describes input file `i`; diagnostics whose file is unknown
/// fall back to printing raw byte ranges.
pub struct PlainEmitter<'a, W: Write> {
    writer: W,
    sources: &'a [SourceInfo],
}

impl<'a, W: Write> PlainEmitter<'a, W> {
    pub fn new(writer: W, sources: &'a [SourceInfo]) -> Self {
        PlainEmitter { writer, sources }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn location(&self, diag: &Diagnostic, offset: u32) -> Option<String> {
        let source = self.sources.get(diag.file?)?;
        let (line, col) = source.lines.offset_to_line_col(&source.text, offset);
        Some(format!("{}:{line}:{col}", source.path))
    }
}

impl<W: Write> DiagnosticEmitter for PlainEmitter<'_, W> {
    fn emit(&mut self, diag: &Diagnostic) -> io::Result<()> {
        writeln!(self.writer, "{}[{}]: {}", diag.severity, diag.code, diag.message)?;
        for label in &diag.labels {
            let marker = if label.is_primary { "-->" } else { "..." };
            let at = self
                .location(diag, label.span.start)
                .unwrap_or_else(|| format!("{:?}", label.span));
            if label.message.is_empty() {
                writeln!(self.writer, "  {marker} {at}")?;
            } else {
                writeln!(self.writer, "  {marker} {at}: {}", label.message)?;
            }
        }
        for note in &diag.notes {
            writeln!(self.writer, "  = note: {note}")?;
        }
        Ok(())
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> io::Result<()> {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match (error_count, warning_count) {
            (0, 0) => Ok(()),
            (e, 0) => writeln!(self.writer, "{}: {e} error{}", Severity::Error, plural(e)),
            (0, w) => writeln!(self.writer, "{}: {w} warning{}", Severity::Warning, plural(w)),
            (e, w) => writeln!(
                self.writer,
                "{}: {e} error{}, {w} warning{}",
                Severity::Error,
                plural(e),
                plural(w)
            ),
        }
    }
}
