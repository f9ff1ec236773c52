//! Diagnostic queue: collects, deduplicates and sorts diagnostics.
//!
//! - Error limit, after which further errors are counted but dropped
//! - Deduplication of consecutive errors at the same position with the same
//!   message prefix
//! - Position-sorted output on [`DiagnosticQueue::flush`]
//! - [`ErrorGuaranteed`] proof that errors were emitted

use std::hash::{Hash, Hasher};

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Number of characters compared when deduplicating messages.
const MESSAGE_PREFIX_LEN: usize = 30;

#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error repeating the previous error's position and message prefix.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Sort key: input file, then byte offset of the primary span.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
struct Position {
    file: usize,
    offset: u32,
}

impl Position {
    fn of(diag: &Diagnostic) -> Self {
        Position {
            file: diag.file.unwrap_or(0),
            offset: diag.primary_span().map_or(0, |s| s.start),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    position: Position,
}

/// Position-tagged sink for diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::with_config(config);
/// queue.emit_error(diag);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    /// Errors rejected because the limit was reached.
    dropped: usize,
    /// Position and message prefix hash of the last accepted error.
    last_error: Option<(Position, u64)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic. Returns `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();
        let position = Position::of(&diag);

        if is_error && self.limit_reached() {
            self.dropped += 1;
            return false;
        }

        if is_error && self.config.deduplicate {
            let key = (position, message_prefix_hash(&diag.message));
            if self.last_error == Some(key) {
                return false;
            }
            self.last_error = Some(key);
        }

        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            position,
        });
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// The proof is returned even when the diagnostic itself was filtered:
    /// an equivalent error is already in the queue or the limit was hit.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a non-error");
        self.add(diag);
        ErrorGuaranteed::new()
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Number of errors kept.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// `Some` if at least one error was emitted.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count + self.dropped)
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    ///
    /// When errors were dropped by the limit, a trailing "too many errors"
    /// diagnostic is appended.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        // Stable: diagnostics at one position keep emission order.
        self.diagnostics.sort_by_key(|d| d.position);

        let mut result: Vec<Diagnostic> =
            self.diagnostics.drain(..).map(|d| d.diagnostic).collect();
        if self.dropped > 0 {
            result.push(too_many_errors(self.config.error_limit, self.dropped));
        }

        self.error_count = 0;
        self.dropped = 0;
        self.last_error = None;
        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }
}

#[cold]
fn too_many_errors(limit: usize, dropped: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
        .with_note(format!("{dropped} further error(s) were not reported"))
}

#[cfg(test)]
mod tests;
