//! Diagnostics for the Panda front end.
//!
//! Every diagnostic carries a stable [`ErrorCode`], a message, a primary
//! span and optional notes. Semantic passes never unwind on an error: they
//! push a [`Diagnostic`] into a [`DiagnosticQueue`] and keep going.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is only handed out by the queue when an error was
//! actually recorded, so a function returning `Result<T, ErrorGuaranteed>`
//! cannot fail silently.
//!
//! ```text
//! let guar = queue.emit_error(diag);
//! return Err(guar);
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
