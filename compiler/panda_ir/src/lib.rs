//! Input tree for the Panda front end.
//!
//! The parser (an external collaborator) produces [`ast::SourceFile`] values;
//! the semantic passes in `panda_sema` consume them. Every node carries a
//! [`Span`] of byte offsets into its file.

pub mod ast;
mod span;

pub use span::{Span, SpanError};
