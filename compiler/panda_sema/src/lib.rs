//! Semantic resolution and IR lowering for Panda.
//!
//! # Architecture
//!
//! Compilation runs in two phases over the parsed [`SourceFile`]s:
//!
//! 1. **Registration** ([`register_program`]): every declaration is moved
//!    into the [`Program`] arenas and entered into the declaration tables of
//!    its namespace or class. Class and interface parents are resolved once
//!    all files are in.
//! 2. **Lowering**: enums first, then class struct types, globals, function
//!    declarations and finally function bodies, in registration order.
//!    Constants and enum ordinals are evaluated on demand, so a global may
//!    use an enum declared after it.
//!
//! Name lookup during lowering goes through [`Scope`]; member access on
//! class values goes through the flat class layout.
//!
//! # Errors
//!
//! Every semantic error is a recoverable [`SemaError`]. It is queued as a
//! [`Diagnostic`], the offending construct yields no value, and lowering
//! continues. [`CompileOutput::into_result`] turns any error into a failure
//! for callers that need a clean module.
//!
//! # Tracing
//!
//! Passes are instrumented with `tracing`. Call [`init_tracing`] and set
//! `RUST_LOG=panda_sema=debug` to see registration, layout, constant
//! folding and member resolution decisions.

mod consteval;
mod error;
mod ids;
mod layout;
mod lower;
pub mod namespace;
mod options;
pub mod program;
mod register;
pub mod scope;
#[cfg(test)]
mod test_helpers;

use std::io::{self, Write};
use std::sync::Once;

use panda_diagnostic::emitter::{DiagnosticEmitter, PlainEmitter, SourceInfo};
use panda_diagnostic::{Diagnostic, DiagnosticQueue, Severity};
use panda_ir::ast::SourceFile;
use panda_llir::Module;

pub use error::SemaError;
pub use ids::{ClassId, EnumId, FuncId, InterfaceId, NamespaceId, VarId};
pub use options::CompileOptions;
pub use program::Program;
pub use register::register_program;
pub use scope::{LocalVar, LoopTarget, Scope, Selector, Symbol};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=panda_sema=debug` or `RUST_LOG=panda_sema=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Lowered module plus every diagnostic reported on the way, sorted by
/// position.
#[derive(Debug)]
pub struct CompileOutput {
    pub module: Module,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Render every diagnostic as plain text, then an error and warning
    /// count. `sources[i]` gives the path and text of input file `i`.
    pub fn emit_diagnostics<W: Write>(&self, writer: W, sources: &[SourceInfo]) -> io::Result<W> {
        let mut emitter = PlainEmitter::new(writer, sources);
        emitter.emit_all(&self.diagnostics)?;
        let errors = self.diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        emitter.emit_summary(errors, warnings)?;
        Ok(emitter.into_inner())
    }

    /// The module if no error was reported, otherwise all diagnostics.
    pub fn into_result(self) -> Result<Module, Vec<Diagnostic>> {
        if self.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(self.module)
        }
    }
}

/// Register and lower `files` into one IR module.
#[tracing::instrument(level = "debug", skip_all, fields(module = %options.module_name))]
pub fn compile(files: Vec<SourceFile>, options: &CompileOptions) -> CompileOutput {
    let mut diagnostics = DiagnosticQueue::with_config(options.diagnostics.clone());
    let program = register_program(files, &mut diagnostics);
    let (module, mut diagnostics) = lower::Lowerer::new(&program, options, diagnostics).lower();
    CompileOutput {
        module,
        diagnostics: diagnostics.flush(),
    }
}
