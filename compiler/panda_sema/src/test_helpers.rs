//! Fixtures shared by the unit tests.

use panda_diagnostic::{Diagnostic, DiagnosticQueue};
use panda_ir::ast::SourceFile;

use crate::lower::Lowerer;
use crate::{compile, register_program, CompileOptions, CompileOutput, Program};

pub(crate) fn options() -> CompileOptions {
    CompileOptions::default().unlimited()
}

pub(crate) fn compile_files(files: Vec<SourceFile>) -> CompileOutput {
    compile(files, &options())
}

/// Register `files`, failing the test on any registration error.
pub(crate) fn registered(files: Vec<SourceFile>) -> Program {
    let mut queue = DiagnosticQueue::with_config(options().diagnostics);
    let program = register_program(files, &mut queue);
    let diags = queue.flush();
    assert!(diags.is_empty(), "registration failed: {diags:?}");
    program
}

pub(crate) fn lowerer<'p>(program: &'p Program, options: &'p CompileOptions) -> Lowerer<'p> {
    Lowerer::new(program, options, DiagnosticQueue::with_config(options.diagnostics.clone()))
}

/// Diagnostics collected by `lowerer` so far.
pub(crate) fn diagnostics(lowerer: Lowerer<'_>) -> Vec<Diagnostic> {
    let (_, mut queue) = lowerer.into_parts();
    queue.flush()
}

pub(crate) fn messages(diags: &[Diagnostic]) -> Vec<String> {
    diags.iter().map(|d| d.message.clone()).collect()
}
