//! Compilation options.

use panda_diagnostic::DiagnosticConfig;
use rustc_hash::FxHashSet;

/// Configuration for one [`compile`](crate::compile) call.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Module name, printed in the `ModuleID` and `source_filename` lines.
    pub module_name: String,
    pub diagnostics: DiagnosticConfig,
    /// Qualified names of classes whose layout ignores inheritance.
    pub intrinsic_classes: FxHashSet<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            module_name: "main".to_owned(),
            diagnostics: DiagnosticConfig::default(),
            intrinsic_classes: ["string", "array"].into_iter().map(str::to_owned).collect(),
        }
    }
}

impl CompileOptions {
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Report every error instead of stopping at the configured limit.
    pub fn unlimited(mut self) -> Self {
        self.diagnostics = DiagnosticConfig::unlimited();
        self
    }

    pub fn is_intrinsic(&self, qualified: &str) -> bool {
        self.intrinsic_classes.contains(qualified)
    }
}
