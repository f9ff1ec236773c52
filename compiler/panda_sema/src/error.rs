//! Semantic errors and their diagnostics.

use panda_diagnostic::{Diagnostic, ErrorCode};
use panda_ir::Span;

/// A recoverable semantic error.
///
/// The offending construct yields no value; the error is queued as a
/// [`Diagnostic`] and lowering continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SemaError {
    #[error("`{name}` is already declared")]
    Redeclaration {
        name: String,
        span: Span,
        /// Span of the declaration that was kept.
        first: Option<Span>,
    },

    #[error("unresolved reference `{name}`")]
    UnresolvedReference { name: String, span: Span },

    #[error("{message}")]
    InvalidConstant { message: String, span: Span },

    #[error("{message}")]
    InvalidEnumValue { message: String, span: Span },

    #[error("{message}")]
    Inheritance { message: String, span: Span },

    #[error("{message}")]
    InvalidOperation { message: String, span: Span },
}

impl SemaError {
    pub fn redeclaration(name: impl Into<String>, span: Span, first: Option<Span>) -> Self {
        SemaError::Redeclaration {
            name: name.into(),
            span,
            first,
        }
    }

    pub fn unresolved(name: impl Into<String>, span: Span) -> Self {
        SemaError::UnresolvedReference {
            name: name.into(),
            span,
        }
    }

    pub fn invalid_constant(message: impl Into<String>, span: Span) -> Self {
        SemaError::InvalidConstant {
            message: message.into(),
            span,
        }
    }

    pub fn invalid_enum_value(message: impl Into<String>, span: Span) -> Self {
        SemaError::InvalidEnumValue {
            message: message.into(),
            span,
        }
    }

    pub fn inheritance(message: impl Into<String>, span: Span) -> Self {
        SemaError::Inheritance {
            message: message.into(),
            span,
        }
    }

    pub fn invalid_operation(message: impl Into<String>, span: Span) -> Self {
        SemaError::InvalidOperation {
            message: message.into(),
            span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SemaError::Redeclaration { .. } => ErrorCode::E2001,
            SemaError::UnresolvedReference { .. } => ErrorCode::E2002,
            SemaError::InvalidConstant { .. } => ErrorCode::E2003,
            SemaError::InvalidEnumValue { .. } => ErrorCode::E2004,
            SemaError::Inheritance { .. } => ErrorCode::E2005,
            SemaError::InvalidOperation { .. } => ErrorCode::E3001,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SemaError::Redeclaration { span, .. }
            | SemaError::UnresolvedReference { span, .. }
            | SemaError::InvalidConstant { span, .. }
            | SemaError::InvalidEnumValue { span, .. }
            | SemaError::Inheritance { span, .. }
            | SemaError::InvalidOperation { span, .. } => *span,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.span(), "");
        match self {
            SemaError::Redeclaration {
                first: Some(first), ..
            } => diag.with_secondary_label(first, "first declared here"),
            _ => diag,
        }
    }
}

impl From<SemaError> for Diagnostic {
    fn from(err: SemaError) -> Self {
        err.into_diagnostic()
    }
}
