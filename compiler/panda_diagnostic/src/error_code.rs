use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E2xxx: Name resolution and declaration errors
/// - E3xxx: Lowering errors
/// - E9xxx: Internal compiler errors
///
/// Warnings use W#### with the same phase digits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Declaration / resolution errors (E2xxx)
    /// Name declared twice in one table
    E2001,
    /// Name does not resolve
    E2002,
    /// Expression is not a compile-time constant
    E2003,
    /// Invalid enum member value
    E2004,
    /// Invalid inheritance (parents, destructors, `base`)
    E2005,

    // Lowering errors (E3xxx)
    /// Operation not valid for its operands or context
    E3001,

    // Internal errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,

    // Warnings (W3xxx)
    /// Statement after a terminator is never lowered
    W3001,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E3001,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::W3001,
    ];

    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W3001 => "W3001",
        }
    }

    /// Short human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "redeclaration",
            ErrorCode::E2002 => "unresolved reference",
            ErrorCode::E2003 => "invalid constant",
            ErrorCode::E2004 => "invalid enum value",
            ErrorCode::E2005 => "invalid inheritance",
            ErrorCode::E3001 => "invalid operation",
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::E9002 => "too many errors",
            ErrorCode::W3001 => "unreachable statement",
        }
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Check if this code is reported as a warning (W prefix).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
