//! Operands: constants and SSA values.

use std::fmt::{self, Write};

use panda_types::{quote_name, FloatKind, Type, I1};

use crate::LocalId;

// ── Constants ───────────────────────────────────────────────────────

/// A compile-time value. Renders without its type (`5`, `@g`, `null`).
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    /// Integer of type `ty`; `i1` renders as `true`/`false`.
    Int { ty: Type, value: i64 },
    /// Float of type `ty`, stored as the bits of the value widened to `f64`.
    Float { ty: Type, bits: u64 },
    Null { ty: Type },
    ZeroInitializer { ty: Type },
    /// Address of a global; `ty` is the pointer type.
    Global { name: String, ty: Type },
    /// Address of a function; `ty` is the pointer-to-function type.
    Function { name: String, ty: Type },
    /// `c"..."` byte array initializer (`ty` is `[N x i8]`).
    Bytes { ty: Type, bytes: Vec<u8> },
    /// `getelementptr inbounds` to the first byte of a byte-array global.
    StrPtr { global: String, len: u64 },
}

impl Constant {
    pub fn int(ty: Type, value: i64) -> Self {
        Constant::Int { ty, value }
    }

    pub fn bool(value: bool) -> Self {
        Constant::Int {
            ty: I1,
            value: i64::from(value),
        }
    }

    /// Float of type `ty`. An `f32` value is rounded to single precision
    /// before widening.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounding to f32 is the point"
    )]
    pub fn float(ty: Type, value: f64) -> Self {
        let value = match ty {
            Type::Float(FloatKind::Float) => f64::from(value as f32),
            _ => value,
        };
        Constant::Float {
            ty,
            bits: value.to_bits(),
        }
    }

    pub fn null(ty: Type) -> Self {
        Constant::Null { ty }
    }

    /// Zero of any type: `0`, `0.0`, `null` or `zeroinitializer`.
    pub fn zero(ty: Type) -> Self {
        match ty {
            Type::Int(_) => Constant::Int { ty, value: 0 },
            Type::Float(_) => Constant::Float { ty, bits: 0 },
            Type::Pointer(_) => Constant::Null { ty },
            _ => Constant::ZeroInitializer { ty },
        }
    }

    /// NUL-terminated byte array for `text`.
    pub fn c_string(text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        Constant::Bytes {
            ty: Type::array(bytes.len() as u64, panda_types::I8),
            bytes,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Constant::Int { ty, .. }
            | Constant::Float { ty, .. }
            | Constant::Null { ty }
            | Constant::ZeroInitializer { ty }
            | Constant::Global { ty, .. }
            | Constant::Function { ty, .. }
            | Constant::Bytes { ty, .. } => ty.clone(),
            Constant::StrPtr { .. } => Type::i8_ptr(),
        }
    }

    /// Integer payload, if this is an integer constant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Constant::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Constant::Float { bits, .. } => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int { ty, value } => {
                if ty.is_bool() {
                    f.write_str(if *value == 0 { "false" } else { "true" })
                } else {
                    write!(f, "{value}")
                }
            }
            Constant::Float { bits, .. } => write!(f, "0x{bits:016X}"),
            Constant::Null { .. } => f.write_str("null"),
            Constant::ZeroInitializer { .. } => f.write_str("zeroinitializer"),
            Constant::Global { name, .. } | Constant::Function { name, .. } => {
                write!(f, "@{}", quote_name(name))
            }
            Constant::Bytes { bytes, .. } => {
                let mut out = String::with_capacity(bytes.len() + 3);
                out.push_str("c\"");
                for &b in bytes {
                    if b == b'"' || b == b'\\' || !(0x20..0x7f).contains(&b) {
                        let _ = write!(out, "\\{b:02X}");
                    } else {
                        out.push(char::from(b));
                    }
                }
                out.push('"');
                f.write_str(&out)
            }
            Constant::StrPtr { global, len } => write!(
                f,
                "getelementptr inbounds ([{len} x i8], [{len} x i8]* @{}, i64 0, i64 0)",
                quote_name(global)
            ),
        }
    }
}

// ── Values ──────────────────────────────────────────────────────────

/// An instruction operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Constant(Constant),
    /// Function parameter, printed by name.
    Param { name: String, ty: Type },
    /// Result of an instruction in the current function.
    Local { id: LocalId, ty: Type },
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Constant(c) => c.ty(),
            Value::Param { ty, .. } | Value::Local { ty, .. } => ty.clone(),
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// `<type> <operand>`, as used in argument lists.
    pub fn typed(&self) -> String {
        format!("{} {}", self.ty(), self)
    }
}

impl From<Constant> for Value {
    fn from(c: Constant) -> Self {
        Value::Constant(c)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Constant(c) => write!(f, "{c}"),
            Value::Param { name, .. } => write!(f, "%{}", quote_name(name)),
            Value::Local { id, .. } => write!(f, "%v.{}", id.raw()),
        }
    }
}

#[cfg(test)]
mod tests;
