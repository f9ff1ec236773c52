//! Canonical LLVM-style text for types.

use std::fmt::{self, Write};

use crate::ty::{FloatKind, StructType, Type};

/// Render `name` as an IR local/type identifier body: bare when it only
/// uses `[-a-zA-Z$._0-9]` and does not start with a digit, otherwise
/// double-quoted with `"`, `\` and non-printable bytes escaped as `\XX`.
pub fn quote_name(name: &str) -> String {
    let bare = !name.is_empty()
        && !name.as_bytes()[0].is_ascii_digit()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'$' | b'.' | b'_'));
    if bare {
        return name.to_owned();
    }
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for b in name.bytes() {
        if b == b'"' || b == b'\\' || !(0x20..0x7f).contains(&b) {
            let _ = write!(out, "\\{b:02X}");
        } else {
            out.push(char::from(b));
        }
    }
    out.push('"');
    out
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatKind::Float => f.write_str("float"),
            FloatKind::Double => f.write_str("double"),
        }
    }
}

/// Reference form: identified types print as `%name`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return write!(f, "%{}", quote_name(name));
        }
        write_body(self, f)
    }
}

impl Type {
    /// Body form, ignoring this type's own name (fields still render by
    /// reference). Used for `%name = type <body>` lines.
    pub fn definition_string(&self) -> String {
        struct Body<'a>(&'a Type);
        impl fmt::Display for Body<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_body(self.0, f)
            }
        }
        Body(self).to_string()
    }
}

fn write_body(ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Void => f.write_str("void"),
        Type::Label => f.write_str("label"),
        Type::Token => f.write_str("token"),
        Type::Int(i) => write!(f, "i{}", i.bits),
        Type::Float(kind) => write!(f, "{kind}"),
        Type::Pointer(p) => write!(f, "{}*", p.elem),
        Type::Function(func) => {
            write!(f, "{} (", func.ret)?;
            for (i, param) in func.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            if func.variadic {
                if func.params.is_empty() {
                    f.write_str("...")?;
                } else {
                    f.write_str(", ...")?;
                }
            }
            f.write_str(")")
        }
        Type::Array(a) => write!(f, "[{} x {}]", a.len, a.elem),
        Type::Vector(v) => {
            if v.scalable {
                write!(f, "<vscale x {} x {}>", v.len, v.elem)
            } else {
                write!(f, "<{} x {}>", v.len, v.elem)
            }
        }
        Type::Struct(s) => write_struct_body(s, f),
    }
}

fn write_struct_body(s: &StructType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if s.opaque {
        return f.write_str("opaque");
    }
    let (open, close) = if s.packed { ("<{", "}>") } else { ("{", "}") };
    if s.fields.is_empty() {
        return write!(f, "{open}{close}");
    }
    write!(f, "{open} ")?;
    for (i, field) in s.fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{field}")?;
    }
    write!(f, " {close}")
}
