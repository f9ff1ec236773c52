//! Type values, predicates and equality.

use std::hash::{Hash, Hasher};

// ── Payloads ────────────────────────────────────────────────────────

/// Integer type. Signedness is a front-end convenience: it is neither
/// rendered nor compared.
#[derive(Copy, Clone, Debug)]
pub struct IntType {
    pub bits: u32,
    pub signed: bool,
}

impl IntType {
    /// Whether `value` is representable in this type.
    pub fn contains(self, value: i64) -> bool {
        if self.bits >= 64 {
            return self.signed || value >= 0;
        }
        if self.signed {
            let half = 1_i64 << (self.bits - 1);
            (-half..half).contains(&value)
        } else {
            (0..1_i64 << self.bits).contains(&value)
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatKind {
    /// IEEE 754 single precision.
    Float,
    /// IEEE 754 double precision.
    Double,
}

#[derive(Clone, Debug)]
pub struct FuncType {
    pub ret: Box<Type>,
    pub params: Vec<Type>,
    pub variadic: bool,
}

#[derive(Clone, Debug)]
pub struct PointerType {
    pub elem: Box<Type>,
    /// Set for an identified pointer type (`%name = type T*`).
    pub name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VectorType {
    pub len: u64,
    pub elem: Box<Type>,
    pub scalable: bool,
}

#[derive(Clone, Debug)]
pub struct ArrayType {
    pub len: u64,
    pub elem: Box<Type>,
}

#[derive(Clone, Debug)]
pub struct StructType {
    /// Set for an identified struct (`%name = type { ... }`).
    pub name: Option<String>,
    pub fields: Vec<Type>,
    pub packed: bool,
    /// Body not known; renders as `opaque`.
    pub opaque: bool,
}

impl StructType {
    /// Literal (unnamed) struct.
    pub fn literal(fields: Vec<Type>) -> Self {
        StructType {
            name: None,
            fields,
            packed: false,
            opaque: false,
        }
    }

    /// Identified struct with a body.
    pub fn named(name: impl Into<String>, fields: Vec<Type>) -> Self {
        StructType {
            name: Some(name.into()),
            fields,
            packed: false,
            opaque: false,
        }
    }

    /// Named reference to an identified struct, without its body.
    ///
    /// Used for a struct's own fields that point back to it.
    pub fn reference(name: impl Into<String>) -> Self {
        StructType {
            name: Some(name.into()),
            fields: Vec::new(),
            packed: false,
            opaque: true,
        }
    }
}

// ── Type ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Type {
    Void,
    Function(FuncType),
    Int(IntType),
    Float(FloatKind),
    Pointer(PointerType),
    Vector(VectorType),
    Label,
    Token,
    Array(ArrayType),
    Struct(StructType),
}

pub const VOID: Type = Type::Void;
pub const LABEL: Type = Type::Label;
pub const TOKEN: Type = Type::Token;
pub const I1: Type = Type::Int(IntType { bits: 1, signed: true });
pub const I8: Type = Type::Int(IntType { bits: 8, signed: true });
pub const I16: Type = Type::Int(IntType { bits: 16, signed: true });
pub const I32: Type = Type::Int(IntType { bits: 32, signed: true });
pub const I64: Type = Type::Int(IntType { bits: 64, signed: true });
pub const U8: Type = Type::Int(IntType { bits: 8, signed: false });
pub const U16: Type = Type::Int(IntType { bits: 16, signed: false });
pub const U32: Type = Type::Int(IntType { bits: 32, signed: false });
pub const U64: Type = Type::Int(IntType { bits: 64, signed: false });
pub const F32: Type = Type::Float(FloatKind::Float);
pub const F64: Type = Type::Float(FloatKind::Double);

impl Type {
    // ── Constructors ────────────────────────────────────────────────

    /// Pointer to `elem`.
    pub fn pointer_to(elem: Type) -> Type {
        Type::Pointer(PointerType {
            elem: Box::new(elem),
            name: None,
        })
    }

    /// `i8*`, the untyped byte pointer.
    pub fn i8_ptr() -> Type {
        Type::pointer_to(I8)
    }

    pub fn function(ret: Type, params: Vec<Type>, variadic: bool) -> Type {
        Type::Function(FuncType {
            ret: Box::new(ret),
            params,
            variadic,
        })
    }

    pub fn array(len: u64, elem: Type) -> Type {
        Type::Array(ArrayType {
            len,
            elem: Box::new(elem),
        })
    }

    pub fn vector(len: u64, elem: Type, scalable: bool) -> Type {
        Type::Vector(VectorType {
            len,
            elem: Box::new(elem),
            scalable,
        })
    }

    /// Reference to the identified struct `name`.
    pub fn named_struct(name: impl Into<String>) -> Type {
        Type::Struct(StructType::reference(name))
    }

    // ── Predicates ──────────────────────────────────────────────────

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float(_))
    }

    pub fn is_number(&self) -> bool {
        self.is_int() || self.is_float()
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector(_))
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Type::Label)
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Type::Token)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Type::Function(_))
    }

    /// `i1`.
    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Int(IntType { bits: 1, .. }))
    }

    /// Pointer to a function type.
    pub fn is_func_pointer(&self) -> bool {
        self.pointee().is_some_and(Type::is_func)
    }

    /// Pointer to a pointer to a function type, e.g. a function-typed slot.
    pub fn is_func_pointer_pointer(&self) -> bool {
        self.pointee().is_some_and(Type::is_func_pointer)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Element type of a pointer.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(p) => Some(&p.elem),
            _ => None,
        }
    }

    /// Signature of a function or of a pointer to a function.
    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            Type::Function(f) => Some(f),
            Type::Pointer(p) => match p.elem.as_ref() {
                Type::Function(f) => Some(f),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn int_bits(&self) -> Option<u32> {
        match self {
            Type::Int(i) => Some(i.bits),
            _ => None,
        }
    }

    /// Name of an identified struct or pointer.
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Struct(s) => s.name.as_deref(),
            Type::Pointer(p) => p.name.as_deref(),
            _ => None,
        }
    }

    /// Whether `self` and `other` denote the same IR type.
    pub fn equal(a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::Void, Type::Void) | (Type::Label, Type::Label) | (Type::Token, Type::Token) => {
                true
            }
            (Type::Int(x), Type::Int(y)) => x.bits == y.bits,
            (Type::Float(x), Type::Float(y)) => x == y,
            (Type::Pointer(x), Type::Pointer(y)) => {
                if x.name.is_some() || y.name.is_some() {
                    return x.name == y.name;
                }
                Type::equal(&x.elem, &y.elem)
            }
            (Type::Struct(x), Type::Struct(y)) => {
                if x.name.is_some() || y.name.is_some() {
                    return x.name == y.name;
                }
                x.packed == y.packed
                    && x.fields.len() == y.fields.len()
                    && x.fields.iter().zip(&y.fields).all(|(f, g)| Type::equal(f, g))
            }
            (Type::Function(x), Type::Function(y)) => {
                x.variadic == y.variadic
                    && x.params.len() == y.params.len()
                    && Type::equal(&x.ret, &y.ret)
                    && x.params.iter().zip(&y.params).all(|(p, q)| Type::equal(p, q))
            }
            (Type::Array(x), Type::Array(y)) => x.len == y.len && Type::equal(&x.elem, &y.elem),
            (Type::Vector(x), Type::Vector(y)) => {
                x.len == y.len && x.scalable == y.scalable && Type::equal(&x.elem, &y.elem)
            }
            _ => false,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Type::equal(self, other)
    }
}

impl Eq for Type {}

/// Hashes only what [`Type::equal`] compares.
impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Type::Void | Type::Label | Type::Token => {}
            Type::Int(i) => i.bits.hash(state),
            Type::Float(k) => k.hash(state),
            Type::Pointer(p) => match &p.name {
                Some(name) => name.hash(state),
                None => p.elem.hash(state),
            },
            Type::Struct(s) => match &s.name {
                Some(name) => name.hash(state),
                None => {
                    s.packed.hash(state);
                    s.fields.hash(state);
                }
            },
            Type::Function(f) => {
                f.ret.hash(state);
                f.params.hash(state);
                f.variadic.hash(state);
            }
            Type::Array(a) => {
                a.len.hash(state);
                a.elem.hash(state);
            }
            Type::Vector(v) => {
                v.len.hash(state);
                v.scalable.hash(state);
                v.elem.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests;
