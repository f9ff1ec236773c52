//! Declarations: variables, functions, enums, interfaces and classes.

use bitflags::bitflags;

use super::{Block, Expr, Literal};
use crate::Span;

bitflags! {
    /// Declaration modifiers.
    ///
    /// Two modifier sets are equal only when every flag matches.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifier: u8 {
        const PUBLIC = 1 << 0;
        const STATIC = 1 << 1;
        const ASYNC  = 1 << 2;
        const INLINE = 1 << 3;
    }
}

impl Modifier {
    #[inline]
    pub fn is_public(self) -> bool {
        self.contains(Modifier::PUBLIC)
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Modifier::STATIC)
    }
}

/// One `@name(...)` annotation on a declaration.
///
/// `text` holds a bare string argument (`@doc("...")`); `values` holds
/// `key = literal` pairs. Keys must be unique within one annotation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Metadata {
    pub name: String,
    pub text: Option<String>,
    pub values: Vec<(Ident, Literal)>,
    pub span: Span,
}

/// Modifiers plus metadata attached to a declaration.
///
/// `resolved` is filled by earlier tooling with metadata it understood;
/// `custom` carries everything else verbatim.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Attributes {
    pub modifier: Modifier,
    pub custom: Vec<Metadata>,
    pub resolved: Vec<Metadata>,
}

impl Attributes {
    pub fn with_modifier(modifier: Modifier) -> Self {
        Attributes {
            modifier,
            ..Attributes::default()
        }
    }
}

/// A name with the span it was written at.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

// ── Types ───────────────────────────────────────────────────────────

/// Primitive types spelled with a keyword.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Pointer to a NUL-terminated byte sequence.
    String,
    Void,
}

impl BuiltinType {
    pub const fn as_str(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Char => "char",
            BuiltinType::I8 => "i8",
            BuiltinType::I16 => "i16",
            BuiltinType::I32 => "i32",
            BuiltinType::I64 => "i64",
            BuiltinType::U8 => "u8",
            BuiltinType::U16 => "u16",
            BuiltinType::U32 => "u32",
            BuiltinType::U64 => "u64",
            BuiltinType::F32 => "f32",
            BuiltinType::F64 => "f64",
            BuiltinType::String => "string",
            BuiltinType::Void => "void",
        }
    }
}

/// A dotted reference to a declared type, e.g. `geometry.Point<T>`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypePath {
    pub segments: Vec<Ident>,
    pub type_args: Vec<TypeExpr>,
    pub span: Span,
}

impl TypePath {
    pub fn new(segments: Vec<Ident>, span: Span) -> Self {
        TypePath {
            segments,
            type_args: Vec::new(),
            span,
        }
    }

    /// Dotted source form of the path.
    pub fn dotted(&self) -> String {
        let names: Vec<&str> = self.segments.iter().map(Ident::as_str).collect();
        names.join(".")
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExpr {
    Builtin(BuiltinType, Span),
    Named(TypePath),
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Builtin(_, span) => *span,
            TypeExpr::Named(path) => path.span,
        }
    }
}

// ── Declarations ────────────────────────────────────────────────────

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Declaration {
    Variable(VariableDecl),
    Function(FunctionDecl),
    Enum(EnumDecl),
    Interface(InterfaceDecl),
    Class(ClassDecl),
}

impl Declaration {
    pub fn name(&self) -> &Ident {
        match self {
            Declaration::Variable(d) => &d.name,
            Declaration::Function(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Interface(d) => &d.name,
            Declaration::Class(d) => &d.name,
        }
    }

    pub fn attrs(&self) -> &Attributes {
        match self {
            Declaration::Variable(d) => &d.attrs,
            Declaration::Function(d) => &d.attrs,
            Declaration::Enum(d) => &d.attrs,
            Declaration::Interface(d) => &d.attrs,
            Declaration::Class(d) => &d.attrs,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Variable(d) => d.span,
            Declaration::Function(d) => d.span,
            Declaration::Enum(d) => d.span,
            Declaration::Interface(d) => d.span,
            Declaration::Class(d) => d.span,
        }
    }
}

/// `var name: T = value` or `const name = value`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct VariableDecl {
    pub attrs: Attributes,
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
    pub is_const: bool,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub attrs: Attributes,
    /// For a destructor this is the name after `~`.
    pub name: Ident,
    pub is_destructor: bool,
    pub type_params: Vec<Ident>,
    pub params: Vec<Param>,
    pub variadic: bool,
    /// `None` means `void`.
    pub return_type: Option<TypeExpr>,
    /// `None` for a bodiless declaration (extern or interface signature).
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumMember {
    pub name: Ident,
    pub value: Option<Expr>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumDecl {
    pub attrs: Attributes,
    pub name: Ident,
    pub members: Vec<EnumMember>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InterfaceDecl {
    pub attrs: Attributes,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub parents: Vec<TypePath>,
    pub functions: Vec<FunctionDecl>,
    pub interfaces: Vec<InterfaceDecl>,
    pub span: Span,
}

/// A class body may hold any declaration kind, including nested classes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDecl {
    pub attrs: Attributes,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub parents: Vec<TypePath>,
    pub members: Vec<Declaration>,
    pub span: Span,
}

/// One parsed file: its `namespace a.b.c;` path and top-level declarations.
///
/// An empty namespace path places declarations at the root.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SourceFile {
    pub namespace: Vec<Ident>,
    pub declarations: Vec<Declaration>,
}
