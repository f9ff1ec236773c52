//! Expression nodes.
//!
//! `ExprKind` is a closed set. The member-access resolver matches on the
//! parent's kind exhaustively, so adding a variant forces every resolver arm
//! to be revisited.

use super::{BinaryOp, Ident, TypePath, UnaryOp};
use crate::Span;

/// Literal value as written in source.
///
/// Floats are stored as `u64` bits so the tree can derive `Eq` and `Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(i64),
    Float(u64),
    Bool(bool),
    Char(char),
    String(String),
    Null,
}

impl Literal {
    /// Build a float literal from its value.
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }

    /// Short description of the literal's kind for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "bool",
            Literal::Char(_) => "char",
            Literal::String(_) => "string",
            Literal::Null => "null",
        }
    }
}

/// An expression with its source span.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Literal(Literal),

    /// Bare name: `x`.
    Identifier(String),

    /// The method's implicit receiver.
    This,

    /// The method's receiver viewed as its parent class.
    Base,

    /// Object construction: `new T(args)`.
    New { ty: TypePath, args: Vec<Expr> },

    /// `parent.member`.
    MemberAccess { parent: Box<Expr>, member: Ident },

    /// `callee(args)`.
    Call { callee: Box<Expr>, args: Vec<Expr> },

    Unary { op: UnaryOp, operand: Box<Expr> },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `target = value`.
    Assign { target: Box<Expr>, value: Box<Expr> },

    /// `cond ? then_value : else_value`.
    Conditional {
        cond: Box<Expr>,
        then_value: Box<Expr>,
        else_value: Box<Expr>,
    },
}

impl ExprKind {
    /// Short description of the expression's shape for diagnostics.
    pub const fn shape_name(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "literal",
            ExprKind::Identifier(_) => "identifier",
            ExprKind::This => "`this`",
            ExprKind::Base => "`base`",
            ExprKind::New { .. } => "`new` expression",
            ExprKind::MemberAccess { .. } => "member access",
            ExprKind::Call { .. } => "call",
            ExprKind::Unary { .. } => "unary expression",
            ExprKind::Binary { .. } => "binary expression",
            ExprKind::Assign { .. } => "assignment",
            ExprKind::Conditional { .. } => "conditional expression",
        }
    }
}
