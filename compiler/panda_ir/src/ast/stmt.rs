//! Statement nodes.

use super::{Expr, VariableDecl};
use crate::Span;

/// `{ ... }` with its own local scope.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Block(Block),
    /// Local `var`/`const` declaration.
    Declaration(VariableDecl),
    Expr(Expr),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then_block: Block,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Block,
    },
    Switch(Switch),
    Break,
    Continue,
}

/// `switch (operand) { case v: ... default: ... }`.
///
/// Cases never fall through into the next case.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Switch {
    pub operand: Expr,
    pub cases: Vec<Case>,
    pub default: Option<Block>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Case {
    pub value: Expr,
    pub body: Block,
    pub span: Span,
}
