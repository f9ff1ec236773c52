//! Input tree produced by the parser.
//!
//! Nodes own their children (`Box`/`Vec`) and carry a [`Span`](crate::Span).
//! Semantic passes consume a `Vec<SourceFile>`.

pub mod build;
mod expr;
mod items;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind, Literal};
pub use items::{
    Attributes, BuiltinType, ClassDecl, Declaration, EnumDecl, EnumMember, FunctionDecl, Ident,
    InterfaceDecl, Metadata, Modifier, Param, SourceFile, TypeExpr, TypePath, VariableDecl,
};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Block, Case, Stmt, StmtKind, Switch};
