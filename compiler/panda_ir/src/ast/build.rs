//! Shorthand constructors for building trees in code.
//!
//! Every node gets [`Span::DUMMY`]; callers that care about positions set
//! the `span` fields afterwards.

use super::{
    Attributes, BinaryOp, Block, BuiltinType, Case, ClassDecl, Declaration, EnumDecl, EnumMember,
    Expr, ExprKind, FunctionDecl, Ident, InterfaceDecl, Literal, Modifier, Param, SourceFile,
    Stmt, StmtKind, Switch, TypeExpr, TypePath, UnaryOp, VariableDecl,
};
use crate::Span;

// ── Names and types ─────────────────────────────────────────────────

pub fn ident(name: &str) -> Ident {
    Ident::new(name, Span::DUMMY)
}

/// `a.b.C` split on dots.
pub fn path(dotted: &str) -> TypePath {
    TypePath::new(dotted.split('.').map(ident).collect(), Span::DUMMY)
}

pub fn builtin(ty: BuiltinType) -> TypeExpr {
    TypeExpr::Builtin(ty, Span::DUMMY)
}

pub fn named(dotted: &str) -> TypeExpr {
    TypeExpr::Named(path(dotted))
}

// ── Expressions ─────────────────────────────────────────────────────

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

pub fn int(value: i64) -> Expr {
    expr(ExprKind::Literal(Literal::Int(value)))
}

pub fn float(value: f64) -> Expr {
    expr(ExprKind::Literal(Literal::float(value)))
}

pub fn boolean(value: bool) -> Expr {
    expr(ExprKind::Literal(Literal::Bool(value)))
}

pub fn character(c: char) -> Expr {
    expr(ExprKind::Literal(Literal::Char(c)))
}

pub fn string(text: &str) -> Expr {
    expr(ExprKind::Literal(Literal::String(text.to_owned())))
}

pub fn null() -> Expr {
    expr(ExprKind::Literal(Literal::Null))
}

pub fn name(name: &str) -> Expr {
    expr(ExprKind::Identifier(name.to_owned()))
}

pub fn this() -> Expr {
    expr(ExprKind::This)
}

pub fn base() -> Expr {
    expr(ExprKind::Base)
}

pub fn member(parent: Expr, member: &str) -> Expr {
    expr(ExprKind::MemberAccess {
        parent: Box::new(parent),
        member: ident(member),
    })
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call {
        callee: Box::new(callee),
        args,
    })
}

pub fn new_object(class: &str, args: Vec<Expr>) -> Expr {
    expr(ExprKind::New {
        ty: path(class),
        args,
    })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    expr(ExprKind::Assign {
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn conditional(cond: Expr, then_value: Expr, else_value: Expr) -> Expr {
    expr(ExprKind::Conditional {
        cond: Box::new(cond),
        then_value: Box::new(then_value),
        else_value: Box::new(else_value),
    })
}

// ── Statements ──────────────────────────────────────────────────────

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block {
        stmts,
        span: Span::DUMMY,
    }
}

pub fn expr_stmt(e: Expr) -> Stmt {
    stmt(StmtKind::Expr(e))
}

pub fn local(decl: VariableDecl) -> Stmt {
    stmt(StmtKind::Declaration(decl))
}

pub fn ret(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(value))
}

pub fn if_else(cond: Expr, then_stmts: Vec<Stmt>, else_stmts: Option<Vec<Stmt>>) -> Stmt {
    stmt(StmtKind::If {
        cond,
        then_block: block(then_stmts),
        else_branch: else_stmts.map(|stmts| Box::new(stmt(StmtKind::Block(block(stmts))))),
    })
}

pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While {
        cond,
        body: block(body),
    })
}

pub fn for_loop(
    init: Option<Stmt>,
    cond: Option<Expr>,
    step: Option<Expr>,
    body: Vec<Stmt>,
) -> Stmt {
    stmt(StmtKind::For {
        init: init.map(Box::new),
        cond,
        step,
        body: block(body),
    })
}

pub fn switch(operand: Expr, cases: Vec<(Expr, Vec<Stmt>)>, default: Option<Vec<Stmt>>) -> Stmt {
    stmt(StmtKind::Switch(Switch {
        operand,
        cases: cases
            .into_iter()
            .map(|(value, body)| Case {
                value,
                body: block(body),
                span: Span::DUMMY,
            })
            .collect(),
        default: default.map(block),
    }))
}

pub fn break_stmt() -> Stmt {
    stmt(StmtKind::Break)
}

pub fn continue_stmt() -> Stmt {
    stmt(StmtKind::Continue)
}

// ── Declarations ────────────────────────────────────────────────────

/// `var name: ty = value`.
pub fn var(name: &str, ty: Option<TypeExpr>, value: Option<Expr>) -> VariableDecl {
    VariableDecl {
        attrs: Attributes::default(),
        name: ident(name),
        ty,
        value,
        is_const: false,
        span: Span::DUMMY,
    }
}

/// `const name = value`.
pub fn constant(name: &str, value: Expr) -> VariableDecl {
    VariableDecl {
        is_const: true,
        ..var(name, None, Some(value))
    }
}

pub fn param(name: &str, ty: TypeExpr) -> Param {
    Param {
        name: ident(name),
        ty,
    }
}

/// Function with a body.
pub fn function(
    name: &str,
    params: Vec<Param>,
    ret: Option<TypeExpr>,
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        body: Some(block(body)),
        ..extern_function(name, params, ret)
    }
}

/// Function declared without a body.
pub fn extern_function(name: &str, params: Vec<Param>, ret: Option<TypeExpr>) -> FunctionDecl {
    FunctionDecl {
        attrs: Attributes::default(),
        name: ident(name),
        is_destructor: false,
        type_params: Vec::new(),
        params,
        variadic: false,
        return_type: ret,
        body: None,
        span: Span::DUMMY,
    }
}

/// `~name()` with an empty body.
pub fn destructor(name: &str) -> FunctionDecl {
    FunctionDecl {
        is_destructor: true,
        ..function(name, Vec::new(), None, Vec::new())
    }
}

pub fn enumeration(name: &str, members: Vec<(&str, Option<Expr>)>) -> EnumDecl {
    EnumDecl {
        attrs: Attributes::default(),
        name: ident(name),
        members: members
            .into_iter()
            .map(|(member, value)| EnumMember {
                name: ident(member),
                value,
            })
            .collect(),
        span: Span::DUMMY,
    }
}

pub fn interface(name: &str, parents: &[&str], functions: Vec<FunctionDecl>) -> InterfaceDecl {
    InterfaceDecl {
        attrs: Attributes::default(),
        name: ident(name),
        type_params: Vec::new(),
        parents: parents.iter().map(|p| path(p)).collect(),
        functions,
        interfaces: Vec::new(),
        span: Span::DUMMY,
    }
}

pub fn class(name: &str, parents: &[&str], members: Vec<Declaration>) -> ClassDecl {
    ClassDecl {
        attrs: Attributes::default(),
        name: ident(name),
        type_params: Vec::new(),
        parents: parents.iter().map(|p| path(p)).collect(),
        members,
        span: Span::DUMMY,
    }
}

/// A file in the dotted `namespace` (empty for the root).
pub fn file(namespace: &str, declarations: Vec<Declaration>) -> SourceFile {
    let namespace = if namespace.is_empty() {
        Vec::new()
    } else {
        namespace.split('.').map(ident).collect()
    };
    SourceFile {
        namespace,
        declarations,
    }
}

/// Adds modifiers to a declaration.
pub trait WithModifier: Sized {
    fn with_modifier(self, modifier: Modifier) -> Self;

    fn public(self) -> Self {
        self.with_modifier(Modifier::PUBLIC)
    }

    fn static_(self) -> Self {
        self.with_modifier(Modifier::STATIC)
    }
}

macro_rules! impl_with_modifier {
    ($($ty:ty),*) => {
        $(impl WithModifier for $ty {
            fn with_modifier(mut self, modifier: Modifier) -> Self {
                self.attrs.modifier |= modifier;
                self
            }
        })*
    };
}

impl_with_modifier!(VariableDecl, FunctionDecl, EnumDecl, InterfaceDecl, ClassDecl);

impl From<VariableDecl> for Declaration {
    fn from(decl: VariableDecl) -> Self {
        Declaration::Variable(decl)
    }
}

impl From<FunctionDecl> for Declaration {
    fn from(decl: FunctionDecl) -> Self {
        Declaration::Function(decl)
    }
}

impl From<EnumDecl> for Declaration {
    fn from(decl: EnumDecl) -> Self {
        Declaration::Enum(decl)
    }
}

impl From<InterfaceDecl> for Declaration {
    fn from(decl: InterfaceDecl) -> Self {
        Declaration::Interface(decl)
    }
}

impl From<ClassDecl> for Declaration {
    fn from(decl: ClassDecl) -> Self {
        Declaration::Class(decl)
    }
}
