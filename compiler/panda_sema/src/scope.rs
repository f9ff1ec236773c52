//! Name lookup for one body or declaration context.
//!
//! Lookup order for a bare name:
//!
//! 1. block-local tables, innermost first
//! 2. inside a class: the class's own members, then its ancestors nearest
//!    first, then the same for each enclosing class of a nested class
//! 3. the enclosing namespace, then each ancestor namespace up to the root
//!
//! At every namespace level the declaration tables are searched before the
//! child namespace names. Within one table level the kinds are searched in
//! the order variables, functions, enums, classes, interfaces.

use panda_ir::ast::{BuiltinType, Expr, ExprKind, Ident, TypeExpr};
use panda_ir::Span;
use panda_llir::{BlockId, Constant, Value};
use panda_types::{Type, F32, F64, I1, I16, I32, I64, I8, U16, U32, U64, U8, VOID};
use rustc_hash::FxHashMap;

use crate::ids::{ClassId, EnumId, FuncId, InterfaceId, NamespaceId, VarId};
use crate::namespace::DeclTables;
use crate::program::{Owner, Program};
use crate::SemaError;

/// A block-local variable: a stack slot and its content type.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalVar {
    /// Pointer to the slot.
    pub ptr: Value,
    pub ty: Type,
    /// Folded initializer of a local `const`.
    pub const_value: Option<Constant>,
    pub span: Span,
}

/// What a name resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Local(LocalVar),
    Variable(VarId),
    Function(FuncId),
    Enum(EnumId),
    EnumMember(EnumId, usize),
    Class(ClassId),
    Interface(InterfaceId),
    Namespace(NamespaceId),
}

impl Symbol {
    /// Kind with its article, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Local(_) => "a local variable",
            Symbol::Variable(_) => "a variable",
            Symbol::Function(_) => "a function",
            Symbol::Enum(_) => "an enum",
            Symbol::EnumMember(..) => "an enum member",
            Symbol::Class(_) => "a class",
            Symbol::Interface(_) => "an interface",
            Symbol::Namespace(_) => "a namespace",
        }
    }
}

/// Result of resolving `qualifier.member`.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    /// `qualifier` is a value of class type; `member` is looked up through
    /// the class layout with the qualifier's value as receiver.
    Instance { qualifier: Symbol, class: ClassId },
    /// `qualifier` is a namespace, class or enum; `member` resolved to this.
    Static(Symbol),
}

/// Targets for `break` and `continue`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopTarget {
    pub break_block: BlockId,
    /// `None` for `switch`, which only captures `break`.
    pub continue_block: Option<BlockId>,
}

/// Lexical context: enclosing namespace, class and function, block-local
/// tables and loop targets.
pub struct Scope<'p> {
    program: &'p Program,
    pub namespace: NamespaceId,
    pub class: Option<ClassId>,
    pub function: Option<FuncId>,
    pub file: usize,
    blocks: Vec<FxHashMap<String, LocalVar>>,
    loops: Vec<LoopTarget>,
}

impl<'p> Scope<'p> {
    /// Context for resolving names inside a declaration at `owner`.
    pub fn for_owner(program: &'p Program, owner: Owner) -> Self {
        Scope {
            program,
            namespace: owner.namespace,
            class: owner.class,
            function: None,
            file: owner.file,
            blocks: Vec::new(),
            loops: Vec::new(),
        }
    }

    /// Context for lowering the body of `function`.
    pub fn for_function(program: &'p Program, function: FuncId) -> Self {
        let mut scope = Scope::for_owner(program, program.func(function).owner);
        scope.function = Some(function);
        scope
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    // ── Locals ──────────────────────────────────────────────────────

    pub fn push_block(&mut self) {
        self.blocks.push(FxHashMap::default());
    }

    pub fn pop_block(&mut self) {
        self.blocks.pop();
    }

    /// Declare a local in the innermost block. On a name clash in that block
    /// the first declaration is kept and its span returned.
    pub fn declare_local(&mut self, name: &Ident, local: LocalVar) -> Result<(), Span> {
        if self.blocks.is_empty() {
            self.push_block();
        }
        let Some(block) = self.blocks.last_mut() else {
            return Ok(());
        };
        if let Some(first) = block.get(&name.name) {
            return Err(first.span);
        }
        block.insert(name.name.clone(), local);
        Ok(())
    }

    pub fn find_local(&self, name: &str) -> Option<&LocalVar> {
        self.blocks.iter().rev().find_map(|block| block.get(name))
    }

    // ── Loops ───────────────────────────────────────────────────────

    pub fn push_loop(&mut self, target: LoopTarget) {
        self.loops.push(target);
    }

    pub fn pop_loop(&mut self) {
        self.loops.pop();
    }

    pub fn break_target(&self) -> Option<BlockId> {
        self.loops.last().map(|t| t.break_block)
    }

    pub fn continue_target(&self) -> Option<BlockId> {
        self.loops.iter().rev().find_map(|t| t.continue_block)
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Resolve a bare name with the full outward search.
    pub fn find_object(&self, name: &str) -> Option<Symbol> {
        if let Some(local) = self.find_local(name) {
            return Some(Symbol::Local(local.clone()));
        }
        self.find_declared(name)
    }

    /// Outward search skipping block locals.
    pub fn find_declared(&self, name: &str) -> Option<Symbol> {
        if let Some(class) = self.class {
            for enclosing in self.program.enclosing_classes(class) {
                if let Some(sym) = self.lookup_in_class_chain(enclosing, name) {
                    return Some(sym);
                }
            }
        }
        self.program
            .namespaces
            .ancestors(self.namespace)
            .find_map(|ns| self.lookup_in_namespace(ns, name))
    }

    /// Resolve `qualifier.member`.
    ///
    /// A class-typed value whose class has no `member` gives way to an enum
    /// of the same name that has one.
    pub fn find_selector(&self, qualifier: &str, member: &str) -> Option<Selector> {
        let sym = self.find_object(qualifier)?;
        if let Some(class) = self.instance_class(&sym) {
            if self.lookup_in_class_chain(class, member).is_none() {
                if let Some(found) = self.enum_fallback(qualifier, member) {
                    return Some(Selector::Static(found));
                }
            }
            return Some(Selector::Instance {
                qualifier: sym,
                class,
            });
        }
        self.member_symbol(&sym, member).map(Selector::Static)
    }

    /// `member` of the enum named `name`, skipping every other declaration
    /// called `name`.
    pub fn enum_fallback(&self, name: &str, member: &str) -> Option<Symbol> {
        let e = self.find_enum(name)?;
        let index = self.program.enum_(e).member(member)?;
        Some(Symbol::EnumMember(e, index))
    }

    /// Member reached through a chain of static qualifiers: `Ns.x`,
    /// `Class.f`, `Enum.A`, `a.b.Enum.A`. `None` when any qualifier is a
    /// value or nothing resolves.
    ///
    /// An identifier qualifier that names nothing with `member` is retried
    /// as an enum name.
    pub fn resolve_static_member(&self, parent: &Expr, member: &Ident) -> Option<Symbol> {
        match &parent.kind {
            ExprKind::Identifier(name) => match self.find_selector(name, &member.name) {
                Some(Selector::Static(sym)) => Some(sym),
                Some(Selector::Instance { .. }) => None,
                None => self.enum_fallback(name, &member.name),
            },
            ExprKind::MemberAccess {
                parent: inner,
                member: inner_member,
            } => {
                let qualifier = self.resolve_static_member(inner, inner_member)?;
                self.member_symbol(&qualifier, &member.name)
            }
            _ => None,
        }
    }

    /// Enum named `name`, ignoring every other kind of declaration.
    pub fn find_enum(&self, name: &str) -> Option<EnumId> {
        if let Some(class) = self.class {
            for enclosing in self.program.enclosing_classes(class) {
                for c in self.program.class_chain(enclosing) {
                    if let Some(&e) = self.program.class(c).tables.enums.get(name) {
                        return Some(e);
                    }
                }
            }
        }
        self.program
            .namespaces
            .ancestors(self.namespace)
            .find_map(|ns| self.program.namespaces.node(ns).tables.enums.get(name).copied())
    }

    /// Resolve a dotted path of declarations (`a.b.Point`).
    pub fn resolve_path(&self, segments: &[Ident]) -> Option<Symbol> {
        let (first, rest) = segments.split_first()?;
        let mut sym = self.find_declared(&first.name)?;
        for segment in rest {
            sym = self.member_symbol(&sym, &segment.name)?;
        }
        Some(sym)
    }

    /// Member `name` of a namespace, class (own and inherited), enum or
    /// interface symbol.
    pub fn member_symbol(&self, sym: &Symbol, name: &str) -> Option<Symbol> {
        match sym {
            Symbol::Namespace(ns) => self.lookup_in_namespace(*ns, name),
            Symbol::Class(class) => self.lookup_in_class_chain(*class, name),
            Symbol::Enum(e) => self
                .program
                .enum_(*e)
                .member(name)
                .map(|idx| Symbol::EnumMember(*e, idx)),
            Symbol::Interface(i) => self
                .program
                .interface(*i)
                .interfaces
                .get(name)
                .map(|&nested| Symbol::Interface(nested)),
            Symbol::Local(_)
            | Symbol::Variable(_)
            | Symbol::Function(_)
            | Symbol::EnumMember(..) => None,
        }
    }

    /// Class of a value-shaped symbol whose type is a class handle.
    pub fn instance_class(&self, sym: &Symbol) -> Option<ClassId> {
        match sym {
            Symbol::Local(local) => self.program.class_of_type(&local.ty),
            Symbol::Variable(var) => self.var_class(*var),
            _ => None,
        }
    }

    /// Class named by a variable's declared type, without lowering anything.
    pub fn var_class(&self, var: VarId) -> Option<ClassId> {
        let info = self.program.var(var);
        let Some(TypeExpr::Named(path)) = &info.decl.ty else {
            return None;
        };
        match Scope::for_owner(self.program, info.owner).resolve_path(&path.segments)? {
            Symbol::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn lookup_in_namespace(&self, ns: NamespaceId, name: &str) -> Option<Symbol> {
        let node = self.program.namespaces.node(ns);
        lookup_in_tables(&node.tables, name)
            .or_else(|| node.children.get(name).map(|&child| Symbol::Namespace(child)))
    }

    /// Own members of `class`, then inherited ones nearest first.
    pub fn lookup_in_class_chain(&self, class: ClassId, name: &str) -> Option<Symbol> {
        self.program
            .class_chain(class)
            .find_map(|c| lookup_in_tables(&self.program.class(c).tables, name))
    }

    /// Whether non-public members of `target` are visible here: the current
    /// class (or one enclosing it) is `target` or derives from it.
    pub fn self_context(&self, target: ClassId) -> bool {
        self.class.is_some_and(|class| {
            self.program
                .enclosing_classes(class)
                .any(|c| self.program.derives_from(c, target))
        })
    }

    // ── Types ───────────────────────────────────────────────────────

    /// IR type for a source type expression.
    pub fn resolve_type(&self, ty: &TypeExpr) -> Result<Type, SemaError> {
        match ty {
            TypeExpr::Builtin(builtin, _) => Ok(builtin_type(*builtin)),
            TypeExpr::Named(path) => match self.resolve_path(&path.segments) {
                Some(Symbol::Class(class)) => Ok(self.program.class_type(class)),
                Some(Symbol::Enum(_)) => Ok(I32),
                Some(Symbol::Interface(_)) => Ok(Type::i8_ptr()),
                _ => Err(SemaError::unresolved(path.dotted(), path.span)),
            },
        }
    }
}

fn lookup_in_tables(tables: &DeclTables, name: &str) -> Option<Symbol> {
    if let Some(&v) = tables.variables.get(name) {
        return Some(Symbol::Variable(v));
    }
    if let Some(&f) = tables.functions.get(name) {
        return Some(Symbol::Function(f));
    }
    if let Some(&e) = tables.enums.get(name) {
        return Some(Symbol::Enum(e));
    }
    if let Some(&c) = tables.classes.get(name) {
        return Some(Symbol::Class(c));
    }
    tables.interfaces.get(name).map(|&i| Symbol::Interface(i))
}

/// IR type of a keyword type. `char` is a 32-bit code point and `string` a
/// byte pointer.
pub fn builtin_type(builtin: BuiltinType) -> Type {
    match builtin {
        BuiltinType::Bool => I1,
        BuiltinType::Char | BuiltinType::I32 => I32,
        BuiltinType::I8 => I8,
        BuiltinType::I16 => I16,
        BuiltinType::I64 => I64,
        BuiltinType::U8 => U8,
        BuiltinType::U16 => U16,
        BuiltinType::U32 => U32,
        BuiltinType::U64 => U64,
        BuiltinType::F32 => F32,
        BuiltinType::F64 => F64,
        BuiltinType::String => Type::i8_ptr(),
        BuiltinType::Void => VOID,
    }
}
