//! Registered declarations.
//!
//! Registration moves every declaration out of the input tree into per-kind
//! arenas addressed by typed ids. After registration (and parent
//! resolution) the [`Program`] is only read.

use panda_ir::ast::{Attributes, EnumMember, FunctionDecl, Ident, TypePath, VariableDecl};
use panda_ir::Span;
use panda_types::Type;
use rustc_hash::FxHashMap;

use crate::ids::{ClassId, EnumId, FuncId, InterfaceId, NamespaceId, VarId};
use crate::namespace::{DeclTables, NamespaceTree};

/// Where a declaration lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Owner {
    pub namespace: NamespaceId,
    /// Innermost enclosing class, if any.
    pub class: Option<ClassId>,
    /// Index of the input file the declaration came from.
    pub file: usize,
}

#[derive(Clone, Debug)]
pub struct VarInfo {
    pub decl: VariableDecl,
    pub owner: Owner,
    pub qualified: String,
}

impl VarInfo {
    /// Non-static variable declared in a class body.
    pub fn is_field(&self) -> bool {
        self.owner.class.is_some() && !self.decl.attrs.modifier.is_static()
    }
}

#[derive(Clone, Debug)]
pub struct FuncInfo {
    pub decl: FunctionDecl,
    pub owner: Owner,
    pub qualified: String,
}

impl FuncInfo {
    /// Non-static function declared in a class body; takes `this` first.
    pub fn is_method(&self) -> bool {
        self.owner.class.is_some() && !self.decl.attrs.modifier.is_static()
    }
}

#[derive(Clone, Debug)]
pub struct EnumInfo {
    pub attrs: Attributes,
    pub name: Ident,
    /// Members with unique names, in declaration order.
    pub members: Vec<EnumMember>,
    pub member_index: FxHashMap<String, usize>,
    pub owner: Owner,
    pub qualified: String,
    pub span: Span,
}

impl EnumInfo {
    pub fn member(&self, name: &str) -> Option<usize> {
        self.member_index.get(name).copied()
    }

    /// Global holding member `index`: `<enum path>.<member>`.
    pub fn member_global(&self, index: usize) -> String {
        format!("{}.{}", self.qualified, self.members[index].name.name)
    }
}

#[derive(Clone, Debug)]
pub struct InterfaceInfo {
    pub attrs: Attributes,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub parent_paths: Vec<TypePath>,
    /// Resolved parent interfaces.
    pub parents: Vec<InterfaceId>,
    /// Signatures with unique names.
    pub functions: Vec<FunctionDecl>,
    pub function_index: FxHashMap<String, usize>,
    /// Nested interfaces.
    pub interfaces: FxHashMap<String, InterfaceId>,
    pub owner: Owner,
    pub qualified: String,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub attrs: Attributes,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub parent_paths: Vec<TypePath>,
    /// The single parent class, once resolved.
    pub parent: Option<ClassId>,
    pub interfaces: Vec<InterfaceId>,
    pub tables: DeclTables,
    /// Variables in declaration order (fields and statics).
    pub variables: Vec<VarId>,
    pub owner: Owner,
    pub qualified: String,
    pub span: Span,
}

/// All registered declarations plus the namespace tree.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub namespaces: NamespaceTree,
    pub variables: Vec<VarInfo>,
    pub functions: Vec<FuncInfo>,
    pub enums: Vec<EnumInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub classes: Vec<ClassInfo>,
    /// Qualified class name to class; class struct types use the same name.
    pub class_by_name: FxHashMap<String, ClassId>,
}

impl Program {
    pub fn var(&self, id: VarId) -> &VarInfo {
        &self.variables[id.index()]
    }

    pub fn func(&self, id: FuncId) -> &FuncInfo {
        &self.functions[id.index()]
    }

    pub fn enum_(&self, id: EnumId) -> &EnumInfo {
        &self.enums[id.index()]
    }

    pub fn interface(&self, id: InterfaceId) -> &InterfaceInfo {
        &self.interfaces[id.index()]
    }

    pub fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.index()]
    }

    pub fn var_ids(&self) -> impl Iterator<Item = VarId> {
        (0..self.variables.len()).map(VarId::from_len)
    }

    pub fn func_ids(&self) -> impl Iterator<Item = FuncId> {
        (0..self.functions.len()).map(FuncId::from_len)
    }

    pub fn enum_ids(&self) -> impl Iterator<Item = EnumId> {
        (0..self.enums.len()).map(EnumId::from_len)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId::from_len)
    }

    /// `class` followed by its ancestors, nearest first.
    pub fn class_chain(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(Some(class), |&c| self.class(c).parent)
    }

    /// `class` followed by its enclosing classes, innermost first.
    pub fn enclosing_classes(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(Some(class), |&c| self.class(c).owner.class)
    }

    /// Whether `class` is `ancestor` or inherits from it.
    pub fn derives_from(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.class_chain(class).any(|c| c == ancestor)
    }

    /// Declaration tables of the class or namespace that owns `owner`.
    pub fn owner_tables(&self, owner: Owner) -> &DeclTables {
        match owner.class {
            Some(class) => &self.class(class).tables,
            None => &self.namespaces.node(owner.namespace).tables,
        }
    }

    /// Class whose handle type is `ty` (`%<qualified class>*`).
    pub fn class_of_type(&self, ty: &Type) -> Option<ClassId> {
        let Type::Struct(s) = ty.pointee()? else {
            return None;
        };
        self.class_by_name.get(s.name.as_deref()?).copied()
    }

    /// Handle type of `class`: a pointer to its named struct.
    pub fn class_type(&self, class: ClassId) -> Type {
        Type::pointer_to(Type::named_struct(self.class(class).qualified.clone()))
    }

    /// Dotted name for `name` declared at `owner`.
    pub fn qualify(&self, owner: Owner, name: &str) -> String {
        match owner.class {
            Some(class) => format!("{}.{name}", self.class(class).qualified),
            None => self.namespaces.qualify(owner.namespace, name),
        }
    }
}
