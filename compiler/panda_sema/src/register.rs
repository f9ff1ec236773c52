//! Registration pass.
//!
//! Moves every declaration of every input file into the [`Program`]
//! arenas, filling the namespace and class declaration tables. Once all
//! files are in, class and interface parents are resolved against the
//! complete tables, so declaration order never matters.

use panda_diagnostic::DiagnosticQueue;
use panda_ir::ast::{
    Attributes, ClassDecl, Declaration, EnumDecl, EnumMember, FunctionDecl, InterfaceDecl,
    SourceFile, VariableDecl,
};
use panda_ir::Span;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::ids::{ClassId, EnumId, FuncId, InterfaceId, VarId};
use crate::namespace::{insert_declaration, DeclTables};
use crate::program::{ClassInfo, EnumInfo, FuncInfo, InterfaceInfo, Owner, Program, VarInfo};
use crate::scope::{Scope, Symbol};
use crate::SemaError;

/// Register all `files` and resolve class and interface parents.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn register_program(files: Vec<SourceFile>, diagnostics: &mut DiagnosticQueue) -> Program {
    let mut registrar = Registrar {
        program: Program::default(),
        diagnostics,
        file: 0,
    };
    for (file, source) in files.into_iter().enumerate() {
        registrar.file = file;
        let namespace = registrar
            .program
            .namespaces
            .resolve_qualified_path(&source.namespace);
        let owner = Owner {
            namespace,
            class: None,
            file,
        };
        for decl in source.declarations {
            registrar.declaration(decl, owner);
        }
    }
    registrar.resolve_class_parents();
    registrar.resolve_interface_parents();
    debug!(
        classes = registrar.program.classes.len(),
        functions = registrar.program.functions.len(),
        "registration done"
    );
    registrar.program
}

struct Registrar<'d> {
    program: Program,
    diagnostics: &'d mut DiagnosticQueue,
    file: usize,
}

impl Registrar<'_> {
    fn report(&mut self, err: SemaError, file: usize) {
        self.diagnostics.add(err.into_diagnostic().in_file(file));
    }

    fn tables_mut(&mut self, owner: Owner) -> &mut DeclTables {
        match owner.class {
            Some(class) => &mut self.program.classes[class.index()].tables,
            None => &mut self.program.namespaces.node_mut(owner.namespace).tables,
        }
    }

    fn declaration(&mut self, decl: Declaration, owner: Owner) {
        self.check_metadata(decl.attrs());
        match decl {
            Declaration::Variable(var) => self.variable(var, owner),
            Declaration::Function(func) => self.function(func, owner),
            Declaration::Enum(e) => self.enum_decl(e, owner),
            Declaration::Interface(i) => {
                self.interface(i, owner, None);
            }
            Declaration::Class(class) => self.class(class, owner),
        }
    }

    /// Keys inside one metadata entry must be unique.
    fn check_metadata(&mut self, attrs: &Attributes) {
        let mut errors = Vec::new();
        for meta in &attrs.custom {
            let mut seen: FxHashMap<&str, Span> = FxHashMap::default();
            for (key, _) in &meta.values {
                if let Some(&first) = seen.get(key.as_str()) {
                    errors.push(SemaError::redeclaration(
                        format!("{}.{}", meta.name, key.name),
                        key.span,
                        Some(first),
                    ));
                } else {
                    seen.insert(key.as_str(), key.span);
                }
            }
        }
        for err in errors {
            self.report(err, self.file);
        }
    }

    fn variable(&mut self, decl: VariableDecl, owner: Owner) {
        let id = VarId::from_len(self.program.variables.len());
        if let Err(existing) = insert_declaration(&mut self.tables_mut(owner).variables, &decl.name, id)
        {
            let first = self.program.var(existing).decl.name.span;
            self.report(
                SemaError::redeclaration(&decl.name.name, decl.name.span, Some(first)),
                self.file,
            );
            return;
        }
        let qualified = self.program.qualify(owner, &decl.name.name);
        if let Some(class) = owner.class {
            self.program.classes[class.index()].variables.push(id);
        }
        self.program.variables.push(VarInfo {
            decl,
            owner,
            qualified,
        });
    }

    fn function(&mut self, decl: FunctionDecl, owner: Owner) {
        let key = if decl.is_destructor {
            let Some(class) = owner.class else {
                self.report(
                    SemaError::inheritance(
                        format!("destructor `~{}` declared outside a class", decl.name.name),
                        decl.name.span,
                    ),
                    self.file,
                );
                return;
            };
            let class_name = &self.program.class(class).name.name;
            if *class_name != decl.name.name {
                let message = format!(
                    "destructor `~{}` does not match class `{class_name}`",
                    decl.name.name
                );
                self.report(SemaError::inheritance(message, decl.name.span), self.file);
                return;
            }
            format!("~{}", decl.name.name)
        } else {
            decl.name.name.clone()
        };

        let id = FuncId::from_len(self.program.functions.len());
        let table = &mut self.tables_mut(owner).functions;
        if let Some(&existing) = table.get(&key) {
            let first = self.program.func(existing).decl.name.span;
            self.report(
                SemaError::redeclaration(key, decl.name.span, Some(first)),
                self.file,
            );
            return;
        }
        table.insert(key.clone(), id);
        let qualified = self.program.qualify(owner, &key);
        self.program.functions.push(FuncInfo {
            decl,
            owner,
            qualified,
        });
    }

    fn enum_decl(&mut self, decl: EnumDecl, owner: Owner) {
        let id = EnumId::from_len(self.program.enums.len());
        if let Err(existing) = insert_declaration(&mut self.tables_mut(owner).enums, &decl.name, id) {
            let first = self.program.enum_(existing).name.span;
            self.report(
                SemaError::redeclaration(&decl.name.name, decl.name.span, Some(first)),
                self.file,
            );
            return;
        }

        let mut members: Vec<EnumMember> = Vec::with_capacity(decl.members.len());
        let mut member_index: FxHashMap<String, usize> = FxHashMap::default();
        for member in decl.members {
            if let Some(&first) = member_index.get(&member.name.name) {
                let first_span = Some(members[first].name.span);
                let name = format!("{}.{}", decl.name.name, member.name.name);
                self.report(
                    SemaError::redeclaration(name, member.name.span, first_span),
                    self.file,
                );
                continue;
            }
            member_index.insert(member.name.name.clone(), members.len());
            members.push(member);
        }

        let qualified = self.program.qualify(owner, &decl.name.name);
        self.program.enums.push(EnumInfo {
            attrs: decl.attrs,
            name: decl.name,
            members,
            member_index,
            owner,
            qualified,
            span: decl.span,
        });
    }

    /// Register an interface. Nested interfaces are reachable only through
    /// their enclosing interface, so `enclosing` replaces the owner table.
    fn interface(
        &mut self,
        decl: InterfaceDecl,
        owner: Owner,
        enclosing: Option<InterfaceId>,
    ) -> Option<InterfaceId> {
        let id = InterfaceId::from_len(self.program.interfaces.len());
        let inserted = match enclosing {
            Some(parent) => insert_declaration(
                &mut self.program.interfaces[parent.index()].interfaces,
                &decl.name,
                id,
            ),
            None => insert_declaration(&mut self.tables_mut(owner).interfaces, &decl.name, id),
        };
        if let Err(existing) = inserted {
            let first = self.program.interface(existing).name.span;
            self.report(
                SemaError::redeclaration(&decl.name.name, decl.name.span, Some(first)),
                self.file,
            );
            return None;
        }

        let qualified = match enclosing {
            Some(parent) => format!(
                "{}.{}",
                self.program.interface(parent).qualified,
                decl.name.name
            ),
            None => self.program.qualify(owner, &decl.name.name),
        };

        let mut functions: Vec<FunctionDecl> = Vec::with_capacity(decl.functions.len());
        let mut function_index: FxHashMap<String, usize> = FxHashMap::default();
        for func in decl.functions {
            if let Some(&first) = function_index.get(&func.name.name) {
                let first_span = functions[first].name.span;
                self.report(
                    SemaError::redeclaration(&func.name.name, func.name.span, Some(first_span)),
                    self.file,
                );
                continue;
            }
            function_index.insert(func.name.name.clone(), functions.len());
            functions.push(func);
        }

        self.program.interfaces.push(InterfaceInfo {
            attrs: decl.attrs,
            name: decl.name,
            type_params: decl.type_params,
            parent_paths: decl.parents,
            parents: Vec::new(),
            functions,
            function_index,
            interfaces: FxHashMap::default(),
            owner,
            qualified,
            span: decl.span,
        });
        for nested in decl.interfaces {
            self.interface(nested, owner, Some(id));
        }
        Some(id)
    }

    fn class(&mut self, decl: ClassDecl, owner: Owner) {
        let id = ClassId::from_len(self.program.classes.len());
        let qualified = self.program.qualify(owner, &decl.name.name);
        let in_scope = self.tables_mut(owner).classes.get(decl.name.as_str()).copied();
        // A nested class `a.B` and class `B` of namespace `a` would share
        // one struct name.
        let clash = match in_scope {
            Some(existing) => Some((decl.name.name.clone(), existing)),
            None => self
                .program
                .class_by_name
                .get(&qualified)
                .map(|&existing| (qualified.clone(), existing)),
        };
        if let Some((name, existing)) = clash {
            let first = self.program.class(existing).name.span;
            self.report(
                SemaError::redeclaration(name, decl.name.span, Some(first)),
                self.file,
            );
            return;
        }
        self.tables_mut(owner).classes.insert(decl.name.name.clone(), id);
        self.program.class_by_name.insert(qualified.clone(), id);
        self.program.classes.push(ClassInfo {
            attrs: decl.attrs,
            name: decl.name,
            type_params: decl.type_params,
            parent_paths: decl.parents,
            parent: None,
            interfaces: Vec::new(),
            tables: DeclTables::default(),
            variables: Vec::new(),
            owner,
            qualified,
            span: decl.span,
        });

        let member_owner = Owner {
            class: Some(id),
            ..owner
        };
        for member in decl.members {
            self.declaration(member, member_owner);
        }
    }

    // ── Parents ─────────────────────────────────────────────────────

    fn resolve_class_parents(&mut self) {
        let mut resolved: Vec<(ClassId, Vec<(Option<Symbol>, String, Span)>)> = Vec::new();
        for class in self.program.class_ids() {
            let info = self.program.class(class);
            let scope = Scope::for_owner(&self.program, info.owner);
            let parents = info
                .parent_paths
                .iter()
                .map(|path| (scope.resolve_path(&path.segments), path.dotted(), path.span))
                .collect();
            resolved.push((class, parents));
        }

        for (class, parents) in resolved {
            let file = self.program.class(class).owner.file;
            for (symbol, name, span) in parents {
                match symbol {
                    Some(Symbol::Class(parent)) => self.set_parent_class(class, parent, span),
                    Some(Symbol::Interface(interface)) => {
                        self.program.classes[class.index()]
                            .interfaces
                            .push(interface);
                    }
                    Some(other) => {
                        let message =
                            format!("`{name}` is {}, not a class or interface", other.kind_name());
                        self.report(SemaError::inheritance(message, span), file);
                    }
                    None => self.report(SemaError::unresolved(name, span), file),
                }
            }
        }
    }

    fn set_parent_class(&mut self, class: ClassId, parent: ClassId, span: Span) {
        let file = self.program.class(class).owner.file;
        let info = self.program.class(class);
        if let Some(existing) = info.parent {
            let message = format!(
                "class `{}` already inherits from `{}`",
                info.name.name,
                self.program.class(existing).name.name
            );
            self.report(SemaError::inheritance(message, span), file);
            return;
        }
        // Edges are only added when they keep the graph acyclic.
        if self.program.derives_from(parent, class) {
            let message = format!(
                "inheritance cycle: `{}` derives from `{}`",
                self.program.class(parent).name.name,
                info.name.name
            );
            self.report(SemaError::inheritance(message, span), file);
            return;
        }
        debug!(
            class = %self.program.class(class).qualified,
            parent = %self.program.class(parent).qualified,
            "parent class"
        );
        self.program.classes[class.index()].parent = Some(parent);
    }

    fn resolve_interface_parents(&mut self) {
        let ids: Vec<InterfaceId> = (0..self.program.interfaces.len())
            .map(InterfaceId::from_len)
            .collect();
        for interface in ids {
            let info = self.program.interface(interface);
            let file = info.owner.file;
            let scope = Scope::for_owner(&self.program, info.owner);
            let parents: Vec<_> = info
                .parent_paths
                .iter()
                .map(|path| (scope.resolve_path(&path.segments), path.dotted(), path.span))
                .collect();
            for (symbol, name, span) in parents {
                match symbol {
                    Some(Symbol::Interface(parent)) if self.interface_extends(parent, interface) => {
                        let message = format!("inheritance cycle through interface `{name}`");
                        self.report(SemaError::inheritance(message, span), file);
                    }
                    Some(Symbol::Interface(parent)) => {
                        self.program.interfaces[interface.index()].parents.push(parent);
                    }
                    Some(other) => {
                        let message = format!("`{name}` is {}, not an interface", other.kind_name());
                        self.report(SemaError::inheritance(message, span), file);
                    }
                    None => self.report(SemaError::unresolved(name, span), file),
                }
            }
        }
    }

    /// Whether `interface` is `ancestor` or extends it through recorded parents.
    fn interface_extends(&self, interface: InterfaceId, ancestor: InterfaceId) -> bool {
        let mut seen = FxHashSet::default();
        let mut stack = vec![interface];
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if seen.insert(current) {
                stack.extend(self.program.interface(current).parents.iter().copied());
            }
        }
        false
    }
}
