//! The top-level IR container.

use std::fmt;

use panda_types::{quote_name, Type};
use rustc_hash::FxHashMap;

use crate::{Block, Constant, FuncId, Function, Global, GlobalId, Linkage};

/// Named type definitions, globals and functions of one compilation.
///
/// Lookups by name return the first entry registered under that name.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub name: String,
    types: Vec<(String, Type)>,
    type_index: FxHashMap<String, usize>,
    globals: Vec<Global>,
    global_index: FxHashMap<String, GlobalId>,
    functions: Vec<Function>,
    function_index: FxHashMap<String, FuncId>,
    /// Interned string literals: text to its `.str.N` global.
    strings: FxHashMap<String, GlobalId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            ..Module::default()
        }
    }

    // ── Types ───────────────────────────────────────────────────────

    /// Record `%name = type <body>` and return the named reference.
    ///
    /// A name that is already defined keeps its first body, like
    /// [`add_function`](Self::add_function).
    pub fn define_type(&mut self, name: impl Into<String>, body: Type) -> Type {
        let name = name.into();
        let reference = Type::named_struct(name.clone());
        if !self.type_index.contains_key(&name) {
            self.type_index.insert(name.clone(), self.types.len());
            self.types.push((name, body));
        }
        reference
    }

    pub fn type_definition(&self, name: &str) -> Option<&Type> {
        self.type_index.get(name).map(|&idx| &self.types[idx].1)
    }

    // ── Globals ─────────────────────────────────────────────────────

    pub fn add_global(&mut self, global: Global) -> GlobalId {
        let id = GlobalId::from_len(self.globals.len());
        self.global_index.entry(global.name.clone()).or_insert(id);
        self.globals.push(global);
        id
    }

    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    pub fn global_by_name(&self, name: &str) -> Option<&Global> {
        self.global_index.get(name).map(|&id| self.global(id))
    }

    pub fn globals(&self) -> &[Global] {
        &self.globals
    }

    /// Pointer to the first byte of a private NUL-terminated copy of `text`.
    /// Identical texts share one global.
    pub fn string_constant(&mut self, text: &str) -> Constant {
        let id = match self.strings.get(text) {
            Some(&id) => id,
            None => {
                let name = format!(".str.{}", self.strings.len());
                let mut global = Global::constant(name, Constant::c_string(text));
                global.linkage = Linkage::Private;
                let id = self.add_global(global);
                self.strings.insert(text.to_owned(), id);
                id
            }
        };
        Constant::StrPtr {
            global: self.global(id).name.clone(),
            len: text.len() as u64 + 1,
        }
    }

    // ── Functions ───────────────────────────────────────────────────

    pub fn add_function(&mut self, function: Function) -> FuncId {
        let id = FuncId::from_len(self.functions.len());
        self.function_index
            .entry(function.name.clone())
            .or_insert(id);
        self.functions.push(function);
        id
    }

    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn function_by_name(&self, name: &str) -> Option<FuncId> {
        self.function_index.get(name).copied()
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Install a lowered body, turning a declaration into a definition.
    pub fn define_body(&mut self, id: FuncId, blocks: Vec<Block>) {
        self.functions[id.index()].blocks = blocks;
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f, "source_filename = \"{}\"", self.name)?;

        if !self.types.is_empty() {
            writeln!(f)?;
            for (name, body) in &self.types {
                writeln!(f, "%{} = type {}", quote_name(name), body.definition_string())?;
            }
        }

        if !self.globals.is_empty() {
            writeln!(f)?;
            for global in &self.globals {
                writeln!(f, "{global}")?;
            }
        }

        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
