//! Functions and basic blocks.

use std::fmt;

use panda_types::{quote_name, Type};

use crate::{BlockId, Constant, Instr, Terminator, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

/// A basic block: straight-line instructions and one terminator.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub instrs: Vec<Instr>,
    pub terminator: Option<Terminator>,
}

impl Block {
    pub fn new(id: BlockId) -> Self {
        Block {
            id,
            instrs: Vec::new(),
            terminator: None,
        }
    }
}

/// A function declaration (no blocks) or definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub ret: Type,
    pub params: Vec<Param>,
    pub variadic: bool,
    pub blocks: Vec<Block>,
}

impl Function {
    pub fn new(name: impl Into<String>, ret: Type, params: Vec<Param>, variadic: bool) -> Self {
        Function {
            name: name.into(),
            ret,
            params,
            variadic,
            blocks: Vec::new(),
        }
    }

    /// The function's own type, `R (P...)`.
    pub fn signature(&self) -> Type {
        Type::function(
            self.ret.clone(),
            self.params.iter().map(|p| p.ty.clone()).collect(),
            self.variadic,
        )
    }

    /// Address of the function as a constant of pointer-to-function type.
    pub fn address(&self) -> Constant {
        Constant::Function {
            name: self.name.clone(),
            ty: Type::pointer_to(self.signature()),
        }
    }

    pub fn param_value(&self, index: usize) -> Option<Value> {
        self.params.get(index).map(|p| Value::Param {
            name: p.name.clone(),
            ty: p.ty.clone(),
        })
    }

    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_declaration() {
            "declare"
        } else {
            "define"
        };
        write!(f, "{keyword} {} @{}(", self.ret, quote_name(&self.name))?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.is_declaration() {
                write!(f, "{}", param.ty)?;
            } else {
                write!(f, "{} %{}", param.ty, quote_name(&param.name))?;
            }
        }
        if self.variadic {
            f.write_str(if self.params.is_empty() { "..." } else { ", ..." })?;
        }
        f.write_str(")")?;

        if self.is_declaration() {
            return Ok(());
        }
        f.write_str(" {")?;
        for block in &self.blocks {
            write!(f, "\nbb.{}:", block.id.raw())?;
            for instr in &block.instrs {
                write!(f, "\n  {instr}")?;
            }
            if let Some(term) = &block.terminator {
                write!(f, "\n  {term}")?;
            }
        }
        f.write_str("\n}")
    }
}
