//! Textual LLVM-style IR for the Panda front end.
//!
//! # Architecture
//!
//! - **[`Module`]**: named type definitions, globals and functions; `Display`
//!   renders the whole module as IR text
//! - **[`Function`]**: signature, parameters and (for definitions) blocks
//! - **[`Block`]**: instructions followed by one [`Terminator`]
//! - **[`FunctionBuilder`]**: "position at a block, emit, terminate" API
//!   used while lowering a body
//!
//! Operands are [`Value`]s. Every value carries its IR [`Type`]; constants
//! (including global and function addresses) are [`Constant`]s.
//!
//! Naming: parameters print by name (`%x`), instruction results as `%v.N`
//! and blocks as `bb.N`. Source identifiers never contain `.`, so the
//! schemes cannot collide.
//!
//! [`Type`]: panda_types::Type

mod builder;
mod function;
mod global;
mod ids;
mod instr;
mod module;
mod value;

pub use builder::FunctionBuilder;
pub use function::{Block, Function, Param};
pub use global::{Global, Linkage};
pub use ids::{BlockId, FuncId, GlobalId, LocalId};
pub use instr::{BinOp, CastOp, FPred, IPred, Instr, Terminator};
pub use module::Module;
pub use value::{Constant, Value};
