//! IR type system for the Panda front end.
//!
//! [`Type`] is a closed set of LLVM-style types. Equality is structural except
//! for *identified* (named) structs and pointers, which compare by name only.
//! That nominal shortcut is taken before any payload is inspected, so
//! self-referential types compare in finite time.
//!
//! A self-referential struct is spelled with a named reference to itself:
//!
//! ```text
//! %Node = type { i32, %Node* }
//! ```
//!
//! where the field's pointee is [`StructType::reference`], a bodiless struct
//! carrying only the name. Owned type trees are therefore always finite.
//!
//! Text comes in two forms: `Display` renders the *reference* form (`%Node`
//! for named types) and [`Type::definition_string`] renders the body used on
//! `%Node = type ...` lines.

mod display;
mod ty;

pub use display::quote_name;
pub use ty::{
    ArrayType, FloatKind, FuncType, IntType, PointerType, StructType, Type, VectorType, F32, F64,
    I1, I16, I32, I64, I8, LABEL, TOKEN, U16, U32, U64, U8, VOID,
};
