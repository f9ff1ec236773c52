//! Class member layout.
//!
//! Layout is flat: walking a class chain from the most-base class to the
//! most-derived one, each class's own instance fields take the next free
//! slot. The struct of a class therefore starts with the struct of every
//! ancestor, and a `%Derived*` can be reinterpreted as a `%Base*`.
//!
//! Intrinsic classes ignore inheritance: their struct holds only their own
//! fields and lookups never leave the class.

use panda_ir::Span;
use panda_llir::{Constant, Value};
use panda_types::{StructType, Type};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ids::{ClassId, VarId};
use crate::lower::{Lowered, Lowerer};
use crate::scope::Scope;
use crate::SemaError;

#[derive(Clone, Debug, Default)]
pub(crate) struct ClassLayout {
    /// Field types by slot.
    pub fields: Vec<Type>,
    /// Slot of each instance field, own and inherited.
    pub slots: FxHashMap<VarId, u32>,
    /// Constant initial value by slot, base class fields first.
    pub initializers: Vec<(u32, Constant)>,
}

/// How a resolved member is reached.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Access {
    /// Address of storage (field, global, local); reading it needs a load.
    Place(Value),
    /// A value as is (function address, enum ordinal, call result).
    Value(Value),
}

/// A resolved member or name.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Resolution {
    pub access: Access,
    /// Receiver to pass when `access` is a method.
    pub receiver: Option<Value>,
    /// The member is a non-static method reached through a value.
    pub is_instance: bool,
}

impl Resolution {
    pub fn value(value: Value) -> Self {
        Resolution {
            access: Access::Value(value),
            receiver: None,
            is_instance: false,
        }
    }

    pub fn place(ptr: Value) -> Self {
        Resolution {
            access: Access::Place(ptr),
            receiver: None,
            is_instance: false,
        }
    }
}

impl Lowerer<'_> {
    /// Define the named struct of every class.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn lower_class_types(&mut self) {
        let program = self.program;
        for class in program.class_ids() {
            self.ensure_layout(class);
            let Some(layout) = &self.layouts[class.index()] else {
                continue;
            };
            let body = Type::Struct(StructType::literal(layout.fields.clone()));
            self.module
                .define_type(program.class(class).qualified.clone(), body);
        }
    }

    pub(crate) fn ensure_layout(&mut self, class: ClassId) {
        if self.layouts[class.index()].is_some() {
            return;
        }
        let program = self.program;
        let info = program.class(class);

        let mut layout = match info.parent {
            Some(parent) if !self.is_intrinsic(class) => {
                self.ensure_layout(parent);
                self.layouts[parent.index()].clone().unwrap_or_default()
            }
            _ => ClassLayout::default(),
        };

        for &var in &info.variables {
            if !program.var(var).is_field() {
                continue;
            }
            // A field whose type does not resolve gets no slot; the error
            // is already reported.
            let Ok(ty) = self.var_type(var) else {
                continue;
            };
            #[expect(
                clippy::cast_possible_truncation,
                reason = "field counts never exceed u32"
            )]
            let slot = layout.fields.len() as u32;
            layout.slots.insert(var, slot);
            if let Ok(Some(constant)) = self.field_initializer(var, &ty) {
                layout.initializers.push((slot, constant));
            }
            layout.fields.push(ty);
        }
        debug!(class = %info.qualified, fields = layout.fields.len(), "layout");
        self.layouts[class.index()] = Some(layout);
    }

    /// Initial value of field `var`, evaluated once per class.
    fn field_initializer(&mut self, var: VarId, ty: &Type) -> Lowered<Option<Constant>> {
        let program = self.program;
        let info = program.var(var);
        let Some(value) = &info.decl.value else {
            return Ok(None);
        };
        let scope = Scope::for_owner(program, info.owner);
        if !self.is_constant(value, &scope) {
            let message = format!("initializer of field `{}` is not constant", info.qualified);
            return Err(self.report(scope.file, SemaError::invalid_constant(message, value.span)));
        }
        let constant = self.generate_constant(value, Some(ty), &scope)?;
        let constant = self.fit_constant(constant, ty, value.span, scope.file)?;
        trace!(field = %info.qualified, %constant, "field initializer");
        Ok(Some(constant))
    }

    /// Slot and type of instance field `var` in the layout of `class`.
    pub(crate) fn field_slot(&mut self, class: ClassId, var: VarId) -> Option<(u32, Type)> {
        self.ensure_layout(class);
        let layout = self.layouts[class.index()].as_ref()?;
        let slot = *layout.slots.get(&var)?;
        Some((slot, layout.fields[slot as usize].clone()))
    }

    /// Look up `name` on a value of class `class`, choosing the lookup the
    /// class kind calls for.
    pub(crate) fn lookup_member(
        &mut self,
        receiver: Option<Value>,
        class: ClassId,
        name: &str,
        self_context: bool,
        span: Span,
        file: usize,
    ) -> Lowered<Resolution> {
        if self.is_intrinsic(class) {
            self.get_member(receiver, class, name, self_context, span, file)
        } else {
            self.get_member_from_counter(receiver, class, name, self_context, span, file)
        }
    }

    /// Flat lookup in the own table of `class`.
    pub(crate) fn get_member(
        &mut self,
        receiver: Option<Value>,
        class: ClassId,
        name: &str,
        self_context: bool,
        span: Span,
        file: usize,
    ) -> Lowered<Resolution> {
        if !self.declares(class, name) {
            return Err(self.report(file, self.missing_member(class, name, span)));
        }
        self.member_in(class, receiver, name, self_context, span, file)
    }

    /// Lookup walking `class` and its ancestors nearest first. A member of
    /// ancestor `A` sees the receiver as a `%A*`.
    pub(crate) fn get_member_from_counter(
        &mut self,
        receiver: Option<Value>,
        class: ClassId,
        name: &str,
        self_context: bool,
        span: Span,
        file: usize,
    ) -> Lowered<Resolution> {
        let program = self.program;
        let Some(owner) = program.class_chain(class).find(|&c| self.declares(c, name)) else {
            return Err(self.report(file, self.missing_member(class, name, span)));
        };
        let adjusted = receiver.map(|r| self.builder.bitcast(r, program.class_type(owner)));
        trace!(
            member = name,
            class = %program.class(class).qualified,
            owner = %program.class(owner).qualified,
            "member from counter"
        );
        self.member_in(owner, adjusted, name, self_context, span, file)
    }

    fn declares(&self, class: ClassId, name: &str) -> bool {
        let tables = &self.program.class(class).tables;
        tables.variables.contains_key(name)
            || tables.functions.contains_key(name)
            || tables.enums.contains_key(name)
            || tables.classes.contains_key(name)
            || tables.interfaces.contains_key(name)
    }

    fn missing_member(&self, class: ClassId, name: &str, span: Span) -> SemaError {
        SemaError::unresolved(format!("{}.{name}", self.program.class(class).qualified), span)
    }

    /// Member `name` declared directly in `class`, with `receiver` already
    /// adjusted to `%class*`.
    fn member_in(
        &mut self,
        class: ClassId,
        receiver: Option<Value>,
        name: &str,
        self_context: bool,
        span: Span,
        file: usize,
    ) -> Lowered<Resolution> {
        let program = self.program;
        let info = program.class(class);
        let qualified = format!("{}.{name}", info.qualified);

        if let Some(&var) = info.tables.variables.get(name) {
            let var_info = program.var(var);
            self.check_visible(var_info.decl.attrs.modifier.is_public(), self_context, &qualified, span, file)?;
            if !var_info.is_field() {
                return self.global_address(var).map(|addr| Resolution::place(addr.into()));
            }
            let Some(receiver) = receiver else {
                return Err(self.report(file, needs_receiver(&qualified, span)));
            };
            let Some((slot, ty)) = self.field_slot(class, var) else {
                return Err(self.already_reported(file, SemaError::unresolved(qualified, span)));
            };
            let ptr = self.builder.struct_gep(receiver, slot, ty);
            return Ok(Resolution::place(ptr));
        }

        if let Some(&func) = info.tables.functions.get(name) {
            let func_info = program.func(func);
            self.check_visible(func_info.decl.attrs.modifier.is_public(), self_context, &qualified, span, file)?;
            let address = self.function_address(func)?;
            let is_instance = func_info.is_method();
            if is_instance && receiver.is_none() {
                return Err(self.report(file, needs_receiver(&qualified, span)));
            }
            return Ok(Resolution {
                access: Access::Value(address.into()),
                receiver: if is_instance { receiver } else { None },
                is_instance,
            });
        }

        Err(self.report(
            file,
            SemaError::invalid_operation(format!("`{qualified}` names a type, not a value"), span),
        ))
    }

    pub(crate) fn check_visible(
        &mut self,
        is_public: bool,
        self_context: bool,
        qualified: &str,
        span: Span,
        file: usize,
    ) -> Lowered<()> {
        if is_public || self_context {
            return Ok(());
        }
        Err(self.report(
            file,
            SemaError::invalid_operation(format!("`{qualified}` is not public"), span),
        ))
    }
}

pub(crate) fn needs_receiver(qualified: &str, span: Span) -> SemaError {
    SemaError::invalid_operation(
        format!("`{qualified}` is an instance member and needs a receiver"),
        span,
    )
}

#[cfg(test)]
mod tests;
