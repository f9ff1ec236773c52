//! Enum ordinal assignment.
//!
//! Members are numbered in order from 0. An explicit value must be an
//! `i32` constant greater than every ordinal before it; the next
//! implicit ordinal continues from it and must itself fit in `i32`. Each
//! accepted member becomes an immutable `i32` global named
//! `<enum path>.<member>`.

use panda_ir::ast::Expr;
use panda_ir::Span;
use panda_llir::{Constant, Global};
use panda_types::I32;
use tracing::debug;

use crate::consteval::fits_int;
use crate::ids::EnumId;
use crate::lower::{Lowered, Lowerer};
use crate::scope::Scope;
use crate::SemaError;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum EnumState {
    Pending,
    InProgress,
    /// Ordinal per member; `None` for rejected members.
    Done(Vec<Option<i64>>),
}

impl<'p> Lowerer<'p> {
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn lower_enums(&mut self) {
        for e in self.program.enum_ids() {
            if self.enum_states[e.index()] == EnumState::Pending {
                self.lower_enum(e);
            }
        }
    }

    /// Ordinal constant of member `index` of `e`, lowering the enum first
    /// if needed.
    pub(crate) fn enum_member_value(
        &mut self,
        e: EnumId,
        index: usize,
        use_span: Span,
        file: usize,
    ) -> Lowered<Constant> {
        let info = self.program.enum_(e);
        if self.enum_states[e.index()] == EnumState::Pending {
            self.lower_enum(e);
        } else if self.enum_states[e.index()] == EnumState::InProgress {
            let message = format!("cyclic reference to enum `{}`", info.qualified);
            return Err(self.report(file, SemaError::invalid_constant(message, use_span)));
        }
        let ordinal = match &self.enum_states[e.index()] {
            EnumState::Done(values) => values.get(index).copied().flatten(),
            EnumState::Pending | EnumState::InProgress => None,
        };
        match ordinal {
            Some(value) => Ok(Constant::int(I32, value)),
            None => {
                let name = format!("{}.{}", info.name.name, info.members[index].name.name);
                Err(self.already_reported(file, SemaError::unresolved(name, use_span)))
            }
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(enum_name = %self.program.enum_(e).qualified)
    )]
    fn lower_enum(&mut self, e: EnumId) {
        let program = self.program;
        let info = program.enum_(e);
        self.enum_states[e.index()] = EnumState::InProgress;

        let scope = Scope::for_owner(program, info.owner);
        let mut running: i64 = 0;
        let mut values = Vec::with_capacity(info.members.len());
        for (index, member) in info.members.iter().enumerate() {
            let ordinal = match &member.value {
                None if fits_int(&I32, running) => Some(running),
                None => {
                    let message = "enum value overflows `i32`";
                    let err = SemaError::invalid_enum_value(message, member.name.span);
                    self.report(scope.file, err);
                    None
                }
                Some(expr) => self.explicit_ordinal(expr, running, &scope),
            };
            values.push(ordinal);
            let Some(ordinal) = ordinal else {
                continue;
            };
            debug!(member = %member.name.name, ordinal, "enum member");
            running = ordinal + 1;
            self.module.add_global(Global::constant(
                info.member_global(index),
                Constant::int(I32, ordinal),
            ));
        }
        self.enum_states[e.index()] = EnumState::Done(values);
    }

    /// Value of an explicit member initializer, or `None` after reporting
    /// why it is rejected.
    fn explicit_ordinal(&mut self, expr: &Expr, running: i64, scope: &Scope<'p>) -> Option<i64> {
        if !self.is_constant(expr, scope) {
            self.report(
                scope.file,
                SemaError::invalid_constant("enum value must be constant", expr.span),
            );
            return None;
        }
        let constant = self.generate_constant(expr, Some(&I32), scope).ok()?;
        let value = match constant {
            Constant::Int { ty, value } if !ty.is_bool() => value,
            _ => {
                self.report(
                    scope.file,
                    SemaError::invalid_enum_value("enum value must be integer", expr.span),
                );
                return None;
            }
        };
        if !fits_int(&I32, value) {
            self.report(
                scope.file,
                SemaError::invalid_enum_value("enum value must fit in `i32`", expr.span),
            );
            return None;
        }
        if value < running {
            let message = format!("enum value must be greater than {}", running - 1);
            self.report(scope.file, SemaError::invalid_enum_value(message, expr.span));
            return None;
        }
        Some(value)
    }
}
