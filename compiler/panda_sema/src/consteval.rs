//! Compile-time constant evaluation.
//!
//! Constants are literals (and negated numeric literals), `const`
//! variables with constant initializers, function addresses and enum
//! members. Evaluation never emits instructions; it may define string
//! literal globals and lower an enum whose ordinals are needed early.

use panda_ir::ast::{Expr, ExprKind, Literal, UnaryOp};
use panda_ir::Span;
use panda_llir::Constant;
use panda_types::{Type, F64, I32, I64};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::ids::VarId;
use crate::lower::{ConstState, Lowered, Lowerer};
use crate::scope::{Scope, Symbol};
use crate::SemaError;

impl<'p> Lowerer<'p> {
    /// Whether `expr` folds to a constant in `scope`.
    pub(crate) fn is_constant(&self, expr: &Expr, scope: &Scope<'p>) -> bool {
        self.is_constant_in(expr, scope, &mut FxHashSet::default())
    }

    /// `visiting` holds the constants on the current chain. Re-entering one
    /// answers `true` so the cycle is reported by evaluation.
    fn is_constant_in(
        &self,
        expr: &Expr,
        scope: &Scope<'p>,
        visiting: &mut FxHashSet<VarId>,
    ) -> bool {
        match &expr.kind {
            ExprKind::Literal(_) => true,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => is_numeric_literal(operand),
            ExprKind::Identifier(name) => scope
                .find_object(name)
                .is_some_and(|sym| self.symbol_is_constant(&sym, visiting)),
            ExprKind::MemberAccess { parent, member } => scope
                .resolve_static_member(parent, member)
                .is_some_and(|sym| self.symbol_is_constant(&sym, visiting)),
            _ => false,
        }
    }

    fn symbol_is_constant(&self, sym: &Symbol, visiting: &mut FxHashSet<VarId>) -> bool {
        match sym {
            Symbol::Local(local) => local.const_value.is_some(),
            Symbol::Variable(var) => {
                let info = self.program.var(*var);
                let Some(value) = info.decl.value.as_ref().filter(|_| info.decl.is_const) else {
                    return false;
                };
                if !visiting.insert(*var) {
                    return true;
                }
                let scope = Scope::for_owner(self.program, info.owner);
                self.is_constant_in(value, &scope, visiting)
            }
            Symbol::Function(_) | Symbol::EnumMember(..) => true,
            Symbol::Enum(_) | Symbol::Class(_) | Symbol::Interface(_) | Symbol::Namespace(_) => {
                false
            }
        }
    }

    /// Fold `expr` to a constant, adapting integer literals to `expected`.
    pub(crate) fn generate_constant(
        &mut self,
        expr: &Expr,
        expected: Option<&Type>,
        scope: &Scope<'p>,
    ) -> Lowered<Constant> {
        let constant = match &expr.kind {
            ExprKind::Literal(lit) => self.literal_constant(lit, expected),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } if is_numeric_literal(operand) => match &operand.kind {
                ExprKind::Literal(Literal::Int(value)) => {
                    self.literal_constant(&Literal::Int(value.wrapping_neg()), expected)
                }
                ExprKind::Literal(Literal::Float(bits)) => {
                    self.literal_constant(&Literal::float(-f64::from_bits(*bits)), expected)
                }
                _ => return Err(self.not_constant(expr.span, scope.file)),
            },
            ExprKind::Identifier(name) => {
                let Some(sym) = scope.find_object(name) else {
                    return Err(self.report(scope.file, SemaError::unresolved(name, expr.span)));
                };
                self.symbol_constant(&sym, name, expected, expr.span, scope.file)?
            }
            ExprKind::MemberAccess { parent, member } => {
                let Some(sym) = scope.resolve_static_member(parent, member) else {
                    return Err(self.not_constant(expr.span, scope.file));
                };
                self.symbol_constant(&sym, &member.name, expected, expr.span, scope.file)?
            }
            _ => return Err(self.not_constant(expr.span, scope.file)),
        };
        trace!(%constant, "folded");
        Ok(constant)
    }

    fn not_constant(&mut self, span: Span, file: usize) -> panda_diagnostic::ErrorGuaranteed {
        self.report(file, SemaError::invalid_constant("expression is not constant", span))
    }

    fn symbol_constant(
        &mut self,
        sym: &Symbol,
        name: &str,
        expected: Option<&Type>,
        span: Span,
        file: usize,
    ) -> Lowered<Constant> {
        let constant = match sym {
            Symbol::Local(local) => match &local.const_value {
                Some(c) => c.clone(),
                None => {
                    let message = format!("`{name}` is not a constant");
                    return Err(self.report(file, SemaError::invalid_constant(message, span)));
                }
            },
            Symbol::Variable(var) => {
                if !self.program.var(*var).decl.is_const {
                    let message = format!("`{name}` is not a constant");
                    return Err(self.report(file, SemaError::invalid_constant(message, span)));
                }
                self.const_var_value(*var, span, file)?
            }
            Symbol::Function(func) => self.function_address(*func)?,
            Symbol::EnumMember(e, index) => self.enum_member_value(*e, *index, span, file)?,
            Symbol::Enum(_) | Symbol::Class(_) | Symbol::Interface(_) | Symbol::Namespace(_) => {
                let message = format!("`{name}` is {}, not a constant", sym.kind_name());
                return Err(self.report(file, SemaError::invalid_constant(message, span)));
            }
        };
        Ok(adapt_constant(constant, expected))
    }

    /// Value of `const` variable `var`, memoized. A constant that depends on
    /// itself is an error at the use that closes the cycle.
    pub(crate) fn const_var_value(
        &mut self,
        var: VarId,
        use_span: Span,
        file: usize,
    ) -> Lowered<Constant> {
        let program = self.program;
        let info = program.var(var);
        match self.const_states.get(&var) {
            Some(ConstState::Done(Some(c))) => return Ok(c.clone()),
            Some(ConstState::Done(None)) => {
                let message = format!("`{}` is not a constant", info.decl.name.name);
                return Err(
                    self.already_reported(file, SemaError::invalid_constant(message, use_span))
                );
            }
            Some(ConstState::InProgress) => {
                let message = format!("cyclic constant `{}`", info.decl.name.name);
                return Err(self.report(file, SemaError::invalid_constant(message, use_span)));
            }
            None => {}
        }

        self.const_states.insert(var, ConstState::InProgress);
        let scope = Scope::for_owner(program, info.owner);
        let result = self.evaluate_const_var(var, &scope);
        self.const_states
            .insert(var, ConstState::Done(result.as_ref().ok().cloned()));
        result
    }

    fn evaluate_const_var(&mut self, var: VarId, scope: &Scope<'p>) -> Lowered<Constant> {
        let info = self.program.var(var);
        let expected = match &info.decl.ty {
            Some(ty) => Some(self.resolve_type(ty, scope)?),
            None => None,
        };
        let Some(value) = &info.decl.value else {
            let message = format!("constant `{}` has no value", info.decl.name.name);
            let err = SemaError::invalid_constant(message, info.decl.name.span);
            return Err(self.report(scope.file, err));
        };
        if !self.is_constant(value, scope) {
            let message = format!("value of constant `{}` is not constant", info.decl.name.name);
            return Err(self.report(scope.file, SemaError::invalid_constant(message, value.span)));
        }
        let constant = self.generate_constant(value, expected.as_ref(), scope)?;
        let constant = match &expected {
            Some(ty) => self.fit_constant(constant, ty, value.span, scope.file)?,
            None => constant,
        };
        trace!(constant = %info.qualified, value = %constant, "const");
        Ok(constant)
    }

    /// [`adapt_constant`] that must land on `expected`: an integer outside
    /// its range or a constant of another kind is an error.
    pub(crate) fn fit_constant(
        &mut self,
        constant: Constant,
        expected: &Type,
        span: Span,
        file: usize,
    ) -> Lowered<Constant> {
        let adapted = adapt_constant(constant, Some(expected));
        if adapted.ty() == *expected {
            return Ok(adapted);
        }
        let message = match &adapted {
            Constant::Int { ty, value } if !ty.is_bool() && expected.is_int() => {
                does_not_fit(*value, expected)
            }
            other => format!("cannot convert constant of type `{}` to `{expected}`", other.ty()),
        };
        Err(self.report(file, SemaError::invalid_constant(message, span)))
    }

    /// Constant for a literal. Without an expected type, integers are `i32`
    /// when they fit and `i64` otherwise, floats are `double`.
    pub(crate) fn literal_constant(&mut self, lit: &Literal, expected: Option<&Type>) -> Constant {
        match lit {
            Literal::Int(value) => {
                let default = if i32::try_from(*value).is_ok() { I32 } else { I64 };
                adapt_constant(Constant::int(default, *value), expected)
            }
            Literal::Float(bits) => {
                adapt_constant(Constant::float(F64, f64::from_bits(*bits)), expected)
            }
            Literal::Bool(value) => Constant::bool(*value),
            Literal::Char(c) => {
                adapt_constant(Constant::int(I32, i64::from(u32::from(*c))), expected)
            }
            Literal::String(text) => self.module.string_constant(text),
            Literal::Null => match expected {
                Some(ty) if ty.is_pointer() => Constant::null(ty.clone()),
                _ => Constant::null(Type::i8_ptr()),
            },
        }
    }
}

fn is_numeric_literal(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Literal(Literal::Int(_) | Literal::Float(_))
    )
}

/// Re-type a constant for `expected`: integers to an integer type that can
/// hold them or to any float type, floats between float kinds, `null` to any
/// pointer. Everything else (including `bool`) is returned unchanged.
pub(crate) fn adapt_constant(constant: Constant, expected: Option<&Type>) -> Constant {
    let Some(expected) = expected else {
        return constant;
    };
    match constant {
        Constant::Int { ty, value } if !ty.is_bool() && fits_int(expected, value) => {
            Constant::int(expected.clone(), value)
        }
        Constant::Int { ty, value } if !ty.is_bool() && expected.is_float() => {
            Constant::float(expected.clone(), int_to_float(value))
        }
        Constant::Float { bits, .. } if expected.is_float() => {
            Constant::float(expected.clone(), f64::from_bits(bits))
        }
        Constant::Null { .. } if expected.is_pointer() => Constant::null(expected.clone()),
        other => other,
    }
}

/// Whether `value` is representable in non-`bool` integer type `ty`.
pub(crate) fn fits_int(ty: &Type, value: i64) -> bool {
    match ty {
        Type::Int(int) if !ty.is_bool() => int.contains(value),
        _ => false,
    }
}

/// Range error for `value` against integer type `ty`, naming `ty` with its
/// signedness.
pub(crate) fn does_not_fit(value: i64, ty: &Type) -> String {
    match ty {
        Type::Int(int) => {
            let prefix = if int.signed { 'i' } else { 'u' };
            format!("constant `{value}` does not fit in `{prefix}{}`", int.bits)
        }
        other => format!("constant `{value}` does not fit in `{other}`"),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integer constants convert to float like a sitofp"
)]
fn int_to_float(value: i64) -> f64 {
    value as f64
}
