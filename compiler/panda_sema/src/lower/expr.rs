//! Expression lowering.

use panda_ir::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use panda_ir::Span;
use panda_llir::{BinOp, CastOp, Constant, FPred, IPred, Value};
use panda_stack::ensure_sufficient_stack;
use panda_types::{FloatKind, Type, I1};

use crate::consteval::{adapt_constant, does_not_fit, fits_int};
use crate::layout::{Access, Resolution};
use crate::lower::{Lowered, Lowerer};
use crate::scope::{Scope, Symbol};
use crate::SemaError;

impl<'p> Lowerer<'p> {
    /// Lower an expression that must produce a value.
    pub(crate) fn lower_value(&mut self, expr: &Expr, scope: &Scope<'p>) -> Lowered<Value> {
        match self.lower_expr(expr, scope)? {
            Some(value) => Ok(value),
            None => Err(self.report(
                scope.file,
                SemaError::invalid_operation("expression has no value", expr.span),
            )),
        }
    }

    /// Lower an expression. `Ok(None)` is a call to a `void` function.
    pub(crate) fn lower_expr(&mut self, expr: &Expr, scope: &Scope<'p>) -> Lowered<Option<Value>> {
        ensure_sufficient_stack(|| self.lower_expr_inner(expr, scope))
    }

    fn lower_expr_inner(&mut self, expr: &Expr, scope: &Scope<'p>) -> Lowered<Option<Value>> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(Some(self.literal_constant(lit, None).into())),
            ExprKind::Identifier(name) => {
                let resolution = self.resolve_identifier(name, span, scope)?;
                Ok(Some(self.read(resolution)))
            }
            ExprKind::This => self.this_value(span, scope).map(Some),
            ExprKind::Base => Err(self.report(
                scope.file,
                SemaError::invalid_operation("`base` can only be used to access a member", span),
            )),
            ExprKind::New { ty, args } => {
                let (object, _) = self.lower_new(ty, args, span, scope)?;
                Ok(Some(object))
            }
            ExprKind::MemberAccess { parent, member } => {
                let resolution = self.resolve_member(parent, member, span, scope)?;
                self.complete_access(resolution, &[], &member.name, span, scope)
            }
            ExprKind::Call { callee, args } => self.lower_call(callee, args, span, scope),
            ExprKind::Unary { op, operand } => self.lower_unary(*op, operand, span, scope).map(Some),
            ExprKind::Binary { op, left, right } => {
                self.lower_binary(*op, left, right, span, scope).map(Some)
            }
            ExprKind::Assign { target, value } => self.lower_assign(target, value, scope).map(Some),
            ExprKind::Conditional {
                cond,
                then_value,
                else_value,
            } => self
                .lower_conditional(cond, then_value, else_value, span, scope)
                .map(Some),
        }
    }

    fn lower_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Option<Value>> {
        let (resolution, name) = match &callee.kind {
            ExprKind::MemberAccess { parent, member } => (
                self.resolve_member(parent, member, callee.span, scope)?,
                member.name.clone(),
            ),
            ExprKind::Identifier(name) => (
                self.resolve_identifier(name, callee.span, scope)?,
                name.clone(),
            ),
            _ => (
                Resolution::value(self.lower_value(callee, scope)?),
                callee.kind.shape_name().to_owned(),
            ),
        };
        self.complete_access(resolution, args, &name, span, scope)
    }

    // ── Operators ───────────────────────────────────────────────────

    fn lower_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Value> {
        match op {
            UnaryOp::Neg => {
                if let ExprKind::Literal(Literal::Int(_) | Literal::Float(_)) = operand.kind {
                    let negated = Expr::new(
                        ExprKind::Unary {
                            op,
                            operand: Box::new(operand.clone()),
                        },
                        span,
                    );
                    return self.generate_constant(&negated, None, scope).map(Value::from);
                }
                let value = self.lower_value(operand, scope)?;
                let ty = value.ty();
                if ty.is_float() {
                    Ok(self.builder.fneg(value))
                } else if ty.is_int() && !ty.is_bool() {
                    let zero = Value::from(Constant::zero(ty));
                    Ok(self.builder.binary(BinOp::Sub, zero, value))
                } else {
                    Err(self.bad_operand("-", &ty, span, scope))
                }
            }
            UnaryOp::Not => {
                let value = self.lower_condition(operand, scope)?;
                Ok(self.builder.binary(BinOp::Xor, value, Constant::bool(true).into()))
            }
            UnaryOp::BitNot => {
                let value = self.lower_value(operand, scope)?;
                let ty = value.ty();
                if !ty.is_int() {
                    return Err(self.bad_operand("~", &ty, span, scope));
                }
                Ok(self.builder.binary(BinOp::Xor, value, Constant::int(ty, -1).into()))
            }
        }
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Value> {
        if op.is_short_circuit() {
            return self.lower_short_circuit(op, left, right, scope);
        }
        let lhs = self.lower_value(left, scope)?;
        let rhs = self.lower_value(right, scope)?;
        let (lhs, rhs) = self.unify(lhs, rhs, span, scope)?;
        let ty = lhs.ty();
        let signed = !matches!(&ty, Type::Int(int) if !int.signed);

        if op.is_comparison() {
            if ty.is_float() {
                let pred = match op {
                    BinaryOp::Eq => FPred::Oeq,
                    BinaryOp::NotEq => FPred::One,
                    BinaryOp::Lt => FPred::Olt,
                    BinaryOp::LtEq => FPred::Ole,
                    BinaryOp::Gt => FPred::Ogt,
                    _ => FPred::Oge,
                };
                return Ok(self.builder.fcmp(pred, lhs, rhs));
            }
            if ty.is_pointer() && !matches!(op, BinaryOp::Eq | BinaryOp::NotEq) {
                return Err(self.bad_operand(op.as_symbol(), &ty, span, scope));
            }
            if !ty.is_int() && !ty.is_pointer() {
                return Err(self.bad_operand(op.as_symbol(), &ty, span, scope));
            }
            let pred = match (op, signed) {
                (BinaryOp::Eq, _) => IPred::Eq,
                (BinaryOp::NotEq, _) => IPred::Ne,
                (BinaryOp::Lt, true) => IPred::Slt,
                (BinaryOp::Lt, false) => IPred::Ult,
                (BinaryOp::LtEq, true) => IPred::Sle,
                (BinaryOp::LtEq, false) => IPred::Ule,
                (BinaryOp::Gt, true) => IPred::Sgt,
                (BinaryOp::Gt, false) => IPred::Ugt,
                (_, true) => IPred::Sge,
                (_, false) => IPred::Uge,
            };
            return Ok(self.builder.icmp(pred, lhs, rhs));
        }

        let bin = if ty.is_float() {
            match op {
                BinaryOp::Add => Some(BinOp::FAdd),
                BinaryOp::Sub => Some(BinOp::FSub),
                BinaryOp::Mul => Some(BinOp::FMul),
                BinaryOp::Div => Some(BinOp::FDiv),
                BinaryOp::Rem => Some(BinOp::FRem),
                _ => None,
            }
        } else if ty.is_int() {
            Some(match op {
                BinaryOp::Add => BinOp::Add,
                BinaryOp::Sub => BinOp::Sub,
                BinaryOp::Mul => BinOp::Mul,
                BinaryOp::Div if signed => BinOp::SDiv,
                BinaryOp::Div => BinOp::UDiv,
                BinaryOp::Rem if signed => BinOp::SRem,
                BinaryOp::Rem => BinOp::URem,
                BinaryOp::BitAnd => BinOp::And,
                BinaryOp::BitOr => BinOp::Or,
                BinaryOp::BitXor => BinOp::Xor,
                BinaryOp::Shl => BinOp::Shl,
                BinaryOp::Shr if signed => BinOp::AShr,
                _ => BinOp::LShr,
            })
        } else {
            None
        };
        match bin {
            Some(bin) => Ok(self.builder.binary(bin, lhs, rhs)),
            None => Err(self.bad_operand(op.as_symbol(), &ty, span, scope)),
        }
    }

    /// `a && b` / `a || b`: `b` is evaluated only when needed; the result is
    /// a `phi` over both paths.
    fn lower_short_circuit(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        scope: &Scope<'p>,
    ) -> Lowered<Value> {
        let lhs = self.lower_condition(left, scope)?;
        let lhs_block = self.builder.current_block();
        let rhs_block = self.builder.new_block();
        let merge = self.builder.new_block();
        let is_and = op == BinaryOp::And;
        if is_and {
            self.builder.cond_br(lhs, rhs_block, merge);
        } else {
            self.builder.cond_br(lhs, merge, rhs_block);
        }

        self.builder.position_at(rhs_block);
        let rhs = self.lower_condition(right, scope)?;
        let rhs_end = self.builder.current_block();
        self.builder.br(merge);

        self.builder.position_at(merge);
        let short = Value::from(Constant::bool(!is_and));
        Ok(self.builder.phi(I1, vec![(short, lhs_block), (rhs, rhs_end)]))
    }

    /// `c ? a : b`: only the taken arm is evaluated. Each arm converts to
    /// the common type at its own end before joining in a `phi`. Two
    /// literal arms have nothing to evaluate and become a `select`.
    fn lower_conditional(
        &mut self,
        cond: &Expr,
        then_value: &Expr,
        else_value: &Expr,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Value> {
        let cond = self.lower_condition(cond, scope)?;
        if is_literal(then_value) && is_literal(else_value) {
            let then_value = self.lower_value(then_value, scope)?;
            let else_value = self.lower_value(else_value, scope)?;
            let (then_value, else_value) = self.unify(then_value, else_value, span, scope)?;
            return Ok(self.builder.select(cond, then_value, else_value));
        }
        let then_block = self.builder.new_block();
        let else_block = self.builder.new_block();
        let merge = self.builder.new_block();
        self.builder.cond_br(cond, then_block, else_block);

        self.builder.position_at(then_block);
        let then_value = self.lower_value(then_value, scope)?;
        let then_end = self.builder.current_block();

        self.builder.position_at(else_block);
        let else_value = self.lower_value(else_value, scope)?;
        let else_end = self.builder.current_block();

        let ty = self.common_type(&then_value, &else_value, span, scope)?;
        self.builder.position_at(then_end);
        let then_value = self.coerce(then_value, &ty, span, scope)?;
        self.builder.br(merge);
        self.builder.position_at(else_end);
        let else_value = self.coerce(else_value, &ty, span, scope)?;
        self.builder.br(merge);

        self.builder.position_at(merge);
        Ok(self.builder.phi(ty, vec![(then_value, then_end), (else_value, else_end)]))
    }

    fn lower_assign(&mut self, target: &Expr, value: &Expr, scope: &Scope<'p>) -> Lowered<Value> {
        let ptr = self.lower_place(target, scope)?;
        let value = self.lower_value(value, scope)?;
        let content = ptr.ty().pointee().cloned().unwrap_or(Type::Void);
        let value = self.coerce(value, &content, target.span, scope)?;
        self.builder.store(value.clone(), ptr);
        Ok(value)
    }

    /// Address of an assignable expression.
    fn lower_place(&mut self, target: &Expr, scope: &Scope<'p>) -> Lowered<Value> {
        let program = self.program;
        let (resolution, name) = match &target.kind {
            ExprKind::Identifier(name) => {
                let is_const = match scope.find_object(name) {
                    Some(Symbol::Local(local)) => local.const_value.is_some(),
                    Some(Symbol::Variable(var)) => program.var(var).decl.is_const,
                    _ => false,
                };
                if is_const {
                    let message = format!("cannot assign to constant `{name}`");
                    return Err(self.report(
                        scope.file,
                        SemaError::invalid_operation(message, target.span),
                    ));
                }
                (self.resolve_identifier(name, target.span, scope)?, name.as_str())
            }
            ExprKind::MemberAccess { parent, member } => (
                self.resolve_member(parent, member, target.span, scope)?,
                member.name.as_str(),
            ),
            _ => {
                return Err(self.report(
                    scope.file,
                    SemaError::invalid_operation("expression is not assignable", target.span),
                ));
            }
        };
        match resolution.access {
            Access::Place(ptr) => Ok(ptr),
            Access::Value(_) => {
                let message = format!("cannot assign to `{name}`");
                Err(self.report(scope.file, SemaError::invalid_operation(message, target.span)))
            }
        }
    }

    // ── Conversions ─────────────────────────────────────────────────

    /// Lower `expr` and test it against zero, giving an `i1`.
    pub(crate) fn lower_condition(&mut self, expr: &Expr, scope: &Scope<'p>) -> Lowered<Value> {
        let value = self.lower_value(expr, scope)?;
        let ty = value.ty();
        if ty.is_bool() {
            return Ok(value);
        }
        let zero = Value::from(Constant::zero(ty.clone()));
        if ty.is_int() || ty.is_pointer() {
            Ok(self.builder.icmp(IPred::Ne, value, zero))
        } else if ty.is_float() {
            Ok(self.builder.fcmp(FPred::One, value, zero))
        } else {
            let message = format!("`{ty}` cannot be used as a condition");
            Err(self.report(scope.file, SemaError::invalid_operation(message, expr.span)))
        }
    }

    /// Convert `value` to `to`: integer resizing, integer/float conversion,
    /// float resizing, pointer casts. Constants are re-typed in place.
    pub(crate) fn coerce(
        &mut self,
        value: Value,
        to: &Type,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Value> {
        let from = value.ty();
        if from == *to && from.name() == to.name() {
            return Ok(value);
        }
        if let Value::Constant(constant) = &value {
            if let Constant::Int { ty, value: int } = constant {
                if !ty.is_bool() && to.is_int() && !to.is_bool() && !fits_int(to, *int) {
                    let message = does_not_fit(*int, to);
                    return Err(self.report(scope.file, SemaError::invalid_constant(message, span)));
                }
            }
            let adapted = adapt_constant(constant.clone(), Some(to));
            if adapted.ty() == *to {
                return Ok(adapted.into());
            }
        }

        let op = match (&from, to) {
            (Type::Int(a), Type::Int(b)) if a.bits == b.bits => return Ok(value),
            (Type::Int(a), Type::Int(b)) if a.bits > b.bits => Some(CastOp::Trunc),
            (Type::Int(a), Type::Int(_)) if a.bits == 1 || !a.signed => Some(CastOp::ZExt),
            (Type::Int(_), Type::Int(_)) => Some(CastOp::SExt),
            (Type::Int(a), Type::Float(_)) if a.signed && a.bits > 1 => Some(CastOp::SIToFP),
            (Type::Int(_), Type::Float(_)) => Some(CastOp::UIToFP),
            (Type::Float(_), Type::Int(b)) if b.signed => Some(CastOp::FPToSI),
            (Type::Float(_), Type::Int(_)) => Some(CastOp::FPToUI),
            (Type::Float(FloatKind::Float), Type::Float(FloatKind::Double)) => Some(CastOp::FPExt),
            (Type::Float(_), Type::Float(_)) => Some(CastOp::FPTrunc),
            (Type::Pointer(_), Type::Pointer(_)) => Some(CastOp::Bitcast),
            _ => None,
        };
        match op {
            Some(op) => Ok(self.builder.cast(op, value, to.clone())),
            None => {
                let message = format!("cannot convert `{from}` to `{to}`");
                Err(self.report(scope.file, SemaError::invalid_operation(message, span)))
            }
        }
    }

    /// Bring two operands to one type, see [`common_type`](Self::common_type).
    fn unify(
        &mut self,
        lhs: Value,
        rhs: Value,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<(Value, Value)> {
        let ty = self.common_type(&lhs, &rhs, span, scope)?;
        let lhs = self.coerce(lhs, &ty, span, scope)?;
        let rhs = self.coerce(rhs, &ty, span, scope)?;
        Ok((lhs, rhs))
    }

    /// The type two operands meet at. A constant side takes the other
    /// side's type; otherwise the narrower operand is widened, integers
    /// become floats and pointers take the left pointer type.
    fn common_type(
        &mut self,
        lhs: &Value,
        rhs: &Value,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Type> {
        let (lt, rt) = (lhs.ty(), rhs.ty());
        if lt == rt && lt.name() == rt.name() {
            return Ok(lt);
        }
        let numeric = lt.is_number() && rt.is_number();
        if numeric && lhs.as_constant().is_none() && takes_type(rhs, &lt) {
            return Ok(lt);
        }
        if numeric && rhs.as_constant().is_none() && takes_type(lhs, &rt) {
            return Ok(rt);
        }

        let left_wins = match (&lt, &rt) {
            (Type::Int(a), Type::Int(b)) => a.bits >= b.bits,
            (Type::Float(a), Type::Float(b)) => *a == FloatKind::Double || *b == FloatKind::Float,
            (Type::Float(_), Type::Int(_)) | (Type::Pointer(_), Type::Pointer(_)) => true,
            (Type::Int(_), Type::Float(_)) => false,
            _ => {
                let message = format!("mismatched operand types `{lt}` and `{rt}`");
                return Err(self.report(scope.file, SemaError::invalid_operation(message, span)));
            }
        };
        Ok(if left_wins { lt } else { rt })
    }

    fn bad_operand(
        &mut self,
        op: &str,
        ty: &Type,
        span: Span,
        scope: &Scope<'p>,
    ) -> panda_diagnostic::ErrorGuaranteed {
        let message = format!("operator `{op}` cannot be applied to `{ty}`");
        self.report(scope.file, SemaError::invalid_operation(message, span))
    }
}

/// Whether constant `value` can be re-typed to `ty` without changing it.
fn takes_type(value: &Value, ty: &Type) -> bool {
    match value.as_constant() {
        Some(Constant::Int { ty: from, value }) if !from.is_bool() && ty.is_int() => {
            fits_int(ty, *value)
        }
        Some(_) => true,
        None => false,
    }
}

/// A literal, or a negated numeric literal.
fn is_literal(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(_) => true,
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => matches!(
            operand.kind,
            ExprKind::Literal(Literal::Int(_) | Literal::Float(_))
        ),
        _ => false,
    }
}
