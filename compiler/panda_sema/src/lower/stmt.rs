//! Statement lowering.

use panda_diagnostic::{Diagnostic, ErrorCode};
use panda_ir::ast::{Block, Expr, Stmt, StmtKind, Switch, VariableDecl};
use panda_llir::{BlockId, FPred, IPred, Value};
use panda_stack::ensure_sufficient_stack;
use panda_types::VOID;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::lower::{Lowered, Lowerer};
use crate::scope::{LocalVar, LoopTarget, Scope};
use crate::SemaError;

impl<'p> Lowerer<'p> {
    /// Lower a block in a fresh local table. Statements after a terminator
    /// are unreachable and skipped.
    pub(crate) fn lower_block(&mut self, block: &Block, scope: &mut Scope<'p>) {
        scope.push_block();
        for stmt in &block.stmts {
            if self.builder.is_terminated() {
                trace!(span = %stmt.span, "skipping unreachable statement");
                let warning = Diagnostic::warning(ErrorCode::W3001)
                    .with_message("unreachable statement")
                    .with_label(stmt.span, "no path reaches this statement");
                self.warn(scope.file, warning);
                break;
            }
            self.lower_stmt(stmt, scope);
        }
        scope.pop_block();
    }

    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt, scope: &mut Scope<'p>) {
        ensure_sufficient_stack(|| self.lower_stmt_inner(stmt, scope));
    }

    /// Errors are reported where they occur; the statement is abandoned and
    /// lowering continues with the next one.
    fn lower_stmt_inner(&mut self, stmt: &Stmt, scope: &mut Scope<'p>) {
        let _ = match &stmt.kind {
            StmtKind::Block(block) => {
                self.lower_block(block, scope);
                Ok(())
            }
            StmtKind::Declaration(decl) => self.lower_local(decl, scope),
            StmtKind::Expr(expr) => self.lower_expr(expr, scope).map(|_| ()),
            StmtKind::Return(value) => self.lower_return(value.as_ref(), stmt, scope),
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => self.lower_if(cond, then_block, else_branch.as_deref(), scope),
            StmtKind::While { cond, body } => self.lower_while(cond, body, scope),
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => self.lower_for(init.as_deref(), cond.as_ref(), step.as_ref(), body, scope),
            StmtKind::Switch(switch) => self.lower_switch(switch, scope),
            StmtKind::Break => match scope.break_target() {
                Some(target) => {
                    self.builder.br(target);
                    Ok(())
                }
                None => Err(self.report(
                    scope.file,
                    SemaError::invalid_operation("`break` outside of a loop or switch", stmt.span),
                )),
            },
            StmtKind::Continue => match scope.continue_target() {
                Some(target) => {
                    self.builder.br(target);
                    Ok(())
                }
                None => Err(self.report(
                    scope.file,
                    SemaError::invalid_operation("`continue` outside of a loop", stmt.span),
                )),
            },
        };
    }

    /// `var x: T = v` / `const x = v`: a stack slot in the entry path.
    fn lower_local(&mut self, decl: &VariableDecl, scope: &mut Scope<'p>) -> Lowered<()> {
        let declared = match &decl.ty {
            Some(ty) => Some(self.resolve_type(ty, scope)?),
            None => None,
        };

        let const_value = match (&decl.value, decl.is_const) {
            (Some(value), true) => {
                if !self.is_constant(value, scope) {
                    let message = format!("value of constant `{}` is not constant", decl.name.name);
                    return Err(self.report(
                        scope.file,
                        SemaError::invalid_constant(message, value.span),
                    ));
                }
                let constant = self.generate_constant(value, declared.as_ref(), scope)?;
                Some(match &declared {
                    Some(ty) => self.fit_constant(constant, ty, value.span, scope.file)?,
                    None => constant,
                })
            }
            (None, true) => {
                let message = format!("constant `{}` has no value", decl.name.name);
                return Err(self.report(
                    scope.file,
                    SemaError::invalid_constant(message, decl.name.span),
                ));
            }
            (_, false) => None,
        };

        let init = match (&const_value, &decl.value) {
            (Some(constant), _) => Some(Value::from(constant.clone())),
            (None, Some(value)) => Some(self.lower_value(value, scope)?),
            (None, None) => None,
        };
        let ty = match (declared, &init) {
            (Some(ty), _) => ty,
            (None, Some(value)) => value.ty(),
            (None, None) => {
                let message = format!("cannot infer the type of `{}`", decl.name.name);
                return Err(self.report(
                    scope.file,
                    SemaError::invalid_operation(message, decl.name.span),
                ));
            }
        };

        let slot = self.builder.alloca(ty.clone());
        if let Some(value) = init {
            let span = decl.value.as_ref().map_or(decl.span, |v| v.span);
            let value = self.coerce(value, &ty, span, scope)?;
            self.builder.store(value, slot.clone());
        }
        let local = LocalVar {
            ptr: slot,
            ty,
            const_value,
            span: decl.name.span,
        };
        if let Err(first) = scope.declare_local(&decl.name, local) {
            return Err(self.report(
                scope.file,
                SemaError::redeclaration(&decl.name.name, decl.name.span, Some(first)),
            ));
        }
        Ok(())
    }

    fn lower_return(
        &mut self,
        value: Option<&Expr>,
        stmt: &Stmt,
        scope: &mut Scope<'p>,
    ) -> Lowered<()> {
        let ret = self
            .current
            .as_ref()
            .map_or(VOID, |current| current.ret.clone());
        match (value, ret.is_void()) {
            (None, true) => {
                self.builder.ret(None);
                Ok(())
            }
            (Some(value), false) => {
                let lowered = self.lower_value(value, scope)?;
                let lowered = self.coerce(lowered, &ret, value.span, scope)?;
                self.builder.ret(Some(lowered));
                Ok(())
            }
            (None, false) => Err(self.report(
                scope.file,
                SemaError::invalid_operation(
                    format!("missing return value of type `{ret}`"),
                    stmt.span,
                ),
            )),
            (Some(value), true) => Err(self.report(
                scope.file,
                SemaError::invalid_operation("`void` function cannot return a value", value.span),
            )),
        }
    }

    fn lower_if(
        &mut self,
        cond: &Expr,
        then_block: &Block,
        else_branch: Option<&Stmt>,
        scope: &mut Scope<'p>,
    ) -> Lowered<()> {
        let cond = self.lower_condition(cond, scope)?;
        let then_bb = self.builder.new_block();
        let else_bb = else_branch.map(|_| self.builder.new_block());
        let merge = self.builder.new_block();
        self.builder.cond_br(cond, then_bb, else_bb.unwrap_or(merge));

        self.builder.position_at(then_bb);
        self.lower_block(then_block, scope);
        self.builder.br(merge);

        if let (Some(else_bb), Some(else_branch)) = (else_bb, else_branch) {
            self.builder.position_at(else_bb);
            self.lower_stmt(else_branch, scope);
            self.builder.br(merge);
        }

        self.builder.position_at(merge);
        Ok(())
    }

    fn lower_while(
        &mut self,
        cond: &Expr,
        body: &Block,
        scope: &mut Scope<'p>,
    ) -> Lowered<()> {
        let cond_bb = self.builder.new_block();
        let body_bb = self.builder.new_block();
        let exit = self.builder.new_block();
        self.builder.br(cond_bb);

        self.builder.position_at(cond_bb);
        let cond = self.lower_condition(cond, scope)?;
        self.builder.cond_br(cond, body_bb, exit);

        self.builder.position_at(body_bb);
        self.lower_loop_body(body, exit, cond_bb, scope);
        self.builder.br(cond_bb);

        self.builder.position_at(exit);
        Ok(())
    }

    fn lower_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        step: Option<&Expr>,
        body: &Block,
        scope: &mut Scope<'p>,
    ) -> Lowered<()> {
        // The init declaration is visible in the condition, step and body.
        scope.push_block();
        if let Some(init) = init {
            self.lower_stmt(init, scope);
        }
        let cond_bb = self.builder.new_block();
        let body_bb = self.builder.new_block();
        let step_bb = self.builder.new_block();
        let exit = self.builder.new_block();
        self.builder.br(cond_bb);

        self.builder.position_at(cond_bb);
        match cond.map(|cond| self.lower_condition(cond, scope)) {
            Some(Ok(cond)) => self.builder.cond_br(cond, body_bb, exit),
            Some(Err(guar)) => {
                scope.pop_block();
                return Err(guar);
            }
            None => self.builder.br(body_bb),
        }

        self.builder.position_at(body_bb);
        self.lower_loop_body(body, exit, step_bb, scope);
        self.builder.br(step_bb);

        self.builder.position_at(step_bb);
        if let Some(step) = step {
            // A failed step is reported; the loop structure stays intact.
            let _ = self.lower_expr(step, scope);
        }
        self.builder.br(cond_bb);

        self.builder.position_at(exit);
        scope.pop_block();
        Ok(())
    }

    fn lower_loop_body(
        &mut self,
        body: &Block,
        break_block: BlockId,
        continue_block: BlockId,
        scope: &mut Scope<'p>,
    ) {
        scope.push_loop(LoopTarget {
            break_block,
            continue_block: Some(continue_block),
        });
        self.lower_block(body, scope);
        scope.pop_loop();
    }

    /// Lowered to an IR `switch` when every case value is an integer
    /// constant, otherwise to a chain of equality tests. Cases never fall
    /// through; `break` leaves the switch.
    fn lower_switch(&mut self, switch: &Switch, scope: &mut Scope<'p>) -> Lowered<()> {
        let operand = self.lower_value(&switch.operand, scope)?;
        let operand_ty = operand.ty();
        let exit = self.builder.new_block();
        let case_blocks: Vec<BlockId> =
            switch.cases.iter().map(|_| self.builder.new_block()).collect();
        let default_bb = switch.default.as_ref().map(|_| self.builder.new_block());
        let fallback = default_bb.unwrap_or(exit);

        let mut constants = Vec::with_capacity(switch.cases.len());
        let mut all_int = operand_ty.is_int();
        for case in &switch.cases {
            let constant = if all_int && self.is_constant(&case.value, scope) {
                self.generate_constant(&case.value, Some(&operand_ty), scope)
                    .ok()
                    .filter(|c| c.as_int().is_some() && c.ty() == operand_ty)
            } else {
                None
            };
            all_int &= constant.is_some();
            constants.push(constant);
        }

        if all_int {
            let mut seen: FxHashSet<i64> = FxHashSet::default();
            let mut cases = Vec::with_capacity(constants.len());
            let labelled = constants.into_iter().zip(&case_blocks).zip(&switch.cases);
            for ((constant, &block), case) in labelled {
                let Some(constant) = constant else {
                    continue;
                };
                let value = constant.as_int().unwrap_or_default();
                if !seen.insert(value) {
                    let message = format!("duplicate case value `{value}`");
                    self.report(scope.file, SemaError::invalid_operation(message, case.value.span));
                    continue;
                }
                cases.push((constant, block));
            }
            self.builder.switch(operand, fallback, cases);
        } else {
            for (case, &block) in switch.cases.iter().zip(&case_blocks) {
                let value = self.lower_value(&case.value, scope)?;
                let value = self.coerce(value, &operand_ty, case.value.span, scope)?;
                let matches = if operand_ty.is_float() {
                    self.builder.fcmp(FPred::Oeq, operand.clone(), value)
                } else {
                    self.builder.icmp(IPred::Eq, operand.clone(), value)
                };
                let next = self.builder.new_block();
                self.builder.cond_br(matches, block, next);
                self.builder.position_at(next);
            }
            self.builder.br(fallback);
        }

        let bodies = switch
            .cases
            .iter()
            .map(|case| &case.body)
            .zip(case_blocks)
            .chain(switch.default.as_ref().zip(default_bb));
        for (body, block) in bodies {
            self.builder.position_at(block);
            scope.push_loop(LoopTarget {
                break_block: exit,
                continue_block: None,
            });
            self.lower_block(body, scope);
            scope.pop_loop();
            self.builder.br(exit);
        }

        self.builder.position_at(exit);
        Ok(())
    }
}
