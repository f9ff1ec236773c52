//! Lowering of a registered [`Program`] to an IR [`Module`].
//!
//! Declarations are lowered in a fixed order: enums, class struct types,
//! globals, function declarations, function bodies. Anything a constant
//! needs earlier (an enum ordinal, a function address, a constant's value)
//! is computed on demand and memoized.

mod enums;
mod expr;
mod member;
mod stmt;

use panda_diagnostic::{Diagnostic, DiagnosticQueue, ErrorGuaranteed};
use panda_ir::ast::TypeExpr;
use panda_llir::{Constant, Function, FunctionBuilder, Global, Module, Param, Value};
use panda_types::{Type, I64};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ids::{ClassId, FuncId, VarId};
use crate::layout::ClassLayout;
use crate::program::Program;
use crate::scope::{LocalVar, Scope};
use crate::{CompileOptions, SemaError};

pub(crate) use enums::EnumState;

/// `Err` means the problem was already reported.
pub(crate) type Lowered<T> = Result<T, ErrorGuaranteed>;

#[derive(Clone, Debug)]
pub(crate) enum ConstState {
    InProgress,
    /// `None` when evaluation failed.
    Done(Option<Constant>),
}

/// Signature facts of the function whose body is being lowered.
#[derive(Clone, Debug)]
pub(crate) struct CurrentFunction {
    pub ret: Type,
    /// Implicit receiver of an instance method.
    pub this: Option<Value>,
}

pub(crate) struct Lowerer<'p> {
    pub(crate) program: &'p Program,
    pub(crate) options: &'p CompileOptions,
    pub(crate) module: Module,
    diagnostics: DiagnosticQueue,
    pub(crate) layouts: Vec<Option<ClassLayout>>,
    pub(crate) enum_states: Vec<EnumState>,
    pub(crate) const_states: FxHashMap<VarId, ConstState>,
    var_types: FxHashMap<VarId, Option<Type>>,
    signatures: FxHashMap<FuncId, Option<Function>>,
    ir_functions: FxHashMap<FuncId, panda_llir::FuncId>,
    pub(crate) builder: FunctionBuilder,
    pub(crate) current: Option<CurrentFunction>,
}

impl<'p> Lowerer<'p> {
    pub(crate) fn new(
        program: &'p Program,
        options: &'p CompileOptions,
        diagnostics: DiagnosticQueue,
    ) -> Self {
        Lowerer {
            program,
            options,
            module: Module::new(options.module_name.clone()),
            diagnostics,
            layouts: vec![None; program.classes.len()],
            enum_states: vec![EnumState::Pending; program.enums.len()],
            const_states: FxHashMap::default(),
            var_types: FxHashMap::default(),
            signatures: FxHashMap::default(),
            ir_functions: FxHashMap::default(),
            builder: FunctionBuilder::new(),
            current: None,
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn lower(mut self) -> (Module, DiagnosticQueue) {
        self.lower_enums();
        self.lower_class_types();
        self.lower_globals();
        self.declare_functions();
        self.lower_bodies();
        self.into_parts()
    }

    pub(crate) fn into_parts(self) -> (Module, DiagnosticQueue) {
        (self.module, self.diagnostics)
    }

    // ── Diagnostics ─────────────────────────────────────────────────

    pub(crate) fn report(&mut self, file: usize, err: SemaError) -> ErrorGuaranteed {
        debug!(code = %err.code(), %err, "semantic error");
        self.diagnostics.emit_error(err.into_diagnostic().in_file(file))
    }

    pub(crate) fn warn(&mut self, file: usize, diag: Diagnostic) {
        debug!(code = %diag.code, message = %diag.message, "warning");
        self.diagnostics.add(diag.in_file(file));
    }

    /// Proof for a failure whose cause was reported earlier. Falls back to
    /// reporting `err` if the queue is somehow empty.
    pub(crate) fn already_reported(&mut self, file: usize, err: SemaError) -> ErrorGuaranteed {
        match self.diagnostics.has_errors() {
            Some(guar) => guar,
            None => self.report(file, err),
        }
    }

    // ── Declaration facts ───────────────────────────────────────────

    /// Content type of a variable: its declared type, or the type of its
    /// constant initializer.
    pub(crate) fn var_type(&mut self, var: VarId) -> Lowered<Type> {
        let program = self.program;
        let info = program.var(var);
        if let Some(cached) = self.var_types.get(&var) {
            return match cached {
                Some(ty) => Ok(ty.clone()),
                None => Err(self.already_reported(
                    info.owner.file,
                    SemaError::unresolved(&info.decl.name.name, info.decl.name.span),
                )),
            };
        }

        let scope = Scope::for_owner(program, info.owner);
        let result = match (&info.decl.ty, &info.decl.value) {
            (Some(ty), _) => self.resolve_type(ty, &scope),
            (None, Some(_)) if info.decl.is_const => self
                .const_var_value(var, info.decl.name.span, info.owner.file)
                .map(|c| c.ty()),
            (None, Some(value)) => self.generate_constant(value, None, &scope).map(|c| c.ty()),
            (None, None) => Err(self.report(
                info.owner.file,
                SemaError::invalid_operation(
                    format!("cannot infer the type of `{}`", info.decl.name.name),
                    info.decl.name.span,
                ),
            )),
        };
        self.var_types.insert(var, result.as_ref().ok().cloned());
        result
    }

    pub(crate) fn resolve_type(&mut self, ty: &TypeExpr, scope: &Scope<'p>) -> Lowered<Type> {
        scope.resolve_type(ty).map_err(|err| self.report(scope.file, err))
    }

    /// Address of a global or static class variable.
    pub(crate) fn global_address(&mut self, var: VarId) -> Lowered<Constant> {
        let ty = self.var_type(var)?;
        Ok(Constant::Global {
            name: self.program.var(var).qualified.clone(),
            ty: Type::pointer_to(ty),
        })
    }

    /// IR declaration for `func`. Instance methods take `this` first.
    pub(crate) fn signature(&mut self, func: FuncId) -> Lowered<Function> {
        let program = self.program;
        let info = program.func(func);
        if let Some(cached) = self.signatures.get(&func) {
            return match cached {
                Some(function) => Ok(function.clone()),
                None => Err(self.already_reported(
                    info.owner.file,
                    SemaError::unresolved(&info.decl.name.name, info.decl.name.span),
                )),
            };
        }

        let scope = Scope::for_owner(program, info.owner);
        let mut params = Vec::with_capacity(info.decl.params.len() + 1);
        let mut failed = None;
        if let (true, Some(class)) = (info.is_method(), info.owner.class) {
            params.push(Param::new("this", program.class_type(class)));
        }
        for param in &info.decl.params {
            match self.resolve_type(&param.ty, &scope) {
                Ok(ty) => params.push(Param::new(param.name.name.clone(), ty)),
                Err(guar) => failed = Some(guar),
            }
        }
        let ret = match &info.decl.return_type {
            Some(ty) => self.resolve_type(ty, &scope),
            None => Ok(Type::Void),
        };

        let result = match (ret, failed) {
            (Ok(ret), None) => Ok(Function::new(
                info.qualified.clone(),
                ret,
                params,
                info.decl.variadic,
            )),
            (Err(guar), _) | (Ok(_), Some(guar)) => Err(guar),
        };
        self.signatures.insert(func, result.as_ref().ok().cloned());
        result
    }

    pub(crate) fn function_address(&mut self, func: FuncId) -> Lowered<Constant> {
        self.signature(func).map(|function| function.address())
    }

    /// `malloc`, declared on first use.
    pub(crate) fn malloc(&mut self) -> Value {
        let id = match self.module.function_by_name("malloc") {
            Some(id) => id,
            None => self.module.add_function(Function::new(
                "malloc",
                Type::i8_ptr(),
                vec![Param::new("size", I64)],
                false,
            )),
        };
        Value::from(self.module.function(id).address())
    }

    pub(crate) fn is_intrinsic(&self, class: ClassId) -> bool {
        self.options.is_intrinsic(&self.program.class(class).qualified)
    }

    // ── Passes ──────────────────────────────────────────────────────

    #[tracing::instrument(level = "debug", skip_all)]
    fn lower_globals(&mut self) {
        let program = self.program;
        for var in program.var_ids() {
            let info = program.var(var);
            if info.is_field() {
                continue;
            }
            let Ok(ty) = self.var_type(var) else {
                continue;
            };
            let scope = Scope::for_owner(program, info.owner);
            let init = match &info.decl.value {
                None => Ok(Constant::zero(ty.clone())),
                Some(_) if info.decl.is_const => {
                    self.const_var_value(var, info.decl.name.span, info.owner.file)
                }
                Some(value) if !self.is_constant(value, &scope) => Err(self.report(
                    info.owner.file,
                    SemaError::invalid_constant(
                        format!("initializer of global `{}` is not constant", info.decl.name.name),
                        value.span,
                    ),
                )),
                Some(value) => self.generate_constant(value, Some(&ty), &scope),
            };
            let init = init
                .and_then(|c| {
                    let span = info.decl.value.as_ref().map_or(info.decl.name.span, |v| v.span);
                    self.fit_constant(c, &ty, span, info.owner.file)
                })
                .unwrap_or_else(|_| Constant::zero(ty.clone()));
            debug!(global = %info.qualified, %init, "global");
            let mut global = Global::new(info.qualified.clone(), ty, Some(init));
            global.immutable = info.decl.is_const;
            self.module.add_global(global);
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn declare_functions(&mut self) {
        for func in self.program.func_ids() {
            if let Ok(function) = self.signature(func) {
                let id = self.module.add_function(function);
                self.ir_functions.insert(func, id);
            }
        }
    }

    fn lower_bodies(&mut self) {
        for func in self.program.func_ids() {
            if let Some(&ir) = self.ir_functions.get(&func) {
                self.lower_function(func, ir);
            }
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(function = %self.program.func(func).qualified)
    )]
    fn lower_function(&mut self, func: FuncId, ir: panda_llir::FuncId) {
        let program = self.program;
        let info = program.func(func);
        let Some(body) = &info.decl.body else {
            return;
        };
        let function = self.module.function(ir).clone();

        self.builder = FunctionBuilder::new();
        let mut scope = Scope::for_function(program, func);
        scope.push_block();

        let offset = usize::from(info.is_method());
        let this = if info.is_method() {
            function.param_value(0)
        } else {
            None
        };
        for (i, param) in info.decl.params.iter().enumerate() {
            let Some(value) = function.param_value(i + offset) else {
                continue;
            };
            let ty = value.ty();
            let slot = self.builder.alloca(ty.clone());
            self.builder.store(value, slot.clone());
            let local = LocalVar {
                ptr: slot,
                ty,
                const_value: None,
                span: param.name.span,
            };
            if let Err(first) = scope.declare_local(&param.name, local) {
                self.report(
                    scope.file,
                    SemaError::redeclaration(&param.name.name, param.name.span, Some(first)),
                );
            }
        }

        self.current = Some(CurrentFunction {
            ret: function.ret.clone(),
            this,
        });
        self.lower_block(body, &mut scope);
        if !self.builder.is_terminated() {
            if function.ret.is_void() {
                self.builder.ret(None);
            } else {
                self.builder.unreachable();
            }
        }
        self.current = None;

        let blocks = std::mem::take(&mut self.builder).finish();
        debug!(blocks = blocks.len(), "body lowered");
        self.module.define_body(ir, blocks);
    }
}
