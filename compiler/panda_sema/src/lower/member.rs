//! Name and member-access resolution.
//!
//! `parent.member` is resolved by the shape of `parent`:
//!
//! | parent            | receiver                   | lookup                          |
//! |-------------------|----------------------------|---------------------------------|
//! | identifier        | the named value, if any    | selector, then enum fallback    |
//! | `this`            | `this`                     | current class and ancestors     |
//! | `base`            | `this`                     | parent class and its ancestors  |
//! | `new T(..)`       | the new object             | class `T`                       |
//! | `a.b`             | `a.b` if it is a value     | by the static shape of `a.b`    |
//! | anything else     | the lowered value          | its class, if it has one        |
//!
//! A resolved function (or a place holding a function pointer) is called
//! straight away, with the receiver first for instance methods. `obj.m`
//! and `obj.m()` therefore lower identically.

use panda_ir::ast::{Expr, ExprKind, Ident, TypePath};
use panda_ir::Span;
use panda_llir::{CastOp, Constant, Value};
use panda_types::{Type, I64};
use smallvec::SmallVec;
use tracing::debug;

use crate::ids::{ClassId, FuncId};
use crate::layout::{needs_receiver, Access, Resolution};
use crate::lower::{Lowered, Lowerer};
use crate::scope::{Scope, Selector, Symbol};
use crate::SemaError;

/// Static shape of an expression, computed without emitting anything.
#[derive(Clone, Debug, PartialEq)]
enum Shape {
    /// A namespace, class, enum or interface used as a qualifier.
    Static(Symbol),
    /// A value whose type is a handle to the class.
    Instance(ClassId),
    /// Any other value.
    Value,
}

impl<'p> Lowerer<'p> {
    // ── Identifiers ─────────────────────────────────────────────────

    /// Resolve a bare name. Instance members of the current class are
    /// reached through `this`.
    pub(crate) fn resolve_identifier(
        &mut self,
        name: &str,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Resolution> {
        let Some(sym) = scope.find_object(name) else {
            return Err(self.report(scope.file, SemaError::unresolved(name, span)));
        };
        self.resolve_symbol(sym, name, span, true, scope)
    }

    /// Turn a symbol into a place or value. With `implicit_this`, fields and
    /// methods of the current class use `this` as receiver.
    fn resolve_symbol(
        &mut self,
        sym: Symbol,
        name: &str,
        span: Span,
        implicit_this: bool,
        scope: &Scope<'p>,
    ) -> Lowered<Resolution> {
        let program = self.program;
        match sym {
            Symbol::Local(local) => Ok(Resolution::place(local.ptr)),
            Symbol::Variable(var) => {
                let info = program.var(var);
                if let Some(class) = info.owner.class {
                    let qualified = info.qualified.as_str();
                    let visible = scope.self_context(class);
                    let is_public = info.decl.attrs.modifier.is_public();
                    self.check_visible(is_public, visible, qualified, span, scope.file)?;
                    if info.is_field() {
                        return self.member_through_this(class, name, span, implicit_this, scope);
                    }
                }
                let address = self.global_address(var)?;
                Ok(Resolution::place(address.into()))
            }
            Symbol::Function(func) => {
                let info = program.func(func);
                if let Some(class) = info.owner.class {
                    let qualified = info.qualified.as_str();
                    let visible = scope.self_context(class);
                    let is_public = info.decl.attrs.modifier.is_public();
                    self.check_visible(is_public, visible, qualified, span, scope.file)?;
                    if info.is_method() {
                        return self.member_through_this(class, name, span, implicit_this, scope);
                    }
                }
                let address = self.function_address(func)?;
                Ok(Resolution::value(address.into()))
            }
            Symbol::EnumMember(e, index) => {
                let value = self.enum_member_value(e, index, span, scope.file)?;
                Ok(Resolution::value(value.into()))
            }
            Symbol::Enum(_) | Symbol::Class(_) | Symbol::Interface(_) | Symbol::Namespace(_) => {
                let message = format!("`{name}` is {}, not a value", sym.kind_name());
                Err(self.report(scope.file, SemaError::invalid_operation(message, span)))
            }
        }
    }

    /// Instance member `name` of `class` reached through `this`.
    fn member_through_this(
        &mut self,
        class: ClassId,
        name: &str,
        span: Span,
        implicit_this: bool,
        scope: &Scope<'p>,
    ) -> Lowered<Resolution> {
        let qualified = format!("{}.{name}", self.program.class(class).qualified);
        let this = self
            .current
            .as_ref()
            .and_then(|current| current.this.clone())
            .filter(|_| implicit_this);
        let this_class = this
            .as_ref()
            .and_then(|this| self.program.class_of_type(&this.ty()));
        match (this, this_class) {
            (Some(this), Some(this_class)) if self.program.derives_from(this_class, class) => {
                self.lookup_member(Some(this), this_class, name, true, span, scope.file)
            }
            _ => Err(self.report(scope.file, needs_receiver(&qualified, span))),
        }
    }

    pub(crate) fn this_value(&mut self, span: Span, scope: &Scope<'p>) -> Lowered<Value> {
        match self.current.as_ref().and_then(|current| current.this.clone()) {
            Some(this) => Ok(this),
            None => Err(self.report(
                scope.file,
                SemaError::invalid_operation("`this` outside of an instance method", span),
            )),
        }
    }

    // ── Member access ───────────────────────────────────────────────

    /// Resolve `parent.member`.
    #[tracing::instrument(level = "trace", skip_all, fields(member = %member.name))]
    pub(crate) fn resolve_member(
        &mut self,
        parent: &Expr,
        member: &Ident,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Resolution> {
        let program = self.program;
        match &parent.kind {
            ExprKind::Identifier(name) => self.member_of_identifier(name, member, span, scope),
            ExprKind::This => {
                let this = self.this_value(parent.span, scope)?;
                let class = self.current_class(parent.span, "this", scope)?;
                self.lookup_member(Some(this), class, &member.name, true, span, scope.file)
            }
            ExprKind::Base => {
                let class = self.current_class(parent.span, "base", scope)?;
                let Some(base) = program.class(class).parent else {
                    let message =
                        format!("class `{}` has no parent class", program.class(class).name.name);
                    return Err(self.report(scope.file, SemaError::inheritance(message, parent.span)));
                };
                let this = self.this_value(parent.span, scope)?;
                self.lookup_member(Some(this), base, &member.name, true, span, scope.file)
            }
            ExprKind::New { ty, args } => {
                let (object, class) = self.lower_new(ty, args, parent.span, scope)?;
                let visible = scope.self_context(class);
                self.lookup_member(Some(object), class, &member.name, visible, span, scope.file)
            }
            ExprKind::MemberAccess { .. } => match self.shape_of(parent, scope) {
                Shape::Static(qualifier) => {
                    let Some(sym) = scope.member_symbol(&qualifier, &member.name) else {
                        let name = format!("{}.{}", dotted(parent), member.name);
                        return Err(self.report(scope.file, SemaError::unresolved(name, span)));
                    };
                    self.resolve_symbol(sym, &member.name, span, false, scope)
                }
                Shape::Instance(_) | Shape::Value => self.member_of_value(parent, member, span, scope),
            },
            ExprKind::Literal(_)
            | ExprKind::Call { .. }
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::Assign { .. }
            | ExprKind::Conditional { .. } => self.member_of_value(parent, member, span, scope),
        }
    }

    fn current_class(&mut self, span: Span, keyword: &str, scope: &Scope<'p>) -> Lowered<ClassId> {
        match scope.class {
            Some(class) => Ok(class),
            None => Err(self.report(
                scope.file,
                SemaError::inheritance(format!("`{keyword}` outside of a class"), span),
            )),
        }
    }

    fn member_of_identifier(
        &mut self,
        name: &str,
        member: &Ident,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Resolution> {
        match scope.find_selector(name, &member.name) {
            Some(Selector::Instance { qualifier, class }) => {
                let resolution = self.resolve_symbol(qualifier, name, span, true, scope)?;
                let receiver = self.read(resolution);
                let visible = scope.self_context(class);
                debug!(qualifier = name, member = %member.name, "instance selector");
                self.lookup_member(Some(receiver), class, &member.name, visible, span, scope.file)
            }
            Some(Selector::Static(sym)) => self.resolve_symbol(sym, &member.name, span, false, scope),
            None => {
                if let Some(found) = scope.enum_fallback(name, &member.name) {
                    debug!(enum_name = name, member = %member.name, "enum fallback");
                    return self.resolve_symbol(found, &member.name, span, false, scope);
                }
                let missing = if scope.find_object(name).is_some() {
                    format!("{name}.{}", member.name)
                } else {
                    name.to_owned()
                };
                Err(self.report(scope.file, SemaError::unresolved(missing, span)))
            }
        }
    }

    /// Lower `parent` as a value and look `member` up on its class.
    fn member_of_value(
        &mut self,
        parent: &Expr,
        member: &Ident,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Resolution> {
        let receiver = self.lower_value(parent, scope)?;
        let Some(class) = self.program.class_of_type(&receiver.ty()) else {
            return Err(self.report(scope.file, SemaError::unresolved(&member.name, member.span)));
        };
        let visible = scope.self_context(class);
        self.lookup_member(Some(receiver), class, &member.name, visible, span, scope.file)
    }

    /// Static shape of `expr`. Emits nothing.
    fn shape_of(&self, expr: &Expr, scope: &Scope<'p>) -> Shape {
        let program = self.program;
        match &expr.kind {
            ExprKind::Identifier(name) => match scope.find_object(name) {
                Some(sym) => self.symbol_shape(sym, scope),
                None => scope
                    .find_enum(name)
                    .map_or(Shape::Value, |e| Shape::Static(Symbol::Enum(e))),
            },
            ExprKind::This => scope.class.map_or(Shape::Value, Shape::Instance),
            ExprKind::Base => scope
                .class
                .and_then(|class| program.class(class).parent)
                .map_or(Shape::Value, Shape::Instance),
            ExprKind::New { ty, .. } => match scope.resolve_path(&ty.segments) {
                Some(Symbol::Class(class)) => Shape::Instance(class),
                _ => Shape::Value,
            },
            ExprKind::MemberAccess { parent, member } => match self.shape_of(parent, scope) {
                Shape::Static(qualifier) => scope
                    .member_symbol(&qualifier, &member.name)
                    .map_or(Shape::Value, |sym| self.symbol_shape(sym, scope)),
                Shape::Instance(class) => program
                    .class_chain(class)
                    .find_map(|c| {
                        let tables = &program.class(c).tables;
                        if let Some(&var) = tables.variables.get(&member.name) {
                            Some(self.symbol_shape(Symbol::Variable(var), scope))
                        } else {
                            tables
                                .functions
                                .get(&member.name)
                                .map(|&func| self.symbol_shape(Symbol::Function(func), scope))
                        }
                    })
                    .unwrap_or(Shape::Value),
                Shape::Value => Shape::Value,
            },
            ExprKind::Literal(_)
            | ExprKind::Call { .. }
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::Assign { .. }
            | ExprKind::Conditional { .. } => Shape::Value,
        }
    }

    fn symbol_shape(&self, sym: Symbol, scope: &Scope<'p>) -> Shape {
        match sym {
            Symbol::Namespace(_) | Symbol::Class(_) | Symbol::Enum(_) | Symbol::Interface(_) => {
                Shape::Static(sym)
            }
            Symbol::Function(func) => self
                .return_class(func)
                .map_or(Shape::Value, Shape::Instance),
            Symbol::Local(_) | Symbol::Variable(_) => scope
                .instance_class(&sym)
                .map_or(Shape::Value, Shape::Instance),
            Symbol::EnumMember(..) => Shape::Value,
        }
    }

    /// Class named by the declared return type of `func`.
    fn return_class(&self, func: FuncId) -> Option<ClassId> {
        let info = self.program.func(func);
        let ty = info.decl.return_type.as_ref()?;
        let ty = Scope::for_owner(self.program, info.owner).resolve_type(ty).ok()?;
        self.program.class_of_type(&ty)
    }

    // ── Normalization ───────────────────────────────────────────────

    /// Read a resolution as a value: load places, take values as they are.
    pub(crate) fn read(&mut self, resolution: Resolution) -> Value {
        match resolution.access {
            Access::Place(ptr) => self.builder.load(ptr),
            Access::Value(value) => value,
        }
    }

    /// Apply call normalization to a resolved member: anything that is a
    /// function is called with the receiver (for instance methods) and then
    /// `args`; anything else is read.
    pub(crate) fn complete_access(
        &mut self,
        resolution: Resolution,
        args: &[Expr],
        name: &str,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Option<Value>> {
        let receiver = resolution.receiver.filter(|_| resolution.is_instance);
        let callee = match resolution.access {
            Access::Value(value) if value.ty().is_func_pointer() => value,
            Access::Place(ptr) if ptr.ty().is_func_pointer_pointer() => self.builder.load(ptr),
            access => {
                if !args.is_empty() {
                    let message = format!("`{name}` is not callable");
                    return Err(self.report(scope.file, SemaError::invalid_operation(message, span)));
                }
                return Ok(Some(self.read(Resolution {
                    access,
                    receiver: None,
                    is_instance: false,
                })));
            }
        };
        self.call_function(callee, receiver, args, name, span, scope)
    }

    /// Call `callee` with `receiver` (if any) followed by `args`, converting
    /// each argument to its parameter type.
    pub(crate) fn call_function(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: &[Expr],
        name: &str,
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<Option<Value>> {
        let callee_ty = callee.ty();
        let Some(sig) = callee_ty.as_func() else {
            let message = format!("`{name}` is not callable");
            return Err(self.report(scope.file, SemaError::invalid_operation(message, span)));
        };

        let implicit = usize::from(receiver.is_some());
        let expected = sig.params.len().saturating_sub(implicit);
        if args.len() < expected || (!sig.variadic && args.len() > expected) {
            let message = format!(
                "`{name}` takes {expected} argument(s) but {} were supplied",
                args.len()
            );
            return Err(self.report(scope.file, SemaError::invalid_operation(message, span)));
        }

        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(implicit + args.len());
        if let Some(receiver) = receiver {
            let receiver = match sig.params.first() {
                Some(param) if param.is_pointer() => self.builder.bitcast(receiver, param.clone()),
                _ => receiver,
            };
            values.push(receiver);
        }
        for arg in args {
            let value = self.lower_value(arg, scope)?;
            let value = match sig.params.get(values.len()) {
                Some(param) => self.coerce(value, param, arg.span, scope)?,
                None => value,
            };
            values.push(value);
        }
        Ok(self.builder.call(callee, values))
    }

    // ── Construction ────────────────────────────────────────────────

    /// `new T(args)`: allocate, initialize fields with constant initializers
    /// and run the constructor (a method named like the class) if any.
    pub(crate) fn lower_new(
        &mut self,
        ty: &TypePath,
        args: &[Expr],
        span: Span,
        scope: &Scope<'p>,
    ) -> Lowered<(Value, ClassId)> {
        let program = self.program;
        let class = match scope.resolve_path(&ty.segments) {
            Some(Symbol::Class(class)) => class,
            Some(other) => {
                let message = format!("`{}` is {}, not a class", ty.dotted(), other.kind_name());
                return Err(self.report(scope.file, SemaError::invalid_operation(message, ty.span)));
            }
            None => return Err(self.report(scope.file, SemaError::unresolved(ty.dotted(), ty.span))),
        };
        let info = program.class(class);
        let handle = program.class_type(class);

        // Size of the struct via `getelementptr null, 1`.
        let null = Value::from(Constant::null(handle.clone()));
        let one = Value::from(Constant::int(I64, 1));
        let end = self
            .builder
            .gep(null, &[one], Type::named_struct(info.qualified.clone()));
        let size = self.builder.cast(CastOp::PtrToInt, end, I64);
        let malloc = self.malloc();
        let Some(raw) = self.builder.call(malloc, [size]) else {
            return Err(self.report(
                scope.file,
                SemaError::invalid_operation("`malloc` must return a pointer", span),
            ));
        };
        let object = self.builder.bitcast(raw, handle);

        self.initialize_fields(&object, class);

        match info.tables.functions.get(&info.name.name) {
            Some(&ctor) => {
                let address = self.function_address(ctor)?;
                let receiver = program.func(ctor).is_method().then(|| object.clone());
                self.call_function(address.into(), receiver, args, &info.name.name, span, scope)?;
            }
            None if !args.is_empty() => {
                let message = format!("class `{}` has no constructor", info.name.name);
                return Err(self.report(scope.file, SemaError::invalid_operation(message, span)));
            }
            None => {}
        }
        debug!(class = %info.qualified, "new");
        Ok((object, class))
    }

    /// Store the constant field initializers of `class`, base class
    /// fields first.
    fn initialize_fields(&mut self, object: &Value, class: ClassId) {
        self.ensure_layout(class);
        let Some(layout) = &self.layouts[class.index()] else {
            return;
        };
        let stores: Vec<(u32, Type, Constant)> = layout
            .initializers
            .iter()
            .map(|(slot, constant)| {
                (*slot, layout.fields[*slot as usize].clone(), constant.clone())
            })
            .collect();
        for (slot, ty, constant) in stores {
            let ptr = self.builder.struct_gep(object.clone(), slot, ty);
            self.builder.store(constant.into(), ptr);
        }
    }
}

/// Source-like rendering of a qualifier chain, for messages.
fn dotted(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::MemberAccess { parent, member } => format!("{}.{}", dotted(parent), member.name),
        ExprKind::This => "this".to_owned(),
        ExprKind::Base => "base".to_owned(),
        _ => expr.kind.shape_name().to_owned(),
    }
}
