use super::*;
use panda_diagnostic::ErrorCode;
use panda_ir::ast::build::{
    binary, builtin, class, expr_stmt, file, function, int, named, new_object, var, WithModifier,
};
use panda_ir::ast::{BinaryOp, BuiltinType};
use panda_types::{F64, I32, I64};
use pretty_assertions::assert_eq;

use crate::test_helpers::{compile_files, diagnostics, lowerer, messages, options, registered};

fn field(name: &str, ty: BuiltinType) -> panda_ir::ast::Declaration {
    var(name, Some(builtin(ty)), None).into()
}

fn definition(module: &panda_llir::Module, name: &str) -> Option<String> {
    module.type_definition(name).map(Type::definition_string)
}

#[test]
fn derived_struct_starts_with_base_fields() {
    let output = compile_files(vec![file(
        "zoo",
        vec![
            class(
                "Animal",
                &[],
                vec![
                    field("legs", BuiltinType::I32),
                    var("count", Some(builtin(BuiltinType::I64)), Some(int(0)))
                        .static_()
                        .into(),
                ],
            )
            .into(),
            class("Bird", &["Animal"], vec![field("wingspan", BuiltinType::F64)]).into(),
        ],
    )]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(
        definition(&output.module, "zoo.Animal").as_deref(),
        Some("{ i32 }")
    );
    assert_eq!(
        definition(&output.module, "zoo.Bird").as_deref(),
        Some("{ i32, double }")
    );
    assert!(output.module.global_by_name("zoo.Animal.count").is_some());
}

#[test]
fn field_slots_follow_the_chain() {
    let program = registered(vec![file(
        "",
        vec![
            class("A", &[], vec![field("a", BuiltinType::I32)]).into(),
            class("B", &["A"], vec![field("b", BuiltinType::I64)]).into(),
            class("C", &["B"], vec![field("c", BuiltinType::F64)]).into(),
        ],
    )]);
    let options = options();
    let mut lowerer = lowerer(&program, &options);

    let c = ClassId::new(2);
    assert_eq!(lowerer.field_slot(c, VarId::new(0)), Some((0, I32)));
    assert_eq!(lowerer.field_slot(c, VarId::new(1)), Some((1, I64)));
    assert_eq!(lowerer.field_slot(c, VarId::new(2)), Some((2, F64)));
    assert_eq!(lowerer.field_slot(ClassId::new(0), VarId::new(2)), None);
    assert!(lowerer.layouts.iter().all(Option::is_some));
}

#[test]
fn field_initializers_are_evaluated_once_per_class() {
    let program = registered(vec![file(
        "",
        vec![
            class(
                "A",
                &[],
                vec![
                    var("a", Some(builtin(BuiltinType::I32)), Some(int(7))).into(),
                    var(
                        "sum",
                        Some(builtin(BuiltinType::I32)),
                        Some(binary(BinaryOp::Add, int(1), int(2))),
                    )
                    .into(),
                ],
            )
            .into(),
            class(
                "B",
                &["A"],
                vec![var("b", Some(builtin(BuiltinType::I64)), Some(int(9))).into()],
            )
            .into(),
        ],
    )]);
    let options = options();
    let mut lowerer = lowerer(&program, &options);
    let b = ClassId::new(1);
    lowerer.ensure_layout(b);
    lowerer.ensure_layout(ClassId::new(0));

    let Some(layout) = lowerer.layouts[b.index()].clone() else {
        panic!("no layout for `B`");
    };
    assert_eq!(
        layout.initializers,
        vec![
            (0, panda_llir::Constant::int(I32, 7)),
            (2, panda_llir::Constant::int(I64, 9)),
        ]
    );
    let diags = diagnostics(lowerer);
    assert_eq!(messages(&diags), vec!["initializer of field `A.sum` is not constant"]);
    assert_eq!(diags[0].code, ErrorCode::E2003);
}

#[test]
fn non_constant_field_initializer_is_reported_once() {
    let output = compile_files(vec![file(
        "",
        vec![
            class(
                "Counter",
                &[],
                vec![var(
                    "start",
                    Some(builtin(BuiltinType::I32)),
                    Some(binary(BinaryOp::Mul, int(2), int(3))),
                )
                .into()],
            )
            .into(),
            function(
                "make",
                vec![],
                None,
                vec![
                    expr_stmt(new_object("Counter", vec![])),
                    expr_stmt(new_object("Counter", vec![])),
                ],
            )
            .into(),
        ],
    )]);
    assert_eq!(
        messages(&output.diagnostics),
        vec!["initializer of field `Counter.start` is not constant"]
    );
}

#[test]
fn intrinsic_class_ignores_its_parent() {
    let output = compile_files(vec![file(
        "",
        vec![
            class("Object", &[], vec![field("id", BuiltinType::I64)]).into(),
            class("string", &["Object"], vec![field("len", BuiltinType::I32)]).into(),
        ],
    )]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(
        definition(&output.module, "string").as_deref(),
        Some("{ i32 }")
    );
}

#[test]
fn class_typed_field_is_a_handle() {
    let output = compile_files(vec![file(
        "",
        vec![class(
            "Node",
            &[],
            vec![
                var("next", Some(named("Node")), None).into(),
                field("value", BuiltinType::I32),
            ],
        )
        .into()],
    )]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(
        definition(&output.module, "Node").as_deref(),
        Some("{ %Node*, i32 }")
    );
}

#[test]
fn unresolved_field_type_gets_no_slot() {
    let output = compile_files(vec![file(
        "",
        vec![class(
            "Holder",
            &[],
            vec![
                var("inner", Some(named("Missing")), None).into(),
                field("size", BuiltinType::I32),
            ],
        )
        .into()],
    )]);
    assert_eq!(
        messages(&output.diagnostics),
        vec!["unresolved reference `Missing`"]
    );
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2002);
    assert_eq!(
        definition(&output.module, "Holder").as_deref(),
        Some("{ i32 }")
    );
}

#[test]
fn lookup_without_receiver_rejects_fields() {
    let program = registered(vec![file(
        "",
        vec![class(
            "Counter",
            &[],
            vec![
                field("hits", BuiltinType::I32),
                var("total", Some(builtin(BuiltinType::I32)), None)
                    .static_()
                    .public()
                    .into(),
            ],
        )
        .into()],
    )]);
    let options = options();
    let mut lowerer = lowerer(&program, &options);
    let counter = ClassId::new(0);
    let span = Span::DUMMY;

    let total = lowerer.lookup_member(None, counter, "total", false, span, 0);
    assert_eq!(
        total.map(|r| r.access),
        Ok(Access::Place(Value::from(panda_llir::Constant::Global {
            name: "Counter.total".to_owned(),
            ty: Type::pointer_to(I32),
        })))
    );
    assert!(lowerer
        .lookup_member(None, counter, "hits", true, span, 0)
        .is_err());
    assert!(lowerer
        .lookup_member(None, counter, "missing", true, span, 0)
        .is_err());
    assert_eq!(
        messages(&diagnostics(lowerer)),
        vec![
            "`Counter.hits` is an instance member and needs a receiver",
            "unresolved reference `Counter.missing`",
        ]
    );
}

#[test]
fn private_members_need_a_self_context() {
    let program = registered(vec![file(
        "",
        vec![class(
            "Vault",
            &[],
            vec![var("secret", Some(builtin(BuiltinType::I32)), None)
                .static_()
                .into()],
        )
        .into()],
    )]);
    let options = options();
    let mut lowerer = lowerer(&program, &options);

    let vault = ClassId::new(0);
    assert!(lowerer
        .lookup_member(None, vault, "secret", true, Span::DUMMY, 0)
        .is_ok());
    assert!(lowerer
        .lookup_member(None, vault, "secret", false, Span::DUMMY, 0)
        .is_err());
    assert_eq!(
        messages(&diagnostics(lowerer)),
        vec!["`Vault.secret` is not public"]
    );
}
