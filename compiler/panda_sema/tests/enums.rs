//! Enum ordinal assignment through the public `compile` entry point.

use panda_diagnostic::ErrorCode;
use panda_ir::ast::build::{
    builtin, constant, enumeration, file, float, int, member, name, string, var,
};
use panda_ir::ast::{BuiltinType, Declaration};
use panda_ir::Span;
use panda_sema::{compile, CompileOptions, CompileOutput};
use pretty_assertions::assert_eq;

fn compile_root(declarations: Vec<Declaration>) -> CompileOutput {
    compile(vec![file("", declarations)], &CompileOptions::default().unlimited())
}

fn ordinal(output: &CompileOutput, global: &str) -> Option<i64> {
    output
        .module
        .global_by_name(global)
        .and_then(|g| g.init.as_ref())
        .and_then(panda_llir::Constant::as_int)
}

#[test]
fn implicit_members_continue_after_explicit_ones() {
    let mut late = int(4);
    late.span = Span::new(30, 31);
    let output = compile_root(vec![enumeration(
        "E",
        vec![("A", None), ("B", Some(int(5))), ("C", None), ("D", Some(late))],
    )
    .into()]);

    assert_eq!(ordinal(&output, "E.A"), Some(0));
    assert_eq!(ordinal(&output, "E.B"), Some(5));
    assert_eq!(ordinal(&output, "E.C"), Some(6));
    assert_eq!(ordinal(&output, "E.D"), None);

    assert_eq!(output.diagnostics.len(), 1);
    let diag = &output.diagnostics[0];
    assert_eq!(diag.code, ErrorCode::E2004);
    assert_eq!(diag.message, "enum value must be greater than 6");
    assert_eq!(diag.primary_span(), Some(Span::new(30, 31)));
}

#[test]
fn member_globals_are_immutable_i32() {
    let output = compile_root(vec![enumeration("Flag", vec![("Off", None), ("On", None)]).into()]);
    assert!(output.diagnostics.is_empty());
    let text = output.module.to_string();
    assert!(text.contains("@Flag.Off = constant i32 0"), "{text}");
    assert!(text.contains("@Flag.On = constant i32 1"), "{text}");
}

#[test]
fn explicit_values_must_be_integers() {
    let output = compile_root(vec![enumeration(
        "Bad",
        vec![("Text", Some(string("x"))), ("Real", Some(float(1.5)))],
    )
    .into()]);
    assert_eq!(output.diagnostics.len(), 2);
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.code == ErrorCode::E2004 && d.message == "enum value must be integer"));
    assert_eq!(ordinal(&output, "Bad.Text"), None);
}

#[test]
fn explicit_values_may_name_constants() {
    let output = compile_root(vec![
        constant("base", int(5)).into(),
        var("moving", Some(builtin(BuiltinType::I32)), Some(int(5))).into(),
        enumeration("Good", vec![("A", Some(name("base"))), ("B", None)]).into(),
        enumeration("Worse", vec![("A", Some(name("moving")))]).into(),
    ]);
    assert_eq!(ordinal(&output, "Good.A"), Some(5));
    assert_eq!(ordinal(&output, "Good.B"), Some(6));
    assert_eq!(ordinal(&output, "Worse.A"), None);

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2003);
    assert_eq!(output.diagnostics[0].message, "enum value must be constant");
}

#[test]
fn ordinals_of_later_enums_are_computed_on_demand() {
    let output = compile_root(vec![
        enumeration("First", vec![("A", Some(member(name("Second"), "B")))]).into(),
        enumeration("Second", vec![("A", None), ("B", Some(int(7)))]).into(),
    ]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(ordinal(&output, "First.A"), Some(7));
    assert_eq!(ordinal(&output, "Second.B"), Some(7));
}

#[test]
fn enums_referring_to_each_other_are_cyclic() {
    let output = compile_root(vec![
        enumeration("P", vec![("A", Some(member(name("Q"), "A")))]).into(),
        enumeration("Q", vec![("A", Some(member(name("P"), "A")))]).into(),
    ]);
    let messages: Vec<&str> = output.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["cyclic reference to enum `P`"]);
    assert_eq!(ordinal(&output, "P.A"), None);
    assert_eq!(ordinal(&output, "Q.A"), None);
}

#[test]
fn globals_may_use_enums_declared_later() {
    let output = compile_root(vec![
        var(
            "start",
            Some(builtin(BuiltinType::I32)),
            Some(member(name("Mode"), "Run")),
        )
        .into(),
        enumeration("Mode", vec![("Idle", None), ("Run", None)]).into(),
    ]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(ordinal(&output, "start"), Some(1));
}

#[test]
fn ordinals_stay_within_i32() {
    let mut wide = int(1_i64 << 31);
    wide.span = Span::new(50, 60);
    let output = compile_root(vec![enumeration(
        "Big",
        vec![
            ("Top", Some(int(i64::from(i32::MAX)))),
            ("Past", None),
            ("Wide", Some(wide)),
        ],
    )
    .into()]);

    assert_eq!(ordinal(&output, "Big.Top"), Some(i64::from(i32::MAX)));
    assert_eq!(ordinal(&output, "Big.Past"), None);
    assert_eq!(ordinal(&output, "Big.Wide"), None);
    let messages: Vec<&str> = output.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["enum value overflows `i32`", "enum value must fit in `i32`"]
    );
    assert!(output.diagnostics.iter().all(|d| d.code == ErrorCode::E2004));
    assert_eq!(output.diagnostics[1].primary_span(), Some(Span::new(50, 60)));
}

#[test]
fn negative_explicit_value_is_below_the_first_ordinal() {
    let output = compile_root(vec![enumeration(
        "Low",
        vec![("Under", Some(int(-3))), ("Zero", None)],
    )
    .into()]);
    assert_eq!(ordinal(&output, "Low.Under"), None);
    assert_eq!(ordinal(&output, "Low.Zero"), Some(0));
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].message, "enum value must be greater than -1");
}
