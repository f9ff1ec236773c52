//! Member access on classes, namespaces and enums.

use panda_diagnostic::ErrorCode;
use panda_ir::ast::build::{
    assign, base, binary, builtin, call, class, enumeration, expr_stmt, file, function, int, local,
    member, name, named, new_object, param, ret, this, var, WithModifier,
};
use panda_ir::ast::{BinaryOp, BuiltinType, Declaration, SourceFile, TypeExpr};
use panda_llir::Module;
use panda_sema::{compile, CompileOptions, CompileOutput};
use pretty_assertions::assert_eq;

fn i32_ty() -> TypeExpr {
    builtin(BuiltinType::I32)
}

fn compile_files(files: Vec<SourceFile>) -> CompileOutput {
    compile(files, &CompileOptions::default().unlimited())
}

fn function_text(module: &Module, name: &str) -> String {
    let Some(id) = module.function_by_name(name) else {
        panic!("no function `{name}` in module");
    };
    module.function(id).to_string()
}

/// Everything after the signature line.
fn body(text: &str) -> &str {
    text.split_once('\n').map_or("", |(_, rest)| rest)
}

fn messages(output: &CompileOutput) -> Vec<&str> {
    output.diagnostics.iter().map(|d| d.message.as_str()).collect()
}

/// `Animal { legs; speak() }` and `Dog : Animal { bark() = base.speak(); wag() = this.speak() }`.
fn animals() -> Vec<Declaration> {
    vec![
        class(
            "Animal",
            &[],
            vec![
                var("legs", Some(i32_ty()), Some(int(4))).public().into(),
                function("speak", vec![], Some(i32_ty()), vec![ret(Some(member(this(), "legs")))])
                    .public()
                    .into(),
                function(
                    "double_legs",
                    vec![],
                    Some(i32_ty()),
                    vec![ret(Some(binary(BinaryOp::Mul, name("legs"), int(2))))],
                )
                .into(),
            ],
        )
        .into(),
        class(
            "Dog",
            &["Animal"],
            vec![
                function(
                    "bark",
                    vec![],
                    Some(i32_ty()),
                    vec![ret(Some(call(member(base(), "speak"), vec![])))],
                )
                .public()
                .into(),
                function(
                    "wag",
                    vec![],
                    Some(i32_ty()),
                    vec![ret(Some(call(member(this(), "speak"), vec![])))],
                )
                .public()
                .into(),
            ],
        )
        .into(),
    ]
}

#[test]
fn base_and_this_reach_the_same_method() {
    let output = compile_files(vec![file("", animals())]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let bark = function_text(&output.module, "Dog.bark");
    let wag = function_text(&output.module, "Dog.wag");
    assert!(bark.starts_with("define i32 @Dog.bark(%Dog* %this)"), "{bark}");
    assert_eq!(body(&bark), body(&wag));
    assert!(bark.contains("bitcast %Dog* %this to %Animal*"), "{bark}");
    assert!(bark.contains("call i32 @Animal.speak(%Animal* %v.0)"), "{bark}");
}

#[test]
fn fields_are_addressed_through_the_layout() {
    let output = compile_files(vec![file("", animals())]);
    let speak = function_text(&output.module, "Animal.speak");
    assert!(
        speak.contains("getelementptr inbounds %Animal, %Animal* %this, i32 0, i32 0"),
        "{speak}"
    );
    let doubled = function_text(&output.module, "Animal.double_legs");
    assert!(doubled.contains("mul i32"), "{doubled}");
}

#[test]
fn method_reference_without_parentheses_is_a_call() {
    let mut decls = animals();
    let dog = || local(var("d", Some(named("Dog")), Some(new_object("Dog", vec![]))));
    decls.push(
        function(
            "implicit",
            vec![],
            Some(i32_ty()),
            vec![dog(), ret(Some(member(name("d"), "speak")))],
        )
        .into(),
    );
    decls.push(
        function(
            "explicit",
            vec![],
            Some(i32_ty()),
            vec![dog(), ret(Some(call(member(name("d"), "speak"), vec![])))],
        )
        .into(),
    );
    let output = compile_files(vec![file("", decls)]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let implicit = function_text(&output.module, "implicit");
    let explicit = function_text(&output.module, "explicit");
    assert_eq!(body(&implicit), body(&explicit));
    assert!(implicit.contains("call i32 @Animal.speak("), "{implicit}");
}

#[test]
fn new_allocates_and_initializes_inherited_fields() {
    let mut decls = animals();
    decls.push(
        function(
            "make",
            vec![],
            Some(named("Dog")),
            vec![ret(Some(new_object("Dog", vec![])))],
        )
        .into(),
    );
    let output = compile_files(vec![file("", decls)]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let make = function_text(&output.module, "make");
    assert!(make.contains("getelementptr inbounds %Dog, %Dog* null, i64 1"), "{make}");
    assert!(make.contains("ptrtoint %Dog*"), "{make}");
    assert!(make.contains("call i8* @malloc(i64"), "{make}");
    assert!(make.contains("store i32 4, i32*"), "{make}");
    assert!(output.module.to_string().contains("declare i8* @malloc(i64)"));
}

#[test]
fn constructor_runs_with_the_new_object() {
    let output = compile_files(vec![file(
        "",
        vec![
            class(
                "Point",
                &[],
                vec![
                    var("x", Some(i32_ty()), None).into(),
                    function(
                        "Point",
                        vec![param("v", i32_ty())],
                        None,
                        vec![expr_stmt(assign(name("x"), name("v")))],
                    )
                    .public()
                    .into(),
                ],
            )
            .into(),
            class("Plain", &[], vec![]).into(),
            function(
                "build",
                vec![],
                None,
                vec![
                    expr_stmt(new_object("Point", vec![int(3)])),
                    expr_stmt(new_object("Plain", vec![int(1)])),
                ],
            )
            .into(),
        ],
    )]);
    assert_eq!(messages(&output), vec!["class `Plain` has no constructor"]);
    let build = function_text(&output.module, "build");
    assert!(build.contains("call void @Point.Point(%Point* "), "{build}");
    assert!(build.contains(", i32 3)"), "{build}");
}

#[test]
fn namespaces_statics_and_enums_resolve_statically() {
    let output = compile_files(vec![
        file(
            "util",
            vec![function(
                "twice",
                vec![param("x", i32_ty())],
                Some(i32_ty()),
                vec![ret(Some(binary(BinaryOp::Add, name("x"), name("x"))))],
            )
            .into()],
        ),
        file(
            "",
            vec![
                class(
                    "Config",
                    &[],
                    vec![var("level", Some(i32_ty()), Some(int(3)))
                        .static_()
                        .public()
                        .into()],
                )
                .into(),
                enumeration("Color", vec![("Red", None), ("Blue", None)]).into(),
                function(
                    "main",
                    vec![],
                    Some(i32_ty()),
                    vec![
                        expr_stmt(call(member(name("util"), "twice"), vec![int(2)])),
                        expr_stmt(member(name("Config"), "level")),
                        ret(Some(member(name("Color"), "Blue"))),
                    ],
                )
                .into(),
            ],
        ),
    ]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let main = function_text(&output.module, "main");
    assert!(main.contains("call i32 @util.twice(i32 2)"), "{main}");
    assert!(main.contains("load i32, i32* @Config.level"), "{main}");
    assert!(main.contains("ret i32 1"), "{main}");
}

#[test]
fn class_typed_value_gives_way_to_an_enum_member() {
    let output = compile_files(vec![file(
        "",
        vec![
            class("Shape", &[], vec![var("sides", Some(i32_ty()), Some(int(3))).public().into()])
                .into(),
            enumeration("Kind", vec![("Round", None), ("Flat", None)]).into(),
            function(
                "pick",
                vec![param("Kind", named("Shape"))],
                Some(i32_ty()),
                vec![
                    local(var("first", Some(i32_ty()), Some(member(name("Kind"), "sides")))),
                    ret(Some(binary(
                        BinaryOp::Add,
                        name("first"),
                        member(name("Kind"), "Flat"),
                    ))),
                ],
            )
            .into(),
        ],
    )]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let pick = function_text(&output.module, "pick");
    assert!(pick.contains("getelementptr inbounds %Shape"), "{pick}");
    assert!(
        pick.lines().any(|line| line.contains("= add i32 ") && line.ends_with(", 1")),
        "{pick}"
    );
    assert!(!pick.contains("Kind.Flat"), "{pick}");
}

#[test]
fn visibility_and_missing_members() {
    let output = compile_files(vec![file(
        "",
        vec![
            class("Safe", &[], vec![var("code", Some(i32_ty()), Some(int(7))).into()]).into(),
            function(
                "peek",
                vec![param("s", named("Safe"))],
                Some(i32_ty()),
                vec![ret(Some(member(name("s"), "code")))],
            )
            .into(),
            function(
                "missing",
                vec![param("s", named("Safe"))],
                Some(i32_ty()),
                vec![ret(Some(member(name("s"), "nothing")))],
            )
            .into(),
        ],
    )]);
    assert_eq!(
        messages(&output),
        vec![
            "`Safe.code` is not public",
            "unresolved reference `Safe.nothing`",
        ]
    );
    assert!(output.diagnostics.iter().all(|d| d.code != ErrorCode::E2001));
}

#[test]
fn receivers_are_required_where_they_are_missing() {
    let mut decls = animals();
    let lonely = function(
        "lonely",
        vec![],
        None,
        vec![expr_stmt(call(member(base(), "speak"), vec![]))],
    );
    decls.push(class("Solo", &[], vec![lonely.into()]).into());
    decls.push(
        function(
            "free",
            vec![],
            Some(i32_ty()),
            vec![
                expr_stmt(call(member(name("Animal"), "speak"), vec![])),
                ret(Some(member(this(), "legs"))),
            ],
        )
        .into(),
    );
    let output = compile_files(vec![file("", decls)]);
    assert_eq!(
        messages(&output),
        vec![
            "class `Solo` has no parent class",
            "`Animal.speak` is an instance member and needs a receiver",
            "`this` outside of an instance method",
        ]
    );
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2005);
}
