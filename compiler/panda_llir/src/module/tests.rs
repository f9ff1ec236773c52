use super::*;
use crate::{FunctionBuilder, Param};
use panda_types::{StructType, I32, VOID};
use pretty_assertions::assert_eq;

#[test]
fn renders_full_module() {
    let mut module = Module::new("demo");
    let node = module.define_type(
        "list.Node",
        Type::Struct(StructType::named(
            "list.Node",
            vec![I32, Type::pointer_to(Type::named_struct("list.Node"))],
        )),
    );
    module.add_global(Global::constant("list.Color.Red", Constant::int(I32, 0)));
    module.add_global(Global::new("list.count", I32, Some(Constant::int(I32, 0))));
    module.add_function(Function::new(
        "malloc",
        Type::i8_ptr(),
        vec![Param::new("size", panda_types::I64)],
        false,
    ));
    let id = module.add_function(Function::new(
        "list.Node.reset",
        VOID,
        vec![Param::new("this", Type::pointer_to(node))],
        false,
    ));
    let mut b = FunctionBuilder::new();
    b.ret(None);
    module.define_body(id, b.finish());

    assert_eq!(
        module.to_string(),
        "; ModuleID = 'demo'\n\
         source_filename = \"demo\"\n\
         \n\
         %list.Node = type { i32, %list.Node* }\n\
         \n\
         @list.Color.Red = constant i32 0\n\
         @list.count = global i32 0\n\
         \n\
         declare i8* @malloc(i64)\n\
         \n\
         define void @list.Node.reset(%list.Node* %this) {\n\
         bb.0:\n  \
         ret void\n\
         }\n"
    );
}

#[test]
fn string_constants_are_interned() {
    let mut module = Module::new("m");
    let a = module.string_constant("hi");
    let b = module.string_constant("hi");
    let c = module.string_constant("bye");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(module.globals().len(), 2);
    assert_eq!(
        module.global_by_name(".str.0").map(ToString::to_string),
        Some("@.str.0 = private constant [3 x i8] c\"hi\\00\"".to_owned())
    );
}

#[test]
fn lookups_keep_first_registration() {
    let mut module = Module::new("m");
    let first = module.add_function(Function::new("f", VOID, vec![], false));
    module.add_function(Function::new("f", I32, vec![], false));
    assert_eq!(module.function_by_name("f"), Some(first));
    assert!(module.function(first).is_declaration());

    module.define_type("T", Type::Struct(StructType::named("T", vec![I32])));
    module.define_type("T", Type::Struct(StructType::named("T", vec![I32, I32])));
    assert_eq!(
        module.type_definition("T").map(Type::definition_string),
        Some("{ i32 }".to_owned())
    );
}

#[test]
fn external_global() {
    let g = Global::new("errno", I32, None);
    assert_eq!(g.to_string(), "@errno = external global i32");
    assert_eq!(g.address().ty(), Type::pointer_to(I32));
}

#[test]
fn variadic_declaration() {
    let f = Function::new("printf", I32, vec![Param::new("fmt", Type::i8_ptr())], true);
    assert_eq!(f.to_string(), "declare i32 @printf(i8*, ...)");
    assert_eq!(f.address().ty().to_string(), "i32 (i8*, ...)*");
}
