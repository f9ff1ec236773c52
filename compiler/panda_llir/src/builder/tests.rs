use super::*;
use crate::{Function, Module, Param};
use panda_types::{StructType, F64, I64, VOID};
use pretty_assertions::assert_eq;

fn render(name: &str, ret: Type, params: Vec<Param>, builder: FunctionBuilder) -> String {
    let mut func = Function::new(name, ret, params, false);
    func.blocks = builder.finish();
    func.to_string()
}

#[test]
fn alloca_store_load() {
    let mut b = FunctionBuilder::new();
    let slot = b.alloca(I32);
    b.store(Constant::int(I32, 7).into(), slot.clone());
    let v = b.load(slot);
    assert_eq!(v.ty(), I32);
    b.ret(Some(v));

    assert_eq!(
        render("seven", I32, vec![], b),
        "define i32 @seven() {\n\
         bb.0:\n  \
         %v.0 = alloca i32\n  \
         store i32 7, i32* %v.0\n  \
         %v.1 = load i32, i32* %v.0\n  \
         ret i32 %v.1\n\
         }"
    );
}

#[test]
fn struct_field_access() {
    let point = Type::named_struct("geo.Point");
    let this = Value::Param {
        name: "this".into(),
        ty: Type::pointer_to(point),
    };
    let mut b = FunctionBuilder::new();
    let field = b.struct_gep(this.clone(), 1, F64);
    assert_eq!(field.ty(), Type::pointer_to(F64));
    let y = b.load(field);
    b.ret(Some(y));

    assert_eq!(
        render("geo.Point.y", F64, vec![Param::new("this", this.ty())], b),
        "define double @geo.Point.y(%geo.Point* %this) {\n\
         bb.0:\n  \
         %v.0 = getelementptr inbounds %geo.Point, %geo.Point* %this, i32 0, i32 1\n  \
         %v.1 = load double, double* %v.0\n  \
         ret double %v.1\n\
         }"
    );
}

#[test]
fn bitcast_same_type_is_identity() {
    let mut b = FunctionBuilder::new();
    let p = Value::Param {
        name: "p".into(),
        ty: Type::i8_ptr(),
    };
    assert_eq!(b.bitcast(p.clone(), Type::i8_ptr()), p);
    let cast = b.bitcast(p, Type::pointer_to(I64));
    assert_eq!(cast.ty(), Type::pointer_to(I64));
    b.ret(None);
    let blocks = b.finish();
    assert_eq!(blocks[0].instrs.len(), 1);
}

#[test]
fn calls_void_and_value() {
    let mut module = Module::new("m");
    let log = module.add_function(Function::new("log", VOID, vec![Param::new("x", I32)], false));
    let printf = module.add_function(Function::new(
        "printf",
        I32,
        vec![Param::new("fmt", Type::i8_ptr())],
        true,
    ));
    let fmt = module.string_constant("%d");

    let mut b = FunctionBuilder::new();
    let none = b.call(
        module.function(log).address().into(),
        [Constant::int(I32, 1).into()],
    );
    assert!(none.is_none());
    let count = b.call(
        module.function(printf).address().into(),
        [fmt.into(), Constant::int(I32, 2).into()],
    );
    assert_eq!(count.map(|v| v.ty()), Some(I32));
    b.ret(None);

    let text = render("main", VOID, vec![], b);
    assert!(text.contains("  call void @log(i32 1)\n"), "{text}");
    assert!(
        text.contains(
            "  %v.0 = call i32 (i8*, ...) @printf(i8* getelementptr inbounds ([3 x i8], [3 x i8]* @.str.0, i64 0, i64 0), i32 2)\n"
        ),
        "{text}"
    );
}

#[test]
fn branches_phi_and_switch() {
    let mut b = FunctionBuilder::new();
    let then_bb = b.new_block();
    let merge = b.new_block();
    let x = Value::Param {
        name: "x".into(),
        ty: I32,
    };
    let cond = b.icmp(IPred::Slt, x.clone(), Constant::int(I32, 0).into());
    b.cond_br(cond, then_bb, merge);
    b.position_at(then_bb);
    let neg = b.binary(BinOp::Sub, Constant::int(I32, 0).into(), x.clone());
    b.br(merge);
    b.position_at(merge);
    let abs = b.phi(I32, vec![(x.clone(), BlockId::new(0)), (neg, then_bb)]);
    let done = b.new_block();
    b.switch(abs, done, vec![(Constant::int(I32, 1), done)]);
    b.position_at(done);
    b.ret(None);

    let text = render("f", VOID, vec![Param::new("x", I32)], b);
    assert!(text.contains("%v.0 = icmp slt i32 %x, 0"), "{text}");
    assert!(text.contains("br i1 %v.0, label %bb.1, label %bb.2"), "{text}");
    assert!(text.contains("%v.1 = sub i32 0, %x"), "{text}");
    assert!(text.contains("%v.2 = phi i32 [ %x, %bb.0 ], [ %v.1, %bb.1 ]"), "{text}");
    assert!(
        text.contains("switch i32 %v.2, label %bb.3 [\n    i32 1, label %bb.3\n  ]"),
        "{text}"
    );
}

#[test]
fn second_terminator_is_ignored_and_finish_seals() {
    let mut b = FunctionBuilder::new();
    let dangling = b.new_block();
    assert!(!b.is_terminated());
    b.ret(None);
    assert!(b.is_terminated());
    b.unreachable();
    b.position_at(dangling);
    assert!(!b.is_terminated());

    let blocks = b.finish();
    assert_eq!(blocks[0].terminator, Some(Terminator::Ret(None)));
    assert_eq!(blocks[1].terminator, Some(Terminator::Unreachable));
}

#[test]
fn fneg_feeds_a_phi() {
    let mut b = FunctionBuilder::new();
    let other = b.new_block();
    let merge = b.new_block();
    let neg = b.fneg(Constant::float(F64, 1.0).into());
    b.cond_br(Constant::bool(true).into(), merge, other);
    b.position_at(other);
    b.br(merge);
    b.position_at(merge);
    let pick = b.phi(
        F64,
        vec![(neg, BlockId::new(0)), (Constant::float(F64, 2.0).into(), other)],
    );
    assert_eq!(pick.ty(), F64);
    b.ret(Some(pick));
    let text = render("g", F64, vec![], b);
    assert!(text.contains("%v.0 = fneg double 0x3FF0000000000000"), "{text}");
    assert!(
        text.contains("%v.1 = phi double [ %v.0, %bb.0 ], [ 0x4000000000000000, %bb.1 ]"),
        "{text}"
    );
}

#[test]
fn select_takes_the_type_of_its_arms() {
    let mut b = FunctionBuilder::new();
    let picked = b.select(
        Constant::bool(false).into(),
        Constant::int(I32, 4).into(),
        Constant::int(I32, 5).into(),
    );
    assert_eq!(picked.ty(), I32);
    b.ret(Some(picked));
    let text = render("s", I32, vec![], b);
    assert!(text.contains("%v.0 = select i1 false, i32 4, i32 5"), "{text}");
    assert!(text.contains("ret i32 %v.0"), "{text}");
}

#[test]
fn literal_struct_alloca() {
    let mut b = FunctionBuilder::new();
    let slot = b.alloca(Type::Struct(StructType::literal(vec![I32, I32])));
    assert_eq!(slot.to_string(), "%v.0");
    b.ret(None);
    let text = render("h", VOID, vec![], b);
    assert!(text.contains("%v.0 = alloca { i32, i32 }"), "{text}");
}
