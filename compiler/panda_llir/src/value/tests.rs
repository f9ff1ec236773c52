use super::*;
use panda_types::{F32, F64, I32, I8};
use pretty_assertions::assert_eq;

#[test]
fn int_and_bool_constants() {
    assert_eq!(Constant::int(I32, -7).to_string(), "-7");
    assert_eq!(Constant::bool(true).to_string(), "true");
    assert_eq!(Constant::bool(false).to_string(), "false");
    assert_eq!(Constant::bool(true).ty(), I1);
    assert_eq!(Constant::int(I32, 5).as_int(), Some(5));
}

#[test]
fn float_constants_render_as_double_hex() {
    assert_eq!(Constant::float(F64, 1.0).to_string(), "0x3FF0000000000000");
    // 0.1 is not representable in f32; the rounded value is widened.
    assert_eq!(Constant::float(F32, 0.1).to_string(), "0x3FB99999A0000000");
    assert_eq!(Constant::float(F64, 2.5).as_float(), Some(2.5));
}

#[test]
fn zero_per_type() {
    assert_eq!(Constant::zero(I32).to_string(), "0");
    assert_eq!(Constant::zero(F64).to_string(), "0x0000000000000000");
    assert_eq!(Constant::zero(Type::i8_ptr()).to_string(), "null");
    assert_eq!(
        Constant::zero(Type::array(2, I32)).to_string(),
        "zeroinitializer"
    );
}

#[test]
fn c_string_escapes() {
    let c = Constant::c_string("hi \"x\"\n");
    assert_eq!(c.to_string(), "c\"hi \\22x\\22\\0A\\00\"");
    assert_eq!(c.ty(), Type::array(8, I8));
}

#[test]
fn addresses() {
    let g = Constant::Global {
        name: "geo.origin".into(),
        ty: Type::pointer_to(I32),
    };
    assert_eq!(g.to_string(), "@geo.origin");
    let s = Constant::StrPtr {
        global: ".str.0".into(),
        len: 3,
    };
    assert_eq!(
        s.to_string(),
        "getelementptr inbounds ([3 x i8], [3 x i8]* @.str.0, i64 0, i64 0)"
    );
    assert_eq!(s.ty(), Type::i8_ptr());
}

#[test]
fn value_operands() {
    let local = Value::Local {
        id: LocalId::new(3),
        ty: I32,
    };
    let param = Value::Param {
        name: "this".into(),
        ty: Type::pointer_to(Type::named_struct("A")),
    };
    assert_eq!(local.to_string(), "%v.3");
    assert_eq!(local.typed(), "i32 %v.3");
    assert_eq!(param.typed(), "%A* %this");
    assert_eq!(Value::from(Constant::int(I32, 1)).typed(), "i32 1");
}
