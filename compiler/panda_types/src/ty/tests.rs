use super::*;

#[test]
fn primitive_equality() {
    assert_eq!(VOID, Type::Void);
    assert_eq!(LABEL, Type::Label);
    assert_ne!(LABEL, TOKEN);
    assert_eq!(F32, F32);
    assert_ne!(F32, F64);
    assert_ne!(I32, F32);
}

#[test]
fn integer_signedness_is_ignored() {
    assert_eq!(I32, U32);
    assert_eq!(I8, U8);
    assert_ne!(I32, I64);
}

#[test]
fn named_struct_compares_by_name_only() {
    let a = Type::Struct(StructType::named("A", vec![I32]));
    let a_other_body = Type::Struct(StructType::named("A", vec![F64, F64]));
    let b_same_body = Type::Struct(StructType::named("B", vec![I32]));
    let literal = Type::Struct(StructType::literal(vec![I32]));

    assert_eq!(a, a_other_body);
    assert_eq!(a, Type::named_struct("A"));
    assert_ne!(a, b_same_body);
    assert_ne!(a, literal);
    assert_ne!(literal, a);
}

#[test]
fn named_pointer_compares_by_name_only() {
    let named = Type::Pointer(PointerType {
        elem: Box::new(I32),
        name: Some("p".into()),
    });
    let same_name = Type::Pointer(PointerType {
        elem: Box::new(F64),
        name: Some("p".into()),
    });
    assert_eq!(named, same_name);
    assert_ne!(named, Type::pointer_to(I32));
    assert_eq!(Type::pointer_to(I32), Type::pointer_to(U32));
}

#[test]
fn literal_struct_is_structural() {
    let mut packed = StructType::literal(vec![I8, I32]);
    packed.packed = true;
    let unpacked = StructType::literal(vec![I8, I32]);
    assert_ne!(Type::Struct(packed), Type::Struct(unpacked.clone()));
    assert_eq!(
        Type::Struct(unpacked),
        Type::Struct(StructType::literal(vec![I8, I32]))
    );
    assert_ne!(
        Type::Struct(StructType::literal(vec![I8])),
        Type::Struct(StructType::literal(vec![I8, I8]))
    );
}

#[test]
fn literal_struct_ignores_the_opaque_flag() {
    let mut flagged = StructType::literal(vec![I8, I32]);
    flagged.opaque = true;
    let plain = Type::Struct(StructType::literal(vec![I8, I32]));
    let flagged = Type::Struct(flagged);
    assert_eq!(flagged, plain);

    let mut set = std::collections::HashSet::new();
    set.insert(flagged);
    assert!(set.contains(&plain));
}

#[test]
fn integer_ranges() {
    let i8_ty = IntType { bits: 8, signed: true };
    let u8_ty = IntType { bits: 8, signed: false };
    assert!(i8_ty.contains(-128) && i8_ty.contains(127));
    assert!(!i8_ty.contains(128) && !i8_ty.contains(-129));
    assert!(u8_ty.contains(255) && !u8_ty.contains(256) && !u8_ty.contains(-1));

    let i32_ty = IntType { bits: 32, signed: true };
    assert!(i32_ty.contains(i64::from(i32::MAX)));
    assert!(!i32_ty.contains(i64::from(i32::MAX) + 1));
    assert!(IntType { bits: 64, signed: true }.contains(i64::MIN));
    assert!(!IntType { bits: 64, signed: false }.contains(-1));
}

#[test]
fn function_equality() {
    let f = Type::function(I32, vec![I32, I8], false);
    assert_eq!(f, Type::function(I32, vec![I32, I8], false));
    assert_ne!(f, Type::function(I32, vec![I32, I8], true));
    assert_ne!(f, Type::function(I64, vec![I32, I8], false));
    assert_ne!(f, Type::function(I32, vec![I32], false));
}

#[test]
fn array_and_vector_equality() {
    assert_eq!(Type::array(3, I8), Type::array(3, I8));
    assert_ne!(Type::array(3, I8), Type::array(4, I8));
    assert_ne!(Type::vector(4, I32, false), Type::vector(4, I32, true));
    assert_ne!(Type::vector(4, I32, false), Type::array(4, I32));
}

#[test]
fn self_referential_struct_terminates() {
    let node = Type::Struct(StructType::named(
        "Node",
        vec![I32, Type::pointer_to(Type::named_struct("Node"))],
    ));
    assert_eq!(node, node.clone());
    let Type::Struct(s) = &node else {
        panic!("expected struct");
    };
    assert_eq!(s.fields[1], Type::pointer_to(node.clone()));
}

#[test]
fn function_pointer_predicates() {
    let func = Type::function(VOID, vec![], false);
    let fp = Type::pointer_to(func.clone());
    let fpp = Type::pointer_to(fp.clone());

    assert!(func.is_func());
    assert!(fp.is_func_pointer());
    assert!(!fp.is_func_pointer_pointer());
    assert!(fpp.is_func_pointer_pointer());
    assert!(!fpp.is_func_pointer());
    assert!(fp.as_func().is_some());
    assert!(I32.as_func().is_none());
}

#[test]
fn predicates() {
    assert!(I32.is_int() && I32.is_number());
    assert!(F64.is_float() && F64.is_number());
    assert!(I1.is_bool());
    assert!(!I8.is_bool());
    assert!(Type::i8_ptr().is_pointer());
    assert!(Type::array(1, I8).is_array());
    assert!(Type::vector(1, I8, false).is_vector());
    assert!(Type::named_struct("S").is_struct());
    assert!(LABEL.is_label());
    assert!(TOKEN.is_token());
    assert!(VOID.is_void());
    assert_eq!(I16.int_bits(), Some(16));
    assert_eq!(Type::named_struct("S").name(), Some("S"));
}
