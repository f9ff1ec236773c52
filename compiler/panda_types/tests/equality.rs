//! Property tests for type equality.

use panda_types::{StructType, Type, F32, F64, I1, I32, I64, I8, LABEL, TOKEN, VOID};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn leaf() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(VOID),
        Just(LABEL),
        Just(TOKEN),
        Just(I1),
        Just(I8),
        Just(I32),
        Just(I64),
        Just(F32),
        Just(F64),
        "[A-C]".prop_map(Type::named_struct),
    ]
}

fn any_type() -> impl Strategy<Value = Type> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::pointer_to),
            (1u64..8, inner.clone()).prop_map(|(n, t)| Type::array(n, t)),
            (1u64..8, inner.clone(), any::<bool>()).prop_map(|(n, t, s)| Type::vector(n, t, s)),
            (prop::collection::vec(inner.clone(), 0..4), any::<bool>()).prop_map(
                |(fields, packed)| {
                    let mut s = StructType::literal(fields);
                    s.packed = packed;
                    Type::Struct(s)
                }
            ),
            ("[A-C]", prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(name, fields)| Type::Struct(StructType::named(name, fields))),
            (inner.clone(), prop::collection::vec(inner, 0..3), any::<bool>())
                .prop_map(|(ret, params, variadic)| Type::function(ret, params, variadic)),
        ]
    })
}

fn hash_of(ty: &Type) -> u64 {
    let mut hasher = DefaultHasher::new();
    ty.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn equality_is_reflexive(t in any_type()) {
        prop_assert!(Type::equal(&t, &t));
        prop_assert!(Type::equal(&t, &t.clone()));
    }

    #[test]
    fn equality_is_symmetric(a in any_type(), b in any_type()) {
        prop_assert_eq!(Type::equal(&a, &b), Type::equal(&b, &a));
    }

    #[test]
    fn equal_types_hash_equal(a in any_type(), b in any_type()) {
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn named_structs_ignore_bodies(
        name in "[A-C]",
        a in prop::collection::vec(any_type(), 0..3),
        b in prop::collection::vec(any_type(), 0..3),
    ) {
        let x = Type::Struct(StructType::named(name.clone(), a));
        let y = Type::Struct(StructType::named(name, b));
        prop_assert_eq!(x, y);
    }

    #[test]
    fn equal_types_render_equal(a in any_type(), b in any_type()) {
        // Integers of one width render identically regardless of signedness.
        if a == b {
            prop_assert_eq!(a.to_string(), b.to_string());
        }
    }
}
