//! Index newtypes for registered declarations.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "declaration arenas never exceed u32"
            )]
            #[inline]
            pub(crate) fn from_len(len: usize) -> Self {
                Self(len as u32)
            }
        }
    };
}

define_id!(
    /// Node in the [`NamespaceTree`](crate::namespace::NamespaceTree). The
    /// root is `NamespaceId::ROOT`.
    NamespaceId
);
define_id!(VarId);
define_id!(FuncId);
define_id!(EnumId);
define_id!(InterfaceId);
define_id!(ClassId);

impl NamespaceId {
    pub const ROOT: NamespaceId = NamespaceId(0);
}
