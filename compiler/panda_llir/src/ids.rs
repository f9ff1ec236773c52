//! Index newtypes for module and function entities.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an ID from a raw index.
            #[inline]
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "module and function tables never exceed u32"
            )]
            #[inline]
            pub(crate) fn from_len(len: usize) -> Self {
                Self(len as u32)
            }
        }
    };
}

define_id!(
    /// Function within a [`Module`](crate::Module).
    FuncId
);
define_id!(
    /// Global variable within a [`Module`](crate::Module).
    GlobalId
);
define_id!(
    /// Basic block within one function. Block 0 is the entry.
    BlockId
);
define_id!(
    /// Instruction result within one function.
    LocalId
);
