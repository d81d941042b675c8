//! Arena handles and ranges for the flat AST.
//!
//! Nodes reference children by `u32` index into the owning
//! [`AstArena`](crate::AstArena); lists are `start..start+len` windows into
//! one of the arena's side tables.

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Invalid ID (sentinel value).
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

macro_rules! define_range {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            /// Empty range.
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn to_range(self) -> std::ops::Range<usize> {
                let start = self.start as usize;
                start..start + self.len as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..{})", stringify!($name), self.start, self.start + self.len)
            }
        }
    };
}

define_id!(
    /// Index into the expression table.
    ExprId
);
define_id!(
    /// Index into the statement table.
    StmtId
);
define_id!(
    /// Index into the variable table (globals, locals and parameters).
    VarId
);
define_id!(
    /// Index into the type declaration table.
    TypeDeclId
);
define_id!(
    /// Index into the function table.
    FuncId
);

define_range!(
    /// Window into the flattened expression-list table.
    ExprRange
);
define_range!(
    /// Window into the flattened statement-list table.
    StmtRange
);
define_range!(
    /// Contiguous run of attributes.
    AttrRange
);
define_range!(
    /// Contiguous run of struct members.
    MemberRange
);
define_range!(
    /// Window into the flattened variable-list table (function parameters).
    VarRange
);
define_range!(
    /// Contiguous run of `case` selectors.
    SelectorRange
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_validity() {
        assert!(ExprId::new(0).is_valid());
        assert!(!ExprId::INVALID.is_valid());
        assert_eq!(StmtId::default(), StmtId::INVALID);
        assert_eq!(format!("{:?}", VarId::new(3)), "VarId(3)");
    }

    #[test]
    fn test_range_window() {
        let range = ExprRange::new(4, 3);
        assert_eq!(range.len(), 3);
        assert_eq!(range.to_range(), 4..7);
        assert!(ExprRange::EMPTY.is_empty());
    }
}
