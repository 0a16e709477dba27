//! Strongly typed identifier wrappers.
//!
//! Every id is a dense index into a `Vec` owned by the network or the demand
//! table.  The inner integer is `pub`; prefer `.index()` when indexing.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "not wired yet" (e.g. a route whose sink link is
            /// still unknown while the topology is being assembled).
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a graph node (cell boundary or source/sink pseudo-node).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed link.  Links are stored sorted by source node.
    pub struct LinkId(u32);
}

typed_id! {
    /// Dense route index.  Potentials are stored per `RouteId`.
    pub struct RouteId(u32);
}

typed_id! {
    /// Position of a group in the scenario's demand table.
    pub struct GroupId(u32);
}
