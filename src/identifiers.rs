//! Dense identifier types for decision-graph entities.
//!
//! Every state, transition and cue receives a stable integer id at graph
//! construction time. Learners key all of their tables by these ids, so any
//! number of independent learners can share one read-only graph.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw index.
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position of the entity in its owning collection.
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }
    };
}

dense_id!(
    /// Identifier of a state (graph node).
    ///
    /// ```
    /// use morris_rl::identifiers::StateId;
    ///
    /// let id = StateId::new(3);
    /// assert_eq!(id.index(), 3);
    /// assert_eq!(id.to_string(), "s3");
    /// ```
    StateId,
    "s"
);

dense_id!(
    /// Identifier of a transition (directed edge).
    TransitionId,
    "t"
);

dense_id!(
    /// Identifier of a cue (named group of states).
    CueId,
    "c"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_index() {
        assert!(TransitionId::new(1) < TransitionId::new(2));
        assert_eq!(CueId::from(7).index(), 7);
        assert_eq!(TransitionId::new(12).to_string(), "t12");
    }
}
