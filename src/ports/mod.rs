//! Ports (trait boundaries) between the learning core and its drivers.
//!
//! Learning methods implement [`Learner`]; anything that wants to watch a
//! session implements [`Observer`].

pub mod learner;
pub mod observer;

pub use learner::Learner;
pub use observer::Observer;
