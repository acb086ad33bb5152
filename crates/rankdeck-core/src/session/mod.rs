//! Session domain model and state machine.

pub mod machine;
pub mod model;

pub use machine::{Comparison, SessionProgress, SwipeOutcome, VoteOutcome};
pub use model::{Session, SessionStatus, Swipe, SwipeDirection, Vote};
