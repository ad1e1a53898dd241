//! Pure domain logic for the taskhub tracker.
//!
//! Everything in this crate is a deterministic function over plain values:
//! no database access, no ambient session state, no clock reads. Handlers
//! pass an explicit [`roles::Actor`] and a relational snapshot
//! ([`visibility::ProjectScope`]) into every decision function, so each
//! rule is testable in isolation.

pub mod comment;
pub mod error;
pub mod lifecycle;
pub mod membership;
pub mod project;
pub mod roles;
pub mod stats;
pub mod types;
pub mod visibility;
