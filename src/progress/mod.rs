//! Progress & gamification core: learner profile, XP, daily streak, badges
//! and challenges, owned by a single `ProgressStore` per session.

pub mod access;
pub mod catalog;
pub mod rewards;
pub mod state;
pub mod store;

pub use catalog::{Game, Subject};
pub use state::{Avatar, AvatarPatch, Badge, Challenge, ProgressState};
pub use store::ProgressStore;
