//! Profile records and the per-conversation profile state.

pub mod model;

pub use model::{ProfileRecord, ProfileState, profile_id};
