pub mod candidate;
pub mod effects;
pub mod error;
pub mod events;
pub mod input;
pub mod policy;
pub mod session;
pub mod state;
