//! # Mindlink Shared
//! Weak-referencing containers and delivery bookkeeping shared by the
//! mindlink crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod arena;
mod delivery;
mod geometry;
mod types;
mod weak;

pub use arena::{
    entity_arena::{DestroyListener, EntityArena},
    entity_key::{EntityId, EntityKey},
};
pub use delivery::{
    delivery_config::DeliveryConfig,
    delivery_tracker::{AbortCallback, DeliveryTimeoutTracker},
};
pub use geometry::Position;
pub use types::{CategoryId, Countdown, Tick};
pub use weak::{
    error::WeakListError, weak_key::WeakKey, weak_list::WeakList, weak_registry::WeakRegistry,
};
