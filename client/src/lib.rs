//! # Mindlink Client
//! Tick-driven target acquisition: lets a controlling agent pick one or
//! more live entities from a weakly-held candidate pool under a time budget,
//! and drives the delivery timeouts of its outstanding remote calls.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use mindlink_shared as shared;

mod controller;
mod selection;
mod selection_config;

pub use controller::{Controller, TickReport};
pub use selection::{
    candidate::{Candidate, CandidateSource},
    effects::EffectSink,
    error::SelectionError,
    events::{AbortReason, SelectionEvent},
    input::{DirectionalInput, InputKey, InputSource},
    policy::{self, MultiTargetMode, ReferenceMode},
    session::{SelectionContext, SelectionSession},
    state::SelectionState,
};
pub use selection_config::SelectionConfig;
