use std::default::Default;

use crate::Countdown;

/// Contains Config properties for tracking outstanding remote calls
#[derive(Clone, Debug)]
pub struct DeliveryConfig {
    /// Ticks an in-flight call may wait for its reply before it is aborted,
    /// used by `track_default`
    pub default_ttl: Countdown,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            // ten seconds at sixty ticks per second
            default_ttl: 600,
        }
    }
}
