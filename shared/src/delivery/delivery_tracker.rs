use log::{debug, warn};

use crate::{Countdown, DeliveryConfig, WeakKey, WeakRegistry};

/// Invoked once for every in-flight call whose countdown runs out.
pub type AbortCallback<H> = Box<dyn FnMut(&H) + Send>;

/// Auto-expires remote calls that never receive a reply.
///
/// Handles are owned by the messaging layer and held weakly here: a call
/// dropped by its owner simply disappears from the tracker without being
/// reported as aborted.
pub struct DeliveryTimeoutTracker<H: WeakKey> {
    config: DeliveryConfig,
    countdowns: WeakRegistry<H, Countdown>,
    on_abort: AbortCallback<H>,
}

impl<H: WeakKey> DeliveryTimeoutTracker<H> {
    pub fn new<F>(config: DeliveryConfig, on_abort: F) -> Self
    where
        F: FnMut(&H) + Send + 'static,
    {
        Self {
            config,
            countdowns: WeakRegistry::new(),
            on_abort: Box::new(on_abort),
        }
    }

    /// Starts (or restarts) the countdown for `handle`.
    pub fn track(&self, handle: H, ttl: Countdown) {
        self.countdowns.set(handle, ttl);
    }

    pub fn track_default(&self, handle: H) {
        self.track(handle, self.config.default_ttl);
    }

    /// Stops tracking `handle`. Idempotent.
    pub fn untrack(&self, handle: &H) -> bool {
        self.countdowns.remove(handle)
    }

    /// A reply arrived for `handle`.
    pub fn acknowledge(&self, handle: &H) -> bool {
        let acknowledged = self.untrack(handle);
        if acknowledged {
            debug!("Delivery acknowledged for {:?}", handle.key_id());
        }
        acknowledged
    }

    pub fn is_tracked(&self, handle: &H) -> bool {
        self.countdowns.contains(handle)
    }

    pub fn remaining(&self, handle: &H) -> Option<Countdown> {
        self.countdowns.get(handle)
    }

    pub fn len(&self) -> usize {
        self.countdowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countdowns.is_empty()
    }

    /// Advances every countdown by one tick, aborting those that drop below
    /// one. Returns how many calls were aborted.
    pub fn tick(&mut self) -> usize {
        if self.countdowns.len_hint() == 0 {
            return 0;
        }

        let mut expired = Vec::new();
        self.countdowns.retain(|handle, countdown| {
            *countdown = countdown.saturating_sub(1);
            if *countdown < 1 {
                expired.push(handle.clone());
                false
            } else {
                true
            }
        });

        // callbacks run after the registry lock is released
        for handle in &expired {
            warn!("Delivery timed out for {:?}, aborting", handle.key_id());
            (self.on_abort)(handle);
        }

        expired.len()
    }
}
