use log::{debug, info};

use mindlink_shared::{DeliveryTimeoutTracker, EntityArena, EntityKey, WeakKey, WeakRegistry};

use crate::{
    CandidateSource, EffectSink, InputSource, SelectionConfig, SelectionContext, SelectionEvent,
    SelectionSession,
};

/// What happened during one `Controller::tick`
#[derive(Default)]
pub struct TickReport {
    pub events: Vec<(EntityKey, SelectionEvent)>,
    pub expired_deliveries: usize,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.expired_deliveries == 0
    }

    pub fn events_for(&self, agent: &EntityKey) -> Vec<&SelectionEvent> {
        self.events
            .iter()
            .filter(|(owner, _)| owner == agent)
            .map(|(_, event)| event)
            .collect()
    }
}

/// Per-tick driver for every controlling agent's selection session and the
/// delivery timeouts of outstanding remote calls.
///
/// Sessions are keyed weakly by their agent: when the host destroys an
/// agent its session goes with it.
pub struct Controller<H: WeakKey> {
    config: SelectionConfig,
    sessions: WeakRegistry<EntityKey, SelectionSession>,
    deliveries: DeliveryTimeoutTracker<H>,
}

impl<H: WeakKey> Controller<H> {
    pub fn new(config: SelectionConfig, deliveries: DeliveryTimeoutTracker<H>) -> Self {
        Self {
            config,
            sessions: WeakRegistry::new(),
            deliveries,
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SelectionConfig {
        &mut self.config
    }

    /// Drops an agent's session as soon as `arena` announces its despawn,
    /// rather than on the next sweep.
    pub fn watch(&self, arena: &EntityArena) {
        arena.subscribe(self.sessions.destroy_listener());
    }

    /// Creates a session for `agent`. Returns `false` if one already exists
    /// or the agent is gone.
    pub fn begin_session(&mut self, agent: EntityKey) -> bool {
        if !agent.is_alive() || self.sessions.contains(&agent) {
            return false;
        }
        info!("Selection session opened for agent {:?}", agent.id());
        self.sessions.set(agent.clone(), SelectionSession::new(agent));
        true
    }

    /// Tears down `agent`'s session, releasing anything it still controls.
    pub fn end_session(&mut self, agent: &EntityKey, effects: &mut dyn EffectSink) -> bool {
        let Some(mut session) = self.sessions.take(agent) else {
            return false;
        };
        for target in session.controlled() {
            effects.release_control(agent, &target);
        }
        session.force_reset();
        info!("Selection session closed for agent {:?}", agent.id());
        true
    }

    pub fn has_session(&self, agent: &EntityKey) -> bool {
        self.sessions.contains(agent)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn with_session<R, F>(&self, agent: &EntityKey, reader: F) -> Option<R>
    where
        F: FnOnce(&SelectionSession) -> R,
    {
        self.sessions.with(agent, reader)
    }

    pub fn with_session_mut<R, F>(&mut self, agent: &EntityKey, writer: F) -> Option<R>
    where
        F: FnOnce(&mut SelectionSession) -> R,
    {
        self.sessions.with_mut(agent, writer)
    }

    /// Emergency reset, e.g. when the agent loses control. Safe from any
    /// state.
    pub fn force_reset(&mut self, agent: &EntityKey) -> bool {
        self.sessions
            .with_mut(agent, SelectionSession::force_reset)
            .is_some()
    }

    pub fn deliveries(&self) -> &DeliveryTimeoutTracker<H> {
        &self.deliveries
    }

    pub fn deliveries_mut(&mut self) -> &mut DeliveryTimeoutTracker<H> {
        &mut self.deliveries
    }

    pub fn tick(
        &mut self,
        candidates: &dyn CandidateSource,
        input: &dyn InputSource,
        effects: &mut dyn EffectSink,
    ) -> TickReport {
        let mut report = TickReport::default();

        // each session leaves the registry while it runs, so host callbacks
        // never execute under the registry lock
        for agent in self.sessions.keys() {
            let Some(mut session) = self.sessions.take(&agent) else {
                continue;
            };
            let mut cx = SelectionContext {
                config: &self.config,
                candidates,
                input,
                effects: &mut *effects,
            };
            for event in session.tick(&mut cx) {
                report.events.push((agent.clone(), event));
            }
            if agent.is_alive() {
                self.sessions.set(agent, session);
            } else {
                debug!("Agent {:?} destroyed mid-tick, dropping session", agent.id());
            }
        }

        report.expired_deliveries = self.deliveries.tick();
        report
    }
}
