use mindlink_shared::{EntityKey, Tick};

/// Gameplay side effects requested by a selection session.
///
/// Start and release must tolerate targets that are already controlled or
/// already released.
pub trait EffectSink {
    /// Last check before `target` receives the start effect.
    fn can_commit(&self, _agent: &EntityKey, _target: &EntityKey) -> bool {
        true
    }

    fn start_control(&mut self, agent: &EntityKey, target: &EntityKey);

    fn release_control(&mut self, agent: &EntityKey, target: &EntityKey);

    /// The agent ran out of selection time.
    fn apply_cooldown(&mut self, agent: &EntityKey, ticks: Tick);

    /// The agent's selection found nothing to take.
    fn apply_time_penalty(&mut self, agent: &EntityKey, ticks: Tick);
}
