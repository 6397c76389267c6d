use log::{debug, error, info, warn};

use mindlink_shared::{EntityKey, Position, Tick, WeakList};

use crate::{
    policy, AbortReason, Candidate, CandidateSource, DirectionalInput, EffectSink, InputKey,
    InputSource, MultiTargetMode, ReferenceMode, SelectionConfig, SelectionError, SelectionEvent,
    SelectionState,
};

/// Collaborators a session reads from and writes to during one tick
pub struct SelectionContext<'a> {
    pub config: &'a SelectionConfig,
    pub candidates: &'a dyn CandidateSource,
    pub input: &'a dyn InputSource,
    pub effects: &'a mut dyn EffectSink,
}

/// Per-agent selection state.
///
/// The session exclusively owns its query pool and committed targets; both
/// hold entities weakly, so anything the host destroys simply drops out.
/// The time-exceeded flag is sticky for the lifetime of the session.
pub struct SelectionSession {
    agent: EntityKey,
    state: SelectionState,
    pool: WeakList<EntityKey>,
    committed: WeakList<EntityKey>,
    // started by the last commit, released when the next round begins
    controlled: WeakList<EntityKey>,
    selected: Option<EntityKey>,
    input_offset: i32,
    last_input: DirectionalInput,
    initialized: bool,
    elapsed: Tick,
    grace: Tick,
    cooldown: Tick,
    locked: bool,
    // the current activate press already came up empty
    empty_activation: bool,
    time_exceeded: bool,
    cursor: Option<Position>,
    multi_target: Option<MultiTargetMode>,
}

impl SelectionSession {
    pub fn new(agent: EntityKey) -> Self {
        Self {
            agent,
            state: SelectionState::Idle,
            pool: WeakList::new(),
            committed: WeakList::new(),
            controlled: WeakList::new(),
            selected: None,
            input_offset: 0,
            last_input: DirectionalInput::default(),
            initialized: false,
            elapsed: 0,
            grace: 0,
            cooldown: 0,
            locked: false,
            empty_activation: false,
            time_exceeded: false,
            cursor: None,
            multi_target: None,
        }
    }

    pub fn agent(&self) -> &EntityKey {
        &self.agent
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Live pool entries in rank order.
    pub fn pool(&self) -> Vec<EntityKey> {
        self.pool.to_vec()
    }

    pub fn committed(&self) -> Vec<EntityKey> {
        self.committed.to_vec()
    }

    pub fn controlled(&self) -> Vec<EntityKey> {
        self.controlled.to_vec()
    }

    pub fn selected(&self) -> Option<&EntityKey> {
        self.selected.as_ref()
    }

    pub fn elapsed(&self) -> Tick {
        self.elapsed
    }

    pub fn grace(&self) -> Tick {
        self.grace
    }

    /// Whether unrelated simulation side effects should be held back.
    pub fn is_grace_active(&self) -> bool {
        self.grace > 0
    }

    pub fn cooldown(&self) -> Tick {
        self.cooldown
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_time_exceeded(&self) -> bool {
        self.time_exceeded
    }

    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<Position>) {
        self.cursor = cursor;
    }

    pub fn multi_target_active(&self, config: &SelectionConfig) -> bool {
        match self.multi_target {
            Some(mode) => mode.is_active(config.ascension_level, config.multi_target_ascension),
            None => config.multi_target_active(),
        }
    }

    /// Overrides the configured multi-target mode for this session. Dropping
    /// out of multi-target mode mid-round resets the session to Idle.
    pub fn set_multi_target(&mut self, mode: Option<MultiTargetMode>, config: &SelectionConfig) {
        let was_active = self.multi_target_active(config);
        self.multi_target = mode;
        if was_active && !self.multi_target_active(config) && self.state != SelectionState::Idle {
            info!(
                "Agent {:?} left multi-target mode, resetting selection",
                self.agent.id()
            );
            self.force_reset();
        }
    }

    /// Moves to `next` if the transition table allows it. On failure the
    /// session keeps its current state.
    pub fn transition(&mut self, next: SelectionState) -> Result<(), SelectionError> {
        if !self.state.can_transition_to(next) {
            let err = SelectionError::InvalidTransition {
                from: self.state,
                to: next,
            };
            error!("Agent {:?}: {}", self.agent.id(), err);
            return Err(err);
        }

        debug!(
            "Agent {:?} selection {} -> {}",
            self.agent.id(),
            self.state,
            next
        );
        self.state = next;
        if next == SelectionState::Idle {
            self.reset_round();
        }
        Ok(())
    }

    /// Returns to Idle from any state, bypassing the transition table.
    pub fn force_reset(&mut self) {
        if self.state != SelectionState::Idle {
            info!(
                "Agent {:?} selection force-reset from {}",
                self.agent.id(),
                self.state
            );
        }
        self.state = SelectionState::Idle;
        self.reset_round();
    }

    /// Querying -> Ready, refused once time is exceeded or with nothing
    /// selected.
    pub fn advance_to_ready(&mut self) -> Result<(), SelectionError> {
        if self.time_exceeded {
            return Err(SelectionError::TimeLimitExceeded {
                to: SelectionState::Ready,
            });
        }
        if self.committed.live_len() == 0 {
            return Err(SelectionError::NothingSelected);
        }
        self.transition(SelectionState::Ready)
    }

    /// Records elapsed input time. The exceeded flag is set the first time
    /// `elapsed` passes `potential` and never clears, even if a later report
    /// is lower.
    pub fn observe_elapsed(&mut self, elapsed: Tick, potential: Tick) -> bool {
        self.elapsed = elapsed;
        if elapsed > potential && !self.time_exceeded {
            warn!(
                "Agent {:?} exceeded selection time ({} > {})",
                self.agent.id(),
                elapsed,
                potential
            );
            self.time_exceeded = true;
        }
        self.time_exceeded
    }

    pub fn tick(&mut self, cx: &mut SelectionContext<'_>) -> Vec<SelectionEvent> {
        let mut events = Vec::new();

        if !self.agent.is_alive() {
            if self.state != SelectionState::Idle {
                self.force_reset();
                events.push(SelectionEvent::Aborted {
                    reason: AbortReason::ForcedReset,
                });
            }
            return events;
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.grace = self.grace.saturating_sub(1);

        match self.state {
            SelectionState::Idle => self.tick_idle(cx, &mut events),
            SelectionState::Querying => self.tick_querying(cx, &mut events),
            SelectionState::Ready => self.tick_ready(cx, &mut events),
        }

        events
    }

    fn tick_idle(&mut self, cx: &mut SelectionContext<'_>, events: &mut Vec<SelectionEvent>) {
        let activate = cx.input.is_pressed(&self.agent, InputKey::Activate);

        if !activate {
            self.empty_activation = false;
        }
        if self.locked {
            if !activate {
                debug!("Agent {:?} selection input unlocked", self.agent.id());
                self.locked = false;
            }
            return;
        }
        if !activate || self.cooldown > 0 {
            return;
        }
        if self.time_exceeded {
            debug!(
                "Agent {:?} activation ignored, selection time already spent",
                self.agent.id()
            );
            return;
        }

        for target in self.controlled.to_vec() {
            cx.effects.release_control(&self.agent, &target);
            events.push(SelectionEvent::Released { target });
        }
        self.controlled.clear();

        let size = self.rebuild_pool(cx);
        if size == 0 {
            if !self.empty_activation {
                debug!("Agent {:?} found no candidates in range", self.agent.id());
                events.push(SelectionEvent::PoolBuilt { size });
            }
            self.empty_activation = true;
            return;
        }
        self.empty_activation = false;
        events.push(SelectionEvent::PoolBuilt { size });
        self.last_input = cx.input.directional(&self.agent);
        if let Err(err) = self.transition(SelectionState::Querying) {
            warn!("Agent {:?} could not start querying: {}", self.agent.id(), err);
        }
    }

    fn tick_querying(&mut self, cx: &mut SelectionContext<'_>, events: &mut Vec<SelectionEvent>) {
        let elapsed = self.elapsed.saturating_add(1);
        if self.observe_elapsed(elapsed, cx.config.time_potential) {
            self.penalize_timeout(cx, events);
            return;
        }
        self.grace = cx.config.grace_ticks;

        if cx.input.is_pressed(&self.agent, InputKey::Cancel) {
            self.abort(AbortReason::Cancelled, events);
            return;
        }

        let input = cx.input.directional(&self.agent);
        let changed = input != self.last_input;
        self.last_input = input;
        if changed {
            self.input_offset += input.offset();
        }

        if changed || !self.initialized {
            self.select(cx, false, events);
            if self.state != SelectionState::Querying {
                return;
            }
        }

        if cx.input.is_pressed(&self.agent, InputKey::Confirm) {
            if let Err(err) = self.advance_to_ready() {
                debug!("Agent {:?} confirm refused: {}", self.agent.id(), err);
            }
        }
    }

    fn tick_ready(&mut self, cx: &mut SelectionContext<'_>, events: &mut Vec<SelectionEvent>) {
        if self.time_exceeded {
            self.penalize_timeout(cx, events);
            return;
        }

        let mut started = Vec::new();
        for target in self.committed.to_vec() {
            if !cx.effects.can_commit(&self.agent, &target) {
                debug!(
                    "Agent {:?} may not take {:?}, skipping",
                    self.agent.id(),
                    target.id()
                );
                continue;
            }
            cx.effects.start_control(&self.agent, &target);
            self.controlled.push(target.clone());
            started.push(target);
        }
        self.committed.clear();

        info!(
            "Agent {:?} committed {} target(s)",
            self.agent.id(),
            started.len()
        );
        events.push(SelectionEvent::Committed { started });

        if let Err(err) = self.transition(SelectionState::Idle) {
            warn!("Agent {:?} could not finish commit: {}", self.agent.id(), err);
        }
    }

    fn select(
        &mut self,
        cx: &mut SelectionContext<'_>,
        recursive: bool,
        events: &mut Vec<SelectionEvent>,
    ) {
        self.pool.shrink();

        if self.pool.is_empty() {
            if !recursive {
                debug!("Agent {:?} pool exhausted, refreshing", self.agent.id());
                let size = self.rebuild_pool(cx);
                events.push(SelectionEvent::PoolBuilt { size });
                self.select(cx, true, events);
                return;
            }
            self.exhaust(cx, events);
            return;
        }

        let base = self
            .selected
            .as_ref()
            .and_then(|selected| self.pool.position(selected))
            .unwrap_or(0);
        let offset = std::mem::take(&mut self.input_offset);
        let Some(index) = policy::wrap_index(base, offset, self.pool.len()) else {
            return;
        };

        let entity = match self.pool.try_at(index) {
            Ok(entity) => entity,
            Err(err) => {
                warn!("Agent {:?}: {}", self.agent.id(), err);
                self.pool.remove_at(index);
                return;
            }
        };

        let Some(candidate) = Self::validate(cx, &entity) else {
            warn!(
                "Agent {:?} cannot select {:?}, discarding it",
                self.agent.id(),
                entity.id()
            );
            self.pool.remove(&entity);
            events.push(SelectionEvent::Missed { entity });
            if recursive {
                self.exhaust(cx, events);
            }
            return;
        };

        let mut targets = vec![entity.clone()];
        if self.multi_target_active(cx.config) {
            for sibling in self.pool.to_vec() {
                if sibling == entity {
                    continue;
                }
                match Self::validate(cx, &sibling) {
                    Some(other) if other.category == candidate.category => targets.push(sibling),
                    _ => {}
                }
            }
        }

        debug!(
            "Agent {:?} selected {} target(s) of category {}",
            self.agent.id(),
            targets.len(),
            candidate.category
        );
        self.initialized = true;
        self.selected = Some(entity);
        self.committed = targets.iter().cloned().collect();
        events.push(SelectionEvent::Selected { targets });
    }

    fn validate(cx: &SelectionContext<'_>, entity: &EntityKey) -> Option<Candidate> {
        if !entity.is_alive() {
            return None;
        }
        let candidate = cx.candidates.candidate(entity)?;
        if !candidate.alive || candidate.controlled || cx.candidates.is_denylisted(&candidate) {
            return None;
        }
        Some(candidate)
    }

    fn reference_point(&self, cx: &SelectionContext<'_>) -> Option<Position> {
        match cx.config.reference {
            ReferenceMode::Cursor => self
                .cursor
                .or_else(|| cx.candidates.agent_position(&self.agent)),
            ReferenceMode::Agent => cx.candidates.agent_position(&self.agent),
        }
    }

    fn rebuild_pool(&mut self, cx: &SelectionContext<'_>) -> usize {
        self.pool.clear();

        let Some(reference) = self.reference_point(cx) else {
            warn!("Agent {:?} has no position, pool left empty", self.agent.id());
            return 0;
        };

        let mut candidates: Vec<Candidate> = cx
            .candidates
            .live_candidates()
            .into_iter()
            .filter(|candidate| candidate.alive && candidate.entity != self.agent)
            .filter(|candidate| {
                !candidate.controlled && !cx.candidates.is_denylisted(candidate)
            })
            .filter(|candidate| {
                policy::within_range(candidate, &reference, cx.config.selection_range)
            })
            .collect();
        policy::rank_candidates(&mut candidates, &reference);
        if cx.config.one_per_category {
            candidates = policy::dedup_by_category(candidates);
        }

        self.pool = candidates
            .into_iter()
            .map(|candidate| candidate.entity)
            .collect();
        self.pool.len()
    }

    /// Nothing left to select even after the refresh: lock input until the
    /// activate key is released and abort with a time penalty.
    fn exhaust(&mut self, cx: &mut SelectionContext<'_>, events: &mut Vec<SelectionEvent>) {
        warn!(
            "Agent {:?} pool still empty after refresh, aborting",
            self.agent.id()
        );
        self.locked = true;
        cx.effects.apply_time_penalty(&self.agent, cx.config.time_penalty);
        self.abort(AbortReason::PoolExhausted, events);
    }

    fn penalize_timeout(
        &mut self,
        cx: &mut SelectionContext<'_>,
        events: &mut Vec<SelectionEvent>,
    ) {
        let penalty = cx.config.cooldown_penalty;
        cx.effects.apply_cooldown(&self.agent, penalty);
        self.cooldown = penalty;
        events.push(SelectionEvent::TimeExceeded);
        self.abort(AbortReason::TimeExceeded, events);
    }

    fn abort(&mut self, reason: AbortReason, events: &mut Vec<SelectionEvent>) {
        if let Err(err) = self.transition(SelectionState::Idle) {
            warn!("Agent {:?} could not abort: {}", self.agent.id(), err);
            return;
        }
        events.push(SelectionEvent::Aborted { reason });
    }

    fn reset_round(&mut self) {
        self.pool.clear();
        self.committed.clear();
        self.selected = None;
        self.input_offset = 0;
        self.last_input = DirectionalInput::default();
        self.initialized = false;
        self.elapsed = 0;
    }
}
