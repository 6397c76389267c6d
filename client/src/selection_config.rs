use std::default::Default;

use mindlink_shared::Tick;

use crate::{MultiTargetMode, ReferenceMode};

/// Contains Config properties which will be used by every selection session
#[derive(Clone, Debug)]
pub struct SelectionConfig {
    /// Candidates further than this from the reference point are left out
    /// of the pool
    pub selection_range: f32,
    /// Querying ticks allowed before the session's time is exceeded
    pub time_potential: Tick,
    /// Ticks the grace value lasts after its last refresh
    pub grace_ticks: Tick,
    /// Cooldown applied to the agent when it runs out of time
    pub cooldown_penalty: Tick,
    /// Penalty applied when the pool stays empty after a refresh
    pub time_penalty: Tick,
    pub reference: ReferenceMode,
    pub multi_target: MultiTargetMode,
    pub ascension_level: u8,
    /// Ascension level from which `MultiTargetMode::Default` selects every
    /// sibling of the chosen category
    pub multi_target_ascension: u8,
    /// Restrict the pool to one representative per category
    pub one_per_category: bool,
}

impl SelectionConfig {
    pub fn multi_target_active(&self) -> bool {
        self.multi_target.is_active(self.ascension_level, self.multi_target_ascension)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            selection_range: 400.0,
            time_potential: 300,
            grace_ticks: 2,
            cooldown_penalty: 120,
            time_penalty: 60,
            reference: ReferenceMode::Agent,
            multi_target: MultiTargetMode::Default,
            ascension_level: 0,
            multi_target_ascension: 20,
            one_per_category: false,
        }
    }
}
