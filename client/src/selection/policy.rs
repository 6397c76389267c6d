use std::collections::HashSet;

use mindlink_shared::Position;

use crate::Candidate;

/// Where distances are measured from when ranking the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceMode {
    /// The controlling agent's body
    Agent,
    /// An independent cursor, falling back to the agent when none is set
    Cursor,
}

/// Whether a selection expands to every same-category sibling in the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiTargetMode {
    /// Multi-target once the ascension level reaches the configured threshold
    Default,
    ForceSingle,
    ForceMulti,
}

impl MultiTargetMode {
    pub fn is_active(&self, ascension_level: u8, multi_target_ascension: u8) -> bool {
        match self {
            MultiTargetMode::Default => ascension_level >= multi_target_ascension,
            MultiTargetMode::ForceSingle => false,
            MultiTargetMode::ForceMulti => true,
        }
    }
}

pub fn within_range(candidate: &Candidate, reference: &Position, range: f32) -> bool {
    candidate.position.distance_squared(reference) <= range * range
}

/// Orders candidates nearest-first from `reference`. Anything without a
/// health state goes after everything with one, whatever the distance.
/// The sort is stable, so equal candidates keep their source order.
pub fn rank_candidates(candidates: &mut [Candidate], reference: &Position) {
    candidates.sort_by(|a, b| {
        b.has_health_state.cmp(&a.has_health_state).then_with(|| {
            a.position
                .distance_squared(reference)
                .total_cmp(&b.position.distance_squared(reference))
        })
    });
}

/// Keeps the first candidate encountered for each category.
pub fn dedup_by_category(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.category))
        .collect()
}

/// Applies `offset` to `base` within a pool of `len`. An index before the
/// start lands on the last element and one past the end lands on the first;
/// larger overshoots are not taken modulo.
pub fn wrap_index(base: usize, offset: i32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let target = base as i64 + i64::from(offset);
    if target < 0 {
        Some(len - 1)
    } else if target >= len as i64 {
        Some(0)
    } else {
        Some(target as usize)
    }
}
