use mindlink_shared::EntityKey;

/// Per-axis directional input, each axis roughly in `-1..=1`.
///
/// The vertical axis grows downward, as in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    pub x: i8,
    pub y: i8,
}

impl DirectionalInput {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Step through the pool: right or down moves forward, left or up back.
    pub fn offset(&self) -> i32 {
        i32::from(self.x) + i32::from(self.y)
    }

    pub fn is_neutral(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKey {
    /// Enter selection mode
    Activate,
    /// Commit the current selection
    Confirm,
    Cancel,
}

pub trait InputSource {
    fn directional(&self, agent: &EntityKey) -> DirectionalInput;
    fn is_pressed(&self, agent: &EntityKey, key: InputKey) -> bool;
}
