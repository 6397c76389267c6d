pub type Tick = u32;
/// Signed ticks remaining before an in-flight call is considered failed
pub type Countdown = i32;
/// Template identity shared by entities of the same kind
pub type CategoryId = u32;
