pub mod test_world;

pub use harness::{Harness, TestController};
pub use helpers::*;
pub use test_world::{TestEntity, TestWorld};
