pub mod entity_arena;
pub mod entity_key;
