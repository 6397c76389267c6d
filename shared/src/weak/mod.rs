pub mod error;
pub mod weak_key;
pub mod weak_list;
pub mod weak_registry;
