pub mod delivery_config;
pub mod delivery_tracker;
