// Infrastructure layer - settings, static catalogues and host adapters
pub mod catalogue;
pub mod config;
pub mod memory_store;
