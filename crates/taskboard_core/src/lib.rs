pub mod clock;
pub mod config;
pub mod error;
pub mod interact;
pub mod model;
pub mod profile_store;
pub mod storage;
pub mod task_store;
