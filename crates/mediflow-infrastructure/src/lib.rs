pub mod config_service;
pub mod file_persistence_store;
pub mod memory_persistence_store;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_persistence_store::FilePersistenceStore;
pub use crate::memory_persistence_store::InMemoryPersistenceStore;
pub use crate::paths::MediflowPaths;
