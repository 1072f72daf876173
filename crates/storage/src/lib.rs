pub mod blob;
pub mod config;
pub mod container;
pub mod error;
pub mod factory;

pub use blob::BlobOperations;
pub use config::ContainerConfig;
pub use container::ContainerOperations;
pub use error::StorageError;
pub use factory::StorageFactory;
