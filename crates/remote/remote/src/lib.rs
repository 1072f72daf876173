pub mod error;
pub mod store;
pub mod testing;

pub use error::RemoteError;
pub use store::{DynRemoteStore, ObjectProperties, RemoteObject, RemoteStore};
