mod store;

pub use store::MemoryRemoteStore;
