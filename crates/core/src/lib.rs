pub mod blob;
pub mod lease;
pub mod move_protocol;

pub use blob::{Blob, BlobError, BlobInfo};
pub use lease::{LEASE_DURATION, Lease};
pub use move_protocol::{MovePhase, MoveStep};
