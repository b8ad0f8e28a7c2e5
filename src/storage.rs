/// The serialized form of an address book.
pub mod snapshot;
mod store;

pub use snapshot::{RestoreError, Snapshot};
pub use store::{LoadError, SaveError, Store};
