//! Versioned Module
//!
//! Time-versioned key-value storage with point-in-time lookups.

mod shared;
mod store;

pub use shared::SharedVersionedStore;
pub use store::{Version, VersionedStore};
