//! # Bundle Registry
//!
//! The shared authorization state both surfaces read and mutate: one row
//! per bundle identifier with an execution flag and a last-access stamp.
//!
//! ## Invariants
//! - `bundle_id` is unique across the registry
//! - Newly observed bundles default to allowed (the gate fails open)
//! - `last_access_time` never decreases for a given bundle
//! - Check-then-insert is serialized by the store's unique-constraint
//!   upsert, never by in-process locks

pub mod bundle;
pub mod errors;
pub mod store;

pub use bundle::Bundle;
pub use errors::{RegistryError, RegistryResult};
pub use store::BundleRegistry;

/// Default row cap for substring search
pub const SEARCH_LIMIT: u32 = 50;
