//! Caching core — key derivation, the TTL entry store, and freshness
//! evaluation.
//!
//! These pieces carry all of the caching logic; the interceptors in
//! [`crate::layer`] are thin orchestration around them.
//!
//! - [`key::derive_key`] — stable cacheable identity for a request.
//! - [`store::EntryStore`] — in-process store of cached response records
//!   with per-entry retention TTLs and an injectable clock.
//! - [`freshness::evaluate`] — miss / fresh / stale decision for an entry.

pub mod freshness;
pub mod key;
pub mod store;

pub use freshness::Freshness;
pub use store::{Clock, Entry, EntryStore, SystemClock};
