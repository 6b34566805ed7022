//! Domain models for the pet listing.
//!
//! Records serialize as JSON via `serde` and are stored together in a single
//! document in the bucket.

pub mod pet;
