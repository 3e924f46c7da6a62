//! Key derivation
//!
//! This module derives per-account spending keys and their default
//! payment addresses from a wallet seed.

mod derivation;

pub use derivation::*;
