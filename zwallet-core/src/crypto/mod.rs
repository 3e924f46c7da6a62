//! Cryptographic primitives
//!
//! Seed handling and the key derivation the reference engine uses to give
//! every account its own spending key and default address.

pub mod seed;
pub mod keys;

pub use seed::*;
pub use keys::*;
