//! Account management
//!
//! The wallet state a reference engine keeps behind each handle: accounts in
//! creation order, their default payment addresses, and the notes their
//! balances are computed from.

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;
