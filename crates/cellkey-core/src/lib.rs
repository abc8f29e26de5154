//! Shared domain types for the cellkey parcel locker system.
//!
//! This crate defines the validated newtypes ([`LockerNumber`], [`AccessCode`])
//! and the error taxonomy used by every other crate in the workspace. It has
//! no I/O of its own; the hardware, storage, and service crates build on it.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
