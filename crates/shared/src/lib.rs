//! Shared types for the courtside dashboard client.

pub mod error;
pub mod models;
pub mod prediction;
pub mod protocol;

pub use error::*;
pub use models::*;
pub use prediction::*;
pub use protocol::*;
