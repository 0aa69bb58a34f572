//! Providers Module - External Collaborators
//!
//! Backend HTTP API, device position and persisted session state.

pub mod api;
pub mod location;
pub mod session;

pub use api::*;
pub use location::*;
pub use session::*;
