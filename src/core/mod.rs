//! Core Module - User Flows
//!
//! Emergency dispatch and OTP login, plus the presentation seams they drive.

pub mod auth;
pub mod emergency;
pub mod map;
pub mod presenter;

pub use auth::*;
pub use emergency::*;
pub use map::*;
pub use presenter::*;
