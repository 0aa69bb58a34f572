//! Utils Module - Shared constants

pub mod constants;

pub use constants::*;
