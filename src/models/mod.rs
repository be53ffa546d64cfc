//! Data models for the FireFight application
//!
//! - Location: geographic coordinates resolved from user input or a device

pub mod location;

pub use location::Coordinates;
