//! Domain models for mail9

pub mod log;
pub mod message;

pub use log::*;
pub use message::*;
