//! # Domain Module

pub mod cancel;
pub mod config;
pub mod outcome;
pub mod stepper;

pub use cancel::*;
pub use config::*;
pub use outcome::*;
pub use stepper::*;
