//! Core building blocks shared by every backend

pub mod config;
pub mod error;
pub mod random;
pub mod rule;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use rule::{Cell, ALIVE, DEAD};
