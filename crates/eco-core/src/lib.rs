//! Core types and utilities shared by the eco toys.

pub mod cell;
pub mod config;
pub mod error;
pub mod math;
pub mod timing;
pub mod types;

pub use cell::*;
pub use config::*;
pub use error::{Error, Result};
pub use math::*;
pub use timing::*;
pub use types::*;
