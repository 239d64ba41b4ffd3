//! Common utilities shared by the CLI, the runner and the steps

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
