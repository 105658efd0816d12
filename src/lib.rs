pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod logging;
pub mod preferences;
pub mod publisher;
pub mod system;

pub use error::{Error, Result};
