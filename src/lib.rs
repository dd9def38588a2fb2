pub mod commands;
pub mod config;
pub mod error;
pub mod util;

pub use config::AppConfig;
pub use error::{Error, Result};
