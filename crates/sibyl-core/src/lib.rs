pub mod config;
pub mod error;

pub use config::SibylConfig;
pub use error::{Result, SibylError};
