pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod options;
pub mod process;
pub mod progress;

pub use config::AppConfig;
pub use error::YtdlError;
