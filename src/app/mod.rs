pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod selftest;

// Re-export commonly used types
pub use cli::CliApp;
pub use config::{CliArgs, LoaderConfig};
pub use error::AppError;
pub use logging::init_logging;
pub use selftest::run_codec_self_test;
