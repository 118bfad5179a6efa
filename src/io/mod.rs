/// Command-line parsing and run orchestration
pub mod cli;
/// Tunable constants and defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG export
pub mod image;
/// Output buffer assembly and resampling
pub mod output;
/// Terminal progress bar
pub mod progress;
/// Generation request message
pub mod request;
