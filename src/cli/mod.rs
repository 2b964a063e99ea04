// mod.rs - Command line front end: arguments, TOML config, merging and validation

pub mod args;
pub mod config;
pub mod merge;
pub mod validation;

// Re-export main types for convenience
pub use args::Args;
pub use config::Config;
pub use validation::{validate_args, ValidationResult, DEFAULT_RAXMLNG};
