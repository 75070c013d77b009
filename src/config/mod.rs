//! Configuration management for crd2types

pub mod config;
pub mod generation;
pub mod output;
pub mod source;

#[cfg(test)]
mod tests;

pub use config::{Config, CONFIG_VERSION, DEFAULT_CONFIG_FILES};
pub use generation::GenerationConfig;
pub use output::{OutputConfig, OutputFormat};
pub use source::*;
