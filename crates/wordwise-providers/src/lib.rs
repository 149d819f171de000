//! wordwise-providers — Text generator backends.
//!
//! Implements the `TextGenerator` trait for an OpenAI-compatible chat API,
//! an offline template generator, and a mock, plus the `wordwise.toml`
//! configuration that selects between them.

pub mod config;
pub mod error;
pub mod mock;
pub mod offline;
pub mod openai;

pub use config::{create_generator, load_config, load_config_from, GeneratorConfig, WordwiseConfig};
pub use error::GeneratorError;
