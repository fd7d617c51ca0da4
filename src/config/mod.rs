//! Configuration management for lectio.
//!
//! The core never reads configuration from hidden globals: the host builds a
//! [`CoreConfig`] once (from the process environment or a TOML file) and
//! passes it by value into the resolver functions that need it.

pub mod settings;

pub use settings::{ConfigError, CoreConfig, GuardrailSettings, SttSettings, SynthesisSettings};
