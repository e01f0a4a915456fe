//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → PORT environment variable (loader.rs)
//!     → --port flag (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, LogFormat, LoggingConfig, ServiceConfig};
