//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → server / dispatcher / observability setup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new dispatcher
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, DispatchOptions, ObservabilityConfig, ServerConfig};
pub use validation::ValidationError;
