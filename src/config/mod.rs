//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//! ```
//!
//! The private key is never part of the file; see
//! [`crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR`].

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ChainConfig, ObservabilityConfig, SignerConfig, WalletConfig};
pub use validation::{validate_config, ValidationError};
