//! Observability subsystem.
//!
//! Structured logging through `tracing`. Library code only emits events;
//! binaries install the subscriber via [`logging::init`].
//!
//! Fields never carry private keys or confidential inputs; inputs are only
//! ever logged by their keccak256 hash.

pub mod logging;

pub use logging::init as init_logging;
