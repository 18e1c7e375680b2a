//! CLI command implementations
//!
//! - **publish**: the release pipeline (the only command; flags select steps)

pub mod publish;

pub use publish::run_publish;
