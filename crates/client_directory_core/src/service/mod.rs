//! Core use-case services.
//!
//! # Responsibility
//! - Expose the client directory operations to callers.
//! - Keep callers decoupled from repository and SQL details.

pub mod client_directory;
