//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the client directory data access contract.
//! - Isolate SQLite query details from the directory facade.
//!
//! # Invariants
//! - Write paths validate input before any SQL runs.
//! - Multi-statement writes commit together or not at all.
//! - Store errors surface unchanged, only classified by kind.

pub mod client_repo;
pub mod filter;
