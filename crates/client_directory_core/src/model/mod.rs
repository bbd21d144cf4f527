//! Domain model for clients and their phone numbers.
//!
//! # Responsibility
//! - Define the records stored in `clients` and `phones`.
//! - Define request shapes for create/update/search use-cases.
//!
//! # Invariants
//! - Client and phone ids are generated by the store and never reused.
//! - A phone always belongs to exactly one client.

pub mod client;
