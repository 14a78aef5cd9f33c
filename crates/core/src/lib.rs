//! Pantry Core - Shared domain types.
//!
//! This crate provides the validated field types used by the Pantry API:
//! - `api` - HTTP service over the document store
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP. Every constraint a stored record must satisfy is enforced
//! here, at construction time.
//!
//! # Modules
//!
//! - [`types`] - Record IDs, emails, bounded text, quantities and date parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
