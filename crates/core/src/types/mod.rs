//! Core types for Pantry.
//!
//! This module provides validated wrappers for the fields of stored records.

pub mod email;
pub mod id;
pub mod quantity;
pub mod temporal;
pub mod text;

pub use email::{Email, EmailError};
pub use id::*;
pub use quantity::{Quantity, QuantityError};
pub use temporal::{
    TemporalError, ensure_after, format_date, format_midnight, parse_date, parse_instant,
};
pub use text::{ShortText, TextError};
