//! Request, response and stored record shapes.

pub mod clock_in;
pub mod item;
pub mod patch;

pub use clock_in::{ClockInFields, ClockInRecord, ClockInUpdate, NewClockInRecord, RecordCreated};
pub use item::{EmailCount, Item, ItemCreated, ItemFields, ItemFilterParams, ItemUpdate, NewItem};
pub use patch::{Patch, PatchError, UpdateSet};

use serde::Serialize;

/// Response body carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
