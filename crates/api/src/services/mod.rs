//! Business operations over the document store.
//!
//! Services borrow the shared [`DocumentStore`](crate::store::DocumentStore)
//! and are created per request via [`AppState`](crate::state::AppState).

pub mod clock_in;
pub mod items;

pub use clock_in::ClockInService;
pub use items::ItemService;
