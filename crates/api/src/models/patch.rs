//! Partial-update payloads.
//!
//! JSON distinguishes a missing key from an explicit `null`, and a partial
//! update must too: only keys actually present in the request body may
//! touch the stored document. [`Patch`] keeps all three states and
//! [`UpdateSet`] turns a set of patches into the document fragment merged
//! by the store.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::store::Document;

/// One field of a partial update.
///
/// Use with `#[serde(default)]` so a missing key becomes [`Patch::Absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The key was not in the payload; leave the stored value alone.
    Absent,
    /// The key was present with a `null` value.
    Null,
    /// The key was present with a value.
    Value(T),
}

// Manual impl: a derived one would require `T: Default`.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    /// Transform the carried value, keeping absence and null as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(value) => Patch::Value(f(value)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Value(value),
            None => Self::Null,
        })
    }
}

/// Errors turning patches into an update set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// A required field was explicitly set to `null`.
    #[error("{0} may not be null")]
    NullField(&'static str),
    /// The payload did not supply any field.
    #[error("at least one field must be supplied")]
    Empty,
}

/// Top-level fields to overwrite on a stored document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    fields: Document,
}

impl UpdateSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one patched field.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::NullField`] for an explicit `null`.
    pub fn apply(&mut self, field: &'static str, patch: Patch<Value>) -> Result<(), PatchError> {
        match patch {
            Patch::Absent => Ok(()),
            Patch::Null => Err(PatchError::NullField(field)),
            Patch::Value(value) => {
                self.fields.insert(field.to_owned(), value);
                Ok(())
            }
        }
    }

    /// Finish the set, rejecting updates that change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Empty`] if no field was applied.
    pub fn finish(self) -> Result<Document, PatchError> {
        if self.fields.is_empty() {
            return Err(PatchError::Empty);
        }
        Ok(self.fields)
    }
}
