//! Clock-in records.

use chrono::{DateTime, Utc};
use pantry_core::{ClockInRecordId, Email, ShortText};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patch::{Patch, PatchError, UpdateSet};
use crate::store::Document;

/// Payload accepted by `POST /clock-in`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClockInRecord {
    pub email: Email,
    pub location: ShortText,
}

impl NewClockInRecord {
    /// Stamp the record with `now`.
    #[must_use]
    pub fn into_fields(self, now: DateTime<Utc>) -> ClockInFields {
        ClockInFields {
            email: self.email.into_inner(),
            location: self.location.into_inner(),
            insert_datetime: now,
        }
    }
}

/// Clock-in fields as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockInFields {
    pub email: String,
    pub location: String,
    pub insert_datetime: DateTime<Utc>,
}

impl ClockInFields {
    pub const EMAIL: &'static str = "email";
    pub const LOCATION: &'static str = "location";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockInRecord {
    #[serde(rename = "_id")]
    pub id: ClockInRecordId,
    #[serde(flatten)]
    pub fields: ClockInFields,
}

/// Payload accepted by `PUT /clock-in/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClockInUpdate {
    pub email: Patch<Email>,
    pub location: Patch<ShortText>,
}

impl ClockInUpdate {
    /// Build the document fragment to merge into the stored record.
    ///
    /// # Errors
    ///
    /// Returns `PatchError` for explicit nulls or an empty payload.
    pub fn into_update_set(self) -> Result<Document, PatchError> {
        let mut set = UpdateSet::new();
        set.apply(
            ClockInFields::EMAIL,
            self.email.map(|v| Value::String(v.into_inner())),
        )?;
        set.apply(
            ClockInFields::LOCATION,
            self.location.map(|v| Value::String(v.into_inner())),
        )?;
        set.finish()
    }
}

/// Response body for `POST /clock-in`.
#[derive(Debug, Serialize)]
pub struct RecordCreated {
    pub message: &'static str,
    pub record_id: String,
}
