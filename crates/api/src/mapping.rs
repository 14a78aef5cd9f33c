//! Conversions between typed records and stored documents.
//!
//! - Typed record fields <-> JSON [`Document`]s
//! - External id strings -> typed ids (see [`parse_id`])
//! - Stored date shapes -> `YYYY-MM-DD` (see [`stored_date`])

use pantry_core::IdError;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::store::{Document, StoreError, StoredDocument};

/// Serialize a record into a document body.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if the record does not serialize to
/// a JSON object.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(doc) => Ok(doc),
        other => Err(StoreError::DataCorruption(format!(
            "record serialized to a non-object: {other}"
        ))),
    }
}

/// Deserialize a stored document body into typed fields.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the body does not have the
/// expected shape.
pub fn from_document<T: DeserializeOwned>(stored: StoredDocument) -> Result<(uuid::Uuid, T), StoreError> {
    let fields = serde_json::from_value(serde_json::Value::Object(stored.body))?;
    Ok((stored.id, fields))
}

/// Parse an external id, reporting failures as `InvalidIdentifier` with the
/// given client-facing message.
///
/// # Errors
///
/// Returns `AppError::InvalidIdentifier` if `raw` is not a valid id.
pub fn parse_id<I>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<I, IdError>,
    message: &str,
) -> Result<I, AppError> {
    parse(raw).map_err(|e| {
        tracing::debug!(error = %e, "rejected record id");
        AppError::InvalidIdentifier(message.to_owned())
    })
}

/// Serde adapter for expiry dates.
///
/// Writes `YYYY-MM-DD`. Reads both `YYYY-MM-DD` and the midnight date-time
/// written by partial updates.
pub mod stored_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by serde
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&pantry_core::format_date(*date))
    }

    /// Deserialize from any stored date shape.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string holding a recognizable date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        pantry_core::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
