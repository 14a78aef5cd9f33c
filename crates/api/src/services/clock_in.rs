//! Clock-in record operations.

use chrono::{DateTime, Utc};
use pantry_core::ClockInRecordId;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::mapping::{from_document, parse_id, to_document};
use crate::models::{ClockInFields, ClockInRecord, ClockInUpdate, NewClockInRecord};
use crate::store::{Collection, DocumentStore, Filter};

const INVALID_ID: &str = "Invalid record ID";
const NOT_FOUND: &str = "Clock-in record not found";

/// Clock-in operations over the `clock_in_records` collection.
pub struct ClockInService<'a> {
    store: &'a DocumentStore,
}

impl<'a> ClockInService<'a> {
    /// Create a new clock-in service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Record a clock-in at the current time.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the insert fails.
    pub async fn create(&self, record: NewClockInRecord) -> Result<ClockInRecordId> {
        self.create_at(record, Utc::now()).await
    }

    /// Record a clock-in as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the insert fails.
    #[instrument(skip(self, record), fields(email = %record.email))]
    pub async fn create_at(
        &self,
        record: NewClockInRecord,
        now: DateTime<Utc>,
    ) -> Result<ClockInRecordId> {
        let doc = to_document(&record.into_fields(now))?;

        let id = ClockInRecordId::new(
            self.store
                .insert_one(Collection::ClockInRecords, doc)
                .await?,
        );
        tracing::info!(record_id = %id, "Clock-in record created");
        Ok(id)
    }

    /// Fetch one record by its external id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIdentifier` or `AppError::NotFound`.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, raw_id: &str) -> Result<ClockInRecord> {
        let id = parse_id(raw_id, ClockInRecordId::parse, INVALID_ID)?;

        let stored = self
            .store
            .find_one(Collection::ClockInRecords, &Filter::by_id(id.as_uuid()))
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        let (uuid, fields) = from_document::<ClockInFields>(stored)?;
        Ok(ClockInRecord {
            id: ClockInRecordId::new(uuid),
            fields,
        })
    }

    /// Overwrite the supplied fields of one record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIdentifier`, `AppError::Validation` or
    /// `AppError::NotFound`.
    #[instrument(skip(self, update))]
    pub async fn update_by_id(&self, raw_id: &str, update: ClockInUpdate) -> Result<()> {
        let id = parse_id(raw_id, ClockInRecordId::parse, INVALID_ID)?;
        let set = update.into_update_set()?;

        let matched = self
            .store
            .update_one(
                Collection::ClockInRecords,
                &Filter::by_id(id.as_uuid()),
                set,
            )
            .await?;
        if matched == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(record_id = %id, "Clock-in record updated");
        Ok(())
    }
}
