//! Inventory item operations.

use chrono::{DateTime, Utc};
use pantry_core::{ItemId, parse_date, parse_instant};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::mapping::{from_document, parse_id, to_document};
use crate::models::{EmailCount, Item, ItemFields, ItemFilterParams, ItemUpdate, NewItem};
use crate::store::{Collection, DocumentStore, Filter, StoredDocument};

const INVALID_ID: &str = "Invalid item ID";
const NOT_FOUND: &str = "Item not found";

/// Item operations over the `items` collection.
pub struct ItemService<'a> {
    store: &'a DocumentStore,
}

impl<'a> ItemService<'a> {
    /// Create a new item service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Create an item stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the expiry date is not in the future,
    /// or `AppError::Store` if the insert fails.
    pub async fn create(&self, item: NewItem) -> Result<ItemId> {
        self.create_at(item, Utc::now()).await
    }

    /// Create an item as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`ItemService::create`].
    #[instrument(skip(self, item), fields(email = %item.email))]
    pub async fn create_at(&self, item: NewItem, now: DateTime<Utc>) -> Result<ItemId> {
        let fields = item.into_fields(now)?;
        let doc = to_document(&fields)?;

        let id = ItemId::new(self.store.insert_one(Collection::Items, doc).await?);
        tracing::info!(item_id = %id, "Item created");
        Ok(id)
    }

    /// Fetch one item by its external id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIdentifier` for a malformed id and
    /// `AppError::NotFound` if no item has that id.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Item> {
        let id = parse_id(raw_id, ItemId::parse, INVALID_ID)?;

        self.store
            .find_one(Collection::Items, &Filter::by_id(id.as_uuid()))
            .await?
            .map(into_item)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// List the items matching every supplied parameter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for an unparseable date parameter.
    #[instrument(skip(self))]
    pub async fn filter(&self, params: &ItemFilterParams) -> Result<Vec<Item>> {
        let filter = build_filter(params)?;

        let docs = self.store.find(Collection::Items, &filter).await?;
        tracing::debug!(matched = docs.len(), "Filtered items");
        docs.into_iter().map(into_item).collect()
    }

    /// Count items per distinct email.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store query fails.
    #[instrument(skip(self))]
    pub async fn aggregate_by_email(&self) -> Result<Vec<EmailCount>> {
        let groups = self
            .store
            .group_count(Collection::Items, ItemFields::EMAIL)
            .await?;

        Ok(groups
            .into_iter()
            .map(|group| EmailCount {
                email: group.key,
                total_items: group.count,
            })
            .collect())
    }

    /// Overwrite the supplied fields of one item.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIdentifier`, `AppError::Validation` for an
    /// empty or null-bearing update, or `AppError::NotFound`.
    #[instrument(skip(self, update))]
    pub async fn update_by_id(&self, raw_id: &str, update: ItemUpdate) -> Result<()> {
        let id = parse_id(raw_id, ItemId::parse, INVALID_ID)?;
        let set = update.into_update_set()?;

        let matched = self
            .store
            .update_one(Collection::Items, &Filter::by_id(id.as_uuid()), set)
            .await?;
        if matched == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(item_id = %id, "Item updated");
        Ok(())
    }

    /// Delete one item.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIdentifier` or `AppError::NotFound`.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, raw_id: &str) -> Result<()> {
        let id = parse_id(raw_id, ItemId::parse, INVALID_ID)?;

        let deleted = self
            .store
            .delete_one(Collection::Items, &Filter::by_id(id.as_uuid()))
            .await?;
        if deleted == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(item_id = %id, "Item deleted");
        Ok(())
    }
}

/// Translate filter query parameters into a store filter.
///
/// Missing and empty parameters impose no restriction.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` naming the date parameter that could not
/// be parsed.
pub fn build_filter(params: &ItemFilterParams) -> Result<Filter> {
    let mut filter = Filter::all();

    if let Some(email) = non_empty(params.email.as_deref()) {
        filter = filter.text_eq(ItemFields::EMAIL, email);
    }

    if let Some(raw) = non_empty(params.expiry_date.as_deref()) {
        let date = parse_date(raw).map_err(|_| {
            AppError::InvalidInput(
                "Invalid date format for expiry_date. Use yyyy-mm-dd format.".to_string(),
            )
        })?;
        filter = filter.date_gt(ItemFields::EXPIRY_DATE, date);
    }

    if let Some(raw) = non_empty(params.insert_date.as_deref()) {
        let instant = parse_instant(raw).map_err(|_| {
            AppError::InvalidInput(
                "Invalid date format for insert_date. Use yyyy-mm-dd format.".to_string(),
            )
        })?;
        filter = filter.instant_gte(ItemFields::INSERT_DATE, instant);
    }

    if let Some(quantity) = params.quantity {
        filter = filter.integer_gte(ItemFields::QUANTITY, quantity);
    }

    Ok(filter)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn into_item(stored: StoredDocument) -> Result<Item> {
    let (id, fields) = from_document::<ItemFields>(stored)?;
    Ok(Item {
        id: ItemId::new(id),
        fields,
    })
}
