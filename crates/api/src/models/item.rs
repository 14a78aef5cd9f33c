//! Inventory item records.

use chrono::{DateTime, NaiveDate, Utc};
use pantry_core::{
    Email, ItemId, Quantity, ShortText, TemporalError, ensure_after, format_midnight,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::patch::{Patch, PatchError, UpdateSet};
use crate::store::Document;

/// Payload accepted by `POST /items`.
///
/// Field-level constraints are enforced while deserializing; the expiry
/// date is checked against the clock in [`NewItem::into_fields`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: ShortText,
    pub email: Email,
    pub item_name: ShortText,
    pub quantity: Quantity,
    pub expiry_date: NaiveDate,
}

impl NewItem {
    /// Stamp the item with `now` and produce the fields to store.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotInFuture`] unless the expiry date is
    /// strictly after the UTC date of `now`.
    pub fn into_fields(self, now: DateTime<Utc>) -> Result<ItemFields, TemporalError> {
        let expiry_date = ensure_after(self.expiry_date, now.date_naive())?;

        Ok(ItemFields {
            name: self.name.into_inner(),
            email: self.email.into_inner(),
            item_name: self.item_name.into_inner(),
            quantity: self.quantity.get(),
            expiry_date,
            insert_date: now,
        })
    }
}

/// Item fields as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    #[serde(with = "crate::mapping::stored_date")]
    pub expiry_date: NaiveDate,
    pub insert_date: DateTime<Utc>,
}

impl ItemFields {
    pub const NAME: &'static str = "name";
    pub const EMAIL: &'static str = "email";
    pub const ITEM_NAME: &'static str = "item_name";
    pub const QUANTITY: &'static str = "quantity";
    pub const EXPIRY_DATE: &'static str = "expiry_date";
    pub const INSERT_DATE: &'static str = "insert_date";
}

/// A stored item with its external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: ItemFields,
}

/// Payload accepted by `PUT /items/{id}`.
///
/// Every field is optional; only the keys present in the body are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemUpdate {
    pub name: Patch<ShortText>,
    pub email: Patch<Email>,
    pub item_name: Patch<ShortText>,
    pub quantity: Patch<Quantity>,
    pub expiry_date: Patch<NaiveDate>,
}

impl ItemUpdate {
    /// Build the document fragment to merge into the stored item.
    ///
    /// A supplied `expiry_date` is written as a midnight date-time.
    ///
    /// # Errors
    ///
    /// Returns `PatchError` for explicit nulls or an empty payload.
    pub fn into_update_set(self) -> Result<Document, PatchError> {
        let mut set = UpdateSet::new();
        set.apply(
            ItemFields::NAME,
            self.name.map(|v| Value::String(v.into_inner())),
        )?;
        set.apply(
            ItemFields::EMAIL,
            self.email.map(|v| Value::String(v.into_inner())),
        )?;
        set.apply(
            ItemFields::ITEM_NAME,
            self.item_name.map(|v| Value::String(v.into_inner())),
        )?;
        set.apply(ItemFields::QUANTITY, self.quantity.map(|v| Value::from(v.get())))?;
        set.apply(
            ItemFields::EXPIRY_DATE,
            self.expiry_date.map(|v| Value::String(format_midnight(v))),
        )?;
        set.finish()
    }
}

/// Query parameters accepted by `GET /items/filter`.
///
/// Dates stay as raw strings here so that parse failures can be reported
/// per parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilterParams {
    pub email: Option<String>,
    pub expiry_date: Option<String>,
    pub insert_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub quantity: Option<i64>,
}

/// Query strings send `quantity=` for an empty form field; treat it as unset.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One row of `GET /items/aggregate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailCount {
    #[serde(rename = "_id")]
    pub email: Option<String>,
    pub total_items: u64,
}

/// Response body for `POST /items`.
#[derive(Debug, Serialize)]
pub struct ItemCreated {
    pub message: &'static str,
    pub item_id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 15, 30, 0).unwrap()
    }

    fn new_item(expiry: &str) -> NewItem {
        serde_json::from_value(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "item_name": "Milk",
            "quantity": 5,
            "expiry_date": expiry,
        }))
        .unwrap()
    }

    #[test]
    fn test_into_fields_stamps_insert_date() {
        let fields = new_item("2026-10-19").into_fields(now()).unwrap();
        assert_eq!(fields.insert_date, now());
        assert_eq!(fields.quantity, 5);
        assert_eq!(fields.name, "John Doe");
    }

    #[test]
    fn test_into_fields_rejects_today_and_past() {
        assert!(matches!(
            new_item("2026-10-18").into_fields(now()),
            Err(TemporalError::NotInFuture { .. })
        ));
        assert!(new_item("2020-01-01").into_fields(now()).is_err());
    }

    #[test]
    fn test_stored_shape() {
        let fields = new_item("2030-12-31").into_fields(now()).unwrap();
        let doc = serde_json::to_value(&fields).unwrap();
        assert_eq!(doc["expiry_date"], json!("2030-12-31"));
        assert_eq!(doc["insert_date"], json!("2026-10-18T15:30:00Z"));
        assert_eq!(doc["quantity"], json!(5));
    }

    #[test]
    fn test_new_item_field_validation() {
        let too_long = json!({
            "name": "x".repeat(101),
            "email": "john@example.com",
            "item_name": "Milk",
            "quantity": 5,
            "expiry_date": "2030-01-01",
        });
        assert!(serde_json::from_value::<NewItem>(too_long).is_err());

        let zero = json!({
            "name": "John",
            "email": "john@example.com",
            "item_name": "Milk",
            "quantity": 0,
            "expiry_date": "2030-01-01",
        });
        assert!(serde_json::from_value::<NewItem>(zero).is_err());

        let bad_email = json!({
            "name": "John",
            "email": "john-at-example",
            "item_name": "Milk",
            "quantity": 1,
            "expiry_date": "2030-01-01",
        });
        assert!(serde_json::from_value::<NewItem>(bad_email).is_err());

        let missing = json!({"name": "John"});
        assert!(serde_json::from_value::<NewItem>(missing).is_err());
    }

    #[test]
    fn test_item_serializes_with_external_id() {
        let id = ItemId::new(uuid::Uuid::nil());
        let item = Item {
            id,
            fields: new_item("2030-12-31").into_fields(now()).unwrap(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["_id"], json!("00000000-0000-0000-0000-000000000000"));
        assert_eq!(value["item_name"], json!("Milk"));
        assert_eq!(value["expiry_date"], json!("2030-12-31"));
    }

    #[test]
    fn test_update_set_only_supplied_fields() {
        let update: ItemUpdate = serde_json::from_value(json!({"quantity": 10})).unwrap();
        let set = update.into_update_set().unwrap();
        assert_eq!(Value::Object(set), json!({"quantity": 10}));
    }

    #[test]
    fn test_update_set_expiry_is_midnight() {
        let update: ItemUpdate =
            serde_json::from_value(json!({"expiry_date": "2031-05-06", "name": "Jane"})).unwrap();
        let set = update.into_update_set().unwrap();
        assert_eq!(
            Value::Object(set),
            json!({"expiry_date": "2031-05-06T00:00:00", "name": "Jane"})
        );
    }

    #[test]
    fn test_update_rejects_null_and_empty() {
        let update: ItemUpdate = serde_json::from_value(json!({"email": null})).unwrap();
        assert_eq!(
            update.into_update_set(),
            Err(PatchError::NullField("email"))
        );

        let update: ItemUpdate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(update.into_update_set(), Err(PatchError::Empty));
    }

    #[test]
    fn test_update_validates_values() {
        assert!(serde_json::from_value::<ItemUpdate>(json!({"quantity": -1})).is_err());
        assert!(serde_json::from_value::<ItemUpdate>(json!({"email": "nope"})).is_err());
    }

    #[test]
    fn test_filter_params_blank_quantity() {
        let params: ItemFilterParams = serde_json::from_value(json!({"quantity": ""})).unwrap();
        assert_eq!(params.quantity, None);

        let params: ItemFilterParams = serde_json::from_value(json!({"quantity": "7"})).unwrap();
        assert_eq!(params.quantity, Some(7));

        assert!(serde_json::from_value::<ItemFilterParams>(json!({"quantity": "lots"})).is_err());
    }

    #[test]
    fn test_email_count_shape() {
        let row = EmailCount {
            email: Some("a@x.com".to_owned()),
            total_items: 3,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"_id": "a@x.com", "total_items": 3})
        );
    }
}
