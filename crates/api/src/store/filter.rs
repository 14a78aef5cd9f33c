//! Store-neutral query filters.
//!
//! A [`Filter`] is a conjunction of typed field conditions, optionally pinned
//! to a single document id. The `PostgreSQL` backend compiles it to SQL over
//! the JSONB column; the in-memory backend evaluates it with
//! [`Filter::matches`]. Both must agree on the comparison rules below.
//!
//! | operand | stored value read as |
//! |---|---|
//! | [`Operand::Text`] | JSON string |
//! | [`Operand::Integer`] | JSON integer |
//! | [`Operand::Date`] | leading `YYYY-MM-DD` of a JSON string |
//! | [`Operand::Instant`] | RFC 3339 timestamp in a JSON string |
//!
//! A document whose field is missing or of the wrong shape never matches.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use pantry_core::{parse_date, parse_instant};
use serde_json::Value;
use uuid::Uuid;

use super::Document;

/// Comparison applied between the stored field and the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Stored value equals the operand.
    Eq,
    /// Stored value is strictly greater than the operand.
    Gt,
    /// Stored value is greater than or equal to the operand.
    Gte,
}

impl Comparison {
    /// SQL operator for this comparison.
    #[must_use]
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }

    /// Whether `stored.cmp(operand)` satisfies this comparison.
    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Gte => !matches!(ordering, Ordering::Less),
        }
    }
}

/// Typed right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

/// A single `field <op> operand` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: &'static str,
    pub comparison: Comparison,
    pub operand: Operand,
}

impl Condition {
    /// Evaluate this condition against a document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(stored) = doc.get(self.field) else {
            return false;
        };

        let ordering = match (&self.operand, stored) {
            (Operand::Text(expected), Value::String(actual)) => {
                Some(actual.as_str().cmp(expected.as_str()))
            }
            (Operand::Integer(expected), Value::Number(actual)) => {
                actual.as_i64().map(|actual| actual.cmp(expected))
            }
            (Operand::Date(expected), Value::String(actual)) => {
                parse_date(actual).ok().map(|actual| actual.cmp(expected))
            }
            (Operand::Instant(expected), Value::String(actual)) => {
                parse_instant(actual).ok().map(|actual| actual.cmp(expected))
            }
            _ => None,
        };

        ordering.is_some_and(|ordering| self.comparison.accepts(ordering))
    }
}

/// Conjunctive document filter.
///
/// An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    id: Option<Uuid>,
    conditions: Vec<Condition>,
}

impl Filter {
    /// A filter matching every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter matching only the document with the given id.
    #[must_use]
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            conditions: Vec::new(),
        }
    }

    /// Add a condition.
    #[must_use]
    pub fn and(mut self, field: &'static str, comparison: Comparison, operand: Operand) -> Self {
        self.conditions.push(Condition {
            field,
            comparison,
            operand,
        });
        self
    }

    /// Require `field == value`.
    #[must_use]
    pub fn text_eq(self, field: &'static str, value: impl Into<String>) -> Self {
        self.and(field, Comparison::Eq, Operand::Text(value.into()))
    }

    /// Require `field >= value`.
    #[must_use]
    pub fn integer_gte(self, field: &'static str, value: i64) -> Self {
        self.and(field, Comparison::Gte, Operand::Integer(value))
    }

    /// Require the stored date to be strictly after `date`.
    #[must_use]
    pub fn date_gt(self, field: &'static str, date: NaiveDate) -> Self {
        self.and(field, Comparison::Gt, Operand::Date(date))
    }

    /// Require the stored timestamp to be at or after `instant`.
    #[must_use]
    pub fn instant_gte(self, field: &'static str, instant: DateTime<Utc>) -> Self {
        self.and(field, Comparison::Gte, Operand::Instant(instant))
    }

    /// The document id this filter is pinned to, if any.
    #[must_use]
    pub const fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// The field conditions, in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether the filter imposes no restriction at all.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.id.is_none() && self.conditions.is_empty()
    }

    /// Evaluate the filter against a stored document.
    #[must_use]
    pub fn matches(&self, id: Uuid, doc: &Document) -> bool {
        self.id.is_none_or(|wanted| wanted == id)
            && self.conditions.iter().all(|c| c.matches(doc))
    }
}
