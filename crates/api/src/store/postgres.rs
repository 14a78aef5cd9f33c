//! `PostgreSQL` document store.
//!
//! Each collection is a table `(id UUID, seq BIGINT, doc JSONB)`. Filters are
//! compiled with [`QueryBuilder`]; field names and values are always bound
//! as parameters, only the table name (a fixed [`Collection`] name) is
//! pushed into the SQL text.
//!
//! Queries are built at runtime, so there is no compile-time checking
//! against the schema.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use super::{Collection, Document, Filter, GroupCount, Operand, StoreError, StoredDocument};

/// Embedded migrations creating the collection tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, doc), fields(collection = collection.name()))]
    pub(super) async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<Uuid, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(collection.name())
            .push(" (doc) VALUES (")
            .push_bind(serde_json::Value::Object(doc))
            .push(") RETURNING id");

        let id = qb.build_query_scalar::<Uuid>().fetch_one(&self.pool).await?;
        Ok(id)
    }

    #[instrument(skip(self, filter), fields(collection = collection.name()))]
    pub(super) async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let mut qb = select(collection, filter);
        qb.push(" LIMIT 1");

        let row = qb
            .build_query_as::<(Uuid, serde_json::Value)>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(into_stored).transpose()
    }

    #[instrument(skip(self, filter), fields(collection = collection.name()))]
    pub(super) async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let mut qb = select(collection, filter);

        let rows = qb
            .build_query_as::<(Uuid, serde_json::Value)>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(into_stored).collect()
    }

    #[instrument(skip(self, filter, set), fields(collection = collection.name()))]
    pub(super) async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
        qb.push(collection.name())
            .push(" SET doc = doc || ")
            .push_bind(serde_json::Value::Object(set))
            .push(" WHERE id = (");
        push_first_id(&mut qb, collection, filter);
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, filter), fields(collection = collection.name()))]
    pub(super) async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(collection.name()).push(" WHERE id = (");
        push_first_id(&mut qb, collection, filter);
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(collection = collection.name()))]
    pub(super) async fn group_count(
        &self,
        collection: Collection,
        field: &'static str,
    ) -> Result<Vec<GroupCount>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT doc->>");
        qb.push_bind(field)
            .push(" AS key, COUNT(*) AS total FROM ")
            .push(collection.name())
            .push(" GROUP BY 1 ORDER BY MIN(seq)");

        let rows = qb
            .build_query_as::<(Option<String>, i64)>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(key, total)| {
                let count = u64::try_from(total).map_err(|_| {
                    StoreError::DataCorruption(format!("negative group count {total}"))
                })?;
                Ok(GroupCount { key, count })
            })
            .collect()
    }

    pub(super) async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// `SELECT id, doc FROM <collection> WHERE <filter> ORDER BY seq`.
fn select<'a>(collection: Collection, filter: &Filter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT id, doc FROM ");
    qb.push(collection.name());
    push_where(&mut qb, filter);
    qb.push(" ORDER BY seq");
    qb
}

/// Sub-select of the first matching id, used to give `UPDATE` and `DELETE`
/// single-document semantics.
fn push_first_id(qb: &mut QueryBuilder<'_, Postgres>, collection: Collection, filter: &Filter) {
    qb.push("SELECT id FROM ").push(collection.name());
    push_where(qb, filter);
    qb.push(" ORDER BY seq LIMIT 1");
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    qb.push(" WHERE TRUE");

    if let Some(id) = filter.id() {
        qb.push(" AND id = ").push_bind(id);
    }

    for condition in filter.conditions() {
        let op = condition.comparison.sql_operator();
        qb.push(" AND ");
        match &condition.operand {
            Operand::Text(value) => {
                qb.push("doc->>")
                    .push_bind(condition.field)
                    .push(format!(" {op} "))
                    .push_bind(value.clone());
            }
            Operand::Integer(value) => {
                qb.push("(doc->>")
                    .push_bind(condition.field)
                    .push(format!(")::bigint {op} "))
                    .push_bind(*value);
            }
            Operand::Date(value) => {
                // Stored as YYYY-MM-DD or YYYY-MM-DDT00:00:00; the date is the first 10 chars
                qb.push("left(doc->>")
                    .push_bind(condition.field)
                    .push(format!(", 10)::date {op} "))
                    .push_bind(*value);
            }
            Operand::Instant(value) => {
                qb.push("(doc->>")
                    .push_bind(condition.field)
                    .push(format!(")::timestamptz {op} "))
                    .push_bind(*value);
            }
        }
    }
}

fn into_stored((id, doc): (Uuid, serde_json::Value)) -> Result<StoredDocument, StoreError> {
    match doc {
        serde_json::Value::Object(body) => Ok(StoredDocument { id, body }),
        other => Err(StoreError::DataCorruption(format!(
            "document {id} is not an object: {other}"
        ))),
    }
}
