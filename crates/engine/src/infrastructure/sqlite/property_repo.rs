//! SQLite-backed property storage.

use async_trait::async_trait;
use realtor_domain::{NewProperty, Property, PropertyId, PropertyUpdate};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, PropertyRepo, PropertySlice, RepoError};

const SELECT_PROPERTY: &str = r#"
    SELECT id, title, description, price, bedrooms, bathrooms, square_feet,
           address, city, state, zip_code, property_type, listing_type,
           created_at, updated_at
    FROM properties
"#;

/// SQLite implementation of the property store.
///
/// Every mutation runs in its own write transaction. If a statement fails the
/// transaction is rolled back before the error is returned.
pub struct SqlitePropertyRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqlitePropertyRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }

    /// Start a write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so concurrent writers
    /// queue on the busy timeout instead of failing a read-to-write upgrade.
    async fn begin(&self, operation: &'static str) -> Result<Transaction<'static, Sqlite>, RepoError> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| RepoError::database(operation, e))
    }
}

/// Commit on success, roll back on failure.
async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    operation: &'static str,
    result: Result<T, RepoError>,
) -> Result<T, RepoError> {
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| RepoError::database(operation, e))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    operation,
                    error = %rollback_err,
                    "Rollback failed"
                );
            } else {
                tracing::debug!(operation, "Rolled back transaction");
            }
            Err(e)
        }
    }
}

fn row_to_property(row: &SqliteRow) -> Result<Property, RepoError> {
    let decode = |e: sqlx::Error| RepoError::serialization(e);
    Ok(Property {
        id: PropertyId::new(row.try_get("id").map_err(decode)?),
        title: row.try_get("title").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        bedrooms: row.try_get("bedrooms").map_err(decode)?,
        bathrooms: row.try_get("bathrooms").map_err(decode)?,
        square_feet: row.try_get("square_feet").map_err(decode)?,
        address: row.try_get("address").map_err(decode)?,
        city: row.try_get("city").map_err(decode)?,
        state: row.try_get("state").map_err(decode)?,
        zip_code: row.try_get("zip_code").map_err(decode)?,
        property_type: row.try_get("property_type").map_err(decode)?,
        listing_type: row.try_get("listing_type").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

async fn fetch_by_id(
    conn: &mut SqliteConnection,
    id: PropertyId,
    operation: &'static str,
) -> Result<Option<Property>, RepoError> {
    let row = sqlx::query(&format!("{SELECT_PROPERTY} WHERE id = ?"))
        .bind(id.as_i64())
        .fetch_optional(conn)
        .await
        .map_err(|e| RepoError::database(operation, e))?;

    row.as_ref().map(row_to_property).transpose()
}

async fn insert_row(
    conn: &mut SqliteConnection,
    draft: &NewProperty,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<i64, RepoError> {
    let done = sqlx::query(
        r#"
        INSERT INTO properties (
            title, description, price, bedrooms, bathrooms, square_feet,
            address, city, state, zip_code, property_type, listing_type,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(draft.title.as_str())
    .bind(draft.description.as_str())
    .bind(draft.price)
    .bind(draft.bedrooms)
    .bind(draft.bathrooms)
    .bind(draft.square_feet)
    .bind(draft.address.as_str())
    .bind(draft.city.as_str())
    .bind(draft.state.as_str())
    .bind(draft.zip_code.as_str())
    .bind(draft.property_type.as_deref())
    .bind(draft.listing_type.as_deref())
    .bind(now)
    .bind(now)
    .execute(conn)
    .await
    .map_err(|e| RepoError::database("insert_property", e))?;

    Ok(done.last_insert_rowid())
}

async fn update_row(
    conn: &mut SqliteConnection,
    id: PropertyId,
    update: PropertyUpdate,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Option<Property>, RepoError> {
    let Some(mut property) = fetch_by_id(&mut *conn, id, "update_property").await? else {
        return Ok(None);
    };

    property.apply(update, now);

    sqlx::query(
        r#"
        UPDATE properties SET
            title = ?, description = ?, price = ?, bedrooms = ?, bathrooms = ?,
            square_feet = ?, address = ?, city = ?, state = ?, zip_code = ?,
            property_type = ?, listing_type = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(property.title.as_str())
    .bind(property.description.as_str())
    .bind(property.price)
    .bind(property.bedrooms)
    .bind(property.bathrooms)
    .bind(property.square_feet)
    .bind(property.address.as_str())
    .bind(property.city.as_str())
    .bind(property.state.as_str())
    .bind(property.zip_code.as_str())
    .bind(property.property_type.as_deref())
    .bind(property.listing_type.as_deref())
    .bind(property.updated_at)
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await
    .map_err(|e| RepoError::database("update_property", e))?;

    Ok(Some(property))
}

#[async_trait]
impl PropertyRepo for SqlitePropertyRepo {
    async fn insert(&self, draft: NewProperty) -> Result<Property, RepoError> {
        let now = self.clock.now();
        let mut tx = self.begin("insert_property").await?;
        let result = insert_row(&mut tx, &draft, now).await;
        let id = finish(tx, "insert_property", result).await?;

        Ok(Property::from_draft(PropertyId::new(id), draft, now))
    }

    async fn get(&self, id: PropertyId) -> Result<Option<Property>, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("get_property", e))?;
        fetch_by_id(&mut conn, id, "get_property").await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<PropertySlice, RepoError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("count_properties", e))?;

        let rows = sqlx::query(&format!("{SELECT_PROPERTY} ORDER BY id LIMIT ? OFFSET ?"))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_properties", e))?;

        let items = rows
            .iter()
            .map(row_to_property)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PropertySlice {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn update(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Option<Property>, RepoError> {
        let now = self.clock.now();
        let mut tx = self.begin("update_property").await?;
        let result = update_row(&mut tx, id, update, now).await;
        finish(tx, "update_property", result).await
    }

    async fn delete(&self, id: PropertyId) -> Result<bool, RepoError> {
        let mut tx = self.begin("delete_property").await?;
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map(|done| done.rows_affected() > 0)
            .map_err(|e| RepoError::database("delete_property", e));
        finish(tx, "delete_property", result).await
    }
}
