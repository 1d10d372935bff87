//! SQLite implementation of the CustomerRepository.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::adapters::sqlite::query_builder::{self, SqlParam, CUSTOMER_COLUMNS};
use crate::domain::models::{
    Customer, CustomerPatch, ListQuery, NewCustomerRecord, TenantStats,
};
use crate::domain::ports::{CustomerRepository, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct SqliteCustomerRepository {
    pool: SqlitePool,
}

impl SqliteCustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Format a timestamp for storage. Fixed-width microseconds keep the
/// column's lexicographic order identical to chronological order.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid timestamp {s:?}: {e}")))
}

/// Raw row as stored; `password_hash` is never selected.
#[derive(Debug, FromRow)]
struct CustomerRow {
    id: String,
    tenant_id: String,
    email: String,
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    loyalty_points: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let address = row
            .address
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| RepositoryError::Decode(format!("invalid address json: {e}")))?;

        Ok(Customer {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::Decode(format!("invalid id {:?}: {e}", row.id)))?,
            tenant_id: row.tenant_id,
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            address,
            loyalty_points: row.loyalty_points,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Bind an ordered parameter list produced by the query builder.
fn bind_all<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    params: &'q [SqlParam],
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.as_str()),
            SqlParam::Int(i) => query.bind(*i),
        };
    }
    query
}

#[async_trait]
impl CustomerRepository for SqliteCustomerRepository {
    async fn insert(&self, record: NewCustomerRecord) -> RepositoryResult<Customer> {
        let id = Uuid::new_v4();
        // Truncate to the stored precision so the returned entity is
        // byte-identical to what a later read will parse back.
        let now = Utc::now().trunc_subsecs(6);
        let address_json = record.address.as_ref().map(ToString::to_string);

        let result = sqlx::query(
            r#"INSERT INTO customers (id, tenant_id, email, password_hash, full_name,
               phone, address, loyalty_points, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(&record.tenant_id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.full_name)
        .bind(&record.phone)
        .bind(&address_json)
        .bind(format_timestamp(now))
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Customer {
                id,
                tenant_id: record.tenant_id,
                email: record.email,
                full_name: record.full_name,
                phone: record.phone,
                address: record.address,
                loyalty_points: 0,
                created_at: now,
                updated_at: now,
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RepositoryError::UniqueViolation(record.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, id: Uuid, tenant_id: &str) -> RepositoryResult<Option<Customer>> {
        let sql =
            format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ? AND tenant_id = ?");
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn email_exists(&self, tenant_id: &str, email: &str) -> RepositoryResult<bool> {
        // Plain equality: the email column is COLLATE NOCASE, so this
        // matches exactly what the unique constraint would reject.
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM customers WHERE tenant_id = ? AND email = ?",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn list(&self, query: &ListQuery) -> RepositoryResult<(Vec<Customer>, i64)> {
        let (list_sql, list_params) = query_builder::build_list(query);
        let rows: Vec<CustomerRow> = bind_all(sqlx::query_as(&list_sql), &list_params)
            .fetch_all(&self.pool)
            .await?;

        let customers = rows
            .into_iter()
            .map(Customer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let (count_sql, count_params) = query_builder::build_count(query);
        let total: (i64,) = bind_all(sqlx::query_as(&count_sql), &count_params)
            .fetch_one(&self.pool)
            .await?;

        Ok((customers, total.0))
    }

    async fn apply_patch(
        &self,
        id: Uuid,
        tenant_id: &str,
        patch: &CustomerPatch,
    ) -> RepositoryResult<Option<Customer>> {
        let updated_at = format_timestamp(Utc::now());
        let Some((sql, params)) = query_builder::build_update(id, tenant_id, patch, &updated_at)
        else {
            return Err(RepositoryError::EmptyPatch);
        };

        let mut q = sqlx::query(&sql);
        for param in &params {
            q = match param {
                SqlParam::Text(s) => q.bind(s.as_str()),
                SqlParam::Int(i) => q.bind(*i),
            };
        }

        let result = q.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find(id, tenant_id).await
    }

    async fn tenant_stats(&self, tenant_id: &str) -> RepositoryResult<TenantStats> {
        let row: SqliteRow = sqlx::query(
            r#"SELECT COUNT(*) AS total,
                      COALESCE(SUM(loyalty_points), 0) AS points,
                      COALESCE(AVG(loyalty_points), 0.0) AS avg_points
               FROM customers WHERE tenant_id = ?"#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(TenantStats {
            total_customers: row.try_get("total")?,
            total_loyalty_points: row.try_get("points")?,
            avg_loyalty_points: row.try_get("avg_points")?,
        })
    }
}
