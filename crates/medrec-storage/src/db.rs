//! Patient record store

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use medrec_core::{Patient, PatientFields};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;
use crate::models::PatientRow;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS patients (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name       TEXT NOT NULL,
    last_name        TEXT NOT NULL,
    birthday         TEXT NOT NULL,
    description      TEXT NOT NULL,
    primary_doctor   TEXT NOT NULL,
    image_identifier TEXT
)";

/// Relational store of patient rows.
///
/// The store owns row identity; callers never pick ids. The optional
/// `image_identifier` column is an opaque key into the object store and is
/// written exactly as given, so carrying an existing identifier forward on
/// an image-less update is the caller's job.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Patient>>;

    async fn get(&self, id: i64) -> Result<Option<Patient>>;

    /// Insert a new row, returning the assigned id.
    async fn insert(&self, fields: &PatientFields, image_identifier: Option<&str>) -> Result<i64>;

    /// Overwrite all scalar fields and the image identifier in one write.
    /// Returns false when no row matched.
    async fn update(
        &self,
        id: i64,
        fields: &PatientFields,
        image_identifier: Option<&str>,
    ) -> Result<bool>;

    /// Delete a row. Returns false when no row matched.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLite-backed [`RecordStore`] with an explicit open/close lifecycle.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (creating if necessary) a database file and bootstrap the schema.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::init(pool).await
    }

    /// Open an in-memory database. Pinned to a single connection because
    /// every SQLite memory connection is its own database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn list(&self) -> Result<Vec<Patient>> {
        let rows = sqlx::query_as::<_, PatientRow>(
            "SELECT id, first_name, last_name, birthday, description, primary_doctor, \
             image_identifier FROM patients",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Patient::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Patient>> {
        let row = sqlx::query_as::<_, PatientRow>(
            "SELECT id, first_name, last_name, birthday, description, primary_doctor, \
             image_identifier FROM patients WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Patient::from))
    }

    async fn insert(&self, fields: &PatientFields, image_identifier: Option<&str>) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO patients \
             (first_name, last_name, birthday, description, primary_doctor, image_identifier) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.birthday)
        .bind(&fields.description)
        .bind(&fields.primary_doctor)
        .bind(image_identifier)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(
        &self,
        id: i64,
        fields: &PatientFields,
        image_identifier: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE patients SET first_name = ?1, last_name = ?2, birthday = ?3, \
             description = ?4, primary_doctor = ?5, image_identifier = ?6 WHERE id = ?7",
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.birthday)
        .bind(&fields.description)
        .bind(&fields.primary_doctor)
        .bind(image_identifier)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
