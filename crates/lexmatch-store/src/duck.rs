//! DuckDB document store for the advocate pool.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use arrow::array::{
    Array, Float64Array, Int64Array, LargeStringArray, StringArray, StringViewArray,
};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use duckdb::{Connection, params};
use lexmatch_core::Advocate;
use tracing::info;

use crate::{AdvocateStore, NamePattern, StoreError};

const CREATE_ADVOCATES: &str = "CREATE TABLE IF NOT EXISTS advocates (
    sl_no             BIGINT  PRIMARY KEY,
    name              VARCHAR NOT NULL,
    age               INTEGER NOT NULL,
    short_description VARCHAR NOT NULL,
    skills            VARCHAR NOT NULL,
    experience        INTEGER NOT NULL,
    gender            VARCHAR NOT NULL,
    rating            DOUBLE  NOT NULL,
    email             VARCHAR NOT NULL
)";

// Fixed column types so decoding never depends on how the table was created.
const SELECT_ADVOCATES: &str = "SELECT
    sl_no::BIGINT      AS sl_no,
    name::VARCHAR      AS name,
    age::BIGINT        AS age,
    short_description::VARCHAR AS short_description,
    skills::VARCHAR    AS skills,
    experience::BIGINT AS experience,
    gender::VARCHAR    AS gender,
    rating::DOUBLE     AS rating,
    email::VARCHAR     AS email
FROM advocates";

/// DuckDB-backed advocate pool.
///
/// One `advocates` table, one row per advocate. Supports in-memory
/// (ephemeral) and persistent (file-backed) modes. Reads are decoded from
/// Arrow record batches and run on the blocking thread pool so the async
/// caller is suspended rather than stalled.
pub struct DuckStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckStore {
    /// Open an in-memory database with an empty `advocates` table.
    pub fn open() -> Result<Self, StoreError> {
        let store = Self::from_connection(Connection::open_in_memory()?);
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open or create a persistent database at the given path.
    ///
    /// An existing pool is available immediately; a new file gets an empty
    /// `advocates` table.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self::from_connection(Connection::open(path)?);
        store.ensure_schema()?;
        info!(path = %path.display(), "opened advocate store");
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create the `advocates` table if it does not exist.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.lock()?.execute_batch(CREATE_ADVOCATES)?;
        Ok(())
    }

    /// Whether the pool has at least one advocate.
    pub fn has_advocates(&self) -> bool {
        self.advocate_count().is_ok_and(|n| n > 0)
    }

    /// Number of rows in the `advocates` table.
    pub fn advocate_count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT count(*)::BIGINT AS cnt FROM advocates")?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    /// Replace the pool with the advocates in a JSON array file.
    ///
    /// Returns the number of advocates loaded.
    pub fn load_json(&self, path: &Path) -> Result<usize, StoreError> {
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let advocates: Vec<Advocate> = serde_json::from_slice(&bytes)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM advocates", [])?;
        insert_all(&tx, &advocates)?;
        tx.commit()?;

        info!(count = advocates.len(), path = %path.display(), "loaded advocates table");
        Ok(advocates.len())
    }

    /// Append advocates to the pool. Fails on a duplicate `sl_no`.
    pub fn insert_advocates(&self, advocates: &[Advocate]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        insert_all(&tx, advocates)?;
        tx.commit()?;
        Ok(advocates.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        lock(&self.conn)
    }
}

#[async_trait]
impl AdvocateStore for DuckStore {
    async fn advocates(&self) -> Result<Vec<Advocate>, StoreError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<Vec<Advocate>, StoreError> {
            let conn = lock(&conn)?;
            let mut stmt = conn.prepare(SELECT_ADVOCATES)?;
            let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
            decode_advocates(&batches)
        })
        .await?
    }

    async fn find_first(&self, pattern: &NamePattern) -> Result<Option<Advocate>, StoreError> {
        let conn = Arc::clone(&self.conn);
        let source = pattern.as_str().to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Advocate>, StoreError> {
            let conn = lock(&conn)?;
            let sql = format!(
                "{SELECT_ADVOCATES} WHERE regexp_matches(name, ?, 'i') ORDER BY rowid LIMIT 1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let batches: Vec<RecordBatch> = stmt.query_arrow([source.as_str()])?.collect();
            Ok(decode_advocates(&batches)?.into_iter().next())
        })
        .await?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StoreError> {
    conn.lock()
        .map_err(|_| StoreError::Other("advocate store connection lock poisoned".into()))
}

fn insert_all(conn: &Connection, advocates: &[Advocate]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("INSERT INTO advocates VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)")?;
    for a in advocates {
        stmt.execute(params![
            a.sl_no,
            a.name,
            i64::from(a.age),
            a.short_description,
            a.skills,
            i64::from(a.experience),
            a.gender,
            a.rating,
            a.email,
        ])?;
    }
    Ok(())
}

// ── Arrow decoding ──

fn decode_advocates(batches: &[RecordBatch]) -> Result<Vec<Advocate>, StoreError> {
    let mut out = Vec::with_capacity(batches.iter().map(|b| b.num_rows()).sum());
    for batch in batches {
        let sl_no = int_column(batch, "sl_no")?;
        let age = int_column(batch, "age")?;
        let experience = int_column(batch, "experience")?;
        let rating = batch
            .column_by_name("rating")
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .ok_or_else(|| StoreError::Other("rating column not f64".into()))?;

        for row in 0..batch.num_rows() {
            out.push(Advocate {
                sl_no: sl_no.value(row),
                name: string_value(batch, "name", row)?,
                age: to_u32(age.value(row), "age")?,
                short_description: string_value(batch, "short_description", row)?,
                skills: string_value(batch, "skills", row)?,
                experience: to_u32(experience.value(row), "experience")?,
                gender: string_value(batch, "gender", row)?,
                rating: rating.value(row),
                email: string_value(batch, "email", row)?,
            });
        }
    }
    Ok(out)
}

fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array, StoreError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| StoreError::Other(format!("{name} column not i64")))
}

fn to_u32(value: i64, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Other(format!("{column} out of range: {value}")))
}

/// Read a string cell, accepting `Utf8`, `LargeUtf8`, and `Utf8View` columns.
fn string_value(batch: &RecordBatch, name: &str, row: usize) -> Result<String, StoreError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::Other(format!("missing '{name}' column")))?;
    if col.is_null(row) {
        return Ok(String::new());
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<StringArray>() {
        Ok(arr.value(row).to_string())
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        Ok(arr.value(row).to_string())
    } else if let Some(arr) = any.downcast_ref::<StringViewArray>() {
        Ok(arr.value(row).to_string())
    } else {
        Err(StoreError::Other(format!(
            "unexpected {name} column type: {:?}",
            col.data_type()
        )))
    }
}
