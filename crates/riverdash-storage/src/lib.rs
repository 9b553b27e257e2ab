//! Gauge table persistence: the `GaugeStore` seam, its Postgres implementation
//! and an in-memory implementation for tests and local runs.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use riverdash_core::{GaugePatch, GaugeRecord};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const CRATE_NAME: &str = "riverdash-storage";

pub const GAUGE_TABLE: &str = "riverlevel_gauge_tb";

const GAUGE_COLUMNS: &str =
    "obscd, obsnm, mngorg, flood_warning, addr, lon, lat, gdt, planflood_level";

// Postgres caps a statement at 65535 bind parameters; each row binds nine.
const INSERT_CHUNK_ROWS: usize = 7000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("gauge {station_code} already exists")]
    Conflict { station_code: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent home of registered gauges, keyed by station code.
///
/// Each write call is atomic: either every record/patch lands or none does.
#[async_trait]
pub trait GaugeStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<GaugeRecord>, StoreError>;

    /// Inserts new gauges, returning the number of rows written.
    async fn insert_many(&self, records: &[GaugeRecord]) -> Result<u64, StoreError>;

    /// Applies sparse patches keyed by station code, returning the number of rows touched.
    async fn update_many(&self, patches: &[GaugePatch]) -> Result<u64, StoreError>;
}

#[derive(Debug, sqlx::FromRow)]
struct GaugeRow {
    obscd: String,
    obsnm: String,
    mngorg: String,
    flood_warning: bool,
    addr: Option<String>,
    lon: Option<f64>,
    lat: Option<f64>,
    gdt: Option<f64>,
    planflood_level: Option<f64>,
}

impl From<GaugeRow> for GaugeRecord {
    fn from(row: GaugeRow) -> Self {
        Self {
            station_code: row.obscd,
            station_name: row.obsnm,
            managing_org: row.mngorg,
            flood_warning: row.flood_warning,
            address: row.addr,
            longitude: row.lon,
            latitude: row.lat,
            ground_datum: row.gdt,
            planned_flood_level: row.planflood_level,
        }
    }
}

/// Multi-row insert for a slice of gauges. `records` must not be empty.
pub fn insert_statement(records: &[GaugeRecord]) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(format!("INSERT INTO {GAUGE_TABLE} ({GAUGE_COLUMNS}) "));
    qb.push_values(records, |mut row, record| {
        row.push_bind(&record.station_code)
            .push_bind(&record.station_name)
            .push_bind(&record.managing_org)
            .push_bind(record.flood_warning)
            .push_bind(record.address.as_deref())
            .push_bind(record.longitude)
            .push_bind(record.latitude)
            .push_bind(record.ground_datum)
            .push_bind(record.planned_flood_level);
    });
    qb
}

/// Point update setting only the columns the patch carries; `None` for an empty patch.
pub fn update_statement(patch: &GaugePatch) -> Option<QueryBuilder<'_, Postgres>> {
    if patch.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new(format!("UPDATE {GAUGE_TABLE} SET "));
    {
        let mut set = qb.separated(", ");
        if let Some(value) = &patch.station_name {
            set.push("obsnm = ").push_bind_unseparated(value);
        }
        if let Some(value) = &patch.managing_org {
            set.push("mngorg = ").push_bind_unseparated(value);
        }
        if let Some(value) = patch.flood_warning {
            set.push("flood_warning = ").push_bind_unseparated(value);
        }
        if let Some(value) = &patch.address {
            set.push("addr = ").push_bind_unseparated(value.as_deref());
        }
        if let Some(value) = patch.longitude {
            set.push("lon = ").push_bind_unseparated(value);
        }
        if let Some(value) = patch.latitude {
            set.push("lat = ").push_bind_unseparated(value);
        }
        if let Some(value) = patch.ground_datum {
            set.push("gdt = ").push_bind_unseparated(value);
        }
        if let Some(value) = patch.planned_flood_level {
            set.push("planflood_level = ").push_bind_unseparated(value);
        }
    }
    qb.push(" WHERE obscd = ").push_bind(&patch.station_code);
    Some(qb)
}

#[derive(Debug, Clone)]
pub struct PgGaugeStore {
    pool: PgPool,
}

impl PgGaugeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("gauge schema migrations applied");
        Ok(())
    }
}

#[async_trait]
impl GaugeStore for PgGaugeStore {
    async fn fetch_all(&self) -> Result<Vec<GaugeRecord>, StoreError> {
        let sql = format!("SELECT {GAUGE_COLUMNS} FROM {GAUGE_TABLE} ORDER BY no");
        let rows = sqlx::query_as::<_, GaugeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "loaded registered gauges");
        Ok(rows.into_iter().map(GaugeRecord::from).collect())
    }

    async fn insert_many(&self, records: &[GaugeRecord]) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for chunk in records.chunks(INSERT_CHUNK_ROWS) {
            let mut stmt = insert_statement(chunk);
            inserted += stmt.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn update_many(&self, patches: &[GaugePatch]) -> Result<u64, StoreError> {
        if patches.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut updated = 0u64;
        for patch in patches {
            let Some(mut stmt) = update_statement(patch) else {
                continue;
            };
            updated += stmt.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }
}

/// A write accepted by [`MemoryGaugeStore`], kept in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Insert(Vec<GaugeRecord>),
    Update(Vec<GaugePatch>),
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<GaugeRecord>,
    journal: Vec<StoreWrite>,
    fetches: usize,
}

/// In-process gauge table with a write journal.
#[derive(Debug, Default)]
pub struct MemoryGaugeStore {
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
}

impl MemoryGaugeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<GaugeRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                rows,
                ..MemoryState::default()
            }),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every following write fail with [`StoreError::Unavailable`] until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn rows(&self) -> Vec<GaugeRecord> {
        self.state.lock().await.rows.clone()
    }

    pub async fn journal(&self) -> Vec<StoreWrite> {
        self.state.lock().await.journal.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.state.lock().await.fetches
    }

    /// Upserts a row behind the back of any cache, like an external writer would.
    pub async fn put(&self, record: GaugeRecord) {
        let mut state = self.state.lock().await;
        match state
            .rows
            .iter_mut()
            .find(|row| row.station_code == record.station_code)
        {
            Some(row) => *row = record,
            None => state.rows.push(record),
        }
    }

    /// Deletes a row behind the back of any cache.
    pub async fn remove(&self, station_code: &str) -> Option<GaugeRecord> {
        let mut state = self.state.lock().await;
        let index = state
            .rows
            .iter()
            .position(|row| row.station_code == station_code)?;
        Some(state.rows.remove(index))
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GaugeStore for MemoryGaugeStore {
    async fn fetch_all(&self) -> Result<Vec<GaugeRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.fetches += 1;
        Ok(state.rows.clone())
    }

    async fn insert_many(&self, records: &[GaugeRecord]) -> Result<u64, StoreError> {
        self.check_writable()?;
        if records.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.lock().await;
        let mut codes = state
            .rows
            .iter()
            .map(|row| row.station_code.clone())
            .collect::<HashSet<_>>();
        for record in records {
            if !codes.insert(record.station_code.clone()) {
                return Err(StoreError::Conflict {
                    station_code: record.station_code.clone(),
                });
            }
        }

        state.rows.extend_from_slice(records);
        state.journal.push(StoreWrite::Insert(records.to_vec()));
        Ok(records.len() as u64)
    }

    async fn update_many(&self, patches: &[GaugePatch]) -> Result<u64, StoreError> {
        self.check_writable()?;
        if patches.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.lock().await;
        let mut updated = 0u64;
        for patch in patches.iter().filter(|p| !p.is_empty()) {
            if let Some(row) = state
                .rows
                .iter_mut()
                .find(|row| row.station_code == patch.station_code)
            {
                patch.apply_to(row);
                updated += 1;
            }
        }
        state.journal.push(StoreWrite::Update(patches.to_vec()));
        Ok(updated)
    }
}
