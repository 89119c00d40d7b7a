use super::{lock, normalize_domain, sort_frequency_table, sort_observations, FrequencyTable, PatternStore};
use crate::error::Result;
use crate::patterns::PatternKind;
use crate::types::DomainPatternObservation;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

/// SQLite-backed pattern store. One row per (domain, pattern); writes are
/// single atomic upserts.
pub struct SqlitePatternStore {
    conn: Mutex<Connection>,
}

impl SqlitePatternStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        Self::initialize(&conn)?;
        debug!("Opened pattern store at {}", db_path.display());
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn initialize(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS domain_patterns (
                id          INTEGER PRIMARY KEY,
                domain      TEXT NOT NULL,
                pattern     TEXT NOT NULL,
                count       INTEGER NOT NULL DEFAULT 1,
                first_seen  TEXT NOT NULL,
                last_seen   TEXT NOT NULL,
                UNIQUE(domain, pattern)
            );
            "#,
        )?;
        Ok(())
    }

    fn parse_pattern(raw: &str, domain: &str) -> Option<PatternKind> {
        match raw.parse::<PatternKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                warn!("Skipping stored row for {}: {}", domain, e);
                None
            }
        }
    }
}

#[async_trait]
impl PatternStore for SqlitePatternStore {
    async fn record(&self, domain: &str, pattern: PatternKind) -> Result<u64> {
        let domain = normalize_domain(domain);
        let now = chrono::Utc::now().to_rfc3339();
        let conn = lock(&self.conn);
        conn.execute(
            "INSERT INTO domain_patterns (domain, pattern, count, first_seen, last_seen)
             VALUES (?1, ?2, 1, ?3, ?3)
             ON CONFLICT(domain, pattern) DO UPDATE SET count = count + 1, last_seen = excluded.last_seen",
            params![domain, pattern.as_str(), now],
        )?;
        let count: i64 = conn.query_row(
            "SELECT count FROM domain_patterns WHERE domain = ?1 AND pattern = ?2",
            params![domain, pattern.as_str()],
            |row| row.get(0),
        )?;

        debug!("Recorded {} for {} (count {})", pattern, domain, count);
        Ok(count as u64)
    }

    async fn lookup(&self, domain: &str) -> Result<FrequencyTable> {
        let domain = normalize_domain(domain);
        let conn = lock(&self.conn);
        let mut stmt = conn.prepare("SELECT pattern, count FROM domain_patterns WHERE domain = ?1 ORDER BY count DESC")?;
        let rows = stmt.query_map(params![domain], |row| {
            let pattern: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((pattern, count))
        })?;

        let mut table = FrequencyTable::new();
        for row in rows {
            let (raw, count) = row?;
            if let Some(kind) = Self::parse_pattern(&raw, &domain) {
                table.push((kind, count as u64));
            }
        }
        sort_frequency_table(&mut table);
        Ok(table)
    }

    async fn observations(&self) -> Result<Vec<DomainPatternObservation>> {
        let conn = lock(&self.conn);
        let mut stmt = conn.prepare("SELECT domain, pattern, count FROM domain_patterns")?;
        let rows = stmt.query_map([], |row| {
            let domain: String = row.get(0)?;
            let pattern: String = row.get(1)?;
            let count: i64 = row.get(2)?;
            Ok((domain, pattern, count))
        })?;

        let mut observations = Vec::new();
        for row in rows {
            let (domain, raw, count) = row?;
            if let Some(pattern) = Self::parse_pattern(&raw, &domain) {
                observations.push(DomainPatternObservation {
                    domain,
                    pattern,
                    count: count as u64,
                });
            }
        }
        sort_observations(&mut observations);
        Ok(observations)
    }
}
