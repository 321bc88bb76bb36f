//! SQLite policy store.
//!
//! RULE: Only policy_store.rs talks to the database.
//! RULE: Snapshots are append-only. Publishing inserts a new row and the
//! newest row for a year wins; no existing row is ever updated.

use crate::{
    config::PolicyConfig,
    error::{RehabError, RehabResult},
    policy_book::PolicyResolver,
};
use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

pub struct PolicyStore {
    conn: Connection,
}

impl PolicyStore {
    /// Open (or create) the policy database at `path`.
    pub fn open(path: &str) -> RehabResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RehabResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RehabResult<()> {
        self.conn
            .execute_batch(include_str!("../migrations/001_policy_snapshot.sql"))?;
        Ok(())
    }

    // ── Publish ────────────────────────────────────────────────

    /// Validate and store `policy` as a new snapshot for its base year.
    /// Returns the snapshot id.
    pub fn publish(&self, policy: &PolicyConfig) -> RehabResult<String> {
        policy.validate()?;
        let snapshot_id = Uuid::new_v4().to_string();
        let json = serde_json::to_string(policy)?;
        self.conn.execute(
            "INSERT INTO policy_snapshot (snapshot_id, base_year, policy_json, published_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![snapshot_id, policy.base_year, json, Utc::now().to_rfc3339()],
        )?;
        log::info!("policy store: published {} as {snapshot_id}", policy.base_year);
        Ok(snapshot_id)
    }

    // ── Lookup ─────────────────────────────────────────────────

    /// Newest snapshot for exactly `year`.
    pub fn policy_for_year(&self, year: i32) -> RehabResult<Option<PolicyConfig>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT policy_json FROM policy_snapshot
                 WHERE base_year = ?1 ORDER BY seq DESC LIMIT 1",
                params![year],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(RehabError::from))
            .transpose()
    }

    /// Distinct years with at least one snapshot, ascending.
    pub fn years(&self) -> RehabResult<Vec<i32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT base_year FROM policy_snapshot ORDER BY base_year ASC")?;
        let years = stmt
            .query_map([], |row| row.get::<_, i32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(years)
    }

    pub fn snapshot_count(&self, year: i32) -> RehabResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM policy_snapshot WHERE base_year = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn resolve_year(&self, year: i32) -> RehabResult<Option<i32>> {
        let at_or_before: Option<i32> = self.conn.query_row(
            "SELECT MAX(base_year) FROM policy_snapshot WHERE base_year <= ?1",
            params![year],
            |row| row.get(0),
        )?;
        if at_or_before.is_some() {
            return Ok(at_or_before);
        }
        let earliest: Option<i32> =
            self.conn
                .query_row("SELECT MIN(base_year) FROM policy_snapshot", [], |row| row.get(0))?;
        Ok(earliest)
    }
}

impl PolicyResolver for PolicyStore {
    fn policy_for_date(&self, date: NaiveDate) -> RehabResult<Arc<PolicyConfig>> {
        let year = date.year();
        let resolved = self
            .resolve_year(year)?
            .ok_or(RehabError::PolicyNotFound { date })?;
        if resolved != year {
            log::warn!("policy store: no {year} policy, using {resolved}");
        }
        let policy = self
            .policy_for_year(resolved)?
            .ok_or(RehabError::PolicyNotFound { date })?;
        Ok(Arc::new(policy))
    }
}
