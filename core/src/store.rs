//! SQLite persistence for finished reports.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches storage; callers hand it finished reports.

use crate::{
    config::AnalysisParams,
    engine::RfmReport,
    error::{RfmError, RfmResult},
    snapshot::{ReportSnapshot, SNAPSHOT_FORMAT},
};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

/// Listing entry for one stored report version.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotHeader {
    pub params_key:   String,
    pub version:      u32,
    pub generated_at: String,
    pub client_count: usize,
}

pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open (or create) the report database at `path`.
    pub fn open(path: &str) -> RfmResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RfmResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RfmResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_reports.sql"))?;
        Ok(())
    }

    // ── Reports ────────────────────────────────────────────────

    /// Store `report` as the next version for (analysis_id, params).
    /// Versions start at 1. Returns the version written.
    pub fn save_report(
        &self,
        analysis_id: &str,
        params: &AnalysisParams,
        report: &RfmReport,
        generated_at: NaiveDateTime,
    ) -> RfmResult<u32> {
        let params_key = params.storage_key();
        let version: u32 = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM report_snapshot
             WHERE analysis_id = ?1 AND params_key = ?2",
            params![analysis_id, params_key],
            |row| row.get(0),
        )?;

        let snapshot = ReportSnapshot {
            analysis_id: analysis_id.to_string(),
            version,
            format: SNAPSHOT_FORMAT,
            params: params.clone(),
            generated_at,
            report: report.clone(),
        };

        self.conn.execute(
            "INSERT INTO report_snapshot (
                analysis_id, params_key, version, params, generated_at, client_count, payload
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                analysis_id,
                params_key,
                version,
                serde_json::to_string(params)?,
                generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
                report.clients.len() as i64,
                serde_json::to_string(&snapshot)?,
            ],
        )?;
        log::debug!("stored report {analysis_id} [{params_key}] v{version}");
        Ok(version)
    }

    /// Most recent version stored for (analysis_id, params).
    pub fn latest_report(
        &self,
        analysis_id: &str,
        params: &AnalysisParams,
    ) -> RfmResult<ReportSnapshot> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM report_snapshot
                 WHERE analysis_id = ?1 AND params_key = ?2
                 ORDER BY version DESC LIMIT 1",
                params![analysis_id, params.storage_key()],
                |row| row.get(0),
            )
            .optional()?;

        let payload = payload.ok_or_else(|| RfmError::SnapshotNotFound {
            analysis_id: analysis_id.to_string(),
        })?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Every stored version for an analysis, oldest first.
    pub fn report_versions(&self, analysis_id: &str) -> RfmResult<Vec<SnapshotHeader>> {
        let mut stmt = self.conn.prepare(
            "SELECT params_key, version, generated_at, client_count
             FROM report_snapshot WHERE analysis_id = ?1
             ORDER BY params_key, version",
        )?;
        let rows = stmt.query_map(params![analysis_id], |row| {
            Ok(SnapshotHeader {
                params_key:   row.get(0)?,
                version:      row.get(1)?,
                generated_at: row.get(2)?,
                client_count: row.get::<_, i64>(3)? as usize,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
