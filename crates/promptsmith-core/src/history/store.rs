//! SQLite-backed request log.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS prompt_requests (
    id TEXT PRIMARY KEY,
    business_description TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS generated_prompts (
    id TEXT PRIMARY KEY,
    request_id TEXT NOT NULL REFERENCES prompt_requests(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_generated_prompts_request
    ON generated_prompts(request_id);
"#;

// ─────────────────────────────────────────────
// Errors & records
// ─────────────────────────────────────────────

/// Errors raised by the request log.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// A stored prompt belonging to a [`LoggedRequest`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LoggedPrompt {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A stored generation request with its prompts in generation order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LoggedRequest {
    pub id: Uuid,
    pub business: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub prompts: Vec<LoggedPrompt>,
}

// ─────────────────────────────────────────────
// HistoryStore
// ─────────────────────────────────────────────

/// Request log over a single SQLite connection.
///
/// The connection sits behind a `Mutex`; every public method holds the lock
/// for the duration of one statement or transaction. Methods are blocking,
/// so async callers should go through `spawn_blocking`.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}

impl HistoryStore {
    /// Open (or create) the log at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!(path = %path.display(), "request log opened");
        Self::init(conn)
    }

    /// In-memory log, used by tests and `--no-history` runs.
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        // Cascade deletes depend on this being set per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a request and its prompts atomically.
    pub fn record(
        &self,
        business: &str,
        role: &str,
        prompts: &[String],
    ) -> Result<LoggedRequest, HistoryError> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let id = Uuid::new_v4();
        // Fixed-width timestamps keep ORDER BY created_at chronological.
        let created_str = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let created_at = parse_time(&created_str)?;

        tx.execute(
            "INSERT INTO prompt_requests (id, business_description, role, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), business, role, created_str],
        )?;

        let mut logged = Vec::with_capacity(prompts.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO generated_prompts (id, request_id, position, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, content) in prompts.iter().enumerate() {
                let prompt_id = Uuid::new_v4();
                stmt.execute(params![
                    prompt_id.to_string(),
                    id.to_string(),
                    position as i64,
                    content,
                    created_str
                ])?;
                logged.push(LoggedPrompt {
                    id: prompt_id,
                    content: content.clone(),
                    created_at,
                });
            }
        }

        tx.commit()?;
        debug!(request_id = %id, prompts = logged.len(), "request logged");

        Ok(LoggedRequest {
            id,
            business: business.to_string(),
            role: role.to_string(),
            created_at,
            prompts: logged,
        })
    }

    /// Most recent requests first, at most `limit` of them.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<LoggedRequest>, HistoryError> {
        let conn = self.lock();
        let rows = {
            let mut stmt = conn.prepare(
                "SELECT id, business_description, role, created_at
                 FROM prompt_requests
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![limit as i64], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter()
            .map(|(id, business, role, created_at)| {
                let id = parse_uuid(&id)?;
                Ok(LoggedRequest {
                    id,
                    business,
                    role,
                    created_at: parse_time(&created_at)?,
                    prompts: load_prompts(&conn, id)?,
                })
            })
            .collect()
    }

    /// One request by id, with its prompts.
    pub fn get(&self, id: Uuid) -> Result<Option<LoggedRequest>, HistoryError> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT business_description, role, created_at
                 FROM prompt_requests WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((business, role, created_at)) = row else {
            return Ok(None);
        };

        Ok(Some(LoggedRequest {
            id,
            business,
            role,
            created_at: parse_time(&created_at)?,
            prompts: load_prompts(&conn, id)?,
        }))
    }

    /// Delete a request; its prompts go with it.
    ///
    /// Returns `true` if the request existed.
    pub fn delete(&self, id: Uuid) -> Result<bool, HistoryError> {
        let conn = self.lock();
        let removed = conn.execute(
            "DELETE FROM prompt_requests WHERE id = ?1",
            params![id.to_string()],
        )?;
        debug!(request_id = %id, removed, "request log delete");
        Ok(removed > 0)
    }

    /// Number of logged requests.
    pub fn count(&self) -> Result<u64, HistoryError> {
        let conn = self.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM prompt_requests", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

fn load_prompts(conn: &Connection, request_id: Uuid) -> Result<Vec<LoggedPrompt>, HistoryError> {
    let mut stmt = conn.prepare(
        "SELECT id, content, created_at FROM generated_prompts
         WHERE request_id = ?1 ORDER BY position ASC",
    )?;
    let rows = stmt
        .query_map(params![request_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, content, created_at)| {
            Ok(LoggedPrompt {
                id: parse_uuid(&id)?,
                content,
                created_at: parse_time(&created_at)?,
            })
        })
        .collect()
}

fn parse_uuid(raw: &str) -> Result<Uuid, HistoryError> {
    Uuid::parse_str(raw).map_err(|e| HistoryError::Corrupt(format!("bad id '{raw}': {e}")))
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, HistoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| HistoryError::Corrupt(format!("bad timestamp '{raw}': {e}")))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
