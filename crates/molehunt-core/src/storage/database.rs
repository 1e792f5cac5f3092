//! SQLite-based score storage.
//!
//! Provides persistent storage for:
//! - Final session scores (the local leaderboard)
//! - A key-value store for application state (the serialized engine)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;

use super::data_dir;

/// One finished session on the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub player_name: String,
    pub score: u32,
    pub level: u32,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate leaderboard statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreStats {
    pub total_games: u64,
    pub best_score: u32,
    pub total_hits: u64,
    pub today_games: u64,
}

/// SQLite database for score storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/molehunt/molehunt.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?
            .join("molehunt.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests, ephemeral sessions).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS scores (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    player_name TEXT NOT NULL,
                    score       INTEGER NOT NULL,
                    level       INTEGER NOT NULL DEFAULT 1,
                    difficulty  TEXT NOT NULL,
                    created_at  TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Record a finished session. Returns the new row id.
    pub fn insert_score(
        &self,
        player_name: &str,
        score: u32,
        level: u32,
        difficulty: &str,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO scores (player_name, score, level, difficulty, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                player_name,
                score,
                level,
                difficulty,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Best scores first, newest breaking ties.
    pub fn top_scores(&self, limit: u32) -> Result<Vec<ScoreRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, player_name, score, level, difficulty, created_at
             FROM scores ORDER BY score DESC, created_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            let created_at: String = row.get(5)?;
            Ok(ScoreRecord {
                id: row.get(0)?,
                player_name: row.get(1)?,
                score: row.get(2)?,
                level: row.get(3)?,
                difficulty: row.get(4)?,
                created_at: created_at
                    .parse::<DateTime<Utc>>()
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Aggregate statistics over all recorded games.
    pub fn stats(&self) -> Result<ScoreStats, DatabaseError> {
        let (total_games, best_score, total_hits) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(MAX(score), 0), COALESCE(SUM(score), 0) FROM scores",
            [],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            },
        )?;
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let today_games = self.conn.query_row(
            "SELECT COUNT(*) FROM scores WHERE created_at LIKE ?1 || '%'",
            params![today],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(ScoreStats {
            total_games,
            best_score,
            total_hits,
            today_games,
        })
    }

    /// Delete all recorded scores.
    pub fn clear_scores(&self) -> Result<usize, DatabaseError> {
        Ok(self.conn.execute("DELETE FROM scores", [])?)
    }

    /// Get a value from the key-value store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the key-value store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
