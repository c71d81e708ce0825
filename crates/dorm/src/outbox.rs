//! Local outbox of produced intents
//!
//! Uses SQLite. The backend remains the authority; this only records what was
//! sent its way.

use chrono::{DateTime, Utc};
use dorm_core::{BedId, Intent, IntentAction, OccupantId, RoomId};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::debug;

use crate::{Error, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS intents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    action TEXT NOT NULL,
    room_id TEXT NOT NULL,
    bed_id TEXT NOT NULL,
    occupant_id TEXT,
    recorded_at TEXT NOT NULL
)";

type IntentRow = (i64, String, String, String, Option<String>, String);

/// An intent as stored in the outbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedIntent {
    pub id: i64,
    #[serde(flatten)]
    pub intent: Intent,
    pub recorded_at: DateTime<Utc>,
}

pub struct Outbox {
    pool: SqlitePool,
}

impl Outbox {
    /// Open (creating if needed) the outbox database at `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or migrated.
    pub async fn connect(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }
        let pool = SqlitePool::connect(&format!("sqlite:{path}?mode=rwc")).await?;
        Self::migrate(pool).await
    }

    /// Private in-memory outbox.
    ///
    /// # Errors
    ///
    /// Returns error if SQLite cannot be initialised.
    pub async fn in_memory() -> Result<Self> {
        // One connection, otherwise each connection sees its own empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Append an intent, returning its outbox id.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    pub async fn record(&self, intent: &Intent) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO intents (action, room_id, bed_id, occupant_id, recorded_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(intent.action.to_string())
        .bind(intent.room_id.as_str())
        .bind(intent.bed_id.as_str())
        .bind(intent.occupant_id.as_ref().map(OccupantId::as_str))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, action = %intent.action, bed = %intent.bed_id, "recorded intent");
        Ok(id)
    }

    /// All recorded intents, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or a stored row is malformed.
    pub async fn list(&self) -> Result<Vec<RecordedIntent>> {
        let rows: Vec<IntentRow> = sqlx::query_as(
            "SELECT id, action, room_id, bed_id, occupant_id, recorded_at
             FROM intents ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }
}

fn decode_row(row: IntentRow) -> Result<RecordedIntent> {
    let (id, action, room_id, bed_id, occupant_id, recorded_at) = row;
    let action: IntentAction = action.parse()?;
    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
        .map_err(|e| Error::Parse(format!("Invalid timestamp on intent {id}: {e}")))?
        .with_timezone(&Utc);

    Ok(RecordedIntent {
        id,
        intent: Intent::new(
            action,
            RoomId::new(room_id),
            BedId::new(bed_id),
            occupant_id.map(OccupantId::new),
        ),
        recorded_at,
    })
}
