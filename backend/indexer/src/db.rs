//! Database layer — migrations, queries, and cursor management.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::{IndexerError, Result};
use crate::events::{EscrowEvent, EventRecord};
use crate::rpc::Position;

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    // Create the file if it doesn't exist yet.
    let url = if url.contains('?') || url.contains(":memory:") {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Scan position
// ─────────────────────────────────────────────────────────

/// Where the previous run stopped, or `start_ledger` on a fresh database.
pub async fn load_position(pool: &SqlitePool, start_ledger: u32) -> Result<Position> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;

    let Some((last_ledger, cursor)) = row else {
        return Ok(Position::at_ledger(start_ledger));
    };
    let ledger = if last_ledger > 0 {
        u32::try_from(last_ledger).map_err(|_| IndexerError::CorruptCursor(last_ledger))?
    } else {
        start_ledger
    };
    Ok(Position { ledger, cursor })
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a decoded page and the position after it in one transaction.
///
/// Events whose RPC id is already stored are skipped, so re-reading a page
/// after a crash or a cursor reset is harmless. Returns the number of new rows.
pub async fn store_page(pool: &SqlitePool, events: &[EscrowEvent], next: &Position) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO events
                (event_id, event_type, actor, amount, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }

    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(i64::from(next.ledger))
        .bind(next.cursor.as_deref())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events for one address (contributor or beneficiary), ordered by ledger.
pub async fn get_events_for_actor(pool: &SqlitePool, actor: &str) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, actor, amount, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        WHERE  actor = ?1
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .bind(actor)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, actor, amount, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
