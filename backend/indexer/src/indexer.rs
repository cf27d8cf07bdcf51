//! Long-running background task that pages through the escrow contract's
//! events and writes them to the database.

use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc::{self, EventSource, Position};

pub struct Indexer {
    pool: SqlitePool,
    source: EventSource,
    poll_interval: Duration,
}

impl Indexer {
    pub fn new(pool: SqlitePool, client: Client, config: &Config) -> Self {
        Self {
            pool,
            source: EventSource::new(client, config),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        }
    }

    /// Poll from `position` until `shutdown` is cancelled.
    ///
    /// A failed poll is logged and retried from the same position on the
    /// next tick.
    pub async fn run(self, mut position: Position, shutdown: CancellationToken) {
        info!(
            "Indexer starting — contract: {}, ledger: {}",
            self.source.contract_id(),
            position.ledger
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.poll(&position) => match result {
                    Ok(next) => position = next,
                    Err(e) => error!("Indexer poll error at ledger {}: {e}", position.ledger),
                },
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("Indexer stopped at ledger {}", position.ledger);
    }

    async fn poll(&self, from: &Position) -> Result<Position> {
        let page = self.source.next_page(from).await?;
        let decoded = rpc::decode_events(&page.events, self.source.contract_id());
        let stored = db::store_page(&self.pool, &decoded, &page.next).await?;

        if !page.events.is_empty() {
            info!(
                "Polled {} raw events → {} new records stored",
                page.events.len(),
                stored
            );
        }
        Ok(page.next)
    }
}
