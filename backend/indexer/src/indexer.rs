//! Background task that follows the contract's event stream.
//!
//! Each tick fetches one `getEvents` page, stores the decoded events and
//! persists the resume position in the same database, so a restart picks up
//! where the last successful tick stopped.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next `getEvents` call starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    ledger: u32,
    cursor: Option<String>,
}

impl Position {
    /// Resume from the stored cursor row, or from `START_LEDGER` on a fresh
    /// database.
    async fn load(pool: &SqlitePool, config: &Config) -> Self {
        let ledger = match db::get_last_ledger(pool).await {
            Ok(l) if l > 0 => u32::try_from(l).unwrap_or(config.start_ledger),
            Ok(_) => config.start_ledger,
            Err(e) => {
                warn!("Could not read stored ledger, starting from config: {e}");
                config.start_ledger
            }
        };
        let cursor = db::get_cursor_string(pool).await.unwrap_or_else(|e| {
            warn!("Could not read stored cursor: {e}");
            None
        });
        Self { ledger, cursor }
    }

    /// Position after a page. A returned cursor keeps paging the same range;
    /// the ledger only moves forward.
    fn advance(&self, page_cursor: Option<String>, latest_ledger: Option<u64>) -> Self {
        let ledger = latest_ledger
            .and_then(|l| u32::try_from(l).ok())
            .map_or(self.ledger, |l| l.max(self.ledger));
        Self {
            ledger,
            cursor: page_cursor,
        }
    }
}

/// Run until `shutdown` fires. Poll errors are logged and retried on the
/// next tick from the unchanged position.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting for contract {}", state.config.contract_id);

    let mut position = Position::load(&state.pool, &state.config).await;
    info!("Resuming from ledger {}", position.ledger);

    let interval = Duration::from_secs(state.config.poll_interval_secs);
    loop {
        let tick = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = poll_once(&state, &position) => result,
        };
        match tick {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Indexer stopped at ledger {}", position.ledger);
}

async fn poll_once(state: &IndexerState, position: &Position) -> crate::errors::Result<Position> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Stored {inserted} new of {} fetched events ({} decoded)",
            page.events.len(),
            decoded.len()
        );
    }

    let next = position.advance(page.cursor, page.latest_ledger);
    db::save_cursor(&state.pool, i64::from(next.ledger), next.cursor.as_deref()).await?;
    Ok(next)
}
