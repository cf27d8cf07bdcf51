//! Application configuration loaded from environment variables.

use std::str::FromStr;

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The escrow contract address (Strkey format)
    pub contract_id: String,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            rpc_url: lookup("RPC_URL")
                .unwrap_or_else(|| "https://soroban-testnet.stellar.org".to_string()),
            contract_id: lookup("CONTRACT_ID").ok_or_else(|| {
                IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
            })?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./escrow_events.db".to_string()),
            api_port: parse_or(&lookup, "API_PORT", 3001)?,
            poll_interval_secs: parse_or(&lookup, "POLL_INTERVAL_SECS", 5)?,
            events_per_page: parse_or(&lookup, "EVENTS_PER_PAGE", 100)?,
            start_ledger: parse_or(&lookup, "START_LEDGER", 0)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| IndexerError::Config(format!("Invalid {key}: {raw:?}"))),
    }
}
