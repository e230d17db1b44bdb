//! services/client/src/resources/symbols.rs
//!
//! Watch-list calls against `/api/market/plot`, plus a small cache that keeps
//! the local list in step with the last successful mutation.

use serde_json::{json, Value};
use signal_client_core::domain::SymbolEntry;
use signal_client_core::validation;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::request::{ApiClient, Envelope, RequestOptions};
use crate::resources::wire::SymbolPayload;

pub const WATCHLIST_ENDPOINT: &str = "/api/market/plot";

fn normalize_symbol(symbol: &str) -> ClientResult<String> {
    validation::require("symbol", symbol)?;
    Ok(symbol.trim().to_lowercase())
}

impl ApiClient {
    pub async fn list_symbols(&self) -> ClientResult<Vec<SymbolEntry>> {
        let payload: Option<Vec<SymbolPayload>> = self
            .send(WATCHLIST_ENDPOINT, RequestOptions::get(), true)
            .await?;
        Ok(payload
            .unwrap_or_default()
            .into_iter()
            .map(SymbolPayload::to_domain)
            .collect())
    }

    /// Adds `symbol` (lowercased) to the watch-list.
    pub async fn add_symbol(&self, symbol: &str) -> ClientResult<()> {
        let symbol = normalize_symbol(symbol)?;
        self.send::<Value>(
            WATCHLIST_ENDPOINT,
            RequestOptions::post().body(json!({ "symbol": symbol })),
            true,
        )
        .await?;
        Ok(())
    }

    /// Removes `symbol` (lowercased) from the watch-list.
    ///
    /// Unlike the other calls this returns the whole envelope, not just `data`,
    /// so callers can show the raw server response.
    pub async fn delete_symbol(&self, symbol: &str) -> ClientResult<Envelope> {
        let symbol = normalize_symbol(symbol)?;
        let token = self.session().token().ok_or(ClientError::MissingCredentials)?;

        let request = self.build_request(
            WATCHLIST_ENDPOINT,
            RequestOptions::delete().body(json!({ "symbol": symbol })),
            Some(&token),
        );
        self.dispatch(request).await
    }
}

//=========================================================================================
// Watchlist Cache
//=========================================================================================

/// The in-memory copy of the user's watch-list.
///
/// Adds re-fetch the list; deletes remove the entry locally once the server
/// has confirmed them.
pub struct Watchlist {
    client: ApiClient,
    entries: Vec<SymbolEntry>,
}

impl Watchlist {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_lowercase();
        self.entries.iter().any(|entry| entry.symbol == symbol)
    }

    /// Replaces the cache with the server's current list.
    pub async fn refresh(&mut self) -> ClientResult<&[SymbolEntry]> {
        self.entries = self.client.list_symbols().await?;
        Ok(&self.entries)
    }

    pub async fn add(&mut self, symbol: &str) -> ClientResult<&[SymbolEntry]> {
        self.client.add_symbol(symbol).await?;
        self.refresh().await
    }

    /// Deletes `symbol` and drops it from the cache. The cache is untouched on failure.
    pub async fn remove(&mut self, symbol: &str) -> ClientResult<Envelope> {
        let envelope = self.client.delete_symbol(symbol).await?;
        let symbol = symbol.trim().to_lowercase();
        self.entries.retain(|entry| entry.symbol != symbol);
        debug!(%symbol, remaining = self.entries.len(), "symbol removed from watch-list");
        Ok(envelope)
    }
}
