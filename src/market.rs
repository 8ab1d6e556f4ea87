//! Market-data client over the exchange info API.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// How long a fetched symbol universe stays valid.
const SYMBOL_TTL: Duration = Duration::from_secs(300);

/// Cached symbol universe with an explicit expiry timestamp.
///
/// Owned by the client and refreshed under its lock; the lock is held across
/// the refill so concurrent callers cannot race duplicate fetches.
struct SymbolCache {
    symbols: Vec<String>,
    refreshed_at: Option<Instant>,
    ttl: Duration,
}

impl SymbolCache {
    fn new(ttl: Duration) -> Self {
        Self {
            symbols: Vec::new(),
            refreshed_at: None,
            ttl,
        }
    }

    fn is_stale(&self) -> bool {
        match self.refreshed_at {
            Some(at) => at.elapsed() >= self.ttl,
            None => true,
        }
    }
}

pub struct MarketClient {
    pub base_url: String,
    client: Client,
    cache: Mutex<SymbolCache>,
}

#[derive(Debug, Deserialize)]
struct MetaResponse {
    universe: Vec<UniverseEntry>,
}

#[derive(Debug, Deserialize)]
struct UniverseEntry {
    name: String,
}

impl MarketClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            cache: Mutex::new(SymbolCache::new(SYMBOL_TTL)),
        }
    }

    /// Symbol for a market index, refreshing the cached universe when stale.
    pub async fn symbol_for(&self, market_id: u32) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if cache.is_stale() {
            let meta = self.fetch_meta().await?;
            cache.symbols = meta.universe.into_iter().map(|u| u.name).collect();
            cache.refreshed_at = Some(Instant::now());
            tracing::debug!(count = cache.symbols.len(), "symbol universe refreshed");
        }

        cache
            .symbols
            .get(market_id as usize)
            .cloned()
            .ok_or_else(|| Error::Market(format!("unknown market id {}", market_id)))
    }

    /// Current mid price for a symbol.
    pub async fn mid_price(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/info", self.base_url);
        let mids: HashMap<String, String> = self
            .client
            .post(&url)
            .json(&json!({ "type": "allMids" }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let raw = mids
            .get(symbol)
            .ok_or_else(|| Error::Market(format!("no mid price for {}", symbol)))?;
        raw.parse::<f64>()
            .map_err(|_| Error::Market(format!("unparseable mid price for {}: {}", symbol, raw)))
    }

    /// Price for a market index: cached symbol lookup plus a mid fetch.
    pub async fn price_for(&self, market_id: u32) -> Result<(String, f64)> {
        let symbol = self.symbol_for(market_id).await?;
        let price = self.mid_price(&symbol).await?;
        Ok((symbol, price))
    }

    async fn fetch_meta(&self) -> Result<MetaResponse> {
        let url = format!("{}/info", self.base_url);
        let meta = self
            .client
            .post(&url)
            .json(&json!({ "type": "meta" }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = SymbolCache::new(Duration::from_secs(300));
        assert!(cache.is_stale());
    }

    #[test]
    fn test_fresh_cache_is_not_stale() {
        let mut cache = SymbolCache::new(Duration::from_secs(300));
        cache.symbols = vec!["BTC".to_string()];
        cache.refreshed_at = Some(Instant::now());
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = SymbolCache::new(Duration::ZERO);
        cache.refreshed_at = Some(Instant::now());
        assert!(cache.is_stale());
    }

    #[test]
    fn test_meta_response_parses() {
        let json = r#"{"universe": [{"name": "BTC", "szDecimals": 5}, {"name": "ETH", "szDecimals": 4}]}"#;
        let parsed: MetaResponse = serde_json::from_str(json).unwrap();
        let symbols: Vec<String> = parsed.universe.into_iter().map(|u| u.name).collect();
        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }
}
