//! Exchange API client: account state queries and signed order placement.

use chrono::Utc;
use k256::ecdsa::SigningKey;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::wallet::{evm_address, keccak256};

/// Lowercase an EVM address and drop its `0x` prefix, as the exchange API
/// expects user fields.
pub fn normalize_address(address: &str) -> String {
    address.to_lowercase().trim_start_matches("0x").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub size: f64,
    pub entry_price: f64,
    pub unrealized_pnl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    pub address: String,
    pub positions: Vec<Position>,
    pub total_unrealized_pnl: f64,
}

/// Parameters for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub is_buy: bool,
    /// Position size in USD
    pub size: f64,
    /// Limit price; `None` places a market order
    pub price: Option<f64>,
    pub reduce_only: bool,
}

#[derive(Clone)]
pub struct ExchangeClient {
    pub base_url: String,
    client: Client,
}

impl ExchangeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Clearinghouse state for a user: balances, margin, asset positions.
    pub async fn user_state(&self, address: &str) -> Result<Value> {
        self.info(&json!({
            "type": "clearinghouseState",
            "user": normalize_address(address),
        }))
        .await
    }

    /// Open positions derived from the clearinghouse state.
    pub async fn positions(&self, address: &str) -> Result<PositionSummary> {
        let state = self.user_state(address).await?;
        Ok(parse_positions(address, &state))
    }

    /// Resting orders for a user.
    pub async fn open_orders(&self, address: &str) -> Result<Vec<Value>> {
        let orders = self
            .info(&json!({
                "type": "openOrders",
                "user": normalize_address(address),
            }))
            .await?;
        Ok(orders.as_array().cloned().unwrap_or_default())
    }

    /// Most recent fills for a user.
    pub async fn trade_history(&self, address: &str, limit: usize) -> Result<Vec<Value>> {
        let fills = self
            .info(&json!({
                "type": "userFills",
                "user": normalize_address(address),
            }))
            .await?;
        let fills = fills.as_array().cloned().unwrap_or_default();
        Ok(fills.into_iter().take(limit).collect())
    }

    /// Place an order signed with the account key.
    pub async fn place_order(&self, private_key_hex: &str, order: &OrderRequest) -> Result<Value> {
        let key = parse_private_key(private_key_hex)?;
        let user = normalize_address(&evm_address(key.verifying_key()));

        let args = json!({
            "user": user,
            "coin": order.symbol,
            "is_buy": order.is_buy,
            "sz": order.size.to_string(),
            "limit_px": order.price.map(|p| p.to_string()).unwrap_or_else(|| "0".to_string()),
            "reduce_only": order.reduce_only,
            "timestamp": Utc::now().timestamp_millis(),
        });
        let signature = sign_action(&args, &key)?;

        self.exchange(&json!({
            "action": "order",
            "args": args,
            "signature": signature,
        }))
        .await
    }

    /// Cancel a resting order signed with the account key.
    pub async fn cancel_order(&self, private_key_hex: &str, order_id: &str) -> Result<Value> {
        let key = parse_private_key(private_key_hex)?;
        let user = normalize_address(&evm_address(key.verifying_key()));

        let args = json!({
            "user": user,
            "oid": order_id,
            "timestamp": Utc::now().timestamp_millis(),
        });
        let signature = sign_action(&args, &key)?;

        self.exchange(&json!({
            "action": "cancel",
            "args": args,
            "signature": signature,
        }))
        .await
    }

    async fn info(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/info", self.base_url);
        let value = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn exchange(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/exchange", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Exchange(format!("API error {}: {}", status, text)));
        }
        Ok(response.json().await?)
    }
}

/// EIP-191 personal-message signature over the compact JSON serialization of
/// `args`, hex-encoded as `r||s||v` with the Ethereum 27/28 recovery byte.
fn sign_action(args: &Value, key: &SigningKey) -> Result<String> {
    let msg = serde_json::to_string(args)?;
    let prefixed = format!("\x19Ethereum Signed Message:\n{}{}", msg.len(), msg);
    let digest = keccak256(prefixed.as_bytes());

    let (sig, recovery_id) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| Error::Exchange(format!("signing failed: {}", e)))?;

    let mut out = [0u8; 65];
    out[..64].copy_from_slice(sig.to_bytes().as_slice());
    out[64] = recovery_id.to_byte() + 27;
    Ok(format!("0x{}", hex::encode(out)))
}

fn parse_private_key(private_key_hex: &str) -> Result<SigningKey> {
    let bytes = hex::decode(private_key_hex.trim_start_matches("0x"))
        .map_err(|_| Error::Key("private key is not valid hex".to_string()))?;
    SigningKey::from_slice(&bytes)
        .map_err(|_| Error::Key("invalid secp256k1 private key".to_string()))
}

fn parse_positions(address: &str, state: &Value) -> PositionSummary {
    let mut positions = Vec::new();
    let mut total_unrealized_pnl = 0.0;

    if let Some(asset_positions) = state.get("assetPositions").and_then(Value::as_array) {
        for entry in asset_positions {
            let Some(position) = entry.get("position").and_then(Value::as_object) else {
                continue;
            };
            let size = num_field(position, "szi");
            if size == 0.0 {
                continue;
            }

            let unrealized_pnl = num_field(position, "unrealizedPnl");
            total_unrealized_pnl += unrealized_pnl;

            positions.push(Position {
                symbol: position
                    .get("coin")
                    .and_then(Value::as_str)
                    .unwrap_or("UNKNOWN")
                    .to_string(),
                side: if size > 0.0 { Side::Long } else { Side::Short },
                size: size.abs(),
                entry_price: num_field(position, "entryPx"),
                unrealized_pnl,
            });
        }
    }

    PositionSummary {
        address: normalize_address(address),
        positions,
        total_unrealized_pnl,
    }
}

// Numeric fields arrive as decimal strings.
fn num_field(obj: &serde_json::Map<String, Value>, key: &str) -> f64 {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xAbCd000000000000000000000000000000000001"),
            "abcd000000000000000000000000000000000001"
        );
        assert_eq!(normalize_address("abcd"), "abcd");
    }

    #[test]
    fn test_sign_action_shape() {
        let mut key_bytes = [0u8; 32];
        key_bytes[31] = 1;
        let key = SigningKey::from_slice(&key_bytes).unwrap();

        let args = json!({"user": "abc", "coin": "BTC"});
        let sig = sign_action(&args, &key).unwrap();

        assert!(sig.starts_with("0x"));
        assert_eq!(sig.len(), 132);
        let bytes = hex::decode(&sig[2..]).unwrap();
        assert!(bytes[64] == 27 || bytes[64] == 28);
    }

    #[test]
    fn test_sign_action_is_deterministic() {
        let mut key_bytes = [0u8; 32];
        key_bytes[31] = 7;
        let key = SigningKey::from_slice(&key_bytes).unwrap();

        let args = json!({"user": "abc", "oid": "42"});
        assert_eq!(
            sign_action(&args, &key).unwrap(),
            sign_action(&args, &key).unwrap()
        );
    }

    #[test]
    fn test_parse_positions() {
        let state = json!({
            "assetPositions": [
                {
                    "position": {
                        "coin": "ETH",
                        "szi": "2.5",
                        "entryPx": "3000.0",
                        "unrealizedPnl": "120.5",
                        "positionValue": "7500.0"
                    }
                },
                {
                    "position": {
                        "coin": "BTC",
                        "szi": "-0.1",
                        "entryPx": "60000.0",
                        "unrealizedPnl": "-50.0"
                    }
                },
                {
                    "position": { "coin": "SOL", "szi": "0" }
                }
            ]
        });

        let summary = parse_positions("0xABC", &state);
        assert_eq!(summary.address, "abc");
        assert_eq!(summary.positions.len(), 2);

        assert_eq!(summary.positions[0].symbol, "ETH");
        assert_eq!(summary.positions[0].side, Side::Long);
        assert_eq!(summary.positions[0].size, 2.5);

        assert_eq!(summary.positions[1].symbol, "BTC");
        assert_eq!(summary.positions[1].side, Side::Short);
        assert_eq!(summary.positions[1].size, 0.1);

        assert!((summary.total_unrealized_pnl - 70.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_positions_empty_state() {
        let summary = parse_positions("0xabc", &json!({}));
        assert!(summary.positions.is_empty());
        assert_eq!(summary.total_unrealized_pnl, 0.0);
    }

    #[test]
    fn test_parse_private_key_rejects_garbage() {
        assert!(parse_private_key("nothex").is_err());
        assert!(parse_private_key("0x00").is_err());
    }
}
