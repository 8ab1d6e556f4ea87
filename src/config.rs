use std::env;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Exchange REST API (info + exchange endpoints)
    pub hyperliquid_api_url: String,
    /// Custody network API that generates deposit addresses
    pub hyperunit_api_url: String,
    /// EVM JSON-RPC endpoint
    pub hyperevm_rpc_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment, reading `.env` first if
    /// one is present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            hyperliquid_api_url: env_or("HYPERLIQUID_API_URL", "https://api.hyperliquid.xyz"),
            hyperunit_api_url: env_or("HYPERUNIT_API_URL", "https://api.hyperunit.xyz"),
            hyperevm_rpc_url: env_or("HYPEREVM_RPC_URL", "https://rpc.hyperliquid.xyz/evm"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8000"),
            log_level: env_or("LOG_LEVEL", "info"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
