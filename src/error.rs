use crate::guardian::{ConfigError, VerificationResult};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Guardian roster error: {0}")]
    Config(#[from] ConfigError),

    #[error("Deposit address rejected by guardian quorum ({} signatures verified)", .result.verified_count)]
    AddressRejected { result: Box<VerificationResult> },

    #[error("Exchange error: {0}")]
    Exchange(String),

    #[error("Market data unavailable: {0}")]
    Market(String),

    #[error("Invalid key material: {0}")]
    Key(String),
}
