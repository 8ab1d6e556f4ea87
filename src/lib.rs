pub mod api;
pub mod config;
pub mod error;
pub mod exchange;
pub mod guardian;
pub mod market;
pub mod proposal;
pub mod unit;
pub mod wallet;

pub use config::Settings;
pub use error::{Error, Result};
pub use guardian::{GuardianNode, GuardianSet, ThresholdVerifier, VerificationResult};
pub use proposal::Proposal;
pub use unit::UnitClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::guardian::{GuardianNode, GuardianSet, ThresholdVerifier, VerificationResult};
    pub use crate::proposal::Proposal;
    pub use crate::unit::UnitClient;
    pub use crate::wallet::{EvmWallet, SolanaWallet};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
