use serde::{Deserialize, Serialize};

/// One custody-network deposit-address claim, as attested by guardians.
///
/// Every field is attacker-observable plaintext extracted from the proposer's
/// response (or generated locally, for the destination address). The verifier
/// only ever hashes these values; they are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// User wallet address on the destination chain
    pub destination_address: String,
    /// Destination chain identifier (e.g. "hyperliquid")
    pub destination_chain: String,
    /// Asset identifier (e.g. "eth", "sol")
    pub asset: String,
    /// The proposed deposit (protocol) address being attested
    pub address: String,
    /// Source chain identifier (e.g. "ethereum", "solana")
    pub source_chain: String,
    /// Coin type tag; "ethereum" pins the user payload scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_type: Option<String>,
}

impl Proposal {
    pub fn new(
        destination_address: impl Into<String>,
        destination_chain: impl Into<String>,
        asset: impl Into<String>,
        address: impl Into<String>,
        source_chain: impl Into<String>,
    ) -> Self {
        Self {
            destination_address: destination_address.into(),
            destination_chain: destination_chain.into(),
            asset: asset.into(),
            address: address.into(),
            source_chain: source_chain.into(),
            coin_type: None,
        }
    }

    pub fn with_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = Some(coin_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposal_builder() {
        let proposal = Proposal::new(
            "0x1234567890123456789012345678901234567890",
            "hyperliquid",
            "eth",
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd",
            "ethereum",
        )
        .with_coin_type("ethereum");

        assert_eq!(proposal.destination_chain, "hyperliquid");
        assert_eq!(proposal.asset, "eth");
        assert_eq!(proposal.coin_type.as_deref(), Some("ethereum"));
    }

    #[test]
    fn test_coin_type_defaults_to_none() {
        let proposal = Proposal::new("a", "b", "c", "d", "e");
        assert!(proposal.coin_type.is_none());
    }
}
