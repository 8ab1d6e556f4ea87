//! Client for the custody network that generates protocol deposit addresses.

use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::guardian::{ThresholdVerifier, VerificationResult};
use crate::proposal::Proposal;

/// Destination chain every deposit address is generated for.
pub const DESTINATION_CHAIN: &str = "hyperliquid";

/// Proposer response for one generated deposit address: the address itself
/// plus the guardian signatures attesting it. Untrusted until verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAddressResponse {
    pub address: String,
    pub signatures: HashMap<String, String>,
    pub status: String,
    #[serde(default, rename = "coinType", skip_serializing_if = "Option::is_none")]
    pub coin_type: Option<String>,
}

#[derive(Clone)]
pub struct UnitClient {
    pub base_url: String,
    client: Client,
    verifier: ThresholdVerifier,
}

impl UnitClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            verifier: ThresholdVerifier::mainnet(),
        }
    }

    /// Swap in an alternate roster or threshold (testnet deployments).
    pub fn with_verifier(mut self, verifier: ThresholdVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Ask the custody network to generate a deposit address for `dst_addr`.
    ///
    /// The response is the proposer's unverified claim; callers that intend
    /// to show the address to a user must go through
    /// [`verified_deposit_address`](Self::verified_deposit_address).
    pub async fn generate_deposit_address(
        &self,
        src_chain: &str,
        dst_chain: &str,
        asset: &str,
        dst_addr: &str,
    ) -> Result<GenerateAddressResponse> {
        let url = format!(
            "{}/gen/{}/{}/{}/{}",
            self.base_url, src_chain, dst_chain, asset, dst_addr
        );
        let response: GenerateAddressResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }

    /// Generate a deposit address and accept it only if a guardian quorum
    /// attests the exact (wallet, chain, asset, source chain, address)
    /// binding. A rejected address must never be exposed to a user.
    pub async fn verified_deposit_address(
        &self,
        src_chain: &str,
        asset: &str,
        dst_addr: &str,
    ) -> Result<(GenerateAddressResponse, VerificationResult)> {
        let generated = self
            .generate_deposit_address(src_chain, DESTINATION_CHAIN, asset, dst_addr)
            .await?;

        let mut proposal = Proposal::new(
            dst_addr,
            DESTINATION_CHAIN,
            asset,
            generated.address.as_str(),
            src_chain,
        );
        if let Some(coin_type) = &generated.coin_type {
            proposal = proposal.with_coin_type(coin_type.as_str());
        }

        let result = match self.verifier.verify(&generated.signatures, &proposal) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "guardian roster failed to load");
                VerificationResult::config_failure(&e)
            }
        };

        if !result.success {
            return Err(Error::AddressRejected {
                result: Box::new(result),
            });
        }
        Ok((generated, result))
    }
}
