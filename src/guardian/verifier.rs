//! Threshold orchestration across the configured guardian roster.

use std::collections::{BTreeMap, HashMap};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use super::{payload, signature, ConfigError, GuardianSet, SignatureError, DEFAULT_THRESHOLD};
use crate::proposal::Proposal;

/// Outcome of one verification call. Constructed once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub verified_count: usize,
    /// Operator-facing diagnostics for malformed signatures. A well-formed
    /// signature that simply does not verify produces no entry here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// One entry per configured guardian; `false` covers both a missing
    /// signature and a failed verification.
    pub verification_details: BTreeMap<String, bool>,
}

impl VerificationResult {
    /// Degraded rendering of a roster configuration failure, for callers that
    /// must answer with a result body (the HTTP layer). The details map is
    /// intentionally empty here: the roster never loaded, so there are no
    /// guardians to report on. This is the one case where not every
    /// configured guardian appears.
    pub fn config_failure(err: &ConfigError) -> Self {
        Self {
            success: false,
            verified_count: 0,
            errors: vec![err.to_string()],
            verification_details: BTreeMap::new(),
        }
    }
}

/// Verifies that a quorum of guardians attests a deposit-address proposal.
///
/// Pure computation over the supplied inputs: no I/O, no clock, no shared
/// state. Given identical inputs the result is always identical, and calls
/// may run concurrently without coordination.
#[derive(Debug, Clone)]
pub struct ThresholdVerifier {
    roster: GuardianSet,
    threshold: usize,
}

impl ThresholdVerifier {
    /// Verifier over the built-in production roster with the default quorum.
    pub fn mainnet() -> Self {
        Self::new(GuardianSet::mainnet(), DEFAULT_THRESHOLD)
    }

    pub fn new(roster: GuardianSet, threshold: usize) -> Self {
        Self { roster, threshold }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn roster(&self) -> &GuardianSet {
        &self.roster
    }

    /// Check the proposer-supplied signature set against the roster.
    ///
    /// `signatures` maps node id to the base64 signature text taken verbatim
    /// from the proposer. Guardians are visited in roster order. A guardian
    /// with no signature is recorded as unverified without raising an error,
    /// and one bad signature never stops the remaining guardians from being
    /// checked. Only a misconfigured roster aborts the call.
    pub fn verify(
        &self,
        signatures: &HashMap<String, String>,
        proposal: &Proposal,
    ) -> Result<VerificationResult, ConfigError> {
        let keys = self.roster.load()?;

        let mut verified_count = 0usize;
        let mut errors = Vec::new();
        let mut details = BTreeMap::new();

        for (node_id, key) in &keys {
            let Some(sig_b64) = signatures.get(node_id) else {
                details.insert(node_id.clone(), false);
                continue;
            };

            let candidates = payload::signing_candidates(node_id, proposal);
            let outcome = BASE64
                .decode(sig_b64)
                .map_err(SignatureError::from)
                .and_then(|sig| signature::verify_candidates(&sig, &candidates, key));

            match outcome {
                Ok(true) => {
                    verified_count += 1;
                    details.insert(node_id.clone(), true);
                    tracing::debug!(node_id = %node_id, "guardian attestation verified");
                }
                Ok(false) => {
                    details.insert(node_id.clone(), false);
                    tracing::debug!(node_id = %node_id, "guardian signature did not verify");
                }
                Err(e) => {
                    errors.push(format!("Verification failed for node {}: {}", node_id, e));
                    details.insert(node_id.clone(), false);
                    tracing::debug!(node_id = %node_id, error = %e, "guardian signature malformed");
                }
            }
        }

        Ok(VerificationResult {
            success: verified_count >= self.threshold,
            verified_count,
            errors,
            verification_details: details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardian::GuardianNode;

    #[test]
    fn test_mainnet_defaults() {
        let verifier = ThresholdVerifier::mainnet();
        assert_eq!(verifier.threshold(), 2);
        assert_eq!(verifier.roster().len(), 3);
    }

    #[test]
    fn test_with_threshold() {
        let verifier = ThresholdVerifier::mainnet().with_threshold(3);
        assert_eq!(verifier.threshold(), 3);
    }

    #[test]
    fn test_config_failure_rendering() {
        let roster = GuardianSet::new(vec![GuardianNode::new("field-node", "00")]);
        let err = roster.load().unwrap_err();

        let result = VerificationResult::config_failure(&err);
        assert!(!result.success);
        assert_eq!(result.verified_count, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.verification_details.is_empty());
    }
}
