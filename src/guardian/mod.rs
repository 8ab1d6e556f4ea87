//! Guardian multi-signature verification for custody-network deposit addresses
//!
//! Before a generated deposit address is shown to a user, a quorum of
//! independent guardian nodes must attest the exact binding between the
//! user's wallet, the destination chain, the asset, the source chain and the
//! proposed address. This module holds the guardian roster, the payload
//! serializations guardians sign, the per-signature check and the threshold
//! orchestration.
//!
//! Security properties:
//! - Forging an accepted address requires compromising a quorum of guardians
//! - A malformed signature is indistinguishable from a wrong one to callers
//! - Verification is pure computation: no I/O, no clock, no shared state

pub mod payload;
pub mod signature;
pub mod verifier;

pub use signature::SignatureError;
pub use verifier::{ThresholdVerifier, VerificationResult};

use k256::ecdsa::VerifyingKey;
use thiserror::Error;

/// Default quorum: at least this many guardians must attest a proposal.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Uncompressed SEC1 public keys (hex, leading point-format tag) of the
/// production guardian nodes.
const MAINNET_GUARDIANS: [(&str, &str); 3] = [
    (
        "field-node",
        "04ae2ab20787f816ea5d13f36c4c4f7e196e29e867086f3ce818abb73077a237f841b33ada5be71b83f4af29f333dedc5411ca4016bd52ab657db2896ef374ce99",
    ),
    (
        "hl-node",
        "048633ea6ab7e40cdacf37d1340057e84bb9810de0687af78d031e9b07b65ad4ab379180ab55075f5c2ebb96dab30d2c2fab49d5635845327b6a3c27d20ba4755b",
    ),
    (
        "unit-node",
        "04dc6f89f921dc816aa69b687be1fcc3cc1d48912629abc2c9964e807422e1047e0435cb5ba0fa53cb9a57a9c610b4e872a0a2caedda78c4f85ebafcca93524061",
    ),
];

/// A misconfigured guardian roster. Fatal to the whole verification call;
/// never downgraded to a per-node failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("guardian key for {node_id} is not valid hex: {source}")]
    KeyEncoding {
        node_id: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("guardian key for {node_id} must be 64 bytes after stripping the point-format tag, got {len}")]
    KeyLength { node_id: String, len: usize },

    #[error("guardian key for {node_id} is not a point on the curve")]
    KeyPoint { node_id: String },
}

/// One guardian node: an id and its raw public key as supplied by
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianNode {
    pub node_id: String,
    pub public_key_hex: String,
}

impl GuardianNode {
    pub fn new(node_id: impl Into<String>, public_key_hex: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            public_key_hex: public_key_hex.into(),
        }
    }
}

/// The guardian roster. Order is significant: verification visits guardians
/// in roster order.
#[derive(Debug, Clone)]
pub struct GuardianSet {
    nodes: Vec<GuardianNode>,
}

impl GuardianSet {
    pub fn new(nodes: Vec<GuardianNode>) -> Self {
        Self { nodes }
    }

    /// The built-in production roster.
    pub fn mainnet() -> Self {
        Self::new(
            MAINNET_GUARDIANS
                .iter()
                .map(|(id, key)| GuardianNode::new(*id, *key))
                .collect(),
        )
    }

    pub fn nodes(&self) -> &[GuardianNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Decode the roster into usable verification keys, in roster order.
    ///
    /// A 65-byte key carries a single SEC1 point-format tag in front of the
    /// 64-byte coordinate pair; the tag is stripped. After stripping, the key
    /// body must be exactly 64 bytes and a valid curve point.
    ///
    /// Runs on every verification call rather than being cached, so callers
    /// may supply an alternate roster (e.g. testnet) without global state.
    pub fn load(&self) -> Result<Vec<(String, VerifyingKey)>, ConfigError> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let raw = hex::decode(&node.public_key_hex).map_err(|source| {
                ConfigError::KeyEncoding {
                    node_id: node.node_id.clone(),
                    source,
                }
            })?;
            let body = if raw.len() == 65 { &raw[1..] } else { &raw[..] };
            if body.len() != 64 {
                return Err(ConfigError::KeyLength {
                    node_id: node.node_id.clone(),
                    len: body.len(),
                });
            }

            let mut sec1 = [0u8; 65];
            sec1[0] = 0x04;
            sec1[1..].copy_from_slice(body);
            let key = VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| ConfigError::KeyPoint {
                node_id: node.node_id.clone(),
            })?;
            keys.push((node.node_id.clone(), key));
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_roster_shape() {
        let roster = GuardianSet::mainnet();
        assert_eq!(roster.len(), 3);

        let ids: Vec<&str> = roster.nodes().iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(ids, vec!["field-node", "hl-node", "unit-node"]);

        for node in roster.nodes() {
            assert!(node.public_key_hex.starts_with("04"));
            assert_eq!(node.public_key_hex.len(), 130);
        }
    }

    #[test]
    fn test_mainnet_roster_loads() {
        let keys = GuardianSet::mainnet().load().expect("mainnet keys are valid");
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].0, "field-node");
    }

    #[test]
    fn test_tag_stripping_is_equivalent() {
        let tagged = GuardianSet::mainnet();
        let untagged = GuardianSet::new(
            tagged
                .nodes()
                .iter()
                .map(|n| GuardianNode::new(n.node_id.clone(), &n.public_key_hex[2..]))
                .collect(),
        );

        let a = tagged.load().unwrap();
        let b = untagged.load().unwrap();
        for ((_, ka), (_, kb)) in a.iter().zip(b.iter()) {
            assert_eq!(ka, kb);
        }
    }

    #[test]
    fn test_bad_hex_is_config_error() {
        let roster = GuardianSet::new(vec![GuardianNode::new("field-node", "zz")]);
        assert!(matches!(
            roster.load(),
            Err(ConfigError::KeyEncoding { .. })
        ));
    }

    #[test]
    fn test_short_key_is_config_error() {
        let roster = GuardianSet::new(vec![GuardianNode::new(
            "field-node",
            hex::encode([0u8; 63]),
        )]);
        match roster.load() {
            Err(ConfigError::KeyLength { node_id, len }) => {
                assert_eq!(node_id, "field-node");
                assert_eq!(len, 63);
            }
            other => panic!("expected KeyLength, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_off_curve_key_is_config_error() {
        let roster = GuardianSet::new(vec![GuardianNode::new(
            "field-node",
            hex::encode([0xffu8; 64]),
        )]);
        assert!(matches!(roster.load(), Err(ConfigError::KeyPoint { .. })));
    }
}
