//! Local wallet keypair generation for the supported source chains.

use ed25519_dalek::SigningKey as Ed25519SigningKey;
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

/// Freshly generated EVM account. The private key is part of the value
/// because the wallet endpoint hands it back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmWallet {
    pub address: String,
    pub private_key: String,
}

impl EvmWallet {
    /// Generate a new random secp256k1 account.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let address = evm_address(signing_key.verifying_key());
        let private_key = format!("0x{}", hex::encode(signing_key.to_bytes()));
        Self {
            address,
            private_key,
        }
    }
}

/// Freshly generated Solana-style account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolanaWallet {
    pub address: String,
    pub private_key: String,
}

impl SolanaWallet {
    /// Generate a new random ed25519 account with a base58 address.
    pub fn generate() -> Self {
        let signing_key = Ed25519SigningKey::generate(&mut OsRng);
        let address = bs58::encode(signing_key.verifying_key().to_bytes()).into_string();
        let private_key = hex::encode(signing_key.to_keypair_bytes());
        Self {
            address,
            private_key,
        }
    }
}

/// EVM address of a secp256k1 public key: last 20 bytes of the keccak256 of
/// the uncompressed point without its tag byte.
pub fn evm_address(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
