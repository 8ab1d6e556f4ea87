//! Checks one guardian signature against one set of candidate payloads.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// A signature blob rejected before any cryptographic work. Reported to
/// operators per node; distinct from a well-formed signature that simply does
/// not verify.
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("signature must decode to 64 or 65 bytes, got {0}")]
    Length(usize),

    #[error("signature is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Normalize a signature blob to its 65-byte `r||s||v` form.
///
/// A 64-byte blob is `r||s` with an implied zero recovery byte. A recovery
/// byte of 27 or above is Ethereum-encoded and shifted back to the 0/1 range.
/// The recovery id is tolerated, not trusted: verification checks the
/// `(r, s)` pair against a known key and never recovers one.
fn normalize(sig: &[u8]) -> Result<[u8; 65], SignatureError> {
    let mut out = [0u8; 65];
    match sig.len() {
        64 => out[..64].copy_from_slice(sig),
        65 => {
            out.copy_from_slice(sig);
            if out[64] >= 27 {
                out[64] -= 27;
            }
        }
        n => return Err(SignatureError::Length(n)),
    }
    Ok(out)
}

/// Check a decoded signature against each candidate payload in order.
///
/// Returns `Ok(true)` on the first candidate whose SHA-256 digest the
/// signature verifies against, `Ok(false)` when none matches. Undecodable
/// `(r, s)` scalars also come back `Ok(false)`: a malformed-but-well-sized
/// signature is indistinguishable from a wrong one, so nothing leaks to the
/// proposer about which it was.
pub fn verify_candidates(
    sig: &[u8],
    candidates: &[Vec<u8>],
    key: &VerifyingKey,
) -> Result<bool, SignatureError> {
    let normalized = normalize(sig)?;
    let recovery_id = normalized[64];

    let parsed = match Signature::from_slice(&normalized[..64]) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(false),
    };

    for candidate in candidates {
        let digest = Sha256::digest(candidate);
        if key.verify_prehash(digest.as_slice(), &parsed).is_ok() {
            tracing::trace!(v = recovery_id, "guardian signature verified");
            return Ok(true);
        }
    }
    Ok(false)
}
