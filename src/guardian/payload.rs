//! Byte payloads a guardian is expected to have signed for one proposal.
//!
//! Two incompatible serializations exist because the custody protocol
//! evolved; which one a guardian signed is not always knowable up front, so
//! callers verify against an ordered candidate list.

use crate::proposal::Proposal;

/// Coin type that pins the user payload format unconditionally.
pub const ETHEREUM_COIN_TYPE: &str = "ethereum";

/// Payload under the original attestation format.
///
/// The operation suffix is the literal `deposit`. Guardians have only ever
/// signed deposit-shaped payloads, so the direction is fixed here even though
/// the wider system carries a deposit/withdraw intent elsewhere.
pub fn legacy_payload(node_id: &str, proposal: &Proposal) -> Vec<u8> {
    format!(
        "{}:{}-{}-{}-{}-{}-deposit",
        node_id,
        proposal.destination_address,
        proposal.destination_chain,
        proposal.asset,
        proposal.address,
        proposal.source_chain,
    )
    .into_bytes()
}

/// Payload under the newer `user`-prefixed attestation format.
///
/// Proposals without a coin type can still have been attested under this
/// format by guardians that already migrated; those sign the source-chain
/// coin identifier, which stands in when the tag is absent.
pub fn user_payload(node_id: &str, proposal: &Proposal) -> Vec<u8> {
    let coin_type = proposal
        .coin_type
        .as_deref()
        .unwrap_or(&proposal.source_chain);
    format!(
        "{}:user-{}-{}-{}-{}",
        node_id,
        coin_type,
        proposal.destination_chain,
        proposal.destination_address,
        proposal.address,
    )
    .into_bytes()
}

/// The payload serializations a guardian may have signed, in the order they
/// are tried.
///
/// An `ethereum` coin type selects the user format exclusively. Anything else
/// is checked against the legacy format first and the user format second; the
/// retry covers guardians that signed the newer format before proposals
/// carried the tag. The order is a contract: tests pin it.
pub fn signing_candidates(node_id: &str, proposal: &Proposal) -> Vec<Vec<u8>> {
    if proposal.coin_type.as_deref() == Some(ETHEREUM_COIN_TYPE) {
        vec![user_payload(node_id, proposal)]
    } else {
        vec![
            legacy_payload(node_id, proposal),
            user_payload(node_id, proposal),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proposal() -> Proposal {
        Proposal::new(
            "0x1234567890123456789012345678901234567890",
            "ethereum",
            "USDC",
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd",
            "polygon",
        )
    }

    #[test]
    fn test_legacy_payload_format() {
        let payload = legacy_payload("field-node", &sample_proposal());
        assert_eq!(
            payload,
            b"field-node:0x1234567890123456789012345678901234567890-ethereum-USDC-0xabcdefabcdefabcdefabcdefabcdefabcdefabcd-polygon-deposit"
        );
    }

    #[test]
    fn test_user_payload_format() {
        let proposal = sample_proposal().with_coin_type("ethereum");
        let payload = user_payload("field-node", &proposal);
        assert_eq!(
            payload,
            b"field-node:user-ethereum-ethereum-0x1234567890123456789012345678901234567890-0xabcdefabcdefabcdefabcdefabcdefabcdefabcd"
        );
    }

    #[test]
    fn test_user_payload_without_coin_type_uses_source_chain() {
        let payload = user_payload("field-node", &sample_proposal());
        let text = String::from_utf8(payload).unwrap();
        assert!(text.starts_with("field-node:user-polygon-"));
    }

    #[test]
    fn test_candidates_legacy_first_without_ethereum_tag() {
        let proposal = sample_proposal();
        let candidates = signing_candidates("hl-node", &proposal);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], legacy_payload("hl-node", &proposal));
        assert_eq!(candidates[1], user_payload("hl-node", &proposal));
    }

    #[test]
    fn test_candidates_user_only_with_ethereum_tag() {
        let proposal = sample_proposal().with_coin_type("ethereum");
        let candidates = signing_candidates("hl-node", &proposal);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], user_payload("hl-node", &proposal));
    }

    #[test]
    fn test_non_ethereum_coin_type_still_falls_back() {
        let proposal = sample_proposal().with_coin_type("solana");
        let candidates = signing_candidates("unit-node", &proposal);
        assert_eq!(candidates.len(), 2);
        let text = String::from_utf8(candidates[1].clone()).unwrap();
        assert!(text.starts_with("unit-node:user-solana-"));
    }
}
