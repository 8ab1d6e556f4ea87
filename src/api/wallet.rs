use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::error::Error;
use crate::guardian::VerificationResult;
use crate::unit::GenerateAddressResponse;
use crate::wallet::EvmWallet;

#[derive(Serialize)]
struct DepositAddresses {
    #[serde(rename = "ETH")]
    eth: GenerateAddressResponse,
    #[serde(rename = "SOL")]
    sol: GenerateAddressResponse,
}

#[derive(Serialize)]
struct GenerateWalletResponse {
    wallet: EvmWallet,
    deposit_address: DepositAddresses,
}

#[derive(Serialize)]
struct RejectionResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<VerificationResult>,
}

/// Create a wallet plus quorum-verified ETH and SOL deposit addresses.
///
/// An address that fails guardian verification is never included in a
/// response; the failing verification result is returned instead so
/// operators can see which guardians did not attest.
pub async fn generate_wallet(State(state): State<AppState>) -> Response {
    let wallet = EvmWallet::generate();

    let eth = match state
        .unit
        .verified_deposit_address("ethereum", "eth", &wallet.address)
        .await
    {
        Ok((generated, _)) => generated,
        Err(e) => return reject("eth", e),
    };

    let sol = match state
        .unit
        .verified_deposit_address("solana", "sol", &wallet.address)
        .await
    {
        Ok((generated, _)) => generated,
        Err(e) => return reject("sol", e),
    };

    (
        StatusCode::OK,
        Json(GenerateWalletResponse {
            wallet,
            deposit_address: DepositAddresses { eth, sol },
        }),
    )
        .into_response()
}

fn reject(asset: &str, err: Error) -> Response {
    match err {
        Error::AddressRejected { result } => {
            tracing::warn!(
                asset,
                verified = result.verified_count,
                "deposit address rejected by guardian quorum"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(RejectionResponse {
                    detail: format!("{} deposit address failed guardian verification", asset),
                    verification: Some(*result),
                }),
            )
                .into_response()
        }
        e => (
            StatusCode::BAD_GATEWAY,
            Json(RejectionResponse {
                detail: format!("{} deposit address generation failed: {}", asset, e),
                verification: None,
            }),
        )
            .into_response(),
    }
}
