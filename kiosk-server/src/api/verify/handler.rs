//! Kiosk Verification Handlers
//!
//! Each handler maps one verifier onto the HTTP surface. A `NoMatch`
//! comes back as a normal response with `matched: false` — the kiosk
//! keeps scanning or falls back to the next method; only device and
//! integrity faults are errors.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use shared::client::{
    AuthMethod, CredentialBeginRequest, CredentialBeginResponse, CredentialCompleteRequest,
    FaceVerifyRequest, PinVerifyRequest, VerifyAttempt,
};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::verify::{self, VerifyOutcome, resolve};

#[derive(Debug, Deserialize)]
pub struct MethodsQuery {
    #[serde(default)]
    pub platform_supported: bool,
}

/// GET /api/verify/methods - 终端可用的验证方式
pub async fn methods(Query(query): Query<MethodsQuery>) -> Json<Vec<AuthMethod>> {
    Json(resolve::available_methods(query.platform_supported))
}

/// POST /api/verify/face - 人脸描述子验证
pub async fn face(
    State(state): State<ServerState>,
    Json(req): Json<FaceVerifyRequest>,
) -> AppResult<Json<VerifyAttempt>> {
    let outcome = verify::face::verify(&state.pool, &req.descriptor).await?;

    match outcome {
        VerifyOutcome::Match(verified) => {
            let response =
                resolve::finish(&state, req.purpose, AuthMethod::Face, verified).await?;
            Ok(Json(VerifyAttempt::matched(response)))
        }
        VerifyOutcome::NoMatch => Ok(Json(VerifyAttempt::no_match())),
    }
}

/// POST /api/verify/pin - PIN 验证
pub async fn pin(
    State(state): State<ServerState>,
    Json(req): Json<PinVerifyRequest>,
) -> AppResult<Json<VerifyAttempt>> {
    let outcome = verify::pin::verify(&state.pool, &req.pin).await?;

    match outcome {
        VerifyOutcome::Match(verified) => {
            let response = resolve::finish(&state, req.purpose, AuthMethod::Pin, verified).await?;
            Ok(Json(VerifyAttempt::matched(response)))
        }
        VerifyOutcome::NoMatch => Ok(Json(VerifyAttempt::no_match())),
    }
}

/// POST /api/verify/credential/begin - 签发平台凭证挑战
pub async fn credential_begin(
    State(state): State<ServerState>,
    Json(_req): Json<CredentialBeginRequest>,
) -> AppResult<Json<CredentialBeginResponse>> {
    let response = verify::platform::begin_verification(&state.pool).await?;
    Ok(Json(response))
}

/// POST /api/verify/credential/complete - 凭证断言回传
pub async fn credential_complete(
    State(state): State<ServerState>,
    Json(req): Json<CredentialCompleteRequest>,
) -> AppResult<Json<VerifyAttempt>> {
    let outcome = verify::platform::complete_verification(
        &state.pool,
        &req.challenge_id,
        &req.credential_id,
    )
    .await?;

    match outcome {
        VerifyOutcome::Match(verified) => {
            let response = resolve::finish(
                &state,
                req.purpose,
                AuthMethod::PlatformCredential,
                verified,
            )
            .await?;
            Ok(Json(VerifyAttempt::matched(response)))
        }
        VerifyOutcome::NoMatch => Ok(Json(VerifyAttempt::no_match())),
    }
}
