//! Signature route handlers.

use axum::{
    Extension, Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header::USER_AGENT},
};
use serde::Deserialize;
use tracing::instrument;
use vible_core::signature::DEFAULT_RECENT_LIMIT;
use vible_core::wire::{CountResponse, OverviewResponse, SESSION_ID_HEADER, SubmitResponse};
use vible_core::{PublicSignature, SignatureDraft};

use crate::error::{AppError, Result};
use crate::middleware::{ClientIp, RequestId};
use crate::state::AppState;
use crate::store::Submission;

/// Largest `limit` honoured by `GET /signatures/recent`.
pub const MAX_RECENT_LIMIT: usize = 50;

/// Query parameters for `GET /signatures/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Clamp a requested limit into `1..=MAX_RECENT_LIMIT`.
fn clamp_limit(limit: Option<i64>) -> usize {
    limit.map_or(DEFAULT_RECENT_LIMIT, |n| {
        usize::try_from(n).map_or(1, |n| n.clamp(1, MAX_RECENT_LIMIT))
    })
}

/// Total number of signatures.
///
/// GET /signatures/count
pub async fn count(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.store().count().await,
    })
}

/// Most recent signatures, newest first.
///
/// GET /signatures/recent?limit=N
pub async fn recent(
    State(state): State<AppState>,
    query: std::result::Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<PublicSignature>>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let limit = clamp_limit(query.limit);
    Ok(Json(state.store().list_recent(limit).await))
}

/// Count and recent list in one response.
///
/// GET /signatures
pub async fn overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    let store = state.store();
    let (total, recent) = tokio::join!(store.count(), store.list_recent(DEFAULT_RECENT_LIMIT));
    Json(OverviewResponse { total, recent })
}

/// Submit a signature.
///
/// POST /signatures
///
/// The fingerprint is derived from the client IP and the `x-session-id`
/// header; the `user-agent` header is stored with the record.
#[instrument(skip_all, fields(request_id, session_id))]
pub async fn submit(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    request_id: Option<Extension<RequestId>>,
    headers: HeaderMap,
    payload: std::result::Result<Json<SignatureDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    let Json(draft) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    if let Some(Extension(id)) = &request_id {
        tracing::Span::current().record("request_id", id.as_str());
    }
    let session_id = header(SESSION_ID_HEADER);
    if let Some(id) = &session_id {
        tracing::Span::current().record("session_id", id.as_str());
    }

    let receipt = state
        .store()
        .submit(Submission {
            draft,
            client_ip: client_ip.map(|ip| ip.to_string()),
            session_id,
            user_agent: header(USER_AGENT.as_str()),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse::accepted(receipt.total)),
    ))
}
