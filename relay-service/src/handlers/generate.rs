use axum::{extract::State, http::HeaderMap, Json};
use service_core::error::AppError;
use service_core::observability::extract_request_id;
use service_core::utils::ApiJson;

use crate::models::{GenerationRequest, GenerationResponse};
use crate::startup::AppState;

/// Relay one generation request to the inference server.
///
/// Schema failures are rejected by [`ApiJson`] before this runs, so a
/// request that reaches the body always makes exactly one upstream call.
#[tracing::instrument(
    skip_all,
    fields(
        model = tracing::field::Empty,
        stream = tracing::field::Empty,
        prompt_len = tracing::field::Empty
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<GenerationRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let span = tracing::Span::current();
    span.record("model", request.model.as_str());
    span.record("stream", request.stream);
    span.record("prompt_len", request.prompt.len());

    let request_id = extract_request_id(&headers);

    let raw = state
        .provider
        .generate(&request.to_upstream(), request_id.as_deref())
        .await?;

    Ok(Json(GenerationResponse::from_upstream(raw)))
}
