//! Gateway lookup handler

use application::{ApplicationError, RequestContext};
use axum::{Extension, Json, body::Bytes, extract::State, http::HeaderMap};
use domain::TemperatureReport;
use serde::Deserialize;
use tracing::debug;

use super::{credential, request_context};
use crate::{error::ApiError, state::GatewayState};

/// Request body of `POST /`
///
/// A body without `cep` is decoded as an empty postal code.
#[derive(Debug, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

impl CepRequest {
    /// Decode a raw request body
    pub fn decode(body: &[u8]) -> Result<Self, ApplicationError> {
        serde_json::from_slice(body)
            .map_err(|e| ApplicationError::MalformedInput(e.to_string()))
    }
}

/// Look up the temperature for a postal code
///
/// `POST /` with `{"cep": "<string>"}` and an `api_key` header.
pub async fn lookup(
    State(state): State<GatewayState>,
    ctx: Option<Extension<RequestContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TemperatureReport>, ApiError> {
    let ctx = request_context(ctx);

    let result = match CepRequest::decode(&body) {
        Ok(request) => {
            debug!(cep = %request.cep, "Gateway request decoded");
            state
                .service
                .temperature_for_cep(&ctx, &request.cep, credential(&headers))
                .await
        },
        Err(e) => Err(e),
    };

    state.metrics.record_lookup(&result);
    Ok(Json(result?))
}
