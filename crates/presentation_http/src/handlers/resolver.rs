//! Resolver lookup handler

use application::{ApplicationError, RequestContext};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use domain::TemperatureReport;
use serde::Deserialize;

use super::{credential, request_context};
use crate::{error::ApiError, state::ResolverState};

/// Query of `GET /`
#[derive(Debug, Default, Deserialize)]
pub struct ZipQuery {
    pub zip: Option<String>,
}

/// Look up the temperature for an already validated postal code
///
/// `GET /?zip=<8 digits>` with an `api_key` header. A missing `zip` is
/// treated as an empty one and fails resolution.
pub async fn lookup(
    State(state): State<ResolverState>,
    ctx: Option<Extension<RequestContext>>,
    headers: HeaderMap,
    query: Result<Query<ZipQuery>, QueryRejection>,
) -> Result<Json<TemperatureReport>, ApiError> {
    let ctx = request_context(ctx);

    let result = match query {
        Ok(Query(query)) => {
            let zip = query.zip.unwrap_or_default();
            state
                .service
                .temperature_for_zip(&ctx, &zip, credential(&headers))
                .await
        },
        Err(e) => Err(ApplicationError::MalformedInput(e.body_text())),
    };

    state.metrics.record_lookup(&result);
    Ok(Json(result?))
}
