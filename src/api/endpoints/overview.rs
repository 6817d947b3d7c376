//! Landing dashboard endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::tabs::overview::{self, Overview};

/// `GET /api/overview`: today's figures across every entity.
pub async fn dashboard(State(ctx): State<ApiContext>) -> Result<Json<Overview>, ApiError> {
    let bundle = ctx.run_blocking(overview::build).await?;
    Ok(Json(bundle))
}
