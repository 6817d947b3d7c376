use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::tabs::pharmacy::{self, PharmacyTab};

/// `GET /api/pharmacy`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<PharmacyTab>, ApiError> {
    let bundle = ctx.run_blocking(pharmacy::build).await?;
    Ok(Json(bundle))
}
