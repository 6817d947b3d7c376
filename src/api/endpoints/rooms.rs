use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::tabs::room::{self, RoomTab};

/// `GET /api/rooms`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<RoomTab>, ApiError> {
    let bundle = ctx.run_blocking(room::build).await?;
    Ok(Json(bundle))
}
