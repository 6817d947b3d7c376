use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::tabs::patient::{self, PatientTab};

/// `GET /api/patients`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<PatientTab>, ApiError> {
    let bundle = ctx.run_blocking(patient::build).await?;
    Ok(Json(bundle))
}
