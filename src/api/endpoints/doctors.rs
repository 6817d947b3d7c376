use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::DoctorFilter;
use crate::tabs::doctor::{self, DoctorTab};

/// `GET /api/doctors?specialization=&day=&search_doctor=`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(filter): Query<DoctorFilter>,
) -> Result<Json<DoctorTab>, ApiError> {
    let bundle = ctx
        .run_blocking(move |source, today| doctor::build(source, &filter, today))
        .await?;
    Ok(Json(bundle))
}
