use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::StaffFilter;
use crate::tabs::staff::{self, StaffTab};

/// `GET /api/staff?staff_role=&staff_department=&staff_status=&search_staff=`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(filter): Query<StaffFilter>,
) -> Result<Json<StaffTab>, ApiError> {
    let bundle = ctx
        .run_blocking(move |source, today| staff::build(source, &filter, today))
        .await?;
    Ok(Json(bundle))
}
