//! Lab tests endpoint.
//!
//! `GET /api/lab-tests?test_type=&result_status=&start_date=&end_date=`
//!
//! Dates are `YYYY-MM-DD`; both bounds are inclusive and either may be
//! left empty.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::LabTestFilter;
use crate::tabs::lab::{self, LabTab};

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(filter): Query<LabTestFilter>,
) -> Result<Json<LabTab>, ApiError> {
    let bundle = ctx
        .run_blocking(move |source, today| lab::build(source, &filter, today))
        .await?;
    Ok(Json(bundle))
}
