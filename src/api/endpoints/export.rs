//! Download endpoint.
//!
//! `GET /api/export/:entity?format=csv|tsv&<tab filters>` serializes the
//! entity's table, after the same filters its tab accepts, as an attachment
//! named `<stem>_<YYYYMMDD>.<ext>`.

use axum::extract::{Path, Query, State};
use axum::http::{header, Uri};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{DoctorFilter, Entity, ExportFormat, LabTestFilter, StaffFilter};
use crate::pipeline::export::{export, export_filename};
use crate::pipeline::{filtered_table, FilterSet};

#[derive(Debug, Default, Deserialize)]
struct FormatQuery {
    format: Option<String>,
}

fn parse_query<T: DeserializeOwned>(uri: &Uri) -> Result<T, ApiError> {
    Query::<T>::try_from_uri(uri)
        .map(|Query(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Filters the entity's tab accepts, read from the query string.
fn filters_for(entity: Entity, uri: &Uri) -> Result<FilterSet, ApiError> {
    Ok(match entity {
        Entity::DoctorSchedule => parse_query::<DoctorFilter>(uri)?.predicates(),
        Entity::LabTest => parse_query::<LabTestFilter>(uri)?.predicates(),
        Entity::Staff => parse_query::<StaffFilter>(uri)?.predicates(),
        Entity::Room | Entity::Patient | Entity::PharmacyStock => FilterSet::new(),
    })
}

pub async fn download(
    State(ctx): State<ApiContext>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let entity: Entity = slug
        .parse()
        .map_err(|e: crate::models::ParseEnumError| ApiError::BadRequest(e.to_string()))?;

    let format = match parse_query::<FormatQuery>(&uri)?.format.as_deref() {
        None | Some("") => ExportFormat::default(),
        Some(raw) => raw
            .parse::<ExportFormat>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };
    let filters = filters_for(entity, &uri)?;

    let (bytes, filename) = ctx
        .run_blocking(move |source, today| {
            let table = filtered_table(source, entity, &filters, today);
            tracing::info!(entity = %entity, rows = table.len(), format = %format, "Exporting table");
            export(&table, format).map(|bytes| (bytes, export_filename(entity, format, today)))
        })
        .await??;

    let headers = [
        (
            header::CONTENT_TYPE,
            format!("{}; charset=utf-8", format.content_type()),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_export_accepts_short_parameter_names() {
        let uri: Uri = "/api/export/staff?role=Nurse&status=Active&search=an".parse().unwrap();
        let filters = filters_for(Entity::Staff, &uri).unwrap();
        assert_eq!(filters.len(), 3);
    }

    #[test]
    fn unfiltered_entities_ignore_parameters() {
        let uri: Uri = "/api/export/rooms?room_type=ICU".parse().unwrap();
        assert!(filters_for(Entity::Room, &uri).unwrap().is_empty());
    }

    #[test]
    fn lab_export_reads_date_range() {
        let uri: Uri = "/api/export/lab-tests?start_date=2024-06-01&format=tsv".parse().unwrap();
        let filters = filters_for(Entity::LabTest, &uri).unwrap();
        assert_eq!(filters.len(), 1);
    }
}
