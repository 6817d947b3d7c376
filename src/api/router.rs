//! Dashboard API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`; an optional static directory serves
//! the frontend at every other path.
//!
//! Layer stack (outermost → innermost):
//! 1. CORS → 2. `Cache-Control: no-store` → 3. Request log → Handler

use std::path::Path;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the dashboard API router.
pub fn dashboard_router(ctx: ApiContext) -> Router {
    dashboard_router_with_static(ctx, None)
}

/// Build the router, serving files from `static_dir` outside `/api`.
pub fn dashboard_router_with_static(ctx: ApiContext, static_dir: Option<&Path>) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/overview", get(endpoints::overview::dashboard))
        .route("/doctors", get(endpoints::doctors::list))
        .route("/rooms", get(endpoints::rooms::list))
        .route("/patients", get(endpoints::patients::list))
        .route("/pharmacy", get(endpoints::pharmacy::list))
        .route("/lab-tests", get(endpoints::labs::list))
        .route("/staff", get(endpoints::staff::list))
        .route("/export/:entity", get(endpoints::export::download))
        .with_state(ctx)
        // Layers apply bottom-up: the request log sees the final status.
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_origin(Any),
        );

    let router = Router::new().nest("/api", api);
    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::db::fixtures::{missing_source, seed_today, seeded_source};
    use crate::db::SqliteSource;

    fn app(source: SqliteSource) -> Router {
        let ctx = ApiContext::new(Arc::new(source), Duration::from_secs(10)).with_today(seed_today());
        dashboard_router(ctx)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok_and_not_cached() {
        let (_dir, source) = seeded_source();
        let response = app(source).oneshot(get_request("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Cache-Control").unwrap(),
            "no-store"
        );
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["source"].as_str().unwrap().starts_with("sqlite:"));
    }

    #[tokio::test]
    async fn overview_returns_today_figures() {
        let (_dir, source) = seeded_source();
        let response = app(source).oneshot(get_request("/api/overview")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["today"], "2024-06-03");
        assert_eq!(json["stats"]["today_doctors"], 2);
        assert_eq!(json["stats"]["occupancy_rate"], 50.0);
    }

    #[tokio::test]
    async fn doctors_apply_query_filters() {
        let (_dir, source) = seeded_source();
        let response = app(source)
            .oneshot(get_request("/api/doctors?specialization=Cardiology"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["table_count"], 2);
        assert_eq!(json["stats"]["total_doctors"], 1);
        assert_eq!(json["filters"]["specialization"], "Cardiology");
        assert_eq!(json["filters"]["day"], "All");
        assert_eq!(json["options"]["specializations"][0], "All");
    }

    #[tokio::test]
    async fn distributions_serialize_as_ordered_objects() {
        let (_dir, source) = seeded_source();
        let response = app(source).oneshot(get_request("/api/patients")).await.unwrap();
        let json = json_body(response).await;

        let cities: Vec<_> = json["charts"]["city_dist"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(cities[0], "Jakarta");
        assert_eq!(json["charts"]["city_dist"]["Jakarta"], 2);
    }

    #[tokio::test]
    async fn every_tab_responds() {
        for uri in ["/api/rooms", "/api/pharmacy", "/api/lab-tests", "/api/staff"] {
            let (_dir, source) = seeded_source();
            let response = app(source).oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let json = json_body(response).await;
            assert_eq!(json["table_count"], 4, "{uri}");
        }
    }

    #[tokio::test]
    async fn staff_status_filter_over_http() {
        let (_dir, source) = seeded_source();
        let response = app(source)
            .oneshot(get_request("/api/staff?staff_status=Active"))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["table_count"], 3);
        assert_eq!(json["charts"]["inactive_count"], 0);
    }

    #[tokio::test]
    async fn missing_database_still_returns_empty_bundle() {
        let (_dir, source) = missing_source();
        let response = app(source).oneshot(get_request("/api/rooms")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["stats"]["total"], 0);
        assert_eq!(json["stats"]["occupancy_rate"], 0.0);
        assert_eq!(json["table"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn export_csv_attachment() {
        let (_dir, source) = seeded_source();
        let response = app(source)
            .oneshot(get_request("/api/export/lab-tests?result_status=Pending"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"lab_tests_20240603.csv\""
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "test_id,patient_id,patient_name,test_type,scheduled_date,result_date,result_status,lab_staff_id"
        );
        assert_eq!(lines.next().unwrap(), "1,1,Siti,Blood,2024-06-03,,Pending,2");
        assert_eq!(lines.next().unwrap(), "4,99,,X-Ray,2024-05-28,,Pending,5");
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn export_tsv_uses_tab_delimiter() {
        let (_dir, source) = seeded_source();
        let response = app(source)
            .oneshot(get_request("/api/export/staff?format=tsv&status=Inactive"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"staff_data_20240603.tsv\""
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("staff_id\tname\trole\tdepartment\thire_date\tactive\tyears_of_service\n"));
        assert!(text.contains("3\tCici\tNurse\tWard\t2018-03-01\tFalse\t"));
        assert_eq!(text.lines().count(), 2);
    }

    #[tokio::test]
    async fn export_rejects_unknown_entity_and_format() {
        let (_dir, source) = seeded_source();
        let response = app(source.clone())
            .oneshot(get_request("/api/export/invoices"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(source)
            .oneshot(get_request("/api/export/rooms?format=xlsx"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let (_dir, source) = seeded_source();
        let response = app(source)
            .oneshot(get_request("/api/nonexistent"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_dir_serves_frontend() {
        let (_dir, source) = seeded_source();
        let web = tempfile::tempdir().unwrap();
        std::fs::write(web.path().join("index.html"), "<h1>Dashboard</h1>").unwrap();

        let ctx = ApiContext::new(Arc::new(source), Duration::from_secs(10));
        let app = dashboard_router_with_static(ctx, Some(web.path()));
        let response = app.oneshot(get_request("/index.html")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>Dashboard</h1>");
    }
}
