//! HTTP handler functions for the crime heatmap API.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use crime_heatmap_layers::geojson_export::markers_to_feature_collection;
use crime_heatmap_server_models::{ApiCategory, ApiHealth, FilterUpdate};

use crate::{AppState, ServerError};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/categories`
///
/// Returns the category selector entries with their marker colors.
pub async fn categories() -> HttpResponse {
    HttpResponse::Ok().json(ApiCategory::selector_options())
}

/// `GET /api/map`
///
/// Returns the initial map center, zoom, and tile layer.
pub async fn map_view(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.map_view)
}

/// `GET /api/view`
///
/// Returns the layers, stats, and filter inputs of the session.
pub async fn view(state: web::Data<AppState>) -> HttpResponse {
    match state.view() {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => session_error(&e),
    }
}

/// `POST /api/filter`
///
/// Applies changed filter inputs and returns the rebuilt view.
pub async fn filter(state: web::Data<AppState>, update: web::Json<FilterUpdate>) -> HttpResponse {
    match state.update_filter(update.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => session_error(&e),
    }
}

/// `GET /api/markers.geojson`
///
/// Returns the marker layer as a `GeoJSON` `FeatureCollection`.
pub async fn markers_geojson(state: web::Data<AppState>) -> HttpResponse {
    match state.markers() {
        Ok(markers) => HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(markers_to_feature_collection(&markers)),
        Err(e) => session_error(&e),
    }
}

/// `POST /api/reload`
///
/// Re-fetches the dataset, falling back to demonstration data.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    match state.reload().await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => session_error(&e),
    }
}

/// `GET /api/proxy/{tail}`
///
/// Forwards the request to the public open-data API and relays the
/// upstream status and body.
pub async fn proxy(
    state: web::Data<AppState>,
    req: HttpRequest,
    tail: web::Path<String>,
) -> HttpResponse {
    let url = upstream_url(&state.upstream_api_url, &tail, req.query_string());
    log::info!("Proxying request to: {url}");

    let response = match state.http.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Proxy request failed: {e}");
            return proxy_failure();
        }
    };

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    match response.bytes().await {
        Ok(body) => HttpResponse::build(status)
            .content_type("application/json")
            .body(body),
        Err(e) => {
            log::error!("Failed to read proxied response: {e}");
            proxy_failure()
        }
    }
}

/// Joins the upstream base URL, the proxied path, and the query string.
fn upstream_url(base: &str, tail: &str, query: &str) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        tail.trim_start_matches('/')
    );
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn proxy_failure() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Failed to fetch data from external API"
    }))
}

fn session_error(e: &ServerError) -> HttpResponse {
    log::error!("Failed to access session: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Failed to access session"
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::App;
    use actix_web::test as actix_test;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone as _, Utc};
    use crime_heatmap_crime_models::CrimeCategory;
    use crime_heatmap_server_models::SessionView;
    use crime_heatmap_source::data_source::DataSource;
    use crime_heatmap_source::source_def::SourceDefinition;
    use crime_heatmap_source::synthetic::SyntheticGenerator;
    use crime_heatmap_source::{RecordFetcher, SourceError};
    use crime_heatmap_source_models::{DataOrigin, Dataset, Incident};
    use serde_json::json;

    use super::*;
    use crate::api_routes;

    struct Offline;

    #[async_trait]
    impl RecordFetcher for Offline {
        async fn fetch_records(&self) -> Result<Vec<serde_json::Value>, SourceError> {
            Err(SourceError::HttpStatus { status: 503 })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    fn state(upstream: &str) -> web::Data<AppState> {
        let def = SourceDefinition::bogota().unwrap();
        let source = DataSource::new(
            Box::new(Offline),
            def.fields,
            SyntheticGenerator::with_seed(def.synthetic, 11),
        );
        web::Data::new(AppState::new(source, upstream, today()))
    }

    fn loaded_state() -> web::Data<AppState> {
        let state = state("http://127.0.0.1:9");
        let incidents = [CrimeCategory::Homicidio, CrimeCategory::Secuestro]
            .into_iter()
            .map(|category| Incident {
                latitude: 4.65,
                longitude: -74.1,
                category: category.into(),
                occurred_at: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
                description: category.source_key().to_string(),
                address: "Calle 10 # 5-20".to_string(),
                neighborhood: "Barrio 3".to_string(),
            })
            .collect();
        state
            .session
            .write()
            .unwrap()
            .replace_dataset(Dataset::real(incidents), today());
        state
    }

    #[test]
    fn upstream_url_joins_path_and_query() {
        assert_eq!(
            upstream_url(
                "https://datosabiertos.bogota.gov.co/api/3/action/",
                "datastore_search",
                "resource_id=abc&limit=1000"
            ),
            "https://datosabiertos.bogota.gov.co/api/3/action/datastore_search?resource_id=abc&limit=1000"
        );
        assert_eq!(upstream_url("https://h/api", "x", ""), "https://h/api/x");
    }

    #[actix_web::test]
    async fn health_reports_healthy() {
        let app = actix_test::init_service(App::new().configure(api_routes)).await;
        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn categories_lists_selector_options() {
        let app = actix_test::init_service(App::new().configure(api_routes)).await;
        let req = actix_test::TestRequest::get().uri("/api/categories").to_request();
        let body: Vec<ApiCategory> = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 8);
        assert_eq!(body[0].value, "all");
    }

    #[actix_web::test]
    async fn map_view_is_centered_on_bogota() {
        let app =
            actix_test::init_service(App::new().app_data(state("")).configure(api_routes)).await;
        let req = actix_test::TestRequest::get().uri("/api/map").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["center"], json!([4.711, -74.0721]));
        assert_eq!(body["zoom"], 12);
    }

    #[actix_web::test]
    async fn view_is_loading_before_first_load() {
        let app =
            actix_test::init_service(App::new().app_data(state("")).configure(api_routes)).await;
        let req = actix_test::TestRequest::get().uri("/api/view").to_request();
        let view: SessionView = actix_test::call_and_read_body_json(&app, req).await;
        assert!(view.loading);
        assert!(view.origin.is_none());
    }

    #[actix_web::test]
    async fn filter_rebuilds_layers() {
        let app = actix_test::init_service(
            App::new()
                .app_data(loaded_state())
                .configure(api_routes),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/api/filter")
            .set_json(json!({"category": "Secuestro"}))
            .to_request();
        let view: SessionView = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.presentation.markers.len(), 1);
        assert_eq!(view.stats.kidnappings, 1);
        assert_eq!(view.stats.homicides, 0);
    }

    #[actix_web::test]
    async fn markers_export_as_geojson() {
        let app = actix_test::init_service(
            App::new()
                .app_data(loaded_state())
                .configure(api_routes),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/markers.geojson")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn reload_falls_back_to_demo_data() {
        let app =
            actix_test::init_service(App::new().app_data(state("")).configure(api_routes)).await;
        let req = actix_test::TestRequest::post().uri("/api/reload").to_request();
        let view: SessionView = actix_test::call_and_read_body_json(&app, req).await;
        assert!(!view.loading);
        assert_eq!(view.origin, Some(DataOrigin::Synthetic));
        assert!(view.notice.is_some());
        assert_eq!(view.filter.date_to, Utc::now().date_naive());
    }

    #[actix_web::test]
    async fn proxy_reports_unreachable_upstream() {
        let app = actix_test::init_service(
            App::new()
                .app_data(state("http://127.0.0.1:9/api/3/action"))
                .configure(api_routes),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/proxy/datastore_search?limit=1")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to fetch data from external API");
    }
}
