//! CKAN Datastore API fetcher.
//!
//! Issues a single `datastore_search` request against either the public
//! open-data host or a local development proxy, and validates the response
//! envelope before handing the raw records on for normalization.

use async_trait::async_trait;

use crate::source_def::CkanFetcherConfig;
use crate::{RecordFetcher, SourceError};

/// Hostnames treated as a local development server.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Returns `true` if `host` is a local development address.
#[must_use]
pub fn is_local_host(host: &str) -> bool {
    LOCAL_HOSTS.contains(&host)
}

/// Selects the API base URL for the current runtime host.
///
/// A local host goes through the development proxy mounted at
/// `local_api_path` on that host; anything else (including no host at
/// all) talks to the public API directly.
#[must_use]
pub fn resolve_base_url(config: &CkanFetcherConfig, host: Option<&str>, port: u16) -> String {
    match host {
        Some(host) if is_local_host(host) => {
            format!("http://{host}:{port}{}", config.local_api_path)
        }
        _ => config.api_url.clone(),
    }
}

/// Fetches crime records from a CKAN `datastore_search` endpoint.
pub struct CkanFetcher {
    client: reqwest::Client,
    base_url: String,
    resource_id: String,
    limit: u64,
}

impl CkanFetcher {
    /// Creates a fetcher against `base_url` using the resource and limit
    /// from `config`.
    #[must_use]
    pub fn new(config: &CkanFetcherConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            resource_id: config.resource_id.clone(),
            limit: config.limit,
        }
    }

    /// The full `datastore_search` URL requested by this fetcher.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!(
            "{}/datastore_search?resource_id={}&limit={}",
            self.base_url.trim_end_matches('/'),
            self.resource_id,
            self.limit
        )
    }
}

#[async_trait]
impl RecordFetcher for CkanFetcher {
    async fn fetch_records(&self) -> Result<Vec<serde_json::Value>, SourceError> {
        let url = self.search_url();
        log::info!("Fetching data from: {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;

        parse_datastore_response(body)
    }
}

/// Validates a `datastore_search` response and extracts its records.
///
/// The body must carry `"success": true` and a `result.records` array.
///
/// # Errors
///
/// Returns [`SourceError::Schema`] if the success flag is missing or false,
/// or if `result.records` is missing or not an array.
pub fn parse_datastore_response(
    mut body: serde_json::Value,
) -> Result<Vec<serde_json::Value>, SourceError> {
    if body.get("success").and_then(serde_json::Value::as_bool) != Some(true) {
        return Err(SourceError::Schema {
            message: "missing or false success flag".to_string(),
        });
    }

    match body
        .get_mut("result")
        .and_then(|result| result.get_mut("records"))
        .map(serde_json::Value::take)
    {
        Some(serde_json::Value::Array(records)) => Ok(records),
        _ => Err(SourceError::Schema {
            message: "missing result.records list".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, HttpServer, web};
    use serde_json::json;

    use super::*;
    use crate::source_def::SourceDefinition;

    fn config() -> CkanFetcherConfig {
        SourceDefinition::bogota().unwrap().fetcher
    }

    /// Starts a local server that answers every request with `status` and
    /// `body`, and returns a CKAN-style base URL pointing at it.
    fn serve(status: StatusCode, body: &'static str) -> String {
        let server = HttpServer::new(move || {
            App::new().default_service(web::to(move || async move {
                HttpResponse::build(status)
                    .content_type("application/json")
                    .body(body)
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}/api/3/action")
    }

    /// A local address with nothing listening on it.
    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/api/3/action")
    }

    #[actix_web::test]
    async fn fetches_records_from_live_endpoint() {
        let body = r#"{"success": true, "result": {"records": [{"latitud": "4.65"}]}}"#;
        let fetcher = CkanFetcher::new(&config(), serve(StatusCode::OK, body));

        let records = fetcher.fetch_records().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["latitud"], "4.65");
    }

    #[actix_web::test]
    async fn error_status_maps_to_http_status() {
        let fetcher = CkanFetcher::new(&config(), serve(StatusCode::SERVICE_UNAVAILABLE, "{}"));
        let err = fetcher.fetch_records().await.unwrap_err();
        assert!(matches!(err, SourceError::HttpStatus { status: 503 }));
    }

    #[actix_web::test]
    async fn non_json_body_maps_to_json_error() {
        let fetcher = CkanFetcher::new(&config(), serve(StatusCode::OK, "not json"));
        let err = fetcher.fetch_records().await.unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[actix_web::test]
    async fn refused_connection_maps_to_transport_error() {
        let fetcher = CkanFetcher::new(&config(), closed_port_url());
        let err = fetcher.fetch_records().await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }

    #[actix_web::test]
    async fn unsuccessful_envelope_maps_to_schema_error() {
        let fetcher = CkanFetcher::new(&config(), serve(StatusCode::OK, r#"{"success": false}"#));
        let err = fetcher.fetch_records().await.unwrap_err();
        assert!(matches!(err, SourceError::Schema { .. }));
    }

    #[test]
    fn local_host_uses_proxy_path() {
        assert_eq!(
            resolve_base_url(&config(), Some("localhost"), 8000),
            "http://localhost:8000/api/proxy"
        );
        assert_eq!(
            resolve_base_url(&config(), Some("127.0.0.1"), 8080),
            "http://127.0.0.1:8080/api/proxy"
        );
    }

    #[test]
    fn other_hosts_use_public_api() {
        let public = "https://datosabiertos.bogota.gov.co/api/3/action";
        assert_eq!(resolve_base_url(&config(), Some("mapa.example.org"), 80), public);
        assert_eq!(resolve_base_url(&config(), None, 80), public);
    }

    #[test]
    fn builds_search_url() {
        let fetcher = CkanFetcher::new(&config(), "https://host/api/3/action/");
        assert_eq!(
            fetcher.search_url(),
            "https://host/api/3/action/datastore_search?resource_id=b64ba3c4-9e41-41b8-b3fd-2da21d6271a5&limit=1000"
        );
    }

    #[test]
    fn extracts_records_from_valid_response() {
        let body = json!({
            "success": true,
            "result": {"records": [{"latitud": "4.6"}, {"latitud": "4.7"}]},
        });
        let records = parse_datastore_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["latitud"], "4.7");
    }

    #[test]
    fn accepts_empty_records_list() {
        let body = json!({"success": true, "result": {"records": []}});
        assert!(parse_datastore_response(body).unwrap().is_empty());
    }

    #[test]
    fn rejects_false_success_flag() {
        let err = parse_datastore_response(json!({"success": false})).unwrap_err();
        assert!(matches!(err, SourceError::Schema { .. }));
    }

    #[test]
    fn rejects_missing_success_flag() {
        let body = json!({"result": {"records": []}});
        assert!(matches!(
            parse_datastore_response(body),
            Err(SourceError::Schema { .. })
        ));
    }

    #[test]
    fn rejects_missing_records() {
        let body = json!({"success": true, "result": {}});
        assert!(matches!(
            parse_datastore_response(body),
            Err(SourceError::Schema { .. })
        ));

        let body = json!({"success": true, "result": {"records": "none"}});
        assert!(matches!(
            parse_datastore_response(body),
            Err(SourceError::Schema { .. })
        ));
    }
}
