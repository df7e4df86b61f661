#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the Bogotá crime heatmap.
//!
//! Holds one [`session::Session`] in memory and exposes it through a small
//! REST API: the page reads the current layers and stats, posts filter
//! changes, and asks for a reload. The server also forwards
//! `/api/proxy/...` to the public open-data API so that a locally served
//! page can fetch data without cross-origin restrictions, and serves the
//! page's static files.

pub mod config;
mod handlers;
pub mod session;

use std::sync::RwLock;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use chrono::{NaiveDate, Utc};
use crime_heatmap_layers_models::{MapView, MarkerLayer};
use crime_heatmap_server_models::{FilterUpdate, SessionView};
use crime_heatmap_source::SourceError;
use crime_heatmap_source::data_source::DataSource;
use crime_heatmap_source::source_def::SourceDefinition;
use crime_heatmap_source::synthetic::SyntheticGenerator;

use crate::config::ServerConfig;
use crate::session::Session;

/// Errors raised while starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The data source definition could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Binding or running the HTTP server failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A handler panicked while holding the session.
    #[error("Session lock poisoned")]
    SessionLock,
}

/// Shared application state.
pub struct AppState {
    /// The single in-memory session.
    pub session: RwLock<Session>,
    /// Where incidents are loaded from.
    pub source: DataSource,
    /// Public API base URL that `/api/proxy` forwards to.
    pub upstream_api_url: String,
    /// Client used by the proxy.
    pub http: reqwest::Client,
    /// Initial map view sent to the page.
    pub map_view: MapView,
}

impl AppState {
    /// Creates state around `source` with a pending session whose default
    /// date range ends `today`.
    #[must_use]
    pub fn new(source: DataSource, upstream_api_url: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            session: RwLock::new(Session::pending(today)),
            source,
            upstream_api_url: upstream_api_url.into(),
            http: reqwest::Client::new(),
            map_view: MapView::default(),
        }
    }

    /// Builds state for the embedded Bogotá source.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Source`] if the embedded source definition is
    /// invalid.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let definition = SourceDefinition::bogota()?;
        log::info!(
            "Loaded source definition '{}' ({})",
            definition.name,
            definition.city
        );

        let generator = match config.seed {
            Some(seed) => SyntheticGenerator::with_seed(definition.synthetic.clone(), seed),
            None => SyntheticGenerator::new(definition.synthetic.clone()),
        };
        let source = DataSource::ckan(
            &definition,
            Some(&config.host),
            config.port,
            config.api_url.clone(),
            generator,
        );

        Ok(Self::new(
            source,
            definition.fetcher.api_url,
            Utc::now().date_naive(),
        ))
    }

    /// Snapshot of the session.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SessionLock`] if the session lock is poisoned.
    pub fn view(&self) -> Result<SessionView, ServerError> {
        let session = self.session.read().map_err(|_| ServerError::SessionLock)?;
        Ok(session.view())
    }

    /// The current marker layer.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SessionLock`] if the session lock is poisoned.
    pub fn markers(&self) -> Result<MarkerLayer, ServerError> {
        let session = self.session.read().map_err(|_| ServerError::SessionLock)?;
        Ok(session.presentation().markers.clone())
    }

    /// Applies a filter change and returns the refreshed view.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SessionLock`] if the session lock is poisoned.
    pub fn update_filter(&self, update: FilterUpdate) -> Result<SessionView, ServerError> {
        let mut session = self.session.write().map_err(|_| ServerError::SessionLock)?;
        session.apply(update);
        Ok(session.view())
    }

    /// Re-fetches the dataset and returns the refreshed view.
    ///
    /// This is the only load path: the initial load at startup and every
    /// `POST /api/reload` go through it. The session lock is released
    /// during the fetch so readers keep seeing the previous dataset,
    /// flagged as loading.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SessionLock`] if the session lock is poisoned.
    pub async fn reload(&self) -> Result<SessionView, ServerError> {
        self.session
            .write()
            .map_err(|_| ServerError::SessionLock)?
            .begin_loading();

        let dataset = self.source.load().await;

        let mut session = self.session.write().map_err(|_| ServerError::SessionLock)?;
        session.replace_dataset(dataset, Utc::now().date_naive());
        Ok(session.view())
    }
}

/// Registers the `/api` routes.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/categories", web::get().to(handlers::categories))
            .route("/map", web::get().to(handlers::map_view))
            .route("/view", web::get().to(handlers::view))
            .route("/filter", web::post().to(handlers::filter))
            .route("/markers.geojson", web::get().to(handlers::markers_geojson))
            .route("/reload", web::post().to(handlers::reload))
            .route("/proxy/{tail:.*}", web::get().to(handlers::proxy)),
    );
}

/// Starts the crime heatmap server.
///
/// Binds the HTTP server first and then performs the initial data load in
/// the background, so a local page can already reach `/api/proxy` while
/// the load is in flight. Until it completes the session reports itself as
/// loading. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Source`] if the source definition is invalid and
/// [`ServerError::Io`] if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let state = web::Data::new(AppState::from_config(&config)?);
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    let app_state = state.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(api_routes)
            // Serve the map page
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run();

    actix_web::rt::spawn(async move {
        log::info!("Loading crime data...");
        if let Err(e) = state.reload().await {
            log::error!("Initial load failed: {e}");
        }
    });

    server.await?;
    Ok(())
}
