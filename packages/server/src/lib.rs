#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for outbreak spread analysis.
//!
//! Exposes the spread engine over a small read-only REST API. The district
//! registry and the case records are loaded once at startup and shared by
//! every request; each request runs its own analysis.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use outbreak_map_cases::{CaseSourceError, CsvCaseSource, SystemClock};
use outbreak_map_district::{DistrictRegistry, RegistryError};
use outbreak_map_spread::SpreadService;
use thiserror::Error;

/// Default address the server binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors that can stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Cases(#[from] CaseSourceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Analysis entry point over the loaded registry and case records.
    pub service: SpreadService,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/spread")
                    .route("/analyze", web::get().to(handlers::analyze))
                    .route(
                        "/districts/{district}",
                        web::get().to(handlers::district_prediction),
                    )
                    .route("/compare", web::get().to(handlers::compare))
                    .route("/density", web::get().to(handlers::density))
                    .route("/routes", web::get().to(handlers::routes)),
            ),
    );
}

/// Starts the outbreak map API server from environment configuration.
///
/// Initializes logging from `RUST_LOG`, loads the district registry
/// (`DISTRICTS_PATH` or the embedded table) and the case CSV named by
/// `CASES_PATH`, then serves on `BIND_ADDR:PORT`. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the reference data or the case file cannot
/// be loaded, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading district registry...");
    let registry = DistrictRegistry::from_env()?;
    log::info!(
        "Loaded {} districts for {}",
        registry.len(),
        registry.city()
    );

    log::info!("Loading case records...");
    let source = CsvCaseSource::from_env()?;

    let service = SpreadService::new(Arc::new(registry), Arc::new(source), Arc::new(SystemClock));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    serve(service, &bind_addr, port).await?;
    Ok(())
}

/// Serves the API for an already-built [`SpreadService`].
///
/// Does not touch logging; the caller initializes it.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(service: SpreadService, bind_addr: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(AppState { service });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
