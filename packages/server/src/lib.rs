#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the street tree planting planner.
//!
//! Serves the species catalog, proxies bounding-box queries to the NYC
//! street tree census, and exposes the in-memory planting scenario with
//! its benefit projections. The frontend is served as static files from
//! the configured directory.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use street_trees_census::socrata::SocrataTreeCensus;
use street_trees_census::{CensusSource, HiddenTrees};
use street_trees_scenario::ScenarioStore;
use street_trees_species::SpeciesCatalog;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Read-only species catalog.
    pub catalog: Arc<SpeciesCatalog>,
    /// The planting scenario being edited.
    pub scenario: Arc<ScenarioStore>,
    /// Upstream provider of existing street trees.
    pub census: Arc<dyn CensusSource>,
    /// Census trees hidden from the map by the user.
    pub hidden_census_trees: Arc<HiddenTrees>,
}

impl AppState {
    /// Creates state with an empty scenario over `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<SpeciesCatalog>, census: Arc<dyn CensusSource>) -> Self {
        Self {
            scenario: Arc::new(ScenarioStore::new(Arc::clone(&catalog))),
            catalog,
            census,
            hidden_census_trees: Arc::new(HiddenTrees::new()),
        }
    }
}

/// Registers the `/api` routes. Expects `web::Data<AppState>` to be
/// registered on the app.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/species", web::get().to(handlers::species))
            .route("/existing-trees", web::get().to(handlers::existing_trees))
            .route(
                "/existing-trees/{tree_id}/remove",
                web::post().to(handlers::remove_existing_tree),
            )
            .route("/scenario", web::get().to(handlers::scenario))
            .route("/scenario/trees", web::post().to(handlers::add_tree))
            .route(
                "/scenario/trees/{tree_id}",
                web::patch().to(handlers::update_tree),
            )
            .route(
                "/scenario/trees/{tree_id}",
                web::delete().to(handlers::delete_tree),
            )
            .route("/scenario/projection", web::get().to(handlers::projection)),
    );
}

/// Starts the street trees API server.
///
/// Reads [`ServerConfig`] from the environment, loads the embedded species
/// catalog, and serves the API plus static frontend files. The caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the species catalog fails to
/// load, the HTTP server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();

    log::info!("Loading species catalog...");
    let catalog = SpeciesCatalog::embedded().map_err(std::io::Error::other)?;

    log::info!("Using tree census at {}", config.census_url);
    let census = SocrataTreeCensus::new(config.census_url.clone());

    let state = web::Data::new(AppState::new(Arc::new(catalog), Arc::new(census)));
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
