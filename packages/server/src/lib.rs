#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the city watch dashboard.
//!
//! Owns the in-memory incident store, seeds it at startup, runs the
//! background feed simulator, and exposes the REST API the dashboard
//! consumes: incident queries and mutations, video analysis endpoints,
//! camera statuses, and the live analysis log stream.

mod handlers;
pub mod interactive;

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use city_watch_cameras::CameraIndex;
use city_watch_feed::generator::{INITIAL_INCIDENT_COUNT, IncidentGenerator};
use city_watch_feed::simulator;
use city_watch_feed::store::IncidentStore;

/// Shared application state.
pub struct AppState {
    /// In-memory incident store.
    pub store: Arc<RwLock<IncidentStore>>,
    /// Incident generator, locked so generated ids stay unique.
    pub generator: Arc<Mutex<IncidentGenerator>>,
    /// Camera registry with incident matching.
    pub cameras: Arc<CameraIndex>,
}

impl AppState {
    /// Acquires read access to the incident store.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn store_read(&self) -> RwLockReadGuard<'_, IncidentStore> {
        self.store.read().expect("incident store lock poisoned")
    }

    /// Acquires write access to the incident store.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn store_write(&self) -> RwLockWriteGuard<'_, IncidentStore> {
        self.store.write().expect("incident store lock poisoned")
    }

    /// Acquires exclusive access to the incident generator.
    ///
    /// # Panics
    ///
    /// Panics if the generator lock is poisoned.
    pub fn generator_lock(&self) -> MutexGuard<'_, IncidentGenerator> {
        self.generator
            .lock()
            .expect("incident generator lock poisoned")
    }
}

/// Starts the city watch API server.
///
/// Seeds the incident store with an initial batch, spawns the feed
/// simulator, and serves the API under `/api` plus the frontend static
/// files from `app/dist`. Runs until the server shuts down; the
/// simulator task is aborted on the way out.
///
/// # Errors
///
/// Returns an error if the server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Seeding incident feed...");
    let mut generator = IncidentGenerator::new();
    let mut store = IncidentStore::new();
    store.refresh(generator.initial_batch(INITIAL_INCIDENT_COUNT));

    let state = web::Data::new(AppState {
        store: Arc::new(RwLock::new(store)),
        generator: Arc::new(Mutex::new(generator)),
        cameras: Arc::new(CameraIndex::from_registry()),
    });

    let simulator = tokio::spawn(simulate_feed(state.clone()));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    let result = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/stats", web::get().to(handlers::stats))
                    .route("/incidents", web::get().to(handlers::incidents))
                    // Static segments before the `{id}` routes so they
                    // are not swallowed by the path parameter.
                    .route(
                        "/incidents/refresh",
                        web::post().to(handlers::refresh_incidents),
                    )
                    .route(
                        "/incidents/dispatch",
                        web::post().to(handlers::dispatch_incident),
                    )
                    .route("/incidents/{id}", web::get().to(handlers::incident_by_id))
                    .route(
                        "/incidents/{id}/report",
                        web::post().to(handlers::incident_report),
                    )
                    .route(
                        "/incidents/{id}/chat",
                        web::post().to(handlers::incident_chat),
                    )
                    .route(
                        "/incidents/{id}/actions",
                        web::post().to(handlers::append_action),
                    )
                    .route("/analyze/upload", web::post().to(handlers::analyze_upload))
                    .route("/analyze/clip", web::post().to(handlers::analyze_clip))
                    .route("/analyze/chat", web::post().to(handlers::clip_chat))
                    .route("/cameras", web::get().to(handlers::cameras))
                    .route("/live/logs", web::get().to(handlers::live_logs)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await;

    simulator.abort();
    result
}

/// Background task that drips simulated incidents into the store.
async fn simulate_feed(state: web::Data<AppState>) {
    loop {
        tokio::time::sleep(simulator::next_interval()).await;
        let incident = state.generator_lock().generate();
        log::debug!(
            "Simulated incident {} ({})",
            incident.id,
            incident.incident_type
        );
        state.store_write().add(incident);
    }
}
