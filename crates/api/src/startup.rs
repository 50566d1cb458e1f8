use crate::{
    index_handler, precipitation, routes, stations, summary_between, summary_from, tobs, Dataset,
    ErrorBody, ObservationStore, SqliteStore, Station, TemperatureSummary,
};
use anyhow::{anyhow, Context};
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::{sync::Arc, time::Duration};
use surfsup_core::is_file;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared by every handler. Built once before the listener is bound and never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObservationStore>,
    pub dataset: Arc<Dataset>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::home::index::index_handler,
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::summary_from,
        routes::climate::climate_routes::summary_between,
    ),
    components(
        schemas(
                Station,
                TemperatureSummary,
                ErrorBody,
                routes::climate::climate_routes::SummaryResponse,
                routes::climate::climate_routes::NoData,
        )
    ),
    tags(
        (name = "surfsup climate api", description = "a read-only api over historical precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Opens the snapshot and loads the cached dataset
pub async fn build_app_state(
    database_path: String,
    max_connections: u32,
    query_timeout: Duration,
) -> Result<AppState, anyhow::Error> {
    if !is_file(&database_path) {
        return Err(anyhow!(
            "observation snapshot not found at: {}",
            database_path
        ));
    }

    let store = SqliteStore::new(&database_path, max_connections, query_timeout)
        .await
        .with_context(|| format!("error opening observation store at {}", database_path))?;
    store
        .health_check()
        .await
        .context("observation store failed health check")?;

    build_app_state_with_store(Arc::new(store)).await
}

/// Loads the dataset from an already opened store. Fails if the store is empty
/// or holds malformed rows, so the server never starts serving without it.
pub async fn build_app_state_with_store(
    store: Arc<dyn ObservationStore>,
) -> Result<AppState, anyhow::Error> {
    let dataset = Dataset::load(store.as_ref())
        .await
        .context("error loading observation dataset")?;

    Ok(AppState {
        store,
        dataset: Arc::new(dataset),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(summary_from))
        .route("/api/v1.0/{start}/{end}", get(summary_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
