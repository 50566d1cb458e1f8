use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{
    list_stations, parse_path_date, precipitation_by_date, temperature_summary,
    temperatures_for_most_active, AppState, Error, ErrorBody, Station, TemperatureSummary,
};

/// Returned by the summary routes when no observation falls inside the range
#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct NoData {}

#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum SummaryResponse {
    Summary(TemperatureSummary),
    NoData(NoData),
}

impl From<Option<TemperatureSummary>> for SummaryResponse {
    fn from(summary: Option<TemperatureSummary>) -> Self {
        match summary {
            Some(summary) => SummaryResponse::Summary(summary),
            None => SummaryResponse::NoData(NoData {}),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Mean precipitation per date over the most recent year", content_type = "application/json", body = BTreeMap<String, f64>),
    ))]
pub async fn precipitation(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, f64>> {
    Json(precipitation_by_date(&state.dataset))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station in the snapshot", content_type = "application/json", body = Vec<Station>),
        (status = SERVICE_UNAVAILABLE, description = "Observation store could not be read", body = ErrorBody),
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Station>>, Error> {
    let stations = list_stations(state.store.as_ref()).await?;
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperatures per date reported by the most active station over the most recent year", content_type = "application/json", body = BTreeMap<String, Vec<f64>>),
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, Vec<f64>>> {
    Json(temperatures_for_most_active(&state.dataset))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature of the most active station from start onwards, or {} when nothing matched", content_type = "application/json", body = SummaryResponse),
        (status = BAD_REQUEST, description = "Start is not a YYYY-MM-DD date", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Observation store could not be read", body = ErrorBody),
    ))]
pub async fn summary_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<SummaryResponse>, Error> {
    let start = parse_path_date(&start)?;
    debug!("temperature summary from {}", start);

    let summary = temperature_summary(state.store.as_ref(), &state.dataset, start, None).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date included, YYYY-MM-DD"),
         ("end" = String, Path, description = "Last date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature of the most active station between start and end, or {} when nothing matched", content_type = "application/json", body = SummaryResponse),
        (status = BAD_REQUEST, description = "Start or end is not a YYYY-MM-DD date", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Observation store could not be read", body = ErrorBody),
    ))]
pub async fn summary_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<SummaryResponse>, Error> {
    let start = parse_path_date(&start)?;
    let end = parse_path_date(&end)?;
    debug!("temperature summary from {} to {}", start, end);

    let summary =
        temperature_summary(state.store.as_ref(), &state.dataset, start, Some(end)).await?;
    Ok(Json(summary.into()))
}
