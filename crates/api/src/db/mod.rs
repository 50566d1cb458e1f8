pub mod sqlite;

pub use sqlite::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

use crate::Error;

/// One station/date reading from the `measurement` table
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub id: i64,
    pub station_id: String,
    pub date: Date,
    pub precipitation: Option<f64>,
    pub temperature: f64,
}

/// Reference data for a weather station, serialized verbatim by the stations route
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Station {
    #[serde(rename = "Station")]
    pub station_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
}

/// Number of observations a station has reported across the whole store
#[derive(Clone, Debug, PartialEq)]
pub struct StationActivity {
    pub station_id: String,
    pub observations: i64,
    /// Lowest store id among the station's observations, i.e. where the
    /// station first appears in store order
    pub first_seen: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureSummary {
    #[serde(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Avg")]
    pub avg: f64,
    #[serde(rename = "Max")]
    pub max: f64,
}

/// Read-only access to the observation snapshot
#[async_trait]
pub trait ObservationStore: Sync + Send {
    /// Latest observation date in the store, `None` when the store is empty
    async fn most_recent_date(&self) -> Result<Option<Date>, Error>;
    /// All observations dated strictly after `after`, in store order
    async fn observations_after(&self, after: Date) -> Result<Vec<Observation>, Error>;
    /// Observation count for every station that has reported at least once
    async fn station_activity(&self) -> Result<Vec<StationActivity>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// min/avg/max temperature for one station with `start <= date` and, when
    /// given, `date <= end`. `None` when no rows match.
    async fn temperature_summary(
        &self,
        station_id: &str,
        start: Date,
        end: Option<Date>,
    ) -> Result<Option<TemperatureSummary>, Error>;
}
