use async_trait::async_trait;
use log::{debug, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    FromRow,
};
use std::{future::Future, str::FromStr, time::Duration};
use time::Date;

use super::{Observation, ObservationStore, Station, StationActivity, TemperatureSummary};
use crate::{dates::parse_date, format_date, Error};

/// Raw `measurement` row as stored in the snapshot
#[derive(Debug, FromRow)]
struct MeasurementRow {
    id: i64,
    station: String,
    date: String,
    prcp: Option<f64>,
    tobs: Option<f64>,
}

impl TryFrom<MeasurementRow> for Observation {
    type Error = Error;

    fn try_from(row: MeasurementRow) -> Result<Self, Self::Error> {
        let date = parse_date(&row.date).map_err(|e| Error::MalformedRow {
            id: row.id,
            reason: format!("unparseable date '{}': {}", row.date, e),
        })?;
        let temperature = row.tobs.ok_or_else(|| Error::MalformedRow {
            id: row.id,
            reason: String::from("temperature (tobs) is null"),
        })?;

        Ok(Observation {
            id: row.id,
            station_id: row.station,
            date,
            precipitation: row.prcp,
            temperature,
        })
    }
}

/// Raw `station` row as stored in the snapshot
#[derive(Debug, FromRow)]
struct StationRow {
    station: String,
    name: String,
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station {
            station_id: row.station,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            elevation: row.elevation,
        }
    }
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    station: String,
    observations: i64,
    first_seen: i64,
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    min_tobs: Option<f64>,
    avg_tobs: Option<f64>,
    max_tobs: Option<f64>,
    /// first row in range with a null `tobs`, if any
    null_tobs_id: Option<i64>,
}

pub struct SqliteStore {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl SqliteStore {
    /// Opens the snapshot read-only; the file is never created or written.
    pub async fn new(
        path: &str,
        max_connections: u32,
        query_timeout: Duration,
    ) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(query_timeout)
            .connect_with(options)
            .await?;

        info!("Opened observation store at: {}", path);
        Ok(Self::from_pool(pool, query_timeout))
    }

    pub fn from_pool(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Check that the store answers queries
    pub async fn health_check(&self) -> Result<(), Error> {
        self.bounded(sqlx::query("SELECT 1").fetch_one(&self.pool))
            .await?;
        Ok(())
    }

    /// Runs a query future, failing with `StoreTimeout` once `query_timeout` elapses.
    /// The pooled connection is returned when the future completes or is dropped.
    async fn bounded<T, F>(&self, query: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| Error::StoreTimeout(self.query_timeout))?
            .map_err(Error::from)
    }
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn most_recent_date(&self) -> Result<Option<Date>, Error> {
        let latest: Option<(i64, String)> = self
            .bounded(
                sqlx::query_as(
                    "SELECT id, date
                     FROM measurement
                     ORDER BY date DESC, id ASC
                     LIMIT 1",
                )
                .fetch_optional(&self.pool),
            )
            .await?;

        latest
            .map(|(id, value)| {
                parse_date(&value).map_err(|e| Error::MalformedRow {
                    id,
                    reason: format!("latest date '{}' does not parse: {}", value, e),
                })
            })
            .transpose()
    }

    async fn observations_after(&self, after: Date) -> Result<Vec<Observation>, Error> {
        let rows: Vec<MeasurementRow> = self
            .bounded(
                sqlx::query_as(
                    "SELECT id, station, date, prcp, tobs
                     FROM measurement
                     WHERE date > ?
                     ORDER BY id",
                )
                .bind(format_date(after))
                .fetch_all(&self.pool),
            )
            .await?;
        debug!("fetched {} measurement rows after {}", rows.len(), after);

        rows.into_iter().map(Observation::try_from).collect()
    }

    async fn station_activity(&self) -> Result<Vec<StationActivity>, Error> {
        let rows: Vec<ActivityRow> = self
            .bounded(
                sqlx::query_as(
                    "SELECT station, COUNT(*) AS observations, MIN(id) AS first_seen
                     FROM measurement
                     GROUP BY station
                     ORDER BY observations DESC, first_seen ASC",
                )
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| StationActivity {
                station_id: row.station,
                observations: row.observations,
                first_seen: row.first_seen,
            })
            .collect())
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let rows: Vec<StationRow> = self
            .bounded(
                sqlx::query_as(
                    "SELECT station, name, latitude, longitude, elevation
                     FROM station
                     ORDER BY id",
                )
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows.into_iter().map(Station::from).collect())
    }

    async fn temperature_summary(
        &self,
        station_id: &str,
        start: Date,
        end: Option<Date>,
    ) -> Result<Option<TemperatureSummary>, Error> {
        let mut sql = String::from(
            "SELECT MIN(tobs) AS min_tobs, AVG(tobs) AS avg_tobs, MAX(tobs) AS max_tobs,
                    MIN(CASE WHEN tobs IS NULL THEN id END) AS null_tobs_id
             FROM measurement
             WHERE station = ? AND date >= ?",
        );
        if end.is_some() {
            sql.push_str(" AND date <= ?");
        }

        let mut query = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(station_id)
            .bind(format_date(start));
        if let Some(end) = end {
            query = query.bind(format_date(end));
        }

        let row = self.bounded(query.fetch_one(&self.pool)).await?;
        if let Some(id) = row.null_tobs_id {
            return Err(Error::MalformedRow {
                id,
                reason: String::from("temperature (tobs) is null"),
            });
        }

        Ok(match (row.min_tobs, row.avg_tobs, row.max_tobs) {
            (Some(min), Some(avg), Some(max)) => Some(TemperatureSummary { min, avg, max }),
            _ => None,
        })
    }
}
