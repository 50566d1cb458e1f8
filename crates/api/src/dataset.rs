use log::info;
use time::{Date, Duration};

use crate::{db::StationActivity, format_date, Error, Observation, ObservationStore};

/// Length of the cached window ending at the most recent observation
pub const LOOKBACK_DAYS: i64 = 366;

/// Observations cached once at startup and shared read-only by every request.
///
/// The working set holds the rows with `window_start < date <= most_recent_date`
/// that carry a precipitation value, sorted ascending by date. Rows sharing a
/// date stay in store order.
#[derive(Clone, Debug)]
pub struct Dataset {
    most_recent_date: Date,
    window_start: Date,
    working_set: Vec<Observation>,
    most_active_station: String,
}

impl Dataset {
    pub async fn load(store: &dyn ObservationStore) -> Result<Self, Error> {
        let most_recent_date = store.most_recent_date().await?.ok_or(Error::EmptyDataset)?;
        let window_start = window_start(most_recent_date);

        let observations = store.observations_after(window_start).await?;
        let activity = store.station_activity().await?;

        let dataset = Self::build(most_recent_date, observations, &activity)?;
        info!(
            "loaded {} observations between {} (exclusive) and {}, most active station: {}",
            dataset.working_set.len(),
            format_date(dataset.window_start),
            format_date(dataset.most_recent_date),
            dataset.most_active_station
        );
        Ok(dataset)
    }

    /// Builds the cache from already fetched rows. `observations` must be in
    /// store order, which is kept among rows sharing a date.
    pub fn build(
        most_recent_date: Date,
        observations: Vec<Observation>,
        activity: &[StationActivity],
    ) -> Result<Self, Error> {
        let most_active_station = most_active(activity)
            .ok_or(Error::EmptyDataset)?
            .station_id
            .clone();
        let window_start = window_start(most_recent_date);

        let mut working_set: Vec<Observation> = observations
            .into_iter()
            .filter(|obs| obs.date > window_start && obs.date <= most_recent_date)
            .filter(|obs| obs.precipitation.is_some())
            .collect();
        working_set.sort_by_key(|obs| obs.date);

        Ok(Self {
            most_recent_date,
            window_start,
            working_set,
            most_active_station,
        })
    }

    pub fn most_recent_date(&self) -> Date {
        self.most_recent_date
    }

    /// Exclusive lower bound of the working set
    pub fn window_start(&self) -> Date {
        self.window_start
    }

    pub fn working_set(&self) -> &[Observation] {
        &self.working_set
    }

    pub fn most_active_station(&self) -> &str {
        &self.most_active_station
    }
}

pub fn window_start(most_recent_date: Date) -> Date {
    most_recent_date.saturating_sub(Duration::days(LOOKBACK_DAYS))
}

/// Station with the most observations. Ties go to the station that appears
/// first in store order.
pub fn most_active(activity: &[StationActivity]) -> Option<&StationActivity> {
    activity.iter().reduce(|best, candidate| {
        if candidate.observations > best.observations
            || (candidate.observations == best.observations
                && candidate.first_seen < best.first_seen)
        {
            candidate
        } else {
            best
        }
    })
}
