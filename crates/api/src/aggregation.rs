//! Derived views over the cached [`Dataset`] and the observation store.
//!
//! Date keys are rendered as `YYYY-MM-DD` strings, so map iteration order is
//! chronological.

use std::collections::BTreeMap;

use log::debug;
use time::Date;

use crate::{format_date, Dataset, Error, ObservationStore, Station, TemperatureSummary};

/// Mean precipitation per date across all working-set rows, rounded to two decimals
pub fn precipitation_by_date(dataset: &Dataset) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<Date, (f64, u32)> = BTreeMap::new();
    for obs in dataset.working_set() {
        if let Some(prcp) = obs.precipitation {
            let entry = totals.entry(obs.date).or_insert((0.0, 0));
            entry.0 += prcp;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(date, (sum, count))| (format_date(date), round_two(sum / f64::from(count))))
        .collect()
}

/// Temperatures reported by the most active station inside the working set.
///
/// A station can report more than once on the same date, so every date maps to
/// all of its readings in working-set order instead of keeping only one.
pub fn temperatures_for_most_active(dataset: &Dataset) -> BTreeMap<String, Vec<f64>> {
    temperatures_for_station(dataset, dataset.most_active_station())
}

pub fn temperatures_for_station(
    dataset: &Dataset,
    station_id: &str,
) -> BTreeMap<String, Vec<f64>> {
    let mut temps: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for obs in dataset
        .working_set()
        .iter()
        .filter(|obs| obs.station_id == station_id)
    {
        temps
            .entry(format_date(obs.date))
            .or_default()
            .push(obs.temperature);
    }
    temps
}

pub async fn list_stations(store: &dyn ObservationStore) -> Result<Vec<Station>, Error> {
    store.stations().await
}

/// min/avg/max temperature of the most active station over the full store.
///
/// `Ok(None)` is the no-data outcome: either nothing matched or `end` falls
/// before `start`, in which case the store is not queried.
pub async fn temperature_summary(
    store: &dyn ObservationStore,
    dataset: &Dataset,
    start: Date,
    end: Option<Date>,
) -> Result<Option<TemperatureSummary>, Error> {
    if matches!(end, Some(end) if end < start) {
        debug!("empty range requested: {} > {:?}", start, end);
        return Ok(None);
    }

    store
        .temperature_summary(dataset.most_active_station(), start, end)
        .await
}

/// Halves round away from zero: `0.125` becomes `0.13`
fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
