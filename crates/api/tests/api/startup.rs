use crate::helpers::{mock_activity, observation, MockSqliteStore, LATEST, MOST_ACTIVE};
use std::sync::Arc;
use surfsup_api::{build_app_state_with_store, dataset::window_start, Error};
use time::macros::date;

#[tokio::test]
async fn empty_store_prevents_startup() {
    let mut store = MockSqliteStore::new();
    store
        .expect_most_recent_date()
        .times(1)
        .returning(|| Ok(None));
    store.expect_observations_after().times(0);

    let result = build_app_state_with_store(Arc::new(store)).await;

    let err = result.err().expect("empty store must not start");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::EmptyDataset)
    ));
}

#[tokio::test]
async fn malformed_rows_prevent_startup() {
    let mut store = MockSqliteStore::new();
    store
        .expect_most_recent_date()
        .returning(|| Ok(Some(LATEST)));
    store.expect_observations_after().returning(|_| {
        Err(Error::MalformedRow {
            id: 42,
            reason: "temperature (tobs) is null".to_string(),
        })
    });
    store
        .expect_station_activity()
        .returning(|| Ok(mock_activity()));

    let result = build_app_state_with_store(Arc::new(store)).await;

    let err = result.err().expect("malformed rows must not start");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MalformedRow { id: 42, .. })
    ));
}

#[tokio::test]
async fn loaded_working_set_respects_window_bounds() {
    let mut store = MockSqliteStore::new();
    store
        .expect_most_recent_date()
        .times(1)
        .returning(|| Ok(Some(LATEST)));
    store.expect_observations_after().times(1).returning(|_| {
        Ok(vec![
            observation(1, MOST_ACTIVE, date!(2016 - 08 - 22), Some(0.1), 70.0),
            observation(2, MOST_ACTIVE, date!(2016 - 08 - 23), Some(0.1), 71.0),
            observation(3, MOST_ACTIVE, date!(2017 - 08 - 23), Some(0.1), 72.0),
        ])
    });
    store
        .expect_station_activity()
        .times(1)
        .returning(|| Ok(mock_activity()));

    let state = build_app_state_with_store(Arc::new(store)).await.unwrap();
    let dataset = &state.dataset;

    assert_eq!(dataset.most_recent_date(), LATEST);
    assert_eq!(dataset.window_start(), window_start(LATEST));
    assert_eq!(dataset.working_set().len(), 2);
    for obs in dataset.working_set() {
        assert!(obs.date > dataset.window_start());
        assert!(obs.date <= dataset.most_recent_date());
    }
}
