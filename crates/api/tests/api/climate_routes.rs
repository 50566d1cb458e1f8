use crate::helpers::{get, get_json, mock_stations, mock_store, spawn_app, MOST_ACTIVE};
use axum::http::StatusCode;
use serde_json::json;
use surfsup_api::{Error, TemperatureSummary};
use time::macros::date;

#[tokio::test]
async fn index_lists_available_routes() {
    let test_app = spawn_app(mock_store()).await;

    let (status, body) = get(&test_app.app, "/").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("Available Routes:"));
    for route in [
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/2016-08-31",
        "/api/v1.0/2016-08-31/2017-01-31",
    ] {
        assert!(text.contains(route), "missing {route}");
    }
}

#[tokio::test]
async fn precipitation_averages_each_date_in_window() {
    let test_app = spawn_app(mock_store()).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "2016-08-23": 0.2,
            "2017-08-22": 0.3,
            "2017-08-23": 0.25,
        })
    );
}

#[tokio::test]
async fn precipitation_is_served_from_the_cache() {
    // load expectations are times(1); repeated requests must not hit the store
    let test_app = spawn_app(mock_store()).await;

    let (_, first) = get_json(&test_app.app, "/api/v1.0/precipitation").await;
    let (_, second) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn stations_are_listed_verbatim() {
    let mut store = mock_store();
    store
        .expect_stations()
        .times(2)
        .returning(|| Ok(mock_stations()));
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/stations").await;
    let (_, again) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, again);
    assert_eq!(
        json,
        json!([
            {
                "Station": "USC00519397",
                "Name": "WAIKIKI 717.2, HI US",
                "Latitude": 21.2716,
                "Longitude": -157.8168,
                "Elevation": 3.0
            },
            {
                "Station": "USC00519281",
                "Name": "WAIHEE 837.5, HI US",
                "Latitude": 21.45167,
                "Longitude": -157.84889,
                "Elevation": 32.9
            }
        ])
    );
}

#[tokio::test]
async fn stations_store_failure_is_a_server_error() {
    let mut store = mock_store();
    store
        .expect_stations()
        .times(1)
        .returning(|| Err(Error::StoreUnavailable(sqlx::Error::PoolTimedOut)));
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "store_unavailable");
}

#[tokio::test]
async fn tobs_keeps_all_readings_of_most_active_station() {
    let test_app = spawn_app(mock_store()).await;
    assert_eq!(test_app.state.dataset.most_active_station(), MOST_ACTIVE);

    let (status, json) = get_json(&test_app.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "2016-08-23": [77.0],
            "2017-08-22": [76.0, 78.0],
        })
    );
}

#[tokio::test]
async fn open_ended_summary_for_most_active_station() {
    let mut store = mock_store();
    store
        .expect_temperature_summary()
        .withf(|station, start, end| {
            station.to_string() == MOST_ACTIVE && *start == date!(2017 - 01 - 01) && end.is_none()
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(Some(TemperatureSummary {
                min: 60.0,
                avg: 70.0,
                max: 80.0,
            }))
        });
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"Min": 60.0, "Avg": 70.0, "Max": 80.0}));
}

#[tokio::test]
async fn bounded_summary_passes_both_dates() {
    let mut store = mock_store();
    store
        .expect_temperature_summary()
        .withf(|station, start, end| {
            station.to_string() == MOST_ACTIVE
                && *start == date!(2016 - 08 - 31)
                && *end == Some(date!(2017 - 01 - 31))
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(Some(TemperatureSummary {
                min: 58.0,
                avg: 71.5,
                max: 83.0,
            }))
        });
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/2016-08-31/2017-01-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"Min": 58.0, "Avg": 71.5, "Max": 83.0}));
}

#[tokio::test]
async fn percent_twenty_separators_are_accepted() {
    let mut store = mock_store();
    store
        .expect_temperature_summary()
        .withf(|_, start, end| *start == date!(2016 - 08 - 31) && end.is_none())
        .times(2)
        .returning(|_, _, _| Ok(None));
    let test_app = spawn_app(store).await;

    // "%20" decodes to a space, "%2520" to a literal "%20"
    let (decoded, _) = get(&test_app.app, "/api/v1.0/2016%2008-31").await;
    let (literal, _) = get(&test_app.app, "/api/v1.0/2016%252008-31").await;

    assert_eq!(decoded, StatusCode::OK);
    assert_eq!(literal, StatusCode::OK);
}

#[tokio::test]
async fn unpadded_month_and_day_are_accepted() {
    let mut store = mock_store();
    store
        .expect_temperature_summary()
        .withf(|_, start, end| {
            *start == date!(2016 - 08 - 31) && *end == Some(date!(2017 - 01 - 05))
        })
        .times(1)
        .returning(|_, _, _| Ok(None));
    let test_app = spawn_app(store).await;

    let (status, _) = get(&test_app.app, "/api/v1.0/2016-8-31/2017-1-5").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn summary_over_malformed_row_is_a_server_error() {
    let mut store = mock_store();
    store
        .expect_temperature_summary()
        .times(1)
        .returning(|_, _, _| {
            Err(Error::MalformedRow {
                id: 2,
                reason: String::from("temperature (tobs) is null"),
            })
        });
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/2010-01-01").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "malformed_row");
}

#[tokio::test]
async fn end_before_start_returns_empty_object() {
    let mut store = mock_store();
    store.expect_temperature_summary().times(0);
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/2017-06-01/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}

#[tokio::test]
async fn range_without_observations_returns_empty_object() {
    let mut store = mock_store();
    store
        .expect_temperature_summary()
        .times(1)
        .returning(|_, _, _| Ok(None));
    let test_app = spawn_app(store).await;

    let (status, json) = get_json(&test_app.app, "/api/v1.0/2030-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}

#[tokio::test]
async fn malformed_dates_are_client_errors() {
    let mut store = mock_store();
    store.expect_temperature_summary().times(0);
    let test_app = spawn_app(store).await;

    for uri in [
        "/api/v1.0/not-a-date",
        "/api/v1.0/2017-13-01",
        "/api/v1.0/2017-01-01/whenever",
        "/api/v1.0/08-31-2016/2017-01-01",
    ] {
        let (status, json) = get_json(&test_app.app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"], "invalid_date_format", "{uri}");
    }
}
