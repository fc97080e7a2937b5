//! End-to-end lookups through a configured session against mock services.

use std::sync::Arc;

use geoweather_core::{
    ConditionLabel, Config, LookupError, LookupOutcome, NoopMap, NoopObserver, Session,
    resolver_from_config,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_body(temperature: f64, code: i32) -> serde_json::Value {
    serde_json::json!({
        "current": {
            "temperature_2m": temperature,
            "relative_humidity_2m": 60,
            "apparent_temperature": temperature - 1.0,
            "weather_code": code,
            "wind_speed_10m": 6.0,
            "surface_pressure": 1012.3
        },
        "daily": {
            "time": ["2024-05-01", "2024-05-02", "2024-05-03"],
            "weather_code": [code, 3, 80],
            "temperature_2m_max": [21.0, 20.0, 19.0],
            "temperature_2m_min": [11.0, 10.0, 9.0],
            "sunrise": ["2024-05-01T05:39", "2024-05-02T05:38", "2024-05-03T05:37"],
            "sunset": ["2024-05-01T19:27", "2024-05-02T19:28", "2024-05-03T19:29"]
        }
    })
}

fn config_for(server: &MockServer) -> Config {
    let mut cfg = Config::default();
    cfg.endpoints.weather = format!("{}/v1/forecast", server.uri());
    cfg.endpoints.reverse_geocode = format!("{}/reverse", server.uri());
    cfg.endpoints.search = format!("{}/search", server.uri());
    cfg.endpoints.ip_location = format!("{}/json/", server.uri());
    cfg
}

fn session_for(server: &MockServer) -> Session {
    let resolver = resolver_from_config(&config_for(server)).unwrap();
    Session::new(resolver, Arc::new(NoopObserver), Arc::new(NoopMap))
}

async fn mount_seoul(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "37.5665"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(18.4, 1)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "37.5665"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": {"city": "Seoul", "country": "South Korea"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn seoul_click_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_seoul(&mock_server).await;

    let session = session_for(&mock_server);
    let outcome = session.click(37.5665, 126.9780).await;

    let LookupOutcome::Applied(location) = outcome else {
        panic!("expected a resolved location, got {outcome:?}");
    };
    assert_eq!(location.display_name, "Seoul");
    assert_eq!(location.country_name, "South Korea");
    assert_eq!(location.current.temperature_c, 18);
    assert_eq!(location.current.condition, ConditionLabel::PartlyCloudy);
    assert_eq!(location.current.visibility_km, 10);
    assert_eq!(location.current.uv_index, 3);
    assert_eq!(location.forecast.len(), 3);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn search_then_weather_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_seoul(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Seoul"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "37.5665", "lon": "126.978", "display_name": "Seoul, South Korea"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server);
    let outcome = session.search("  Seoul  ").await;

    assert!(matches!(outcome, LookupOutcome::Applied(ref l) if l.display_name == "Seoul"));
    assert_eq!(session.search_text(), "  Seoul  ");
}

#[tokio::test]
async fn weather_outage_leaves_selection_alone() {
    let mock_server = MockServer::start().await;
    mount_seoul(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.8566"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "48.8566"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": {"city": "Paris", "country": "France"}
        })))
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server);
    session.click(37.5665, 126.978).await;

    let outcome = session.click(48.8566, 2.3522).await;

    let LookupOutcome::Failed(LookupError::WeatherUnavailable(reason)) = outcome else {
        panic!("expected weather failure, got {outcome:?}");
    };
    assert!(reason.contains("503"));
    assert_eq!(session.selected().unwrap().display_name, "Seoul");
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn reverse_geocode_outage_still_shows_weather() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(-3.5, 73)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server);
    let outcome = session.click(64.1466, -21.9426).await;

    let LookupOutcome::Applied(location) = outcome else {
        panic!("expected a resolved location, got {outcome:?}");
    };
    assert_eq!(location.display_name, "Unknown location");
    assert_eq!(location.current.temperature_c, -4);
    assert_eq!(location.current.condition, ConditionLabel::Snow);
}

#[tokio::test]
async fn blank_search_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server);
    assert_eq!(session.search(" \n ").await, LookupOutcome::Skipped);
    assert!(session.selected().is_none());
}

#[tokio::test]
async fn locate_via_ip_service() {
    let mock_server = MockServer::start().await;
    mount_seoul(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 37.5665,
            "longitude": 126.978
        })))
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server);
    let outcome = session.locate().await;

    assert!(matches!(outcome, LookupOutcome::Applied(ref l) if l.display_name == "Seoul"));
}
