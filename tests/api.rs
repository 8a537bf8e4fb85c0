use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use quakemap::server::{create_app, AppState};
use quakemap::settings::FeedVariant;
use quakemap::{FeedClient, Settings};

const TWO_QUAKES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "mag": 4.5, "place": "X", "time": 0, "url": "u1" },
            "geometry": { "type": "Point", "coordinates": [10, 20] }
        },
        {
            "type": "Feature",
            "properties": { "mag": 1.0, "place": "Y", "time": 0, "url": "u2" },
            "geometry": { "type": "Point", "coordinates": [30, 40] }
        },
        {
            "type": "Feature",
            "properties": { "place": "no magnitude" },
            "geometry": { "type": "Point", "coordinates": [50, 60] }
        }
    ]
}"#;

const PLATES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "LAYER": "plate", "Code": "NA", "PlateName": "North America" },
            "geometry": { "type": "Polygon", "coordinates": [[[-120, 40], [-110, 40], [-110, 50], [-120, 40]]] }
        }
    ]
}"#;

async fn serve_feed() -> String {
    let app = Router::new()
        .route("/quakes", get(|| async { TWO_QUAKES }))
        .route("/plates", get(|| async { PLATES }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                TWO_QUAKES
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn app(settings: Settings) -> Router {
    let client = FeedClient::new(Duration::from_secs(5)).unwrap();
    create_app(AppState::new(settings, client))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_page_assets_are_served() {
    let app = app(Settings::default());

    for (uri, content_type) in [
        ("/", "text/html; charset=utf-8"),
        ("/style.css", "text/css"),
        ("/script.js", "application/javascript"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
    }
}

#[tokio::test]
async fn test_weekly_map_with_plates_and_legend() {
    let base = serve_feed().await;
    let settings = Settings {
        feed_url: Some(format!("{}/quakes", base)),
        plates_source: format!("{}/plates", base),
        ..Settings::default()
    };

    let (status, body) = get_json(app(settings), "/api/map").await;
    assert_eq!(status, StatusCode::OK);

    let markers = body["earthquakes"]["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0]["color"], "red");
    assert_eq!(markers[0]["radius"], 25.0);
    assert_eq!(markers[0]["position"], serde_json::json!([20.0, 10.0]));
    assert_eq!(markers[1]["color"], "green");
    assert_eq!(markers[1]["radius"], 5.0);
    assert_eq!(markers[1]["position"], serde_json::json!([40.0, 30.0]));

    assert_eq!(body["skipped_features"], 1);
    assert_eq!(body["tectonic_plates"]["name"], "Tectonic Plates");
    assert_eq!(
        body["tectonic_plates"]["boundaries"]["features"][0]["type"],
        "Feature"
    );
    assert_eq!(body["legend"]["entries"].as_array().unwrap().len(), 4);
    assert_eq!(body["view"]["zoom"], 5);
}

#[tokio::test]
async fn test_hourly_map_has_no_extras() {
    let base = serve_feed().await;
    let settings = Settings {
        feed: FeedVariant::PastHour,
        feed_url: Some(format!("{}/quakes", base)),
        ..Settings::default()
    };

    let (status, body) = get_json(app(settings), "/api/map").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feed"], "past_hour");
    assert_eq!(body["earthquakes"]["markers"][0]["radius"], 15.0);
    assert!(body.get("tectonic_plates").is_none());
    assert!(body.get("legend").is_none());
}

#[tokio::test]
async fn test_missing_plates_only_drop_the_overlay() {
    let base = serve_feed().await;
    let settings = Settings {
        feed_url: Some(format!("{}/quakes", base)),
        plates_source: format!("{}/missing", base),
        ..Settings::default()
    };

    let (status, body) = get_json(app(settings), "/api/map").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("tectonic_plates").is_none());
    assert_eq!(body["earthquakes"]["markers"].as_array().unwrap().len(), 2);

    let warnings = body["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().starts_with("Tectonic plates overlay unavailable")));
}

#[tokio::test]
async fn test_feed_failure_is_reported() {
    let base = serve_feed().await;
    let settings = Settings {
        feed_url: Some(format!("{}/missing", base)),
        show_plates: Some(false),
        ..Settings::default()
    };

    let (status, body) = get_json(app(settings), "/api/map").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "status");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Earthquake data could not be loaded"));
}

#[tokio::test]
async fn test_feed_timeout_is_gateway_timeout() {
    let base = serve_feed().await;
    let settings = Settings {
        feed_url: Some(format!("{}/slow", base)),
        show_plates: Some(false),
        ..Settings::default()
    };
    let client = FeedClient::new(Duration::from_millis(200)).unwrap();
    let app = create_app(AppState::new(settings, client));

    let (status, body) = get_json(app, "/api/map").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "timeout");
}
