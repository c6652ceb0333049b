use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use crimescope::{api, config::Settings};
use tower::ServiceExt;

fn test_settings() -> Settings {
    Settings {
        api_base_url: "http://api.test".to_string(),
        api_key: "DEMO_KEY".to_string(),
        environment: "test".to_string(),
        self_base_url: "http://127.0.0.1:8080".to_string(),
        database_url: None,
        database_type: None,
        database_host: None,
        database_port: None,
        database_name: None,
        database_user: None,
        database_password: None,
    }
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = api::router(test_settings()).expect("router builds");
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["server"], "running");
    assert_eq!(body["services"]["api"], "available");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn offenses_lists_the_fixed_enumeration() {
    let (status, body) = get("/api/offenses").await;
    assert_eq!(status, StatusCode::OK);

    let offenses = body.as_array().expect("array body");
    assert_eq!(offenses.len(), 9);
    assert_eq!(offenses[0]["value"], "violent-crime");
    assert_eq!(offenses[0]["label"], "Violent Crime");
    assert_eq!(offenses[8]["value"], "motor-vehicle-theft");
}

#[tokio::test]
async fn unknown_offense_is_rejected() {
    let (status, body) =
        get("/api/crime/estimates?agency=NJ1234567&offense=arson&start_year=2010&end_year=2020")
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("unknown offense type"));
}

#[tokio::test]
async fn inverted_year_range_is_rejected() {
    let (status, body) = get(
        "/api/crime/estimates?agency=NJ1234567&offense=robbery&start_year=2022&end_year=2010",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn unknown_offense_in_compare_list_is_rejected() {
    let (status, _) = get(
        "/api/crime/compare?agency=NJ1234567&offenses=robbery,arson&start_year=2010&end_year=2020",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
