use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app.health_check().await;

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let app = spawn_app().await;

    let response = app.health_check().await;

    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn preflight_requests_are_answered() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/qc", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(204, response.status().as_u16());
}

#[tokio::test]
async fn unknown_routes_return_a_404_with_an_error_body() {
    let app = spawn_app().await;

    let response = app.get("/does-not-exist").await;

    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = spawn_app().await;

    let response = app.get("/metrics").await;

    assert!(response.status().is_success());
    let text = response.text().await.unwrap();
    assert!(text.contains("foundry_qc_records_created_total"));
    assert!(text.contains("foundry_qc_touch_failures_total"));
}
