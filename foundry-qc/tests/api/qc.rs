use crate::helpers::spawn_app;
use chrono::{Duration, TimeZone, Utc};
use foundry_qc::domain::{Created, QcReading, QcReadingAdd};

#[tokio::test]
async fn a_reading_is_stored_with_a_server_timestamp_and_touches_its_component() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;
    let before = Utc::now();

    let response = app
        .post(
            "/qc",
            &serde_json::json!({
                "component_in_production": "X123",
                "hot_box_temp": 27,
                "air_pressure": 6.0,
                "inject_pressure": 1.5,
                "is_new_bag": true,
            }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());
    let created: Created<QcReading> = response.json().await.unwrap();
    let reading = created.record;
    assert_eq!(reading.component_in_production, "X123");
    assert_eq!(reading.hot_box_temp, Some(27.0));
    assert_eq!(reading.air_pressure, Some(6.0));
    assert_eq!(reading.inject_pressure, Some(1.5));
    assert!(reading.is_new_bag);
    assert!(!reading.air_drier_function);
    assert!(!reading.filter_cleaning);
    assert_eq!(reading.flow_rate_setting_a, None);
    assert!(reading.hourly_time >= before - Duration::seconds(5));

    let last_used = app.last_used("X123").await.expect("component was not touched");
    assert!(last_used >= before - Duration::seconds(5));
}

#[tokio::test]
async fn out_of_range_readings_are_stored() {
    let app = spawn_app().await;

    let mut reading = QcReadingAdd::new("X123").unwrap();
    reading.hot_box_temp = Some(45.0);
    reading.air_pressure = Some(0.5);
    let response = app.post("/qc", &reading).await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn a_reading_for_an_unknown_component_is_stored() {
    let app = spawn_app().await;

    let response = app
        .post("/qc", &serde_json::json!({"component_in_production": "UNKNOWN"}))
        .await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn invalid_bodies_return_a_400_with_an_error_body() {
    let app = spawn_app().await;

    let test_cases = [
        (serde_json::json!({}), "missing component"),
        (
            serde_json::json!({"component_in_production": "   "}),
            "blank component",
        ),
        (
            serde_json::json!({"component_in_production": "X123", "hot_box_temp": "hot"}),
            "text as a number",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post("/qc", &body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request for {description}."
        );
        let error: serde_json::Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Invalid request body");
        assert!(error["details"].is_string());
    }

    let response = app.post_raw("/qc", "{not json").await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn latest_is_null_without_readings() {
    let app = spawn_app().await;

    let response = app.latest_qc_reading("X123").await;

    assert_eq!(200, response.status().as_u16());
    let latest: Option<QcReading> = response.json().await.unwrap();
    assert!(latest.is_none());
}

#[tokio::test]
async fn latest_returns_the_most_recent_reading_of_the_component() {
    let app = spawn_app().await;
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

    for (component, hours, temp) in [
        ("X123", 1, 26.0),
        ("X123", 3, 28.0),
        ("X123", 2, 27.0),
        ("Y456", 5, 29.0),
    ] {
        let mut reading = QcReadingAdd::new(component).unwrap();
        reading.hot_box_temp = Some(temp);
        reading.hourly_time = Some(base + Duration::hours(hours));
        assert_eq!(201, app.post("/qc", &reading).await.status().as_u16());
    }

    let latest: Option<QcReading> = app.latest_qc_reading("X123").await.json().await.unwrap();

    let latest = latest.expect("no reading returned");
    assert_eq!(latest.component_in_production, "X123");
    assert_eq!(latest.hot_box_temp, Some(28.0));
    assert_eq!(latest.hourly_time, base + Duration::hours(3));
}

#[tokio::test]
async fn latest_breaks_timestamp_ties_by_id() {
    let app = spawn_app().await;
    let time = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

    for temp in [26.0, 27.0] {
        let mut reading = QcReadingAdd::new("X123").unwrap();
        reading.hot_box_temp = Some(temp);
        reading.hourly_time = Some(time);
        app.post("/qc", &reading).await;
    }

    let latest: Option<QcReading> = app.latest_qc_reading("X123").await.json().await.unwrap();

    assert_eq!(latest.unwrap().hot_box_temp, Some(27.0));
}

#[tokio::test]
async fn a_created_reading_is_the_latest_one() {
    let app = spawn_app().await;

    let mut reading = QcReadingAdd::new("X123").unwrap();
    reading.flow_rate_setting_a = Some(4.2);
    reading.feed_pipe_condition = Some("Clean".to_string());
    reading.filter_cleaning = true;
    app.post("/qc", &reading).await;

    let latest: Option<QcReading> = app.latest_qc_reading("X123").await.json().await.unwrap();

    assert!(latest.unwrap().matches(&reading));
}

#[tokio::test]
async fn list_returns_readings_newest_first() {
    let app = spawn_app().await;
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    for hours in [1, 3, 2] {
        let mut reading = QcReadingAdd::new("X123").unwrap();
        reading.hourly_time = Some(base + Duration::hours(hours));
        app.post("/qc", &reading).await;
    }

    let readings: Vec<QcReading> = app.get("/qc").await.json().await.unwrap();

    let times: Vec<_> = readings.iter().map(|r| r.hourly_time).collect();
    assert_eq!(
        times,
        vec![
            base + Duration::hours(3),
            base + Duration::hours(2),
            base + Duration::hours(1)
        ]
    );
}
