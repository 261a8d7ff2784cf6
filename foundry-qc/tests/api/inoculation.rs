use crate::helpers::spawn_app;
use foundry_qc::domain::{Created, EventType, InoculationRecord};

#[tokio::test]
async fn a_bag_change_keeps_powder_readings_only_and_marks_a_new_bag() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/inoculation/bag-change",
            &serde_json::json!({
                "component_in_production": "X123",
                "powder_size": 0.4,
                "powder_moisture": 0.1,
                "air_pressure": 6.0,
                "gauge_test": 2.0,
            }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());
    let created: Created<InoculationRecord> = response.json().await.unwrap();
    let record = created.record;
    assert_eq!(record.event_type, EventType::BagChange);
    assert_eq!(record.is_new_bag, Some(true));
    assert_eq!(record.inoculant_powder_size, Some(0.4));
    assert_eq!(record.inoculant_powder_moisture, Some(0.1));
    assert_eq!(record.air_pressure, None);
    assert_eq!(record.gauge_test, None);
    assert_eq!(record.inoculation_flow_rate_rpm, None);
    assert_eq!(record.micro_structure, "Inoculation System Checks");
    assert_eq!(record.macro_structure, "Pre-Process");

    let stored: String =
        sqlx::query_scalar("SELECT event_type FROM inoculation_events WHERE id = $1")
            .bind(record.id)
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch data.");
    assert_eq!(stored, "bag_change");
}

#[tokio::test]
async fn every_event_path_stores_its_event_type() {
    let app = spawn_app().await;

    for event_type in EventType::ALL {
        let response = app
            .post(
                &format!("/inoculation/{}", event_type.path_segment()),
                &serde_json::json!({
                    "component_in_production": "X123",
                    "inoculation_flow_rate_rpm": 120,
                    "air_line_water_drainage": true,
                    "gauge_test": 2.5,
                }),
            )
            .await;

        assert_eq!(201, response.status().as_u16());
        let created: Created<InoculationRecord> = response.json().await.unwrap();
        assert_eq!(created.record.event_type, event_type);
        assert_eq!(
            created.record.inoculation_flow_rate_rpm.is_some(),
            event_type == EventType::Hourly
        );
        assert_eq!(
            created.record.air_line_water_drainage.is_some(),
            event_type == EventType::FourHourly
        );
        assert_eq!(
            created.record.gauge_test.is_some(),
            event_type == EventType::GaugeTest
        );
    }
}

#[tokio::test]
async fn an_unknown_event_path_returns_a_404() {
    let app = spawn_app().await;

    for path in ["/inoculation/weekly", "/inoculation/latest"] {
        let response = app
            .post(path, &serde_json::json!({"component_in_production": "X123"}))
            .await;

        assert_eq!(404, response.status().as_u16(), "{path}");
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn a_check_touches_its_component() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;

    app.post(
        "/inoculation/gauge-test",
        &serde_json::json!({"component_in_production": "X123", "gauge_test": 2.0}),
    )
    .await;

    assert!(app.last_used("X123").await.is_some());
}

#[tokio::test]
async fn list_and_latest_filter_by_component_and_event_type() {
    let app = spawn_app().await;
    for (component, path, rpm) in [
        ("X123", "hourly", 100),
        ("X123", "4hourly", 0),
        ("X123", "hourly", 110),
        ("Y456", "hourly", 120),
    ] {
        app.post(
            &format!("/inoculation/{path}"),
            &serde_json::json!({
                "component_in_production": component,
                "inoculation_flow_rate_rpm": rpm,
            }),
        )
        .await;
    }

    let all: Vec<InoculationRecord> = app.get("/inoculation").await.json().await.unwrap();
    assert_eq!(all.len(), 4);

    let hourly: Vec<InoculationRecord> = app
        .get("/inoculation?component=X123&event_type=hourly")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(hourly.len(), 2);
    assert_eq!(hourly[0].inoculation_flow_rate_rpm, Some(110.0));

    let latest: Option<InoculationRecord> = app
        .get("/inoculation/latest?component=X123")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(latest.unwrap().event_type, EventType::Hourly);

    let latest: Option<InoculationRecord> = app
        .get("/inoculation/latest?component=X123&event_type=4-hourly")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(latest.unwrap().event_type, EventType::FourHourly);

    let latest: Option<InoculationRecord> = app
        .get("/inoculation/latest?component=Z000")
        .await
        .json()
        .await
        .unwrap();
    assert!(latest.is_none());
}

#[tokio::test]
async fn an_unknown_event_type_filter_returns_a_400() {
    let app = spawn_app().await;

    let response = app.get("/inoculation?event_type=weekly").await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn both_names_of_a_powder_reading_return_a_400() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/inoculation/bag-change",
            &serde_json::json!({
                "component_in_production": "X123",
                "powder_size": 0.4,
                "inoculant_powder_size": 0.5,
            }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
