use crate::helpers::{spawn_app, TestApp};
use claim::{assert_none, assert_ok, assert_some};
use foundry_qc::domain::{
    Component, EventType, InoculationAdd, InoculationFilter, QcReadingAdd, QcRecord, RecordKind,
    TimeStudyAdd,
};
use foundry_qc_client::{
    ClientError, EntrySession, FormKind, QcClient, QcClientBuilder, SubmitError,
};
use std::time::Duration;

fn client(app: &TestApp) -> QcClient {
    QcClientBuilder::new()
        .connection_string(&app.address)
        .timeout(10)
        .build()
        .unwrap()
}

#[tokio::test]
async fn client_reports_a_healthy_service() {
    let app = spawn_app().await;
    assert!(client(&app).health_check().await);
}

#[tokio::test]
async fn a_created_reading_is_the_latest() {
    let app = spawn_app().await;
    let client = client(&app);
    assert_none!(assert_ok!(client.latest_qc_reading("X123").await));

    let mut reading = QcReadingAdd::new("X123").unwrap();
    reading.hot_box_temp = Some(27.0);
    let created = assert_ok!(client.add_qc_reading(&reading).await);
    assert_eq!(created.message, "QC reading recorded");

    let latest = assert_some!(assert_ok!(client.latest_qc_reading("X123").await));
    assert_eq!(latest, created.record);
    assert!(latest.matches(&reading));
}

#[tokio::test]
async fn inoculation_checks_round_trip_through_the_client() {
    let app = spawn_app().await;
    let client = client(&app);

    let mut check = InoculationAdd::new("X123").unwrap();
    check.inoculant_powder_size = Some(0.3);
    check.air_pressure = Some(6.0);
    let created = assert_ok!(client.add_inoculation(EventType::BagChange, &check).await);
    assert_eq!(created.record.is_new_bag, Some(true));
    assert_eq!(created.record.air_pressure, None);

    let filter = InoculationFilter {
        component: Some("X123".to_string()),
        event_type: Some(EventType::BagChange),
    };
    let latest = assert_some!(assert_ok!(client.latest_inoculation(&filter).await));
    assert_eq!(latest.id, created.record.id);
    assert_eq!(assert_ok!(client.get_inoculation_events(&filter).await).len(), 1);
}

#[tokio::test]
async fn search_and_touch_through_the_client() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;
    let client = client(&app);

    let found = assert_ok!(client.search_components("x1").await);
    assert_eq!(found.len(), 1);
    assert!(assert_ok!(client.touch_component("X123").await).touched);
    assert!(!assert_ok!(client.touch_component("NOPE").await).touched);
    assert_some!(app.last_used("X123").await);
}

#[tokio::test]
async fn service_errors_reach_the_client() {
    let app = spawn_app().await;
    let client = client(&app);

    let entry: TimeStudyAdd = serde_json::from_value(serde_json::json!({
        "shift": "A",
        "part_name": "Hub",
        "heat_code": "H1",
        "grade": "SG500",
    }))
    .unwrap();
    assert_ok!(client.add_time_study(&entry).await);

    // Close the pool so the next request fails on the server side.
    app.db_pool.close().await;
    let error = client.get_time_study_entries().await.unwrap_err();
    assert!(matches!(error, ClientError::Server { status: 500, .. }));
}

#[tokio::test]
async fn an_entry_session_against_the_service() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;
    let mut session = EntrySession::new(client(&app), Duration::from_secs(3600));

    let found = assert_ok!(session.search("X12").await);
    let component: Component = found.into_iter().next().unwrap();
    session.select_component(component).await;
    assert_some!(app.last_used("X123").await);

    let form = session.form_mut();
    form.input("hot_box_temp", "27");
    form.input("air_pressure", "6.0");
    form.input("inject_pressure", "1.5");
    form.check("is_new_bag", true);
    let created = assert_ok!(session.submit().await);

    assert_eq!(session.last_known(), Some(&created.record));
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].kind(), RecordKind::QcReading);

    // Selecting again prefills the hourly readings of the stored record.
    let component = session.active_component().cloned().unwrap();
    session.select_component(component).await;
    assert_eq!(session.form().value("hot_box_temp"), Some("27.0"));
    assert_eq!(session.form().value("is_new_bag"), None);

    let QcRecord::QcReading(reading) = created.record else {
        panic!("expected a QC reading");
    };
    assert_eq!(reading.component_in_production, "X123");
}

#[tokio::test]
async fn a_time_study_without_shift_is_not_sent() {
    let app = spawn_app().await;
    let mut session = EntrySession::new(client(&app), Duration::from_secs(3600));
    session.switch_form(FormKind::TimeStudy);
    session.form_mut().input("part_name", "Hub");

    let error = session.submit().await.unwrap_err();

    assert!(matches!(error, SubmitError::MissingFields(_)));
    let response = app.get("/time-study").await;
    let entries: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(entries.is_empty());
}
