use crate::helpers::spawn_app;
use foundry_qc::domain::{Created, TimeStudyEntry};

fn entry() -> serde_json::Value {
    serde_json::json!({
        "shift": "A",
        "c": 3.5, "si": 2.2, "mn": 0.3, "p": 0.03, "s": 0.01, "cr": 0.05,
        "ni": 0.02, "al": 0.01, "cu": 0.4, "sn": 0.02, "mo": 0.01,
        "cac2_s": 1.0, "fesi_sh": 2.0, "femn_sic": 0.5, "cu_fecr": 0.2,
        "carbon_steel": "40 kg",
        "part_name": "Hub",
        "heat_code": "H-3",
        "grade": "SG 500/7",
    })
}

#[tokio::test]
async fn an_entry_is_stored_and_listed() {
    let app = spawn_app().await;

    let response = app.post("/time-study", &entry()).await;

    assert_eq!(201, response.status().as_u16());
    let created: Created<TimeStudyEntry> = response.json().await.unwrap();
    assert_eq!(created.message, "Time study data successfully recorded");
    let stored = created.record;
    assert_eq!(stored.shift, "A");
    assert_eq!(stored.composition.mo, Some(0.01));
    assert_eq!(stored.additives.cu_fecr, Some(0.2));
    assert_eq!(stored.additives.carbon_steel.as_deref(), Some("40 kg"));
    assert_eq!(stored.grade, "SG 500/7");

    let entries: Vec<TimeStudyEntry> = app.get("/time-study").await.json().await.unwrap();
    assert_eq!(entries, vec![stored]);
}

#[tokio::test]
async fn missing_required_fields_return_a_400() {
    let app = spawn_app().await;

    for field in ["shift", "part_name", "heat_code", "grade"] {
        let mut body = entry();
        body.as_object_mut().unwrap().remove(field);

        let response = app.post("/time-study", &body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail without {field}."
        );
        let error: serde_json::Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Invalid request body");
    }
}

#[tokio::test]
async fn stored_entries_are_counted() {
    let app = spawn_app().await;

    app.post("/time-study", &entry()).await;
    app.post("/time-study", &entry()).await;

    let metrics = app.get("/metrics").await.text().await.unwrap();
    assert!(metrics.contains(r#"foundry_qc_records_created_total{kind="time_study"} 2"#));
}
