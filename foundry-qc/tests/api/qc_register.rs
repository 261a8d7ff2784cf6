use crate::helpers::spawn_app;
use chrono::{NaiveDate, NaiveTime};
use foundry_qc::domain::{Created, QcRegisterEntry};

fn entry() -> serde_json::Value {
    serde_json::json!({
        "record_date": "2024-03-01",
        "disa_line": "DISA 2",
        "part_name": "Brake drum",
        "heat_code": "H-17",
        "qty_moulds": 12,
        "remarks": "ok",
        "c1": 3.6, "si1": 1.8, "mn1": 0.3, "p1": 0.03, "s1": 0.01,
        "mg1": 0.04, "f_l1": 1.1, "cu1": 0.5, "cr1": 0.05,
        "c2": 3.5, "si2": 2.4, "mn2": 0.3, "s2": 0.01, "cr2": 0.05, "cu2": 0.5, "sn2": 0.02,
        "pouring_time": "10:15:00",
        "pouring_temp": 1390,
        "pp_code": "PP1",
        "fc_no_heat_no": "FC3/17",
        "mg_kgs": 1.2, "res_mg": 0.045, "converter_percent": 0.8,
        "rec_mg_percent": 45, "stream_innoculat": 0.1, "p_time_sec": 9,
        "treatment_no": "T4",
        "con_no": "C1",
        "tapping_time": "09:55:30",
        "corrective_addition_kgs": 2,
        "tapping_wt_kgs": 500,
    })
}

#[tokio::test]
async fn an_entry_is_stored_with_all_groups() {
    let app = spawn_app().await;

    let response = app.post("/qc-register", &entry()).await;

    assert_eq!(201, response.status().as_u16());
    let created: Created<QcRegisterEntry> = response.json().await.unwrap();
    assert_eq!(created.message, "QC Register data submitted successfully");
    let stored = created.record;
    assert_eq!(stored.record_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(stored.part_name, "Brake drum");
    assert_eq!(stored.qty_moulds, Some(12));
    assert_eq!(stored.pre_treatment.f_l1, Some(1.1));
    assert_eq!(stored.post_treatment.sn2, Some(0.02));
    assert_eq!(stored.pouring.pouring_time, NaiveTime::from_hms_opt(10, 15, 0));
    assert_eq!(stored.pouring.fc_no_heat_no.as_deref(), Some("FC3/17"));
    assert_eq!(stored.magnesium.rec_mg_percent, Some(45.0));
    assert_eq!(stored.tapping.tapping_time, NaiveTime::from_hms_opt(9, 55, 30));
    assert_eq!(stored.tapping.tapping_wt_kgs, Some(500.0));

    let entries: Vec<QcRegisterEntry> = app.get("/qc-register").await.json().await.unwrap();
    assert_eq!(entries, vec![stored]);
}

#[tokio::test]
async fn only_date_part_name_and_heat_code_are_required() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/qc-register",
            &serde_json::json!({
                "record_date": "2024-03-01",
                "part_name": "Brake drum",
                "heat_code": "H-17",
            }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn missing_required_fields_return_a_400() {
    let app = spawn_app().await;

    for field in ["record_date", "part_name", "heat_code"] {
        let mut body = entry();
        body.as_object_mut().unwrap().remove(field);

        let response = app.post("/qc-register", &body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail without {field}."
        );
    }
}
