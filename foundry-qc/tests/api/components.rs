use crate::helpers::spawn_app;
use foundry_qc::domain::{Component, TouchResponse};

#[tokio::test]
async fn an_empty_query_returns_no_components() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;

    for query in ["", "   "] {
        let response = app.search_components(query).await;

        assert_eq!(200, response.status().as_u16());
        let components: Vec<Component> = response.json().await.unwrap();
        assert!(components.is_empty(), "query {query:?} returned components");
    }
}

#[tokio::test]
async fn search_matches_code_or_description_ignoring_case() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;
    app.insert_component("Y456", "Hub for x-axle").await;
    app.insert_component("Z789", "Flywheel").await;

    let components: Vec<Component> = app.search_components("x1").await.json().await.unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].code, "X123");
    assert_eq!(components[0].description, "Brake drum");

    let mut codes: Vec<String> = app
        .search_components("X")
        .await
        .json::<Vec<Component>>()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.code)
        .collect();
    codes.sort();
    assert_eq!(codes, vec!["X123".to_string(), "Y456".to_string()]);
}

#[tokio::test]
async fn search_returns_at_most_ten_components() {
    let app = spawn_app().await;
    for i in 0..15 {
        app.insert_component(&format!("X1{i:02}"), "Casting").await;
    }

    let components: Vec<Component> = app.search_components("X1").await.json().await.unwrap();

    assert_eq!(components.len(), 10);
}

#[tokio::test]
async fn wildcards_in_the_query_match_literally() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;

    let components: Vec<Component> = app.search_components("%").await.json().await.unwrap();

    assert!(components.is_empty());
}

#[tokio::test]
async fn list_returns_every_component() {
    let app = spawn_app().await;
    app.insert_component("B2", "Second").await;
    app.insert_component("A1", "First").await;

    let components: Vec<Component> = app.get("/components").await.json().await.unwrap();

    assert_eq!(
        components,
        vec![Component::new("A1", "First"), Component::new("B2", "Second")]
    );
}

#[tokio::test]
async fn touch_sets_last_used() {
    let app = spawn_app().await;
    app.insert_component("X123", "Brake drum").await;
    assert!(app.last_used("X123").await.is_none());

    let response = app
        .post("/components/touch", &serde_json::json!({"code": "X123"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let touched: TouchResponse = response.json().await.unwrap();
    assert_eq!(
        touched,
        TouchResponse {
            code: "X123".to_string(),
            touched: true
        }
    );
    assert!(app.last_used("X123").await.is_some());
}

#[tokio::test]
async fn touching_an_unknown_code_is_not_an_error() {
    let app = spawn_app().await;

    let response = app
        .post("/components/touch", &serde_json::json!({"code": "NOPE"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let touched: TouchResponse = response.json().await.unwrap();
    assert!(!touched.touched);
}

#[tokio::test]
async fn touching_a_blank_code_returns_a_400() {
    let app = spawn_app().await;

    let response = app
        .post("/components/touch", &serde_json::json!({"code": "  "}))
        .await;

    assert_eq!(400, response.status().as_u16());
}
