use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use sticky_note::{
    build_router, AppState, DashboardConfig, FileMarketData, InMemoryReviewStore, ReviewStore,
};
use tempfile::TempDir;
use tower::ServiceExt;

const EXECUTIVES: &str = r#"{
    "Jordan Avery": {"title": "CEO", "direct_reports": ["Morgan Blake", "Gone Person"], "role_tag": "C"},
    "Morgan Blake": {"title": "CFO", "reports_to": "Jordan Avery", "direct_reports": []}
}"#;

struct Fixture {
    _dir: TempDir,
    state: Arc<AppState>,
    reviews: Arc<InMemoryReviewStore>,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("acme_executives.json"), EXECUTIVES).unwrap();
    fs::write(dir.path().join("companies.json"), r#"{"ACME": "Acme Corp", "INIT": "Initech"}"#)
        .unwrap();
    fs::create_dir_all(dir.path().join("market")).unwrap();
    fs::write(
        dir.path().join("market").join("acme_info.json"),
        r#"{"fullTimeEmployees": 200, "totalRevenue": 2.0e9}"#,
    )
    .unwrap();

    let config = DashboardConfig {
        data_dir: dir.path().to_path_buf(),
        companies_file: dir.path().join("companies.json"),
        review_file: dir.path().join("reviews.json"),
        ..DashboardConfig::default()
    };
    let reviews = Arc::new(InMemoryReviewStore::new());
    let market = Arc::new(FileMarketData::new(dir.path()));
    let state = Arc::new(AppState::new(config, reviews.clone(), market));

    Fixture {
        _dir: dir,
        state,
        reviews,
    }
}

async fn call(state: &Arc<AppState>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = build_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_companies_sorted() {
    let f = fixture();
    let (status, body) = call(&f.state, "GET", "/api/companies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["display"], "ACME - Acme Corp");
    assert_eq!(body[1]["ticker"], "INIT");
}

#[tokio::test]
async fn test_chart_endpoint() {
    let f = fixture();

    let (status, body) = call(&f.state, "GET", "/api/companies/ACME/chart/Jordan%20Avery", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["focal"], "Jordan Avery");
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(body["nodes"][1]["label"], "Morgan");
    assert_eq!(body["badges"][0]["text"], "C");

    let (status, _) = call(&f.state, "GET", "/api/companies/ACME/chart/Nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&f.state, "GET", "/api/companies/INIT/chart/Anyone", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Executive information not available for this company.");
}

#[tokio::test]
async fn test_submit_and_read_reviews() {
    let f = fixture();
    let uri = "/api/executives/Morgan%20Blake/reviews";

    for i in 0..7 {
        let (status, body) = call(
            &f.state,
            "POST",
            uri,
            Some(json!({
                "rating": 4,
                "review": format!("review {}", i),
                "relationship": "Peer",
                "is_current_employee": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["reviewer"], "Anonymous");
    }

    let (status, body) = call(&f.state, "GET", &format!("{}?page=2", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(body["reviews"][1]["review"], "review 0");

    let (status, body) = call(&f.state, "GET", &format!("{}?page={}", uri, usize::MAX), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reviews"].as_array().unwrap().is_empty());
    assert_eq!(body["has_next"], false);

    let (_, summary) = call(&f.state, "GET", &format!("{}/summary", uri), None).await;
    assert_eq!(summary["total_reviews"], 7);
    assert_eq!(summary["sentiment"], "overwhelmingly positive");
    assert_eq!(summary["reviewer_bias"], "high");
}

#[tokio::test]
async fn test_rejected_review_is_not_stored() {
    let f = fixture();

    let (status, body) = call(
        &f.state,
        "POST",
        "/api/executives/Jordan%20Avery/reviews",
        Some(json!({ "rating": 3, "review": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please write a review before submitting");
    assert!(f.reviews.reviews_for("Jordan Avery").is_empty());
}

#[tokio::test]
async fn test_session_events() {
    let f = fixture();

    let (status, body) = call(&f.state, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    let events = format!("/api/sessions/{}/events", id);

    let (_, body) = call(
        &f.state,
        "POST",
        &events,
        Some(json!({ "type": "view_changed", "view": "executive_detail" })),
    )
    .await;
    assert_eq!(body["notice"], "Company not selected. Please return to the home page.");

    call(
        &f.state,
        "POST",
        &events,
        Some(json!({ "type": "company_selected", "ticker": "ACME", "name": "Acme Corp", "role": "viewer" })),
    )
    .await;
    call(
        &f.state,
        "POST",
        &events,
        Some(json!({ "type": "page_changed", "executive": "Morgan Blake", "page": 3 })),
    )
    .await;
    let (status, body) = call(
        &f.state,
        "POST",
        &events,
        Some(json!({ "type": "focal_changed", "executive": "Morgan Blake" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["view"], "company");
    assert_eq!(body["context"]["focal_executive"], "Morgan Blake");
    assert_eq!(body["context"]["review_pages"]["Morgan Blake"], 3);
    assert!(body["notice"].is_null());

    let (status, body) = call(
        &f.state,
        "POST",
        &format!("/api/executives/Morgan%20Blake/reviews?session={}", id),
        Some(json!({ "rating": 5, "review": "Great" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 5);

    let (_, body) = call(&f.state, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(body["context"]["review_pages"]["Morgan Blake"], 1);
}

#[tokio::test]
async fn test_overview_omits_missing_metrics() {
    let f = fixture();

    let (status, body) = call(&f.state, "GET", "/api/companies/ACME/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Corp");
    assert!(body["stock"].is_null());

    let structure = body["metrics"]["structure"].as_array().unwrap();
    let labels: Vec<&str> = structure.iter().map(|m| m["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Number of Executives", "Total Employees", "Executive Ratio"]);
    assert_eq!(body["metrics"]["financial"][1]["label"], "Revenue/Employee");
    assert_eq!(body["metrics"]["financial"][1]["value"], "$10.0M");

    let (_, body) = call(&f.state, "GET", "/api/companies/INIT/overview", None).await;
    assert!(body["metrics"]["structure"].as_array().unwrap().is_empty());
}
