use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;

use rentcheck_rs::dataset::{DataConfig, RentData};
use rentcheck_rs::server::build_app;

fn fixture_config() -> DataConfig {
    DataConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data"),
        zip_index_url: None,
    }
}

/// Serve `data` on an ephemeral port and return its base URL
async fn spawn_app(data: RentData) -> String {
    let app = build_app(Arc::new(data));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_fixture_app() -> String {
    spawn_app(RentData::load(&fixture_config()).await).await
}

#[tokio::test]
async fn test_health() {
    let base = spawn_fixture_app().await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_city_page_prefills_rent_and_zip() {
    let base = spawn_fixture_app().await;
    let response = reqwest::get(format!("{}/texas/austin-78701", base))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains("<title>Salary needed to live in Austin, texas | Income Calculator</title>"));
    assert!(html.contains("Average 2-Bed Rent: <strong>$1,890/mo</strong>"));
    assert!(html.contains(r#"value="78701""#));
    assert!(html.contains("Enter salary to see result"));
}

#[tokio::test]
async fn test_city_page_with_salary_shows_verdict() {
    let base = spawn_fixture_app().await;
    let html = reqwest::get(format!("{}/texas/austin-78701?salary=65%2C000", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    // 1890 / 4246.29 = 44.5%
    assert!(html.contains("YES ✅"));
    assert!(html.contains("<strong>44.5%</strong>"));
}

#[tokio::test]
async fn test_city_page_other_zip_not_found() {
    let base = spawn_fixture_app().await;
    let html = reqwest::get(format!("{}/texas/austin-78701?zip=99999", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("LOCATION NOT FOUND"));
    assert!(!html.contains("Average 2-Bed Rent"));
    assert!(html.contains("Enter details to calculate"));
}

#[tokio::test]
async fn test_home_zip_autofill() {
    let base = spawn_fixture_app().await;
    let html = reqwest::get(format!("{}/?zip=44308&salary=30000", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("AKRON"));
    assert!(html.contains("$980/mo"));
    assert!(html.contains("Rent is <strong>"));
}

#[tokio::test]
async fn test_state_page_sorted() {
    let base = spawn_fixture_app().await;
    let html = reqwest::get(format!("{}/texas", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let abilene = html.find("Abilene").unwrap();
    let austin = html.find("Austin").unwrap();
    let el_paso = html.find("El Paso").unwrap();
    let waco = html.find("Waco").unwrap();
    assert!(abilene < austin && austin < el_paso && el_paso < waco);
    assert!(html.contains(r#"href="/texas/austin-78701""#));
}

#[tokio::test]
async fn test_encoded_city_link_resolves() {
    let base = spawn_fixture_app().await;
    let html = reqwest::get(format!("{}/idaho", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"href="/idaho/coeur-d%27alene-83814""#));

    let response = reqwest::get(format!("{}/idaho/coeur-d%27alene-83814", base))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Coeur d&#39;Alene"));
    assert!(html.contains(r#"action="/idaho/coeur-d%27alene-83814""#));
}

#[tokio::test]
async fn test_unknown_pages_are_404() {
    let base = spawn_fixture_app().await;
    for path in ["/atlantis", "/texas/nowhere-00000", "/a/b/c"] {
        let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
    }
    let html = reqwest::get(format!("{}/texas/nowhere-00000", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("<title>City Not Found</title>"));
}

#[tokio::test]
async fn test_zip_api() {
    let base = spawn_fixture_app().await;

    let found = reqwest::get(format!("{}/api/zip/10001", base)).await.unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    let body: Value = found.json().await.unwrap();
    assert_eq!(body["data"]["rent"], 2780);
    assert_eq!(body["data"]["state_slug"], "new-york");

    let partial = reqwest::get(format!("{}/api/zip/100", base)).await.unwrap();
    assert_eq!(partial.status(), StatusCode::BAD_REQUEST);

    let missing = reqwest::get(format!("{}/api/zip/abcde", base)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "LOCATION NOT FOUND");
}

#[tokio::test]
async fn test_zip_api_without_index() {
    let base = spawn_app(RentData::default()).await;
    let response = reqwest::get(format!("{}/api/zip/78701", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let asset = reqwest::get(format!("{}/data/zip_index.json", base)).await.unwrap();
    assert_eq!(asset.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_affordability_api() {
    let base = spawn_fixture_app().await;

    let body: Value = reqwest::get(format!(
        "{}/api/affordability?salary=65000&rent=1500",
        base
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(body["data"]["percent_display"], "35.3");
    assert_eq!(body["data"]["result"]["is_affordable"], true);

    let body: Value = reqwest::get(format!("{}/api/affordability?salary=65000&zip=10001", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["monthly_rent"], 2780);
    assert_eq!(body["data"]["result"]["is_affordable"], false);

    let incomplete = reqwest::get(format!("{}/api/affordability?salary=abc&rent=1500", base))
        .await
        .unwrap();
    assert_eq!(incomplete.status(), StatusCode::BAD_REQUEST);

    let no_rent = reqwest::get(format!("{}/api/affordability?salary=65000", base))
        .await
        .unwrap();
    assert_eq!(no_rent.status(), StatusCode::BAD_REQUEST);

    let bad_rent = reqwest::get(format!("{}/api/affordability?salary=65000&rent=abc", base))
        .await
        .unwrap();
    assert_eq!(bad_rent.status(), StatusCode::BAD_REQUEST);
    let body: Value = bad_rent.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Enter details to calculate");

    let body: Value = reqwest::get(format!(
        "{}/api/affordability?salary=65000&rent=%241%2C500",
        base
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(body["data"]["monthly_rent"], 1500);
    assert_eq!(body["data"]["percent_display"], "35.3");
}

#[tokio::test]
async fn test_affordability_explicit_rent_omits_zip_location() {
    let base = spawn_fixture_app().await;

    let body: Value = reqwest::get(format!(
        "{}/api/affordability?salary=65000&rent=1500&zip=10001",
        base
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(body["data"]["monthly_rent"], 1500);
    assert!(body["data"]["location"].is_null());

    let body: Value = reqwest::get(format!("{}/api/affordability?salary=65000&zip=10001", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["location"]["zip"], "10001");
    assert_eq!(body["data"]["location"]["rent"], 2780);
}

#[tokio::test]
async fn test_state_apis() {
    let base = spawn_fixture_app().await;

    let body: Value = reqwest::get(format!("{}/api/states", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let states = body["data"].as_array().unwrap();
    assert_eq!(states.len(), 51);
    let texas = states.iter().find(|s| s["slug"] == "texas").unwrap();
    assert_eq!(texas["cities"], 4);

    let body: Value = reqwest::get(format!("{}/api/states/ohio", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"][0]["name"], "Akron");
    assert_eq!(body["data"][1]["name"], "Columbus");

    let missing = reqwest::get(format!("{}/api/states/atlantis", base)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zip_index_asset_uses_compact_keys() {
    let base = spawn_fixture_app().await;
    let body: Value = reqwest::get(format!("{}/data/zip_index.json", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["78701"]["r"], 1890);
    assert_eq!(body["78701"]["s"], "texas");
    assert_eq!(body["78701"]["c"], "Austin");
}

#[tokio::test]
async fn test_metrics_count_requests() {
    let base = spawn_fixture_app().await;
    reqwest::get(format!("{}/texas", base)).await.unwrap();
    reqwest::get(format!("{}/api/zip/78701", base)).await.unwrap();

    let body: Value = reqwest::get(format!("{}/api/metrics", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total_requests"], 2);
    assert_eq!(body["requests_in_flight"], 0);
}
