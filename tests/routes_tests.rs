// HTTP front end tests with axum-test

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{healthy_fake, test_app_config};
use vminfo::routes;
use vminfo::test_utils::{FakeMonitoringClient, fake_session};

async fn test_server(fake: FakeMonitoringClient) -> TestServer {
    let (session, _) = fake_session(fake).await;
    TestServer::try_new(routes::app(session, test_app_config())).unwrap()
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server(healthy_fake(&[])).await;
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("vminfo"));
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_index_serves_request_form() {
    let server = test_server(healthy_fake(&[])).await;
    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("name=\"vmname\""));
    assert!(body.contains("name=\"vminterval\" value=\"15\""));
}

#[tokio::test]
async fn test_report_requires_vmname() {
    let server = test_server(healthy_fake(&["web01"])).await;
    server
        .get("/report")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/report")
        .add_query_param("vmname", " , ")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_rejects_bad_interval() {
    let server = test_server(healthy_fake(&["web01"])).await;
    for bad in ["0", "-5", "soon"] {
        let response = server
            .get("/report")
            .add_query_param("vmname", "web01")
            .add_query_param("vminterval", bad)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("vminterval"));
    }
}

#[tokio::test]
async fn test_report_renders_html_for_each_target() {
    let server = test_server(healthy_fake(&["web01", "web02"])).await;
    let response = server
        .get("/report")
        .add_query_param("vmname", "web01, web02")
        .add_query_param("vminterval", "10")
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/html; charset=utf-8");
    let body = response.text();
    assert!(body.contains("NOTE: Any VM statistics are averages of the last 10 minutes"));
    assert!(body.contains("<b>web01</b>"));
    assert!(body.contains("<b>web02</b>"));
    assert_eq!(body.matches("<p>Parent Host Information</p>").count(), 2);
}

#[tokio::test]
async fn test_report_uses_default_interval_when_blank() {
    let server = test_server(healthy_fake(&["web01"])).await;
    let response = server
        .get("/report")
        .add_query_param("vmname", "web01")
        .add_query_param("vminterval", "")
        .await;
    response.assert_status_ok();
    assert!(
        response
            .text()
            .contains("NOTE: Any VM statistics are averages of the last 15 minutes")
    );
}

#[tokio::test]
async fn test_report_shows_unknown_target_inline() {
    let server = test_server(healthy_fake(&["web01"])).await;
    let response = server
        .get("/report")
        .add_query_param("vmname", "ghost,web01")
        .await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("<p class=\"error\">ERROR: Virtual machine not found: ghost</p>"));
    assert!(body.contains("<b>web01</b>"));
}
