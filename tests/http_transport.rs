//! The reqwest transport against a mock HTTP server.

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use volland_rs::batch::Dispatcher;
use volland_rs::request::{ParadigmRequest, Request, RequestBody, RequestPackage, ZeroDteRequest};
use volland_rs::transport::{HttpTransport, Transport};
use volland_rs::{Error, Paradigm, TokenBudget, VollandClient};

const PATH: &str = "/api/v1/volland";

fn transport(server_url: &str) -> HttpTransport {
    HttpTransport::new(
        &format!("{}{}", server_url, PATH),
        "test-key",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_posts_package_with_api_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-api-key", "test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "requests": [
                {"request_type": "zerodte_request", "ticker": "SPX"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"request_type":"zerodte_request","ticker":"SPX","data":{"dealer_premium":12.5}}]"#)
        .create_async()
        .await;

    let request = Request::new(ZeroDteRequest::new("spx").unwrap());
    let package = RequestPackage::new([request.body()]);
    let reply = transport(&server.url())
        .send(package.to_bytes().unwrap())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(reply.is_success());
    let nodes: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
    assert_eq!(nodes[0]["data"]["dealer_premium"], 12.5);
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(401)
        .create_async()
        .await;

    let reply = transport(&server.url()).send("{}".into()).await.unwrap();
    assert_eq!(reply.status, 401);
    assert_eq!(reply.reason.as_deref(), Some("Unauthorized"));
}

#[tokio::test]
async fn test_dispatcher_maps_http_statuses() {
    for (status, tokens_after) in [(401u16, 9u64), (429, 0), (500, 9)] {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(status as usize)
            .create_async()
            .await;

        let budget = Arc::new(TokenBudget::new(10));
        let d = Dispatcher::new(Arc::new(transport(&server.url())), Arc::clone(&budget));
        let body: RequestBody = ParadigmRequest::new("SPY").unwrap().into();
        let err = d.exchange(&[&body]).await.unwrap_err();

        match status {
            401 => assert!(matches!(err, Error::Auth)),
            429 => assert!(matches!(err, Error::QuotaExhausted)),
            _ => assert!(matches!(err, Error::RemoteInternal)),
        }
        assert_eq!(budget.remaining(), tokens_after);
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Nothing listens on port 9 (discard) locally.
    let t = HttpTransport::new("http://127.0.0.1:9/api", "k", Duration::from_secs(2)).unwrap();
    let err = t.send("{}".into()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_) | Error::TransportTimeout));
}

#[tokio::test]
async fn test_client_against_mock_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-api-key", "secret")
        .match_body(Matcher::PartialJson(json!({
            "requests": [{"request_type": "paradigm_request", "ticker": "SPX"}]
        })))
        .with_status(200)
        .with_body(
            json!([{
                "request_type": "paradigm_request",
                "ticker": "SPX",
                "data": {
                    "paradigm": "SIDIAL-MESSY",
                    "target": null,
                    "lis": 5200.0,
                    "lastModified": "2024-06-21 10:15:00"
                }
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let client = VollandClient::builder()
        .api_key("secret")
        .base_url_override(format!("{}{}", server.url(), PATH))
        .tokens_remaining(5)
        .requests_per_second(20)
        .result_timeout(Duration::from_secs(5))
        .build()
        .await
        .unwrap();

    let result = client.request_paradigm("spx").await.unwrap().unwrap();
    mock.assert_async().await;
    assert_eq!(result.paradigm, Paradigm::SidialMessy);
    assert_eq!(result.target, None);
    assert_eq!(result.lis, Some(vec![5200.0]));
    assert_eq!(client.tokens_remaining(), 4);
}
