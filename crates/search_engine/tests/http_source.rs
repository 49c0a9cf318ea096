use std::time::Duration;

use pretty_assertions::assert_eq;
use search_core::{ApartmentHit, UnifiedResult};
use search_engine::{
    FailureKind, HitKind, HttpSource, HttpSourceSettings, SearchSource, SourceRequest,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn apartments(server: &MockServer) -> HttpSourceSettings {
    let mut settings = HttpSourceSettings::new(
        "apartments",
        format!("{}/api/apartments/search", server.uri()),
        HitKind::Apartment,
    );
    settings.records_history = true;
    settings
}

#[tokio::test]
async fn returns_decoded_hits_in_response_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apartments/search"))
        .and(query_param("q", "래미안"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id":"a2","name":"래미안 대치"},{"id":"a1","name":"래미안 원베일리","households":2990}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let source = HttpSource::new(apartments(&server)).unwrap();
    let hits = source
        .search(&SourceRequest::anonymous("래미안"))
        .await
        .expect("search ok");

    assert_eq!(
        hits,
        vec![
            UnifiedResult::Apartment(ApartmentHit {
                id: "a2".to_string(),
                name: "래미안 대치".to_string(),
                address: None,
                households: None,
            }),
            UnifiedResult::Apartment(ApartmentHit {
                id: "a1".to_string(),
                name: "래미안 원베일리".to_string(),
                address: None,
                households: Some(2990),
            }),
        ]
    );
}

#[tokio::test]
async fn history_request_sends_bearer_token_and_save_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apartments/search"))
        .and(query_param("save", "true"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpSource::new(apartments(&server)).unwrap();
    let request = SourceRequest {
        query: "자이",
        token: Some("secret-token"),
        save_history: true,
    };
    let hits = source.search(&request).await.expect("search ok");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn plain_request_carries_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apartments/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;

    let source = HttpSource::new(apartments(&server)).unwrap();
    let request = SourceRequest {
        query: "자이",
        token: Some("secret-token"),
        save_history: false,
    };
    source.search(&request).await.expect("search ok");

    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
    assert!(!received[0].url.query().unwrap_or("").contains("save="));
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let source = HttpSource::new(apartments(&server)).unwrap();
    let err = source
        .search(&SourceRequest::anonymous("자이"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Unauthorized);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpSource::new(apartments(&server)).unwrap();
    let err = source
        .search(&SourceRequest::anonymous("자이"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.kind.to_string(), "server error (503)");
}

#[tokio::test]
async fn times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("[]", "application/json"),
        )
        .mount(&server)
        .await;

    let mut settings = apartments(&server);
    settings.request_timeout = Duration::from_millis(50);
    let source = HttpSource::new(settings).unwrap();

    let err = source
        .search(&SourceRequest::anonymous("자이"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unexpected_body_maps_to_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
        .mount(&server)
        .await;

    let source = HttpSource::new(apartments(&server)).unwrap();
    let err = source
        .search(&SourceRequest::anonymous("자이"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}
