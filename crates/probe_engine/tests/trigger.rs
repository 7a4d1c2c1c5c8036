use std::time::Duration;

use probe_core::{TriggerCall, TriggerRequest};
use probe_engine::{HttpSettings, HttpTrigger, Trigger, TriggerFailure};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reparse_call() -> TriggerCall {
    TriggerCall::reparse(&TriggerRequest::new(32, "python"))
}

#[tokio::test]
async fn accepted_reparse_returns_ack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/reparse"))
        .and(body_string_contains("projectId=32"))
        .and(body_string_contains("language=python"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "SUCCESS",
            "obj": { "message": "parsing started" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let trigger = HttpTrigger::new(server.uri(), &HttpSettings::default()).unwrap();
    let ack = trigger.fire(&reparse_call()).await.expect("trigger ok");
    assert_eq!(ack.status, 200);
    assert_eq!(ack.body.code, 200);
    assert_eq!(ack.body.obj.unwrap()["message"], "parsing started");
}

#[tokio::test]
async fn embedded_error_code_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/reparse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500500,
            "message": "project not found"
        })))
        .mount(&server)
        .await;

    let trigger = HttpTrigger::new(server.uri(), &HttpSettings::default()).unwrap();
    let err = trigger.fire(&reparse_call()).await.unwrap_err();
    assert_eq!(
        err.kind,
        TriggerFailure::Rejected {
            code: 500500,
            message: Some("project not found".into())
        }
    );
    assert!(!err.kind.is_transport());
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/reparse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let trigger = HttpTrigger::new(server.uri(), &HttpSettings::default()).unwrap();
    let err = trigger.fire(&reparse_call()).await.unwrap_err();
    assert_eq!(err.kind, TriggerFailure::MalformedBody);
    assert!(!err.kind.is_transport());
}

#[tokio::test]
async fn http_error_status_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/reparse"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let trigger = HttpTrigger::new(format!("{}/", server.uri()), &HttpSettings::default()).unwrap();
    let err = trigger.fire(&reparse_call()).await.unwrap_err();
    assert_eq!(err.kind, TriggerFailure::HttpStatus(502));
    assert!(err.kind.is_transport());
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/reparse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "code": 200 })),
        )
        .mount(&server)
        .await;

    let settings = HttpSettings {
        request_timeout: Duration::from_millis(50),
        ..HttpSettings::default()
    };
    let trigger = HttpTrigger::new(server.uri(), &settings).unwrap();
    let err = trigger.fire(&reparse_call()).await.unwrap_err();
    assert_eq!(err.kind, TriggerFailure::Timeout);
}

#[tokio::test]
async fn bad_base_url_is_invalid() {
    let trigger = HttpTrigger::new("not a url", &HttpSettings::default()).unwrap();
    let err = trigger.fire(&reparse_call()).await.unwrap_err();
    assert_eq!(err.kind, TriggerFailure::InvalidUrl);
}
