use std::path::Path;

use probe_core::Category;
use probe_engine::{parser_endpoint, HttpSettings, ServiceProbe, TriggerFailure};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe(server: &MockServer) -> ServiceProbe {
    ServiceProbe::new(server.uri(), server.uri(), &HttpSettings::default()).unwrap()
}

#[test]
fn java_goes_through_pom_parser() {
    assert_eq!(parser_endpoint(&Category::new("java")), "/parse/pom_parse");
    assert_eq!(parser_endpoint(&Category::new("Erlang")), "/parse/erlang_parse");
}

#[tokio::test]
async fn health_checks_report_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project/statistics"))
        .and(query_param("companyId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vulnerabilities/test"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let probe = probe(&server);
    let backend = probe.check_backend(1).await;
    assert!(backend.is_up());
    assert_eq!(backend.name, "backend");
    assert_eq!(backend.result, Ok(200));

    let parser = probe.check_parser().await;
    assert!(!parser.is_up());
    assert_eq!(parser.result.unwrap_err().kind, TriggerFailure::HttpStatus(500));
}

#[tokio::test]
async fn detect_language_normalizes_and_drops_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parse/get_primary_language"))
        .and(query_param("project_folder", "/srv/projects/a"))
        .and(query_param("use_optimized", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "language": "Python" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/parse/get_primary_language"))
        .and(query_param("project_folder", "/srv/projects/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "language": "unknown" })))
        .mount(&server)
        .await;

    let probe = probe(&server);
    let detected = probe
        .detect_language(Path::new("/srv/projects/a"))
        .await
        .unwrap();
    assert_eq!(detected, Some(Category::new("python")));

    let unknown = probe
        .detect_language(Path::new("/srv/projects/b"))
        .await
        .unwrap();
    assert_eq!(unknown, None);
}

#[tokio::test]
async fn parse_manifest_collects_dependency_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parse/go_parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "github.com/gin-gonic/gin", "version": "v1.9.0" },
            { "name": "gorm.io/gorm" },
            { "version": "no name" }
        ])))
        .mount(&server)
        .await;

    let names = probe(&server)
        .parse_manifest(&Category::new("go"), Path::new("/tmp/x"))
        .await
        .unwrap();
    assert_eq!(names, vec!["github.com/gin-gonic/gin", "gorm.io/gorm"]);
}

#[tokio::test]
async fn parse_manifest_rejects_non_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parse/python_parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "folder missing" })))
        .mount(&server)
        .await;

    let err = probe(&server)
        .parse_manifest(&Category::new("python"), Path::new("/nonexistent"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, TriggerFailure::MalformedBody);
}
