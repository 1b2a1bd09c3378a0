use super::Router;
use crate::spec::{OperationDescriptor, ResponseDescriptor};
use http::Method;
use std::sync::Arc;

fn descriptor(method: Method, path: &str, handler: &str) -> OperationDescriptor {
    OperationDescriptor {
        method,
        path_pattern: Arc::from(path),
        handler_name: Arc::from(handler),
        request_body: None,
        response: ResponseDescriptor::default(),
        base_path: String::new(),
    }
}

#[test]
fn test_root_path() {
    let (re, params) = Router::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = Router::path_to_regex("/items/{id}").unwrap();
    assert!(re.is_match("/items/123"));
    assert!(!re.is_match("/items/123/extra"));
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].as_ref(), "id");
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _) = Router::path_to_regex("/files/report.json").unwrap();
    assert!(re.is_match("/files/report.json"));
    assert!(!re.is_match("/files/reportxjson"));
}

#[test]
fn test_literal_route_wins_over_param() {
    let router = Router::new(vec![
        descriptor(Method::GET, "/pets/{id}", "get_pet"),
        descriptor(Method::GET, "/pets/mine", "my_pets"),
    ])
    .unwrap();
    let m = router.route(Method::GET, "/pets/mine").unwrap();
    assert_eq!(m.handler_name, "my_pets");
    let m = router.route(Method::GET, "/pets/7").unwrap();
    assert_eq!(m.handler_name, "get_pet");
    assert_eq!(m.get_path_param("id"), Some("7"));
}

#[test]
fn test_allowed_methods_for_405() {
    let router = Router::new(vec![
        descriptor(Method::POST, "/fake/outer/string", "fake_outer_string"),
        descriptor(Method::PUT, "/fake/outer/string", "replace_outer_string"),
    ])
    .unwrap();
    assert!(router.route(Method::GET, "/fake/outer/string").is_none());
    assert_eq!(
        router.allowed_methods("/fake/outer/string"),
        vec![Method::POST, Method::PUT]
    );
    assert!(router.allowed_methods("/nothing").is_empty());
}

#[test]
fn test_param_with_literal_suffix() {
    let (re, params) = Router::path_to_regex("/reports/{id}.json").unwrap();
    assert!(re.is_match("/reports/7.json"));
    assert!(!re.is_match("/reports/7"));
    assert!(!re.is_match("/reports/a/b.json"));
    assert_eq!(params, vec![std::sync::Arc::<str>::from("id")]);

    let router = Router::new(vec![
        descriptor(Method::GET, "/reports/{id}.json", "report_json"),
        descriptor(Method::GET, "/api/v{major}.{minor}/status", "status"),
    ])
    .unwrap();
    let m = router.route(Method::GET, "/reports/2024.json").unwrap();
    assert_eq!(m.handler_name, "report_json");
    assert_eq!(m.get_path_param("id"), Some("2024"));

    let m = router.route(Method::GET, "/api/v1.2/status").unwrap();
    assert_eq!(m.get_path_param("major"), Some("1"));
    assert_eq!(m.get_path_param("minor"), Some("2"));
}
