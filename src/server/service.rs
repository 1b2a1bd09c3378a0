use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use crate::ids::RequestId;
use crate::router::Router;
use crate::validator_cache::ValidatorCache;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The `may_minihttp` service hosting the operation handlers
///
/// Everything it holds is immutable after startup; clones share the same
/// router, dispatcher and validators.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
    pub validators: Arc<ValidatorCache>,
    /// Served verbatim at `GET /openapi.yaml` when set
    pub spec_path: Option<PathBuf>,
}

impl AppService {
    /// Build the service; response validators are compiled from the router's descriptors.
    pub fn new(router: Router, dispatcher: Dispatcher, spec_path: Option<PathBuf>) -> Self {
        let descriptors: Vec<_> = router.descriptors().map(|d| d.as_ref().clone()).collect();
        let validators = ValidatorCache::precompile(&descriptors);
        Self {
            router: Arc::new(router),
            dispatcher: Arc::new(dispatcher),
            validators: Arc::new(validators),
            spec_path,
        }
    }

    /// Route, dispatch and validate one parsed request
    ///
    /// Covers everything except `GET /openapi.yaml`, which streams a file.
    pub fn process(&self, parsed: ParsedRequest) -> HandlerResponse {
        if parsed.method == "GET" && parsed.path == "/health" {
            return health_response();
        }

        let Ok(method) = parsed.method.parse::<Method>() else {
            return HandlerResponse::error(400, "Invalid method");
        };

        let Some(mut route_match) = self.router.route(method.clone(), &parsed.path) else {
            let allowed = self.router.allowed_methods(&parsed.path);
            if allowed.is_empty() {
                return HandlerResponse::json(
                    404,
                    json!({"error": "Not Found", "method": parsed.method, "path": parsed.path}),
                );
            }
            let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            return HandlerResponse::json(
                405,
                json!({
                    "error": "Method Not Allowed",
                    "method": parsed.method,
                    "path": parsed.path,
                    "allowed": allowed
                }),
            );
        };

        let request_id = RequestId::from_header_or_new(parsed.header("x-request-id"));
        route_match.query_params = parsed.query_params;
        let handler_name = route_match.handler_name.clone();

        let mut request = HandlerRequest::from_route_match(route_match, &parsed.path, request_id);
        request.headers = parsed.headers;
        if let Some(body) = parsed.body {
            request = request.with_body(body);
        }

        let response = self.dispatcher.dispatch(&request);

        if (200..300).contains(&response.status) {
            if let Err(details) = self.validators.validate_response(&handler_name, &response.body) {
                error!(
                    request_id = %request_id,
                    handler_name = %handler_name,
                    details = ?details,
                    "Response does not match declared schema"
                );
                return HandlerResponse::json(
                    500,
                    json!({"error": "Response validation failed", "details": details}),
                );
            }
        }

        info!(
            request_id = %request_id,
            method = %method,
            path = %request.path,
            handler_name = %handler_name,
            status = response.status,
            "Request completed"
        );
        response
    }
}

/// Body of `GET /health`.
pub fn health_response() -> HandlerResponse {
    HandlerResponse::json(200, json!({ "status": "ok" }))
}

/// Streams the OpenAPI specification file as `text/yaml`.
pub fn openapi_endpoint(res: &mut Response, spec_path: Option<&PathBuf>) -> io::Result<()> {
    match spec_path.map(std::fs::read) {
        Some(Ok(bytes)) => {
            res.status_code(200, "OK");
            res.header("Content-Type: text/yaml");
            res.body_vec(bytes);
        }
        Some(Err(err)) => {
            warn!(error = %err, "Failed to read spec for /openapi.yaml");
            write_json_error(res, 404, json!({ "error": "Spec not found" }));
        }
        None => write_json_error(res, 404, json!({ "error": "Spec not found" })),
    }
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        if parsed.method == "GET" && parsed.path == "/openapi.yaml" {
            return openapi_endpoint(res, self.spec_path.as_ref());
        }
        let response = self.process(parsed);
        write_handler_response(res, &response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::HeaderVec;
    use crate::router::ParamVec;
    use crate::spec::{OperationDescriptor, ResponseDescriptor};

    fn service() -> AppService {
        let descriptors = vec![
            OperationDescriptor {
                method: Method::POST,
                path_pattern: Arc::from("/fake/outer/string"),
                handler_name: Arc::from("fake_outer_string"),
                request_body: None,
                response: ResponseDescriptor::default(),
                base_path: String::new(),
            },
            OperationDescriptor {
                method: Method::GET,
                path_pattern: Arc::from("/greeting"),
                handler_name: Arc::from("greeting"),
                request_body: None,
                response: ResponseDescriptor {
                    status: 200,
                    type_name: Some("String".to_string()),
                    schema: Some(json!({"type": "string"})),
                    content_type: Some("application/json".to_string()),
                },
                base_path: String::new(),
            },
        ];
        let mut dispatcher = Dispatcher::new();
        dispatcher.register("greeting", |_req: &HandlerRequest| {
            Ok(HandlerResponse::json(200, json!({"not": "a string"})))
        });
        dispatcher.register_missing_as_stubs(&descriptors);
        AppService::new(Router::new(descriptors).unwrap(), dispatcher, None)
    }

    fn parsed(method: &str, path: &str, body: Option<serde_json::Value>) -> ParsedRequest {
        ParsedRequest {
            method: method.to_string(),
            path: path.to_string(),
            headers: HeaderVec::new(),
            query_params: ParamVec::new(),
            body,
        }
    }

    #[test]
    fn test_health() {
        let resp = service().process(parsed("GET", "/health", None));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({"status": "ok"}));
    }

    #[test]
    fn test_stub_answers_500_with_or_without_body() {
        let svc = service();
        for body in [None, Some(json!({"bodyData": {"key": "value"}}))] {
            let resp = svc.process(parsed("POST", "/fake/outer/string", body));
            assert_eq!(resp.status, 500);
            assert_eq!(resp.body["error"], "Not implemented");
        }
    }

    #[test]
    fn test_404_and_405() {
        let svc = service();
        assert_eq!(svc.process(parsed("GET", "/nope", None)).status, 404);
        let resp = svc.process(parsed("GET", "/fake/outer/string", None));
        assert_eq!(resp.status, 405);
        assert_eq!(resp.body["allowed"], json!(["POST"]));
    }

    #[test]
    fn test_invalid_success_body_is_500() {
        let resp = service().process(parsed("GET", "/greeting", None));
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body["error"], "Response validation failed");
    }
}
