use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, HandlerResult};
use crate::error::OperationError;
use crate::router::ParamVec;
use crate::stub::OperationState;
use http::Method;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Trait implemented by typed operation handlers.
///
/// The request type is built from the raw [`HandlerRequest`] before `handle`
/// runs; the response is serialized to JSON with status 200.
pub trait Handler: Send + Sync + 'static {
    /// The typed request type (converted from HandlerRequest)
    type Request: TryFrom<HandlerRequest, Error = anyhow::Error> + Send + 'static;
    /// The typed response type (serialized to JSON)
    type Response: Serialize + Send + 'static;

    /// Handle a typed request
    ///
    /// # Errors
    ///
    /// Fails with one of the declared [`OperationError`] kinds.
    fn handle(&self, req: TypedHandlerRequest<Self::Request>) -> Result<Self::Response, OperationError>;

    /// Whether this handler still carries the generated placeholder.
    fn state(&self) -> OperationState {
        OperationState::Implemented
    }
}

/// Trait for converting HandlerRequest to TypedHandlerRequest
pub trait TypedHandlerFor<T>: Sized {
    /// Convert a generic HandlerRequest to a typed request
    ///
    /// # Errors
    ///
    /// Returns an error if the request data cannot be converted to type T
    fn from_handler(req: HandlerRequest) -> anyhow::Result<TypedHandlerRequest<T>>;
}

/// Typed request data passed to a [`Handler`]
#[derive(Debug, Clone)]
pub struct TypedHandlerRequest<T> {
    /// HTTP method
    pub method: Method,
    /// Request path
    pub path: String,
    /// Handler name
    pub handler_name: String,
    /// Path parameters extracted from URL
    pub path_params: ParamVec,
    /// Query string parameters
    pub query_params: ParamVec,
    /// Typed request data
    pub data: T,
}

impl<T> TypedHandlerFor<T> for TypedHandlerRequest<T>
where
    T: TryFrom<HandlerRequest, Error = anyhow::Error>,
{
    fn from_handler(req: HandlerRequest) -> anyhow::Result<TypedHandlerRequest<T>> {
        let method = req.method.clone();
        let path = req.path.clone();
        let handler_name = req.handler_name.clone();
        let path_params = req.path_params.clone();
        let query_params = req.query_params.clone();
        let data = T::try_from(req)?;

        Ok(TypedHandlerRequest {
            method,
            path,
            handler_name,
            path_params,
            query_params,
            data,
        })
    }
}

/// Run a typed handler against a raw request.
///
/// Conversion failures become `Validation` (400); a response that cannot be
/// serialized becomes `Internal` (500).
pub fn call_typed<H: Handler>(handler: &H, req: &HandlerRequest) -> HandlerResult {
    let typed = TypedHandlerRequest::<H::Request>::from_handler(req.clone()).map_err(|err| {
        warn!(
            request_id = %req.request_id,
            handler_name = %req.handler_name,
            error = %err,
            "Typed request conversion failed"
        );
        OperationError::validation(format!("Invalid request data: {err}"))
    })?;

    let response = handler.handle(typed)?;

    let body = serde_json::to_value(response).map_err(|err| {
        error!(
            request_id = %req.request_id,
            handler_name = %req.handler_name,
            error = %err,
            "Failed to serialize typed response"
        );
        OperationError::internal("Failed to serialize response")
    })?;
    Ok(HandlerResponse::json(200, body))
}

impl Dispatcher {
    /// Register a typed handler under `name`.
    ///
    /// The handler's [`Handler::state`] decides whether the entry point is
    /// reported as a stub.
    pub fn register_typed<H: Handler>(&mut self, name: &str, handler: H) {
        let state = handler.state();
        let handler = Arc::new(handler);
        self.register_with_state(
            name,
            Arc::new(move |req: &HandlerRequest| call_typed(handler.as_ref(), req)),
            state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubHandler;
    use serde_json::json;

    #[derive(Debug)]
    struct Name(String);

    impl TryFrom<HandlerRequest> for Name {
        type Error = anyhow::Error;

        fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
            let name = req
                .body()
                .and_then(|b| b.get("name"))
                .and_then(|n| n.as_str())
                .ok_or_else(|| anyhow::anyhow!("missing field `name`"))?;
            Ok(Name(name.to_string()))
        }
    }

    struct Greeter;

    impl Handler for Greeter {
        type Request = Name;
        type Response = serde_json::Value;

        fn handle(&self, req: TypedHandlerRequest<Name>) -> Result<serde_json::Value, OperationError> {
            if req.data.0 == "taken" {
                return Err(OperationError::conflict("name already taken"));
            }
            Ok(json!({ "greeting": format!("hello {}", req.data.0) }))
        }
    }

    fn request(body: serde_json::Value) -> HandlerRequest {
        HandlerRequest::new(Method::POST, "/greet", "greet").with_body(body)
    }

    #[test]
    fn test_typed_success() {
        let resp = call_typed(&Greeter, &request(json!({"name": "rex"}))).unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({"greeting": "hello rex"}));
    }

    #[test]
    fn test_typed_conversion_failure_is_validation() {
        let err = call_typed(&Greeter, &request(json!({}))).unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains("missing field `name`"));
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot serialize"))
        }
    }

    struct Broken;

    impl Handler for Broken {
        type Request = Name;
        type Response = Unserializable;

        fn handle(&self, _req: TypedHandlerRequest<Name>) -> Result<Unserializable, OperationError> {
            Ok(Unserializable)
        }
    }

    #[test]
    fn test_unserializable_response_is_internal_error() {
        let err = call_typed(&Broken, &request(json!({"name": "rex"}))).unwrap_err();
        assert_eq!(err, OperationError::internal("Failed to serialize response"));

        let mut dispatcher = Dispatcher::new();
        dispatcher.register_typed("greet", Broken);
        let resp = dispatcher.dispatch(&request(json!({"name": "rex"})));
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body["kind"], "internal");
    }

    #[test]
    fn test_typed_declared_error() {
        let err = call_typed(&Greeter, &request(json!({"name": "taken"}))).unwrap_err();
        assert_eq!(err, OperationError::conflict("name already taken"));
    }

    #[test]
    fn test_register_typed_records_state() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_typed("greet", Greeter);
        dispatcher.register_typed("later", StubHandler::<Name, serde_json::Value>::new());
        assert_eq!(dispatcher.state_of("greet"), Some(OperationState::Implemented));
        assert_eq!(dispatcher.stubbed_handlers(), vec!["later"]);

        let mut req = request(json!({"name": "rex"}));
        req.handler_name = "later".to_string();
        let resp = dispatcher.dispatch(&req);
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body["error"], "Not implemented");
    }
}
