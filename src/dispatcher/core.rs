use crate::error::OperationError;
use crate::ids::RequestId;
use crate::router::{ParamVec, RouteMatch};
use crate::spec::OperationDescriptor;
use crate::stub::{not_implemented_handler, OperationState};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage for requests and responses
///
/// Header names are `Arc<str>` so the common names clone cheaply.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Well-known attribute key the request body is attached under.
///
/// The server deserializes the body before the handler runs and stores it
/// here. Handlers read it back with [`HandlerRequest::body`].
pub const BODY_ATTRIBUTE: &str = "bodyData";

/// Request context handed to an operation entry point
///
/// Owned by a single request; dropped once the handler returns.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path as received
    pub path: String,
    /// Name of the handler that should process this request
    pub handler_name: String,
    /// Path parameters extracted by the router
    pub path_params: ParamVec,
    /// Query string parameters
    pub query_params: ParamVec,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Values attached by upstream collaborators, keyed by name
    pub attributes: HashMap<String, Value>,
}

impl HandlerRequest {
    /// Empty request context for the given handler.
    pub fn new(method: Method, path: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            handler_name: handler_name.into(),
            path_params: ParamVec::new(),
            query_params: ParamVec::new(),
            headers: HeaderVec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Request context for a routed request.
    pub fn from_route_match(route_match: RouteMatch, path: &str, request_id: RequestId) -> Self {
        Self {
            request_id,
            method: route_match.route.method.clone(),
            path: path.to_string(),
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers: HeaderVec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Attach the deserialized request body under [`BODY_ATTRIBUTE`].
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.set_attribute(BODY_ATTRIBUTE, body);
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    #[inline]
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The body attached by the server, if any.
    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.attribute(BODY_ATTRIBUTE)
    }

    /// Get a path parameter by name (last occurrence wins)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name (last occurrence wins)
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response produced by an operation entry point
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// HTTP response headers
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Plain `{"error": message}` response.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// What an operation entry point returns: a response or a declared error kind.
pub type HandlerResult = Result<HandlerResponse, OperationError>;

/// A registered operation entry point.
pub type HandlerFn = Arc<dyn Fn(&HandlerRequest) -> HandlerResult + Send + Sync>;

#[derive(Clone)]
struct HandlerEntry {
    func: HandlerFn,
    state: OperationState,
}

/// Registry from handler name to entry point
///
/// Built once at startup and shared read-only afterwards. Dispatch is a plain
/// synchronous call on the caller's coroutine.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<String, HandlerEntry>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implemented entry point, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(handler_fn), OperationState::Implemented);
    }

    /// Register an entry point together with its implementation state.
    pub fn register_with_state(&mut self, name: &str, handler_fn: HandlerFn, state: OperationState) {
        self.insert(name, handler_fn, state);
    }

    /// Register the not-implemented placeholder for `name`.
    pub fn register_stub(&mut self, name: &str) {
        self.insert(
            name,
            Arc::new(not_implemented_handler),
            OperationState::Unimplemented,
        );
    }

    fn insert(&mut self, name: &str, func: HandlerFn, state: OperationState) {
        if self
            .handlers
            .insert(name.to_string(), HandlerEntry { func, state })
            .is_some()
        {
            warn!(handler_name = %name, "Replaced existing handler");
        }
        debug!(
            handler_name = %name,
            state = ?state,
            total_handlers = self.handlers.len(),
            "Handler registered"
        );
    }

    /// Fill every descriptor that has no registered entry point with the stub.
    ///
    /// Returns the handler names that were filled, in descriptor order.
    pub fn register_missing_as_stubs(&mut self, descriptors: &[OperationDescriptor]) -> Vec<String> {
        let mut filled = Vec::new();
        for descriptor in descriptors {
            let name = descriptor.handler_name.as_ref();
            if !self.handlers.contains_key(name) {
                self.register_stub(name);
                filled.push(name.to_string());
            }
        }
        if !filled.is_empty() {
            info!(
                count = filled.len(),
                handlers = ?filled,
                "Operations without a handler bound to the not-implemented stub"
            );
        }
        filled
    }

    /// Drop every entry point no descriptor names.
    ///
    /// Returns the removed handler names, sorted.
    pub fn retain_declared(&mut self, descriptors: &[OperationDescriptor]) -> Vec<String> {
        let declared: HashSet<&str> = descriptors.iter().map(|d| d.handler_name.as_ref()).collect();
        let mut removed: Vec<String> = self
            .handlers
            .keys()
            .filter(|name| !declared.contains(name.as_str()))
            .cloned()
            .collect();
        for name in &removed {
            self.handlers.remove(name);
        }
        removed.sort_unstable();
        if !removed.is_empty() {
            debug!(handlers = ?removed, "Dropped handlers for undeclared operations");
        }
        removed
    }

    /// Names of handlers still answering with the not-implemented stub, sorted.
    #[must_use]
    pub fn stubbed_handlers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlers
            .iter()
            .filter(|(_, entry)| entry.state == OperationState::Unimplemented)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<OperationState> {
        self.handlers.get(name).map(|entry| entry.state)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the entry point registered for `req.handler_name`
    ///
    /// - Unknown handler: `Internal` 500 `"Handler not registered"`.
    /// - `Err(OperationError)`: the error's own response.
    /// - A panic inside the handler: `Internal` 500 `"Handler panicked"`.
    #[must_use]
    pub fn dispatch(&self, req: &HandlerRequest) -> HandlerResponse {
        let Some(entry) = self.handlers.get(&req.handler_name) else {
            error!(
                request_id = %req.request_id,
                handler_name = %req.handler_name,
                available_handlers = self.handlers.len(),
                "Handler not registered"
            );
            return OperationError::internal("Handler not registered").into_response();
        };

        debug!(
            request_id = %req.request_id,
            handler_name = %req.handler_name,
            method = %req.method,
            path = %req.path,
            has_body = req.body().is_some(),
            "Request dispatched to handler"
        );

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| (entry.func)(req)));
        let latency_us = start.elapsed().as_micros() as u64;

        match outcome {
            Ok(Ok(resp)) => {
                info!(
                    request_id = %req.request_id,
                    handler_name = %req.handler_name,
                    status = resp.status,
                    latency_us,
                    "Handler completed"
                );
                resp
            }
            Ok(Err(err)) => {
                if matches!(err, OperationError::NotImplemented) {
                    warn!(
                        request_id = %req.request_id,
                        handler_name = %req.handler_name,
                        "Operation not implemented"
                    );
                } else if matches!(err, OperationError::Internal { .. }) {
                    error!(
                        request_id = %req.request_id,
                        handler_name = %req.handler_name,
                        error = %err,
                        latency_us,
                        "Handler failed"
                    );
                } else {
                    info!(
                        request_id = %req.request_id,
                        handler_name = %req.handler_name,
                        status = err.status(),
                        kind = err.kind(),
                        error = %err,
                        latency_us,
                        "Handler returned declared error"
                    );
                }
                err.into_response()
            }
            Err(panic) => {
                let panic_message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                error!(
                    request_id = %req.request_id,
                    handler_name = %req.handler_name,
                    panic_message = %panic_message,
                    "Handler panicked"
                );
                OperationError::internal("Handler panicked").into_response()
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort_unstable();
        f.debug_struct("Dispatcher").field("handlers", &names).finish()
    }
}
