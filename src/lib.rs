//! # stubrouter
//!
//! **stubrouter** serves an [OpenAPI 3](https://spec.openapis.org/oas/v3.1.0)
//! document on the `may` coroutine runtime before any business logic exists.
//! Every declared operation is routed to a handler; operations nobody has
//! implemented yet answer with one predictable failure:
//!
//! ```text
//! HTTP/1.1 500 Internal Server Error
//! Content-Type: application/json
//!
//! {"error":"Not implemented","kind":"not_implemented"}
//! ```
//!
//! Replacing a stub with a real controller is a local change: implement the
//! operation's [`typed::Handler`] and register it. Nothing else moves.
//!
//! ## Architecture
//!
//! - **[`spec`]** - OpenAPI loading, operation descriptors and type naming
//! - **[`router`]** - Regex path matching to handler names
//! - **[`dispatcher`]** - Handler registry, request context and dispatch
//! - **[`typed`]** - Typed handler trait with request conversion
//! - **[`stub`]** - The not-implemented contract and [`stub::StubHandler`]
//! - **[`server`]** - HTTP service on `may_minihttp`
//! - **[`generator`]** - Emits controller stubs and their registry
//! - **[`pet_store`]** - The sample `/fake/outer/string` operation
//!
//! ### Request Flow
//!
//! ```text
//! may_minihttp ─► server::parse_request ─► Router::route ─► HandlerRequest
//!     (bodyData attached) ─► Dispatcher::dispatch ─► Handler::handle
//!     ─► OperationError::NotImplemented ─► 500 {"error":"Not implemented"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use stubrouter::dispatcher::{Dispatcher, HandlerRequest, BODY_ATTRIBUTE};
//! use stubrouter::pet_store;
//! use http::Method;
//! use serde_json::json;
//!
//! let mut dispatcher = Dispatcher::new();
//! pet_store::registry::register_all(&mut dispatcher);
//!
//! let mut req = HandlerRequest::new(Method::POST, "/fake/outer/string", "fake_outer_string");
//! req.set_attribute(BODY_ATTRIBUTE, json!("hello"));
//! let res = dispatcher.dispatch(&req);
//! assert_eq!(res.status, 500);
//! assert_eq!(res.body["error"], "Not implemented");
//! ```
//!
//! ## Binary
//!
//! ```bash
//! stubrouter serve --spec doc/openapi.yaml
//! stubrouter check --spec doc/openapi.yaml
//! stubrouter generate-stubs --spec doc/openapi.yaml --output src/generated
//! ```
//!
//! ## Configuration
//!
//! `config/config.yaml` (optional, see [`config`]) plus `STUBR_*` environment
//! variables for logging ([`logging`]) and the coroutine stack size
//! ([`runtime_config`]).

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod generator;
pub mod ids;
pub mod logging;
pub mod pet_store;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod spec;
pub mod stub;
pub mod typed;
pub mod validator;
pub mod validator_cache;

pub use error::OperationError;
pub use ids::RequestId;
pub use spec::{load_spec, OperationDescriptor};
pub use stub::{OperationState, StubHandler};
