//! # Typed Module
//!
//! Type-safe request and response handling for operation handlers.
//!
//! A [`Handler`] names its request type (built from the raw request context,
//! usually from the attached body) and its response type (serialized to JSON).
//! Conversion failures are reported as `Validation` errors before the handler
//! runs, so `handle` only ever sees well-formed input.
//!
//! ## Usage
//!
//! ```rust
//! use stubrouter::dispatcher::{Dispatcher, HandlerRequest};
//! use stubrouter::error::OperationError;
//! use stubrouter::typed::{Handler, TypedHandlerRequest};
//!
//! struct Ping(serde_json::Value);
//!
//! impl TryFrom<HandlerRequest> for Ping {
//!     type Error = anyhow::Error;
//!     fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
//!         Ok(Ping(req.body().cloned().unwrap_or_default()))
//!     }
//! }
//!
//! struct PingController;
//!
//! impl Handler for PingController {
//!     type Request = Ping;
//!     type Response = serde_json::Value;
//!
//!     fn handle(&self, req: TypedHandlerRequest<Ping>) -> Result<serde_json::Value, OperationError> {
//!         Ok(req.data.0)
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register_typed("ping", PingController);
//! ```
//!
//! Generated code provides the request and response types for every operation,
//! so a controller only has to supply `handle`.

mod core;

pub use core::{call_typed, Handler, TypedHandlerFor, TypedHandlerRequest};
