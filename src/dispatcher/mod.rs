//! # Dispatcher Module
//!
//! Maps handler names to operation entry points and invokes them.
//!
//! ## Overview
//!
//! Every [`OperationDescriptor`](crate::spec::OperationDescriptor) names exactly
//! one handler. At startup the application registers a plain function (or a
//! typed [`Handler`](crate::typed::Handler)) for each name it implements and
//! fills the rest with the not-implemented stub via
//! [`Dispatcher::register_missing_as_stubs`]. After that the registry is
//! read-only and shared through `Arc`.
//!
//! ## Handler Registration
//!
//! ```rust
//! use stubrouter::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register("get_pet", |req: &HandlerRequest| {
//!     Ok(HandlerResponse::json(
//!         200,
//!         serde_json::json!({ "id": req.get_path_param("id") }),
//!     ))
//! });
//! dispatcher.register_stub("add_pet");
//! assert_eq!(dispatcher.stubbed_handlers(), vec!["add_pet"]);
//! ```
//!
//! ## Request Flow
//!
//! 1. The server parses the request and attaches the JSON body under
//!    [`BODY_ATTRIBUTE`]
//! 2. The router resolves the handler name
//! 3. [`Dispatcher::dispatch`] calls the entry point on the current coroutine
//! 4. `Ok` responses are returned as-is, `Err(OperationError)` becomes the
//!    error's response, and a panic becomes a 500

mod core;

pub use core::{
    Dispatcher, HandlerFn, HandlerRequest, HandlerResponse, HandlerResult, HeaderVec,
    BODY_ATTRIBUTE, MAX_INLINE_HEADERS,
};
