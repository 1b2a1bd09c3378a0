//! # Spec Module
//!
//! Turns an OpenAPI 3 document into immutable [`OperationDescriptor`]s: one per
//! declared operation, each naming the HTTP method, path pattern, handler
//! name, declared request-body type and declared response type.
//!
//! Descriptors are created once at startup and never mutated. The router and
//! dispatcher share them behind `Arc`.
//!
//! ## Handler names
//!
//! The first `x-handler*` string extension on an operation wins, otherwise the
//! `operationId` is used. Every `(method, path)` and every handler name must be
//! unique; violations are reported together as a single error.
//!
//! ## Type names
//!
//! Component references keep their name (`#/components/schemas/OuterString`
//! becomes `OuterString`). Inline objects are named after their `title`, or
//! after the operation (`<operationId>Body`, `<operationId><status>`), with a
//! numeric suffix on collision. Inline primitives map to Rust primitives.

mod build;
mod load;
mod naming;
mod types;

pub use build::{
    build_descriptors, expand_schema_refs, extract_request_body, extract_success_response,
    resolve_schema_ref,
};
pub use load::{load_spec, load_spec_str};
pub use naming::{to_camel_case, ModelNamer};
pub use types::{OperationDescriptor, RequestBodyDescriptor, ResponseDescriptor, SpecFormat};
