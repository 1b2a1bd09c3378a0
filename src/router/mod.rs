//! # Router Module
//!
//! Resolves an incoming `(method, path)` to the operation descriptor that
//! declared it.
//!
//! ## Architecture
//!
//! 1. **Compilation**: at startup each `base_path + path_pattern` (e.g.
//!    `/v2/pets/{id}`) becomes an anchored regex that captures one path segment
//!    per `{param}`.
//!
//! 2. **Matching**: each request is tested against the compiled patterns of its
//!    method. The first match yields a [`RouteMatch`] with the descriptor, the
//!    handler name and the extracted parameters.
//!
//! A path that matches some pattern under a different method is a 405; the
//! server asks [`Router::allowed_methods`] to tell the two apart.
//!
//! ```rust
//! use stubrouter::router::Router;
//! use stubrouter::spec::load_spec;
//!
//! # fn main() -> anyhow::Result<()> {
//! let (descriptors, _slug) = load_spec("doc/openapi.yaml")?;
//! let router = Router::new(descriptors)?;
//! if let Some(m) = router.route(http::Method::POST, "/fake/outer/string") {
//!     assert_eq!(m.handler_name, "fake_outer_string");
//! }
//! # Ok(())
//! # }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
