//! The pet store "fake outer" sample, as the stub emitter would lay it out.
//!
//! - [`types`]: models named by the document (`OuterString`)
//! - [`handlers`]: typed request/response of each operation
//! - [`controllers`]: the user-owned entry points, still stubs
//! - [`registry`]: binds handler names to controllers at startup

pub mod controllers;
pub mod handlers;
pub mod registry;
pub mod types;
