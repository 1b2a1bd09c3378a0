//! HTTP hosting for operation handlers on top of `may_minihttp`.
//!
//! Each request is parsed, its JSON body attached under the well-known
//! `bodyData` key, routed, dispatched on the connection's coroutine, and the
//! handler's response validated and written.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_json_body, parse_query_params, parse_request, ParsedRequest};
pub use service::{health_response, AppService};
