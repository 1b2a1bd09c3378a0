//! # CLI Module
//!
//! Command-line interface of the `stubrouter` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Serve an OpenAPI spec. Operations bound to a real controller answer with
//! it; every other operation answers `500 {"error":"Not implemented"}`.
//! Stops gracefully on SIGINT or SIGTERM.
//!
//! ```bash
//! stubrouter serve --spec doc/openapi.yaml --addr 127.0.0.1:8080
//! ```
//!
//! Options:
//! - `--spec <FILE>` - OpenAPI specification (or `spec_path` in the config)
//! - `--addr <ADDR>` - Bind address (default from config, else `0.0.0.0:8080`)
//! - `--config <FILE>` - Service config (default `config/config.yaml`, optional)
//!
//! ### `routes`
//!
//! Print the routing table derived from a spec.
//!
//! ### `check`
//!
//! List operations that still answer with the stub, plus source files that
//! still carry the generated-stub marker.
//!
//! ### `generate-stubs`
//!
//! ```bash
//! stubrouter generate-stubs --spec doc/openapi.yaml --output src/generated --force
//! ```

mod commands;


pub use commands::{build_dispatcher, run, run_cli, start_service, Cli, Commands};
