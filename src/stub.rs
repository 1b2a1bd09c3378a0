//! Placeholders for operations nobody has implemented yet.
//!
//! A stub is safe to deploy: it has no side effects and always answers with
//! status 500 and `"Not implemented"`, whatever the request carries.

use crate::dispatcher::{HandlerRequest, HandlerResult};
use crate::error::OperationError;
use crate::typed::{Handler, TypedHandlerRequest};
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Whether an entry point still carries the generated placeholder.
///
/// Moves from `Unimplemented` to `Implemented` only by editing the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Unimplemented,
    Implemented,
}

/// Untyped entry point that fails every call with [`OperationError::NotImplemented`].
pub fn not_implemented_handler(req: &HandlerRequest) -> HandlerResult {
    debug!(
        request_id = %req.request_id,
        handler_name = %req.handler_name,
        "Stub handler invoked"
    );
    Err(OperationError::not_implemented())
}

/// Typed placeholder for an operation with request `Req` and response `Resp`.
///
/// Ignores its input entirely, including the attached body.
pub struct StubHandler<Req, Resp> {
    _types: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> StubHandler<Req, Resp> {
    pub fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<Req, Resp> Default for StubHandler<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> fmt::Debug for StubHandler<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubHandler")
            .field("request", &std::any::type_name::<Req>())
            .field("response", &std::any::type_name::<Resp>())
            .finish()
    }
}

impl<Req, Resp> Handler for StubHandler<Req, Resp>
where
    Req: TryFrom<HandlerRequest, Error = anyhow::Error> + Send + 'static,
    Resp: Serialize + Send + 'static,
{
    type Request = Req;
    type Response = Resp;

    fn handle(&self, _req: TypedHandlerRequest<Req>) -> Result<Resp, OperationError> {
        Err(OperationError::not_implemented())
    }

    fn state(&self) -> OperationState {
        OperationState::Unimplemented
    }
}
