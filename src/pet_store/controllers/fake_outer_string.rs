// stubrouter: generated stub
//! Controller for `fakeOuterStringSerialize` (`POST /fake/outer/string`).

use crate::error::OperationError;
use crate::pet_store::handlers::fake_outer_string::{Request, Response};
use crate::stub::OperationState;
use crate::typed::{Handler, TypedHandlerRequest};

pub struct FakeOuterStringController;

impl Handler for FakeOuterStringController {
    type Request = Request;
    type Response = Response;

    fn handle(&self, req: TypedHandlerRequest<Request>) -> Result<Response, OperationError> {
        handle(req)
    }

    fn state(&self) -> OperationState {
        OperationState::Unimplemented
    }
}

pub fn handle(req: TypedHandlerRequest<Request>) -> Result<Response, OperationError> {
    // TODO: implement fakeOuterStringSerialize, then drop `state` above.
    let _body_data = req.data;
    Err(OperationError::not_implemented())
}
