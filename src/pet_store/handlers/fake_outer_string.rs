//! Request and response of `fakeOuterStringSerialize` (`POST /fake/outer/string`).

use crate::dispatcher::{HandlerRequest, BODY_ATTRIBUTE};
use crate::error::OperationError;
use crate::pet_store::types::OuterString;
use serde_json::Value;

/// Typed request for `fake_outer_string`
///
/// The attached body is kept as received. Conversion never rejects a request,
/// so the operation answers the same way whatever the client sent;
/// [`Request::body_data`] does the `OuterString` check once a controller needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub body_data: Option<Value>,
}

impl Request {
    /// The attached body as an `OuterString`
    ///
    /// # Errors
    ///
    /// `Validation` when a body is attached but is not a JSON string.
    pub fn body_data(&self) -> Result<Option<OuterString>, OperationError> {
        self.body_data
            .clone()
            .map(serde_json::from_value::<OuterString>)
            .transpose()
            .map_err(|err| OperationError::validation(format!("bodyData is not an OuterString: {err}")))
    }
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(mut req: HandlerRequest) -> anyhow::Result<Self> {
        Ok(Request {
            body_data: req.attributes.remove(BODY_ATTRIBUTE),
        })
    }
}

/// Declared response type of `fake_outer_string`.
pub type Response = OuterString;
