//! # Schema Validator Cache Module
//!
//! Compiles the declared success-response schema of every operation once at
//! startup, so the server never compiles a schema on the request path.
//!
//! The cache is immutable after construction and shared through `Arc`.
//! Schemas that fail to compile are logged and skipped; responses of those
//! operations are written unvalidated.

use crate::spec::OperationDescriptor;
use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Precompiled response validators keyed by handler name.
#[derive(Clone, Default)]
pub struct ValidatorCache {
    responses: HashMap<String, Arc<Validator>>,
}

impl ValidatorCache {
    /// Compile the response schema of each descriptor that declares one.
    pub fn precompile(descriptors: &[OperationDescriptor]) -> Self {
        let mut responses = HashMap::new();
        for descriptor in descriptors {
            let Some(schema) = descriptor.response.schema.as_ref() else {
                continue;
            };
            match jsonschema::validator_for(schema) {
                Ok(validator) => {
                    debug!(
                        handler_name = %descriptor.handler_name,
                        status = descriptor.response.status,
                        "Response schema compiled"
                    );
                    responses.insert(descriptor.handler_name.to_string(), Arc::new(validator));
                }
                Err(err) => warn!(
                    handler_name = %descriptor.handler_name,
                    error = %err,
                    "Response schema does not compile; responses will not be validated"
                ),
            }
        }
        info!(validators = responses.len(), "Response validators precompiled");
        Self { responses }
    }

    #[must_use]
    pub fn response_validator(&self, handler_name: &str) -> Option<&Arc<Validator>> {
        self.responses.get(handler_name)
    }

    /// Check a success body against the handler's declared response schema.
    ///
    /// # Errors
    ///
    /// Returns one message per schema violation.
    pub fn validate_response(&self, handler_name: &str, body: &Value) -> Result<(), Vec<String>> {
        let Some(validator) = self.responses.get(handler_name) else {
            return Ok(());
        };
        let errors: Vec<String> = validator.iter_errors(body).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl std::fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("responses", &self.responses.len())
            .finish()
    }
}
