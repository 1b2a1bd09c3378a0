use http::Method;
use serde_json::Value;
use std::sync::Arc;

/// Declared request body of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyDescriptor {
    /// Model name the body deserializes into (e.g. `OuterString`)
    pub type_name: String,
    /// JSON schema with `$ref`s expanded
    pub schema: Option<Value>,
    /// Whether the spec marks the body as required
    pub required: bool,
    /// Media type the schema was taken from
    pub content_type: String,
}

/// Declared success response of an operation.
///
/// `type_name` and `schema` are `None` for responses that carry no body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDescriptor {
    pub status: u16,
    pub type_name: Option<String>,
    pub schema: Option<Value>,
    pub content_type: Option<String>,
}

impl Default for ResponseDescriptor {
    fn default() -> Self {
        Self {
            status: 200,
            type_name: None,
            schema: None,
            content_type: None,
        }
    }
}

/// Generated metadata binding an HTTP route to its handler types.
///
/// Built once from the OpenAPI document and never mutated afterwards.
/// `path_pattern` and `handler_name` are `Arc<str>` so route matches can
/// share them without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub method: Method,
    pub path_pattern: Arc<str>,
    pub handler_name: Arc<str>,
    pub request_body: Option<RequestBodyDescriptor>,
    pub response: ResponseDescriptor,
    /// Path prefix taken from the first `servers` entry (empty when absent)
    pub base_path: String,
}

impl OperationDescriptor {
    /// Name of the declared request type, if the operation takes a body.
    #[must_use]
    pub fn request_type(&self) -> Option<&str> {
        self.request_body.as_ref().map(|b| b.type_name.as_str())
    }

    /// Name of the declared response type, if the success response has a body.
    #[must_use]
    pub fn response_type(&self) -> Option<&str> {
        self.response.type_name.as_deref()
    }

    /// Full path pattern including the base path.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}{}", self.base_path, self.path_pattern)
    }
}

/// Input format for [`super::load_spec_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// Pick the format from a file name: `.yaml`/`.yml` is YAML, anything else JSON.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".yaml") || path.ends_with(".yml") {
            SpecFormat::Yaml
        } else {
            SpecFormat::Json
        }
    }
}
