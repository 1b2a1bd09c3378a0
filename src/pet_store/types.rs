// Reusable types for handler schemas
use serde::{Deserialize, Serialize};

/// `#/components/schemas/OuterString`: a bare JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OuterString(pub String);

impl From<String> for OuterString {
    fn from(value: String) -> Self {
        OuterString(value)
    }
}

impl AsRef<str> for OuterString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
