//! Model names for request and response types.
//!
//! Referenced component schemas keep their component name. Inline schemas get
//! a name derived from their `title` or from the operation, made unique
//! against every component and previously generated name. Two identical
//! inline schemas share one generated name.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Convert `fake_outer-string body` style keys into `FakeOuterStringBody`.
pub fn to_camel_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c == ' ' || c == '.')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn sanitize(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ' ' | '-'))
        .collect()
}

/// Rust-facing name of a primitive or container schema that never becomes a model.
///
/// Returns `None` for object schemas with properties; those need a model name.
pub fn primitive_type_name(schema: &Value, namer: &ModelNamer) -> Option<String> {
    if let Some(name) = schema.get("x-ref-name").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => Some("String".to_string()),
        Some("integer") => Some("i64".to_string()),
        Some("number") => Some("f64".to_string()),
        Some("boolean") => Some("bool".to_string()),
        Some("array") => {
            let inner = schema
                .get("items")
                .and_then(|items| primitive_type_name(items, namer))
                .unwrap_or_else(|| "serde_json::Value".to_string());
            Some(format!("Vec<{inner}>"))
        }
        Some("object") | None => {
            let has_props = schema
                .get("properties")
                .and_then(Value::as_object)
                .is_some_and(|p| !p.is_empty());
            if has_props || schema.get("title").is_some() {
                None
            } else {
                Some("serde_json::Value".to_string())
            }
        }
        Some(_) => Some("serde_json::Value".to_string()),
    }
}

/// Hands out unique model names for one document.
#[derive(Debug, Default)]
pub struct ModelNamer {
    taken: HashSet<String>,
    generated: HashMap<String, String>,
}

impl ModelNamer {
    /// Start with the component schema names already reserved.
    pub fn new<I, S>(component_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: component_names.into_iter().map(Into::into).collect(),
            generated: HashMap::new(),
        }
    }

    /// Name for an inline schema: its title if present, otherwise `fallback_key`.
    pub fn name_inline(&mut self, schema: &Value, fallback_key: &str) -> String {
        let signature = schema.to_string();
        if let Some(existing) = self.generated.get(&signature) {
            return existing.clone();
        }
        let key = schema
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(fallback_key);
        let name = self.unique_name(&to_camel_case(&sanitize(key)));
        self.generated.insert(signature, name.clone());
        name
    }

    fn unique_name(&mut self, key: &str) -> String {
        let mut count = 0usize;
        loop {
            let name = if count == 0 {
                key.to_string()
            } else {
                format!("{key}_{count}")
            };
            if self.taken.insert(name.clone()) {
                return name;
            }
            count += 1;
        }
    }
}
