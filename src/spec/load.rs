use super::build::build_descriptors;
use super::types::{OperationDescriptor, SpecFormat};
use anyhow::Context;
use oas3::OpenApiV3Spec;
use std::path::Path;

/// Drop path-item keys oas3 does not understand (e.g. `query` or other
/// draft verbs) so parsing does not fail on them.
fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

    let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") else {
        return;
    };
    for item in paths_map.values_mut() {
        if let serde_json::Value::Object(obj) = item {
            obj.retain(|k, _| {
                let lk = k.to_ascii_lowercase();
                match lk.as_str() {
                    "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                    m if METHODS.contains(&m) => true,
                    _ => k.starts_with("x-"),
                }
            });
        }
    }
}

/// Lower-case, underscore-separated slug of the document title.
fn slug_of(spec: &OpenApiV3Spec) -> String {
    spec.info
        .title
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}

/// Parse an OpenAPI document held in memory.
///
/// # Errors
///
/// Returns an error if the document is not valid YAML/JSON, is not an
/// OpenAPI 3 document, or describes operations that cannot be bound to a
/// single handler.
pub fn load_spec_str(
    content: &str,
    format: SpecFormat,
) -> anyhow::Result<(Vec<OperationDescriptor>, String)> {
    let mut value: serde_json::Value = match format {
        SpecFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML document")?,
        SpecFormat::Json => serde_json::from_str(content).context("invalid JSON document")?,
    };

    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec =
        serde_json::from_value(value).context("document is not a valid OpenAPI 3 spec")?;

    let slug = slug_of(&spec);
    let descriptors = build_descriptors(&spec)?;
    Ok((descriptors, slug))
}

/// Load an OpenAPI document from disk and build its operation descriptors.
///
/// The format follows the file extension: `.yaml`/`.yml` is YAML, anything
/// else is parsed as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`load_spec_str`] fails.
pub fn load_spec(file_path: impl AsRef<Path>) -> anyhow::Result<(Vec<OperationDescriptor>, String)> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read spec {}", path.display()))?;
    let format = SpecFormat::from_path(&path.to_string_lossy());
    load_spec_str(&content, format).with_context(|| format!("failed to load spec {}", path.display()))
}
