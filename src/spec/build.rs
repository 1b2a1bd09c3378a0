use super::naming::{primitive_type_name, ModelNamer};
use super::types::{OperationDescriptor, RequestBodyDescriptor, ResponseDescriptor};
use crate::validator::{ensure_no_issues, ValidationIssue};
use http::Method;
use oas3::spec::{MediaType, ObjectOrReference, ObjectSchema, RequestBody};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolve a JSON Schema `$ref` to the actual schema definition
///
/// Only local component references (`#/components/schemas/<Name>`) are supported.
pub fn resolve_schema_ref<'a>(spec: &'a OpenApiV3Spec, ref_path: &str) -> Option<&'a ObjectSchema> {
    let name = ref_path.strip_prefix("#/components/schemas/")?;
    spec.components
        .as_ref()?
        .schemas
        .get(name)
        .and_then(|schema_ref| match schema_ref {
            ObjectOrReference::Object(schema) => Some(schema),
            _ => None,
        })
}

/// Resolve a `#/components/requestBodies/<Name>` reference
pub fn resolve_request_body_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a RequestBody> {
    let name = ref_path.strip_prefix("#/components/requestBodies/")?;
    spec.components
        .as_ref()?
        .request_bodies
        .get(name)
        .and_then(|body_ref| match body_ref {
            ObjectOrReference::Object(body) => Some(body),
            _ => None,
        })
}

/// Recursively expand all `$ref` references in a schema value
///
/// Each expanded object gets an `x-ref-name` field holding the component name
/// it came from.
pub fn expand_schema_refs(spec: &OpenApiV3Spec, value: &mut Value) {
    expand_schema_refs_inner(spec, value, 0);
}

fn expand_schema_refs_inner(spec: &OpenApiV3Spec, value: &mut Value, depth: usize) {
    // Self-referencing schemas would recurse forever.
    if depth > 16 {
        return;
    }
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(|v| v.as_str()) {
                if let Some(schema) = resolve_schema_ref(spec, ref_path) {
                    if let Ok(mut new_val) = serde_json::to_value(schema) {
                        expand_schema_refs_inner(spec, &mut new_val, depth + 1);
                        if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
                            if let Value::Object(o) = &mut new_val {
                                o.insert("x-ref-name".to_string(), Value::String(name.to_string()));
                            }
                        }
                        *value = new_val;
                        return;
                    }
                }
            }
            for v in obj.values_mut() {
                expand_schema_refs_inner(spec, v, depth + 1);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                expand_schema_refs_inner(spec, v, depth + 1);
            }
        }
        _ => {}
    }
}

/// Schema of a media type plus the component name when it is a `$ref`.
fn media_schema(spec: &OpenApiV3Spec, media: &MediaType) -> (Option<Value>, Option<String>) {
    match media.schema.as_ref() {
        Some(ObjectOrReference::Object(schema_obj)) => {
            let mut val = serde_json::to_value(schema_obj).ok();
            if let Some(v) = val.as_mut() {
                expand_schema_refs(spec, v);
            }
            (val, None)
        }
        Some(ObjectOrReference::Ref { ref_path, .. }) => {
            let name = ref_path
                .strip_prefix("#/components/schemas/")
                .map(str::to_string);
            let mut val = resolve_schema_ref(spec, ref_path).and_then(|s| serde_json::to_value(s).ok());
            if let Some(v) = val.as_mut() {
                expand_schema_refs(spec, v);
            }
            (val, name)
        }
        None => (None, None),
    }
}

/// Pick the media type a schema should be read from: JSON first, then `*/*`,
/// then whatever comes first.
fn preferred_media(content: &BTreeMap<String, MediaType>) -> Option<(&String, &MediaType)> {
    content
        .get_key_value("application/json")
        .or_else(|| content.get_key_value("*/*"))
        .or_else(|| content.iter().next())
}

fn type_name_for(
    schema: Option<&Value>,
    ref_name: Option<String>,
    namer: &mut ModelNamer,
    fallback_key: &str,
) -> Option<String> {
    if ref_name.is_some() {
        return ref_name;
    }
    let schema = schema?;
    primitive_type_name(schema, namer).or_else(|| Some(namer.name_inline(schema, fallback_key)))
}

fn resolve_handler_name(
    operation: &oas3::spec::Operation,
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    operation
        .extensions
        .iter()
        .find_map(|(key, val)| {
            // oas3 may or may not keep the `x-` prefix on extension keys.
            let bare = key.strip_prefix("x-").unwrap_or(key);
            if bare.starts_with("handler") {
                if let Value::String(s) = val {
                    return Some(s.clone());
                }
            }
            None
        })
        .or_else(|| operation.operation_id.clone())
        .or_else(|| {
            issues.push(ValidationIssue::new(
                location,
                "MissingHandler",
                "Missing operationId or x-handler-* extension",
            ));
            None
        })
}

/// Extract the declared request body of an operation
///
/// Returns `None` when the operation takes no body. Inline body schemas are
/// named `<operationId>Body` unless they carry a title.
pub fn extract_request_body(
    spec: &OpenApiV3Spec,
    operation: &oas3::spec::Operation,
    operation_key: &str,
    namer: &mut ModelNamer,
) -> Option<RequestBodyDescriptor> {
    let req_body = match operation.request_body.as_ref()? {
        ObjectOrReference::Object(req_body) => req_body,
        ObjectOrReference::Ref { ref_path, .. } => {
            let Some(req_body) = resolve_request_body_ref(spec, ref_path) else {
                warn!(ref_path = %ref_path, "Unresolvable request body reference");
                return None;
            };
            req_body
        }
    };
    let (content_type, media) = preferred_media(&req_body.content)?;
    let (schema, ref_name) = media_schema(spec, media);
    let type_name = type_name_for(
        schema.as_ref(),
        ref_name,
        namer,
        &format!("{operation_key}_body"),
    )
    .unwrap_or_else(|| "serde_json::Value".to_string());

    Some(RequestBodyDescriptor {
        type_name,
        schema,
        required: req_body.required.unwrap_or(false),
        content_type: content_type.clone(),
    })
}

/// Extract the declared success response of an operation
///
/// Prefers `200`, then the lowest other 2xx, then `default`. Inline response
/// schemas are named `<operationId><status>` unless they carry a title.
pub fn extract_success_response(
    spec: &OpenApiV3Spec,
    operation: &oas3::spec::Operation,
    operation_key: &str,
    namer: &mut ModelNamer,
) -> ResponseDescriptor {
    let Some(responses) = operation.responses.as_ref() else {
        return ResponseDescriptor::default();
    };

    let mut success: Vec<(u16, &String)> = responses
        .keys()
        .filter_map(|k| k.parse::<u16>().ok().map(|s| (s, k)))
        .filter(|(s, _)| (200..300).contains(s))
        .collect();
    success.sort_unstable_by_key(|(s, _)| *s);

    let chosen = success
        .first()
        .map(|(s, k)| (*s, k.as_str()))
        .or_else(|| responses.contains_key("default").then_some((200, "default")));

    let Some((status, key)) = chosen else {
        return ResponseDescriptor::default();
    };

    let resp_obj = match responses.get(key) {
        Some(ObjectOrReference::Object(obj)) => obj,
        _ => {
            return ResponseDescriptor {
                status,
                ..ResponseDescriptor::default()
            }
        }
    };

    match preferred_media(&resp_obj.content) {
        Some((content_type, media)) => {
            let (schema, ref_name) = media_schema(spec, media);
            let type_name = type_name_for(
                schema.as_ref(),
                ref_name,
                namer,
                &format!("{operation_key}_{key}"),
            );
            ResponseDescriptor {
                status,
                type_name,
                schema,
                content_type: Some(content_type.clone()),
            }
        }
        None => ResponseDescriptor {
            status,
            ..ResponseDescriptor::default()
        },
    }
}

fn base_path_of(spec: &OpenApiV3Spec) -> String {
    let Some(server) = spec.servers.first() else {
        return String::new();
    };
    let url_str = &server.url;
    url::Url::parse(url_str)
        .or_else(|_| url::Url::parse(&format!("http://dummy{url_str}")))
        .map(|u| {
            let p = u.path().trim_end_matches('/');
            if p == "/" || p.is_empty() {
                String::new()
            } else {
                p.to_string()
            }
        })
        .unwrap_or_default()
}

/// Path template with every parameter name erased.
///
/// `/pets/{id}` and `/pets/{petId}` both become `/pets/{}`, so two operations
/// that would match the same requests share one key.
pub(crate) fn route_template(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str("{}");
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    let trimmed = out.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build one descriptor per operation in an OpenAPI document
///
/// # Errors
///
/// Returns every issue found (missing handler names, duplicate routes,
/// duplicate handler names) as a single error.
pub fn build_descriptors(spec: &OpenApiV3Spec) -> anyhow::Result<Vec<OperationDescriptor>> {
    let mut descriptors = Vec::new();
    let mut issues = Vec::new();
    let mut seen_routes: HashSet<(Method, String)> = HashSet::new();
    let mut seen_handlers: HashSet<String> = HashSet::new();

    let base_path = base_path_of(spec);
    let component_names: Vec<String> = spec
        .components
        .as_ref()
        .map(|c| c.schemas.keys().cloned().collect())
        .unwrap_or_default();
    let mut namer = ModelNamer::new(component_names);

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method, operation) in item.methods() {
                let method: Method = method.clone();
                let location = format!("{path} → {method}");

                let Some(handler_name) = resolve_handler_name(operation, &location, &mut issues)
                else {
                    continue;
                };

                if !seen_routes.insert((method.clone(), route_template(path))) {
                    issues.push(ValidationIssue::new(
                        &location,
                        "DuplicateOperation",
                        "Another operation with this method matches the same paths",
                    ));
                    continue;
                }
                if !seen_handlers.insert(handler_name.clone()) {
                    issues.push(ValidationIssue::new(
                        &location,
                        "DuplicateHandler",
                        format!("Handler name '{handler_name}' is already bound to another operation"),
                    ));
                    continue;
                }

                let operation_key = operation
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| handler_name.clone());
                let request_body = extract_request_body(spec, operation, &operation_key, &mut namer);
                let response = extract_success_response(spec, operation, &operation_key, &mut namer);

                debug!(
                    method = %method,
                    path = %path,
                    handler_name = %handler_name,
                    request_type = ?request_body.as_ref().map(|b| &b.type_name),
                    response_type = ?response.type_name,
                    "Operation descriptor built"
                );

                descriptors.push(OperationDescriptor {
                    method,
                    path_pattern: Arc::from(path.as_str()),
                    handler_name: Arc::from(handler_name.as_str()),
                    request_body,
                    response,
                    base_path: base_path.clone(),
                });
            }
        }
    }

    ensure_no_issues(issues)?;
    info!(
        operations = descriptors.len(),
        base_path = %base_path,
        "Operation descriptors built"
    );
    Ok(descriptors)
}
