use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use serde_json::Value;
use tracing::error;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// `may_minihttp` only takes `'static` header lines, so content types map to
/// a fixed set.
fn content_type_header(content_type: Option<&str>) -> &'static str {
    let base = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .unwrap_or("application/json");
    match base {
        "text/plain" => "Content-Type: text/plain",
        "text/yaml" | "application/yaml" => "Content-Type: text/yaml",
        "text/html" => "Content-Type: text/html",
        _ => "Content-Type: application/json",
    }
}

fn body_bytes(body: &Value) -> Vec<u8> {
    serde_json::to_vec(body).unwrap_or_else(|err| {
        error!(error = %err, "Failed to serialize response body");
        br#"{"error":"Failed to serialize response"}"#.to_vec()
    })
}

/// Write a handler response
///
/// String bodies are written raw when the handler asked for `text/plain`;
/// everything else is serialized as JSON. `204` responses carry no body.
pub fn write_handler_response(res: &mut Response, hr: &HandlerResponse) {
    res.status_code(hr.status as usize, status_reason(hr.status));
    if hr.status == 204 {
        return;
    }
    let header = content_type_header(hr.get_header("content-type"));
    res.header(header);
    match &hr.body {
        Value::String(s) if header == "Content-Type: text/plain" => {
            res.body_vec(s.clone().into_bytes());
        }
        other => res.body_vec(body_bytes(other)),
    }
}

/// Write a JSON error body with the given status
pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body_bytes(&body));
}
