use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    /// Parsed query string parameters
    pub query_params: ParamVec,
    /// Body parsed as JSON; `None` when absent, empty or not valid JSON
    pub body: Option<Value>,
}

impl ParsedRequest {
    /// Get a header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse query string parameters from a URL path
///
/// Everything after the first `?` is form-url-decoded.
pub fn parse_query_params(path: &str) -> ParamVec {
    match path.split_once('?') {
        Some((_, query_str)) => url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// Parse a request body as JSON
///
/// An empty or whitespace-only body, or one that is not valid JSON, yields
/// `None`; nothing is attached to the request in that case.
pub fn parse_json_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(error = %err, body_size_bytes = raw.len(), "Request body is not valid JSON");
            None
        }
    }
}

/// Extract method, path, headers, query parameters and JSON body from a
/// `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let mut body_str = String::new();
    let body = match req.body().read_to_string(&mut body_str) {
        Ok(_) => parse_json_body(&body_str),
        Err(err) => {
            debug!(error = %err, "Failed to read request body");
            None
        }
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=hello%20world");
        assert_eq!(q.len(), 2);
        assert_eq!(q[0].0.as_ref(), "x");
        assert_eq!(q[1].1, "hello world");
        assert!(parse_query_params("/p").is_empty());
    }

    #[test]
    fn test_parse_json_body() {
        assert_eq!(
            parse_json_body(r#"{"bodyData":{"key":"value"}}"#),
            Some(json!({"bodyData": {"key": "value"}}))
        );
        assert_eq!(parse_json_body("\"plain\""), Some(json!("plain")));
        assert_eq!(parse_json_body(""), None);
        assert_eq!(parse_json_body("  \n"), None);
        assert_eq!(parse_json_body("{not json"), None);
    }
}
