use crate::spec::OperationDescriptor;
use anyhow::Context;
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for the hot path.
///
/// Names are `Arc<str>` shared with the compiled route; values are per request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched operation descriptor
    pub route: Arc<OperationDescriptor>,
    /// Path parameters extracted from the URL (e.g., `{id}` → `("id", "123")`)
    pub path_params: ParamVec,
    /// Name of the handler that should process this request
    pub handler_name: String,
    /// Query string parameters (populated by the server)
    pub query_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name (last occurrence wins)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    method: Method,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    descriptor: Arc<OperationDescriptor>,
}

/// Matches `(method, path)` pairs to exactly one operation descriptor
///
/// Routes with more literal segments are tried first, so `/pets/mine` wins
/// over `/pets/{id}`.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
    base_path: String,
}

impl Router {
    /// Compile one anchored regex per descriptor.
    ///
    /// # Errors
    ///
    /// Fails if a path pattern does not compile into a valid regex.
    pub fn new(descriptors: Vec<OperationDescriptor>) -> anyhow::Result<Self> {
        let base_path = descriptors
            .first()
            .map(|d| d.base_path.clone())
            .unwrap_or_default();

        let mut routes = descriptors
            .into_iter()
            .map(|descriptor| {
                let full_path = descriptor.full_path();
                let (regex, param_names) = Self::path_to_regex(&full_path)
                    .with_context(|| format!("invalid path pattern '{full_path}'"))?;
                Ok(CompiledRoute {
                    method: descriptor.method.clone(),
                    regex,
                    param_names,
                    descriptor: Arc::new(descriptor),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        routes.sort_by_key(|r| {
            std::cmp::Reverse(
                r.descriptor
                    .path_pattern
                    .split('/')
                    .filter(|s| !s.is_empty() && !s.contains('{'))
                    .count(),
            )
        });

        info!(
            routes_count = routes.len(),
            base_path = %base_path,
            "Routing table loaded"
        );

        Ok(Self { routes, base_path })
    }

    /// Descriptors in matching order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<OperationDescriptor>> {
        self.routes.iter().map(|r| &r.descriptor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!(
            "[routes] base_path={} count={}",
            self.base_path,
            self.routes.len()
        );
        for route in &self.routes {
            let d = &route.descriptor;
            println!(
                "[route] {} {} -> {} (request: {}, response: {} {})",
                route.method,
                d.full_path(),
                d.handler_name,
                d.request_type().unwrap_or("-"),
                d.response.status,
                d.response_type().unwrap_or("-"),
            );
        }
    }

    /// Match an HTTP request to a route
    ///
    /// Returns `None` when no route has this method and path; use
    /// [`Router::allowed_methods`] to tell a 404 from a 405.
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        for route in self.routes.iter().filter(|r| r.method == method) {
            let Some(caps) = route.regex.captures(path) else {
                continue;
            };
            let path_params: ParamVec = route
                .param_names
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (Arc::clone(name), m.as_str().to_string())))
                .collect();

            debug!(
                method = %method,
                path = %path,
                handler_name = %route.descriptor.handler_name,
                route_pattern = %route.descriptor.path_pattern,
                path_params = ?path_params,
                "Route matched"
            );

            return Some(RouteMatch {
                route: Arc::clone(&route.descriptor),
                path_params,
                handler_name: route.descriptor.handler_name.to_string(),
                query_params: ParamVec::new(),
            });
        }

        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Methods of every route whose pattern matches `path`, in table order.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in &self.routes {
            if route.regex.is_match(path) && !methods.contains(&route.method) {
                methods.push(route.method.clone());
            }
        }
        methods
    }

    /// Convert an OpenAPI path pattern to an anchored regex and its parameter names
    ///
    /// `/users/{id}` becomes `^/users/([^/]+)$` with parameters `["id"]`.
    /// Literal text is escaped; a parameter may share a segment with literal
    /// text, so `/reports/{id}.json` captures `id` before the suffix.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        if path == "/" || path.is_empty() {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.is_empty() {
                continue;
            }
            pattern.push('/');
            if segment.starts_with('{') && segment.ends_with('}') && segment.matches('{').count() == 1 {
                let param_name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("([^/]+)");
                param_names.push(Arc::from(param_name));
                continue;
            }
            // Parameters mixed with literal text, e.g. `{id}.json` or `v{major}.{minor}`.
            let mut rest = segment;
            while let Some(open) = rest.find('{') {
                let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                    break;
                };
                pattern.push_str(&regex::escape(&rest[..open]));
                pattern.push_str("([^/]+?)");
                param_names.push(Arc::from(&rest[open + 1..close]));
                rest = &rest[close + 1..];
            }
            pattern.push_str(&regex::escape(rest));
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}
