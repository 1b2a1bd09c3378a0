use askama::Template;

use crate::spec::{to_camel_case, OperationDescriptor};

/// Crate the emitted code imports the runtime from.
pub const RUNTIME_CRATE: &str = "stubrouter";

/// First line of every emitted stub; [`super::find_stubs`] looks for it.
pub const STUB_MARKER: &str = "// stubrouter: generated stub";

/// A file carrying this line is never overwritten, even with `force`.
pub const USER_OWNED_MARKER: &str = "// stubrouter: user-owned";

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Entry in the handler registry for code generation
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Handler name the controller is registered under
    pub handler_name: String,
    /// Module under `controllers/`
    pub module: String,
    /// Controller struct name
    pub struct_name: String,
}

impl RegistryEntry {
    pub fn from_descriptor(descriptor: &OperationDescriptor) -> Self {
        Self {
            handler_name: descriptor.handler_name.to_string(),
            module: module_name(&descriptor.handler_name),
            struct_name: controller_struct_name(&descriptor.handler_name),
        }
    }
}

/// Template data for a controller stub
#[derive(Template)]
#[template(path = "controller.rs.txt", escape = "none")]
pub struct ControllerTemplateData {
    pub runtime: String,
    pub handler_name: String,
    pub struct_name: String,
    pub method: String,
    pub path: String,
    pub request_type: String,
    pub response_status: u16,
    pub response_type: String,
}

/// Template data for `registry.rs`
#[derive(Template)]
#[template(path = "registry.rs.txt", escape = "none")]
pub struct RegistryTemplateData {
    pub runtime: String,
    pub entries: Vec<RegistryEntry>,
}

/// Template data for `controllers/mod.rs`
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    pub modules: Vec<String>,
}

/// `fakeOuterString-serialize` → `fake_outer_string_serialize`
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower_or_digit = true;
        } else {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower_or_digit = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Rust module name for a handler; keywords and leading digits get an escape.
pub fn module_name(handler_name: &str) -> String {
    let snake = to_snake_case(handler_name);
    if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("{snake}_op")
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) || snake.is_empty() {
        format!("op_{snake}")
    } else {
        snake
    }
}

/// `fake_outer_string` → `FakeOuterStringController`
pub fn controller_struct_name(handler_name: &str) -> String {
    format!("{}Controller", to_camel_case(&module_name(handler_name)))
}

/// Render the controller stub for one operation.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_controller(descriptor: &OperationDescriptor) -> anyhow::Result<String> {
    let data = ControllerTemplateData {
        runtime: RUNTIME_CRATE.to_string(),
        handler_name: descriptor.handler_name.to_string(),
        struct_name: controller_struct_name(&descriptor.handler_name),
        method: descriptor.method.to_string(),
        path: descriptor.full_path(),
        request_type: descriptor.request_type().unwrap_or("no body").to_string(),
        response_status: descriptor.response.status,
        response_type: descriptor.response_type().unwrap_or("empty").to_string(),
    };
    Ok(data.render()?)
}

/// Render `registry.rs` binding every descriptor's controller.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_registry(descriptors: &[OperationDescriptor]) -> anyhow::Result<String> {
    let data = RegistryTemplateData {
        runtime: RUNTIME_CRATE.to_string(),
        entries: descriptors.iter().map(RegistryEntry::from_descriptor).collect(),
    };
    Ok(data.render()?)
}

/// Render `controllers/mod.rs` declaring the given modules.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_mod_rs(modules: &[String]) -> anyhow::Result<String> {
    Ok(ModRsTemplateData {
        modules: modules.to_vec(),
    }
    .render()?)
}
