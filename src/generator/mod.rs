//! # Generator Module
//!
//! A minimal stub emitter: one controller per operation plus the registry that
//! binds them, rendered from Askama templates in `templates/`.
//!
//! ## Generated Structure
//!
//! ```text
//! <output>/
//! ├── registry.rs             # register_all(&mut Dispatcher)
//! └── controllers/
//!     ├── mod.rs
//!     └── <handler>.rs        # one stub per operation
//! ```
//!
//! Every emitted controller starts with [`STUB_MARKER`], carries a `TODO` and
//! fails with `NotImplemented`. Existing controllers are skipped unless `force`
//! is set; a file containing [`USER_OWNED_MARKER`] is never overwritten.
//!
//! ## Usage
//!
//! ```bash
//! stubrouter generate-stubs --spec doc/openapi.yaml --output src/generated
//! ```

mod templates;

pub use templates::{
    controller_struct_name, module_name, render_controller, render_mod_rs, render_registry,
    to_snake_case, ControllerTemplateData, ModRsTemplateData, RegistryEntry,
    RegistryTemplateData, RUNTIME_CRATE, STUB_MARKER, USER_OWNED_MARKER,
};

use crate::spec::{load_spec, OperationDescriptor};
use anyhow::{bail, Context};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existed and `force` was not set
    Skipped,
    /// Carries the user-owned marker
    UserOwned,
}

/// Files touched by one [`generate_stubs`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub user_owned: Vec<PathBuf>,
}

impl GenerationReport {
    fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written.push(path),
            WriteOutcome::Skipped => self.skipped.push(path),
            WriteOutcome::UserOwned => self.user_owned.push(path),
        }
    }
}

fn is_user_owned(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|content| content.contains(USER_OWNED_MARKER))
        .unwrap_or(false)
}

/// Write `content` to `path` unless the file is user-owned, or exists and
/// `overwrite` is false.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_generated(path: &Path, content: &str, overwrite: bool) -> anyhow::Result<WriteOutcome> {
    if path.exists() {
        if is_user_owned(path) {
            println!("🔒 Keeping user-owned file: {}", path.display());
            return Ok(WriteOutcome::UserOwned);
        }
        if !overwrite {
            println!("⚠️  Skipping existing file: {}", path.display());
            return Ok(WriteOutcome::Skipped);
        }
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("✅ Generated {}", path.display());
    Ok(WriteOutcome::Written)
}

/// Module name of every descriptor's controller, in order.
///
/// # Errors
///
/// Fails when two handler names map to the same module, e.g. `getPet` and
/// `get_pet`.
fn controller_modules(descriptors: &[OperationDescriptor]) -> anyhow::Result<Vec<String>> {
    let mut owners: HashMap<String, &str> = HashMap::with_capacity(descriptors.len());
    let mut modules = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let module = module_name(&descriptor.handler_name);
        if let Some(first) = owners.insert(module.clone(), &descriptor.handler_name) {
            bail!(
                "handlers '{first}' and '{}' both map to controllers/{module}.rs",
                descriptor.handler_name
            );
        }
        modules.push(module);
    }
    Ok(modules)
}

/// Emit controllers and registry for already-loaded descriptors.
///
/// Nothing is written when two handlers would share a controller module.
///
/// # Errors
///
/// Returns an error on a module name clash, if rendering fails, or if the
/// output cannot be written.
pub fn generate_stubs_for(
    descriptors: &[OperationDescriptor],
    out_dir: &Path,
    force: bool,
) -> anyhow::Result<GenerationReport> {
    let modules = controller_modules(descriptors)?;
    let controllers_dir = out_dir.join("controllers");
    fs::create_dir_all(&controllers_dir)
        .with_context(|| format!("failed to create {}", controllers_dir.display()))?;

    let mut report = GenerationReport::default();

    for (descriptor, module) in descriptors.iter().zip(&modules) {
        let path = controllers_dir.join(format!("{module}.rs"));
        let outcome = write_generated(&path, &render_controller(descriptor)?, force)?;
        report.record(path, outcome);
    }

    let mod_path = controllers_dir.join("mod.rs");
    let outcome = write_generated(&mod_path, &render_mod_rs(&modules)?, true)?;
    report.record(mod_path, outcome);

    let registry_path = out_dir.join("registry.rs");
    let outcome = write_generated(&registry_path, &render_registry(descriptors)?, true)?;
    report.record(registry_path, outcome);

    info!(
        out_dir = %out_dir.display(),
        written = report.written.len(),
        skipped = report.skipped.len(),
        user_owned = report.user_owned.len(),
        "Stub generation finished"
    );
    Ok(report)
}

/// Load `spec` and emit `controllers/<handler>.rs`, `controllers/mod.rs` and
/// `registry.rs` under `out_dir`.
///
/// # Errors
///
/// Returns an error if the spec does not load or any file cannot be written.
pub fn generate_stubs(
    spec: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    force: bool,
) -> anyhow::Result<GenerationReport> {
    let (descriptors, slug) = load_spec(spec.as_ref())?;
    info!(slug = %slug, operations = descriptors.len(), "Generating stubs");
    generate_stubs_for(&descriptors, out_dir.as_ref(), force)
}

/// Rust files under `dir` (recursively) that still carry [`STUB_MARKER`], sorted.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn find_stubs(dir: impl AsRef<Path>) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect_stubs(dir.as_ref(), &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_stubs(dir: &Path, found: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_stubs(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if content.lines().any(|line| line.trim() == STUB_MARKER) {
                found.push(path);
            }
        }
    }
    Ok(())
}
