use crate::{
    config::ServiceConfig,
    dispatcher::Dispatcher,
    generator::{find_stubs, generate_stubs},
    logging::{init_logging_with_config, LogConfig},
    pet_store,
    router::Router,
    server::{AppService, HttpServer, ServerHandle},
    spec::{load_spec, OperationDescriptor},
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line interface for stubrouter
///
/// Serves an OpenAPI spec with stub handlers, inspects it, and emits
/// controller stubs.
#[derive(Debug, Parser)]
#[command(name = "stubrouter")]
#[command(about = "OpenAPI stub operation server", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the spec; operations without a controller answer 500 Not implemented
    Serve {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Address and port to bind the server to (overrides the config file)
        #[arg(long)]
        addr: Option<String>,

        /// Service configuration file
        #[arg(short, long, default_value = "config/config.yaml")]
        config: PathBuf,
    },
    /// Print the routing table
    Routes {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
    /// List operations still answering with the stub, and stub files on disk
    Check {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Directory scanned for generated stub files
        #[arg(long, default_value = "src")]
        stubs_dir: PathBuf,
    },
    /// Emit one controller stub per operation plus the registry binding them
    ///
    /// Existing controllers are kept unless --force is given. Files carrying
    /// the `// stubrouter: user-owned` line are never overwritten.
    GenerateStubs {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite existing controller stubs
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
}

/// Parse the process arguments and run the selected command
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Run an already-parsed command line
///
/// # Errors
///
/// Returns an error if:
/// - The OpenAPI spec cannot be loaded or is invalid
/// - The config file is malformed
/// - Stub generation cannot write its output
/// - The server fails to start
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { spec, addr, config } => {
            let mut service_config = ServiceConfig::load(&config)?;
            service_config.merge_cli(spec, addr);
            let log_config = LogConfig::from_env().with_service_config(&service_config.logging);
            let _guard = init_logging_with_config(&log_config)?;
            serve(&service_config)
        }
        Commands::Routes { spec } => {
            let (descriptors, _slug) = load_spec(&spec)?;
            Router::new(descriptors)?.dump_routes();
            Ok(())
        }
        Commands::Check { spec, stubs_dir } => {
            let (descriptors, _slug) = load_spec(&spec)?;
            let dispatcher = build_dispatcher(&descriptors);
            print_stub_report(&dispatcher, descriptors.len(), &stubs_dir)
        }
        Commands::GenerateStubs {
            spec,
            output,
            force,
        } => {
            let report = generate_stubs(&spec, &output, force)?;
            println!(
                "📦 {} written, {} skipped, {} user-owned",
                report.written.len(),
                report.skipped.len(),
                report.user_owned.len()
            );
            Ok(())
        }
    }
}

/// Bind the built-in controllers the spec declares, then register a stub for
/// every operation that is still missing one.
pub fn build_dispatcher(descriptors: &[OperationDescriptor]) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    pet_store::registry::register_all(&mut dispatcher);
    dispatcher.retain_declared(descriptors);
    dispatcher.register_missing_as_stubs(descriptors);
    dispatcher
}

/// Load the spec and start serving it; returns once the server is listening.
///
/// # Errors
///
/// Returns an error if no spec path is configured, the spec is invalid, or
/// the address cannot be bound.
pub fn start_service(config: &ServiceConfig) -> anyhow::Result<ServerHandle> {
    let spec_path = config
        .spec_path
        .clone()
        .context("no spec given: pass --spec or set spec_path in the config file")?;
    let (descriptors, slug) = load_spec(&spec_path)?;
    let router = Router::new(descriptors.clone())?;
    let dispatcher = build_dispatcher(&descriptors);
    for handler in dispatcher.stubbed_handlers() {
        warn!(handler = %handler, "Operation not implemented");
    }

    config.runtime()?.apply();
    let service = AppService::new(router, dispatcher, Some(spec_path));
    let handle = HttpServer(service)
        .start(config.http.addr.as_str())
        .with_context(|| format!("failed to bind {}", config.http.addr))?;
    info!(slug = %slug, addr = %handle.addr(), "stubrouter serving");
    Ok(handle)
}

fn serve(config: &ServiceConfig) -> anyhow::Result<()> {
    let handle = start_service(config)?;
    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))
}

fn print_stub_report(
    dispatcher: &Dispatcher,
    operations: usize,
    stubs_dir: &Path,
) -> anyhow::Result<()> {
    let stubbed = dispatcher.stubbed_handlers();
    if stubbed.is_empty() {
        println!("✅ All {operations} operations implemented");
    } else {
        println!("🚧 {} of {operations} operations not implemented:", stubbed.len());
        for handler in stubbed {
            println!("  - {handler}");
        }
    }

    if stubs_dir.is_dir() {
        let files = find_stubs(stubs_dir)?;
        if !files.is_empty() {
            println!("📄 Stub files under {}:", stubs_dir.display());
            for file in files {
                println!("  - {}", file.display());
            }
        }
    }
    Ok(())
}
