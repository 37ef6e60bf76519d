use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use startup_api::config::{self, Config};
use startup_api::docker::DockerCli;
use startup_api::logging::{self, LogFormat};
use startup_api::orchestrator::Orchestrator;
use startup_api::server::{self, AppState};
use startup_api::workflows;

#[derive(Parser)]
#[command(name = "startup-api", version, about)]
struct Cli {
    /// YAML config file; missing file means built-in defaults.
    #[arg(
        long,
        short,
        global = true,
        env = "STARTUP_API_CONFIG",
        default_value = config::DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    /// Log filter, e.g. `info` or `startup_api=debug`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the start/stop/status HTTP API (default).
    Serve(ServeArgs),
    /// Render one deployment workflow per product.
    RenderWorkflows(RenderArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Address to listen on; overrides the config file.
    #[arg(long, env = "STARTUP_API_LISTEN")]
    listen: Option<String>,
}

#[derive(Args)]
struct RenderArgs {
    /// Product table (YAML). Defaults to the bundled table.
    #[arg(long)]
    products: Option<PathBuf>,

    /// Directory the workflow files are written to.
    #[arg(long, short, default_value = ".github/workflow-templates")]
    output: PathBuf,

    /// Write nothing; print a diff and fail if any file is out of date.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    let level = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    logging::init(level, cli.log_format.unwrap_or(cfg.log_format));

    match cli.command {
        Some(Command::RenderWorkflows(args)) => render_workflows(&args),
        Some(Command::Serve(args)) => serve(cfg, args).await,
        None => serve(cfg, ServeArgs::default()).await,
    }
}

async fn serve(cfg: Config, args: ServeArgs) -> Result<()> {
    let catalog = Arc::new(cfg.catalog(|name| std::env::var(name).ok())?);
    let docker = DockerCli::from_command(&cfg.docker_command)?;

    // Not fatal: probes read "not running" until the daemon comes back.
    if let Err(e) = docker.ensure_available() {
        warn!(error = %e, "docker is not reachable");
    }

    info!(
        products = catalog.len(),
        network = %cfg.network,
        memory_limit = %cfg.memory_limit,
        "catalog loaded"
    );

    let orchestrator = Orchestrator::new(catalog, Arc::new(docker), cfg.launch_settings());
    let state = Arc::new(AppState::new(orchestrator));
    let listen = args.listen.unwrap_or(cfg.listen);
    server::run_server(state, &listen).await
}

fn render_workflows(args: &RenderArgs) -> Result<()> {
    let products = match &args.products {
        Some(path) => workflows::load_products(path)?,
        None => workflows::builtin_products()?,
    };
    let rendered = workflows::render_all(workflows::builtin_template()?, &products)?;

    if args.check {
        return check_workflows(&rendered, &args.output);
    }

    let written = workflows::write_all(&rendered, &args.output)?;
    for path in &written {
        println!("Generated: {}", path.display());
    }
    println!("\nGenerated {} workflow files", written.len());
    Ok(())
}

fn check_workflows(rendered: &[workflows::RenderedWorkflow], output: &Path) -> Result<()> {
    let diffs = workflows::check_outputs(rendered, output)?;
    if diffs.is_empty() {
        println!("{} workflow files up to date in {}", rendered.len(), output.display());
        return Ok(());
    }
    for diff in &diffs {
        print!("{diff}");
    }
    bail!(
        "{} workflow file(s) in {} are out of date; rerun without --check",
        diffs.len(),
        output.display()
    );
}
