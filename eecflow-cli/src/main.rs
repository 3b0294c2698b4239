//! eecflow - print the build pipeline for an eec workspace
//!
//! Usage: eecflow plan --config .vscode/settings.json --mode device
//!
//! Reads the persisted settings, resolves the pipeline for the selected
//! device and prints each invocation. Nothing is executed.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eecflow::prelude::*;
use eecflow::tasks::{NoPromptSelector, StaticConfigStore};
use eecflow::toolchain::resolve_root;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eecflow")]
#[command(about = "Resolve eec build pipelines without running them")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the invocations of a pipeline
    Plan {
        /// Settings file holding targetDevice and build.* keys
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pipeline to resolve
        #[arg(long, value_enum, default_value_t = Mode::Device)]
        mode: Mode,

        #[command(flatten)]
        env: Environment,

        /// Look up executables and create output directories
        #[arg(long)]
        materialize: bool,

        /// Print JSON instead of command lines
        #[arg(long)]
        json: bool,
    },

    /// Resolve a task definition from a JSON file
    Task {
        /// File holding one task definition
        definition: PathBuf,

        #[command(flatten)]
        env: Environment,
    },
}

#[derive(clap::Args)]
struct Environment {
    /// Workspace the arguments are relative to (default: current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Toolchain bin directory (default: $EEC_HOME/bin or ~/.eec/bin)
    #[arg(long)]
    toolchain: Option<PathBuf>,
}

impl Environment {
    fn workspace(&self) -> Result<PathBuf> {
        match &self.workspace {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    fn toolchain(&self) -> Result<InstallDirToolchain> {
        match &self.toolchain {
            Some(path) => Ok(InstallDirToolchain::new(path)),
            None => InstallDirToolchain::from_env().map_err(report),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Device,
    Simulate,
    Fallback,
}

impl From<Mode> for PipelineMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Device => Self::Device,
            Mode::Simulate => Self::Simulate,
            Mode::Fallback => Self::Fallback,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Plan {
            config,
            mode,
            env,
            materialize,
            json,
        } => plan(config.as_deref(), mode.into(), &env, materialize, json).await,
        Command::Task { definition, env } => task(&definition, &env).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn plan(
    config: Option<&Path>,
    mode: PipelineMode,
    env: &Environment,
    materialize: bool,
    json: bool,
) -> Result<()> {
    let workspace = env.workspace()?;
    let toolchain = env.toolchain()?;
    let snapshot = match config {
        Some(path) => read_snapshot(path)?,
        None if mode == PipelineMode::Fallback => ConfigSnapshot::default(),
        None => bail!("--config is required for the {mode} pipeline"),
    };
    debug!(%mode, workspace = %workspace.display(), materialize, "Resolving pipeline");

    if materialize {
        let provider = TaskProvider::new(
            Arc::new(toolchain),
            Arc::new(StaticConfigStore::new(snapshot)),
            Arc::new(NoPromptSelector),
            &workspace,
        );
        let ready = provider.create_pipeline(mode).await.map_err(report)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&ready)?);
        } else {
            for invocation in &ready {
                print_line(&invocation.descriptor, &invocation.executable);
            }
        }
        return Ok(());
    }

    let (root, pipeline) = if mode == PipelineMode::Fallback {
        let root = toolchain.bin_dir().to_path_buf();
        (root, PipelineBuilder::fallback(&workspace).map_err(report)?)
    } else {
        let root = installed_root(&toolchain).await?;
        let pipeline = PipelineBuilder::new(&snapshot, &root, &workspace)
            .build(mode)
            .map_err(report)?;
        (root, pipeline)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
    } else {
        for descriptor in pipeline.invocations() {
            print_line(descriptor, &root.join(descriptor.role().file_name()));
        }
    }
    Ok(())
}

async fn task(definition: &Path, env: &Environment) -> Result<()> {
    let text = std::fs::read_to_string(definition)
        .with_context(|| format!("Failed to read {}", definition.display()))?;
    let definition: TaskDefinition = serde_json::from_str(&text)
        .with_context(|| format!("Invalid task definition in {}", definition.display()))?;

    let provider = TaskProvider::new(
        Arc::new(env.toolchain()?),
        Arc::new(StaticConfigStore::default()),
        Arc::new(NoPromptSelector),
        env.workspace()?,
    );
    let Some(ready) = provider
        .resolve_task(&definition)
        .await
        .map_err(report)?
    else {
        bail!("'{}' is not an eec task command", definition.command);
    };

    print_line(&ready.descriptor, &ready.executable);
    Ok(())
}

/// The toolchain root, failing before any path is derived when nothing is
/// installed.
async fn installed_root(toolchain: &InstallDirToolchain) -> Result<PathBuf> {
    resolve_root(toolchain).await.map_err(report)
}

fn read_snapshot(path: &Path) -> Result<ConfigSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ConfigSnapshot::from_json(&text).map_err(report)
}

fn report(err: impl Into<EecflowError>) -> anyhow::Error {
    let info = err.into().error_info();
    match info.fix_hint {
        Some(hint) => anyhow!("{} [{}]\n{hint}", info.summary, info.code),
        None => anyhow!("{} [{}]", info.summary, info.code),
    }
}

fn print_line(descriptor: &InvocationDescriptor, executable: &Path) {
    println!(
        "{:<18} {} {}",
        descriptor.name(),
        executable.display(),
        descriptor.args().join(" ")
    );
}
