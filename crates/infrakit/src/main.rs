// # infrakit - command-line front end
//
// Thin wrapper around infrakit-core. Every subcommand parses its input,
// calls one library operation and prints the resulting value. No
// infrastructure logic lives here.
//
// ## Configuration
//
// - `INFRAKIT_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
// - `INFRAKIT_HANDLER_DIR`: load edge handlers from this directory instead of
//   the embedded catalog
//
// ## Example
//
// ```bash
// infrakit subnet 2a05:d024:5a::/56 2
// infrakit vpc --name main --ipv6-cidr 2a05:d024:5a::/56 --zones abc
// infrakit compile infra.json --function site-request --out request.js
// infrakit version src/database resources/mailer
// infrakit build --name backend --command "cargo build --release" src
// ```
//
// Logs go to stderr; stdout carries only the command result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use infrakit_core::edge::CompiledFunction;
use infrakit_core::traits::HandlerSource;
use infrakit_core::{
    Artifact, BuiltinCatalog, DirectoryCatalog, GitRevisionSource, InfraConfig, Ipv6Block,
    compute_subnet_cidr, compute_version, plan_subnets,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the CLI
///
/// - 0: Success
/// - 1: Configuration or usage error
/// - 2: Runtime error
#[derive(Debug, Clone, Copy)]
enum InfrakitExitCode {
    /// Command completed
    Success = 0,
    /// Invalid arguments, configuration or input values
    ConfigError = 1,
    /// Failure while executing (I/O, git, build command)
    RuntimeError = 2,
}

impl From<InfrakitExitCode> for ExitCode {
    fn from(code: InfrakitExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "infrakit")]
#[command(
    about = "Subnet allocation, edge function compilation and artifact versioning",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log verbosity
    #[arg(long, global = true, env = "INFRAKIT_LOG_LEVEL", value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Directory catalog of edge handlers (`<dir>/<stage>/<name>.js`)
    #[arg(long, global = true, env = "INFRAKIT_HANDLER_DIR")]
    handler_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the /64 subnet at an index of a /56 block
    Subnet {
        /// Parent block, e.g. 2a05:d024:5a::/56
        parent: String,

        /// Subnet index (0-255)
        index: u32,
    },

    /// Print the per-zone subnet plan of a VPC as JSON
    Vpc {
        /// VPC name, used as subnet name prefix
        #[arg(long)]
        name: String,

        /// IPv6 block assigned to the VPC (/56)
        #[arg(long)]
        ipv6_cidr: Ipv6Block,

        /// Mask bits of each IPv4 subnet (20-24)
        #[arg(long, default_value_t = infrakit_core::vpc::DEFAULT_IPV4_MASK_BITS)]
        ipv4_mask_bits: u8,

        /// Availability zone suffixes out of a, b and c, e.g. "abc"
        #[arg(long, default_value = "abc")]
        zones: String,
    },

    /// Compile the edge functions of a configuration file
    Compile {
        /// JSON configuration file
        config: PathBuf,

        /// Only compile this function
        #[arg(long)]
        function: Option<String>,

        /// Write the code to this file instead of stdout (single function only)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the version of the sources under the given paths
    Version {
        /// Source paths, relative to the working directory
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Repository working directory
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
    },

    /// Run a build command and print the versioned artifact path
    Build {
        /// Artifact name
        #[arg(long)]
        name: String,

        /// Shell command producing the artifact
        #[arg(long)]
        command: String,

        /// Source paths the artifact is built from
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Repository working directory
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                InfrakitExitCode::ConfigError.into()
            } else {
                InfrakitExitCode::Success.into()
            };
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return InfrakitExitCode::ConfigError.into();
    }

    match run(cli) {
        Ok(()) => InfrakitExitCode::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            exit_code_for(&e).into()
        }
    }
}

/// Classify a failure by the library error at its root
fn exit_code_for(err: &anyhow::Error) -> InfrakitExitCode {
    use infrakit_core::Error;

    match err.downcast_ref::<Error>() {
        Some(
            Error::UnsupportedPrefixLength(_)
            | Error::SubnetIndexOutOfRange { .. }
            | Error::InvalidCidr(_)
            | Error::UnsupportedMaskBits(_)
            | Error::HandlerNotFound { .. }
            | Error::InvalidHandler(_)
            | Error::Config(_)
            | Error::InvalidInput(_)
            | Error::PathNotFound(_)
            | Error::Json(_),
        ) => InfrakitExitCode::ConfigError,
        _ => InfrakitExitCode::RuntimeError,
    }
}

fn run(cli: Cli) -> Result<()> {
    let catalog: Box<dyn HandlerSource> = match &cli.handler_dir {
        Some(dir) => {
            debug!("Using handler directory {}", dir.display());
            Box::new(DirectoryCatalog::new(dir))
        }
        None => Box::new(BuiltinCatalog::new()),
    };

    match cli.command {
        Commands::Subnet { parent, index } => {
            let cidr = compute_subnet_cidr(&parent, index)?;
            println!("{}", cidr);
        }

        Commands::Vpc {
            name,
            ipv6_cidr,
            ipv4_mask_bits,
            zones,
        } => {
            let zones: Vec<char> = zones.chars().collect();
            let plans = plan_subnets(&name, &ipv6_cidr, ipv4_mask_bits, &zones)?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }

        Commands::Compile {
            config,
            function,
            out,
        } => {
            let functions = compile_functions(&config, function.as_deref(), catalog.as_ref())?;
            write_functions(&functions, out.as_deref())?;
        }

        Commands::Version { paths, workdir } => {
            let version = block_on(async {
                let source = GitRevisionSource::new(&workdir);
                compute_version(&source, paths.as_slice()).await
            })??;
            println!("{}", version);
        }

        Commands::Build {
            name,
            command,
            paths,
            workdir,
        } => {
            let artifact = block_on(async {
                let source = GitRevisionSource::new(&workdir);
                let version = compute_version(&source, paths.as_slice()).await?;
                let artifact = Artifact::new(name, version)?;

                info!("Building {}", artifact);
                infrakit_core::artifact::run_build_command(&workdir, &command).await?;
                Ok::<_, infrakit_core::Error>(artifact)
            })??;
            println!("{}", artifact.path());
        }
    }

    Ok(())
}

/// Run a future on a single-threaded runtime
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Load a configuration file and compile the selected functions
fn compile_functions(
    path: &Path,
    only: Option<&str>,
    catalog: &dyn HandlerSource,
) -> Result<Vec<CompiledFunction>> {
    let config = InfraConfig::load(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;

    let selected: Vec<_> = match only {
        Some(name) => vec![config.function(name).ok_or_else(|| {
            infrakit_core::Error::config(format!(
                "Function '{}' not found in {}",
                name,
                path.display()
            ))
        })?],
        None => config.functions.iter().collect(),
    };

    info!(
        "Compiling {} function(s) with the {} catalog",
        selected.len(),
        catalog.name()
    );

    let mut compiled = Vec::with_capacity(selected.len());
    for function in selected {
        let mut chain = function.to_chain()?;
        let built = chain
            .build(catalog)
            .with_context(|| format!("Failed to compile function '{}'", function.name))?;
        debug!("Compiled {} ({})", built.name(), built.comment());
        compiled.push(built);
    }

    Ok(compiled)
}

/// Write compiled code to a file or to stdout
fn write_functions(functions: &[CompiledFunction], out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let [function] = functions else {
                return Err(infrakit_core::Error::config(format!(
                    "--out needs exactly one function, {} selected (use --function)",
                    functions.len()
                ))
                .into());
            };
            std::fs::write(path, function.code())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} to {}", function.name(), path.display());
        }
        None => {
            for function in functions {
                println!(
                    "// Function: {} ({}, {})",
                    function.name(),
                    function.stage(),
                    function.runtime()
                );
                println!("{}", function.code());
            }
        }
    }

    Ok(())
}
