//! platinfo - prints process and system information for the running host.
//!
//! Thin adapter over `platinfo-core`: parses flags, sets up logging, runs one
//! query and renders the result as text or JSON.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, debug, warn};
use tracing_subscriber::EnvFilter;

#[cfg(not(target_os = "linux"))]
use platinfo_core::collector::mock::{MockFs, MockOs};
#[cfg(target_os = "linux")]
use platinfo_core::collector::{LinuxOs, RealFs};
use platinfo_core::collector::procfs::EXE_PATH_CAPACITY;
use platinfo_core::collector::{FileSystem, OsApi};
use platinfo_core::{Platform, PlatformConfig, PlatformError, title};

/// Process and system introspection.
#[derive(Parser)]
#[command(name = "platinfo", about = "Process and system introspection", version)]
struct Args {
    /// Path to /proc filesystem (for testing/chroots).
    #[arg(long, default_value = "/proc", global = true)]
    proc_path: PathBuf,

    /// Path to /sys filesystem.
    #[arg(long, default_value = "/sys", global = true)]
    sys_path: PathBuf,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Memory footprint of this process and of the system.
    Memory,
    /// Model, clock speed and times of every logical CPU.
    Cpus,
    /// Load averages over 1, 5 and 15 minutes.
    Load,
    /// System uptime and age of this process.
    Uptime,
    /// Addresses of every up and running network interface.
    Interfaces,
    /// Path of the running executable.
    Exe {
        /// Buffer capacity in bytes, including the terminator.
        #[arg(long, default_value_t = EXE_PATH_CAPACITY)]
        capacity: usize,
    },
    /// Show or change the process title.
    Title {
        /// New title to apply.
        #[arg(long)]
        set: Option<String>,
    },
    /// Every query at once (default).
    Snapshot,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is WARN. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["platinfo", "platinfo_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Error type for a failed command.
#[derive(Debug)]
enum CliError {
    Platform(PlatformError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Platform(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "JSON encoding failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<PlatformError> for CliError {
    fn from(e: PlatformError) -> Self {
        CliError::Platform(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct MemoryReport {
    process: platinfo_core::ProcessMemoryInfo,
    free_memory: f64,
    total_memory: f64,
}

#[derive(Serialize)]
struct UptimeReport {
    uptime: f64,
    process_age: f64,
    process_start_time: Option<f64>,
}

fn run<F, O>(platform: &Platform<F, O>, command: Command, json: bool) -> Result<(), CliError>
where
    F: FileSystem + Clone,
    O: OsApi + Clone,
{
    match command {
        Command::Memory => {
            let report = MemoryReport {
                process: platform.process_memory()?,
                free_memory: platform.free_memory()?,
                total_memory: platform.total_memory()?,
            };
            if json {
                print_json(&report)?;
            } else {
                print!(
                    "{}",
                    render::memory(&report.process, report.free_memory, report.total_memory)
                );
            }
        }
        Command::Cpus => {
            let cpus = platform.cpus()?;
            if json {
                print_json(&cpus)?;
            } else {
                print!("{}", render::cpus(&cpus));
            }
        }
        Command::Load => {
            let load = platform.load_average()?;
            if json {
                print_json(&load.as_array())?;
            } else {
                println!("{}", render::load(&load));
            }
        }
        Command::Uptime => {
            let report = UptimeReport {
                uptime: platform.uptime(),
                process_age: platform.process_age(),
                process_start_time: platinfo_core::process_start_time(),
            };
            if json {
                print_json(&report)?;
            } else {
                println!("{}", render::uptime(report.uptime, report.process_age));
            }
        }
        Command::Interfaces => {
            let table = platform.interface_addresses()?;
            if json {
                print_json(&table)?;
            } else {
                print!("{}", render::interfaces(&table));
            }
        }
        Command::Exe { capacity } => {
            let path = platform.executable_path(capacity)?;
            if json {
                print_json(&path)?;
            } else {
                println!("{path}");
            }
        }
        Command::Title { set } => {
            if let Some(new_title) = set {
                platform.set_title(&new_title)?;
                debug!(title = %new_title, "process title updated");
            }
            let current = platform.title().to_string();
            if json {
                print_json(&current)?;
            } else {
                println!("{current}");
            }
        }
        Command::Snapshot => {
            let snapshot = platform.snapshot();
            for error in &snapshot.errors {
                warn!("{error}");
            }
            if json {
                print_json(&snapshot)?;
            } else {
                print!("{}", render::snapshot(&snapshot));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    title::setup_from_args();
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = PlatformConfig {
        proc_path: args.proc_path.clone(),
        sys_path: args.sys_path.clone(),
    };
    debug!(proc = %config.proc_path.display(), sys = %config.sys_path.display(), "config");

    #[cfg(target_os = "linux")]
    let platform = Platform::new(RealFs::new(), LinuxOs::new(), config);
    #[cfg(not(target_os = "linux"))]
    let platform = {
        warn!("not running on Linux, reporting a simulated four-core host");
        Platform::new(
            MockFs::four_core_system(),
            MockOs::with_typical_interfaces(),
            config,
        )
    };

    let command = args.command.unwrap_or(Command::Snapshot);
    match run(&platform, command, args.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("platinfo: {e}");
            ExitCode::FAILURE
        }
    }
}
