//! EO4A WPS CLI - list, describe and run processes outside the WPS server

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{info, warn};

use eo4a_core::application::{bind_request, ProcessRegistry, ProcessRunner, RawInput};
use eo4a_core::domain::ProcessDescriptor;
use eo4a_core::port::id_provider::UuidProvider;
use eo4a_core::port::ProcessDefinition;
use eo4a_core::port::time_provider::SystemTimeProvider;
use eo4a_infra_system::{LocalWorkspace, SubprocessExecutor, WorkflowVolume};

use config::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "eo4a-wps")]
#[command(about = "EO4A WPS process host", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered processes
    List,

    /// Show the inputs and outputs of a process
    Describe {
        /// Process identifier (e.g., gdalwarp_ref)
        process: String,

        /// Print the full descriptor as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a process
    Run {
        /// Process identifier (e.g., sleep)
        process: String,

        /// Input as name=value; repeat for multiple inputs or occurrences
        #[arg(short, long = "input")]
        inputs: Vec<RawInput>,

        /// Only synthesize and print the command; no directories are created
        #[arg(long)]
        dry_run: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct ProcessRow {
    identifier: String,
    title: String,
    version: String,
    metadata: String,
}

#[derive(Tabled)]
struct InputRow {
    name: String,
    label: String,
    kind: String,
    occurs: String,
    constraint: String,
    formats: String,
}

#[derive(Tabled)]
struct OutputRow {
    name: String,
    label: String,
    kind: String,
    uom: String,
}

#[derive(Tabled)]
struct ResultRow {
    output: String,
    data: String,
    uom: String,
}

fn build_runner(settings: &Settings, registry: Arc<ProcessRegistry>) -> Result<ProcessRunner> {
    let volume = WorkflowVolume::new(settings.volume_mapping()?)
        .context("Failed to resolve the data volume")?;
    let time_provider = Arc::new(SystemTimeProvider);
    let task_executor = Arc::new(SubprocessExecutor::new(
        time_provider.clone(),
        settings.env_allowlist.clone(),
    ));

    Ok(ProcessRunner::new(
        registry,
        task_executor,
        Arc::new(LocalWorkspace::new()),
        Arc::new(volume),
        Arc::new(UuidProvider),
        time_provider,
        settings.runner_config()?,
    ))
}

fn print_list(registry: &ProcessRegistry) {
    let rows: Vec<ProcessRow> = registry
        .descriptors()
        .map(|d| ProcessRow {
            identifier: d.identifier.clone(),
            title: d.title.clone(),
            version: d.version.clone(),
            metadata: d.metadata.join(", "),
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn print_description(descriptor: &ProcessDescriptor) {
    println!(
        "{} {}",
        descriptor.identifier.cyan().bold(),
        format!("v{}", descriptor.version).dimmed()
    );
    println!("{}", descriptor.title.bold());
    if !descriptor.abstract_text.is_empty() {
        println!("{}", descriptor.abstract_text);
    }
    println!();

    let inputs: Vec<InputRow> = descriptor
        .inputs
        .iter()
        .map(|f| InputRow {
            name: f.name.clone(),
            label: f.label.clone(),
            kind: f.kind.to_string(),
            occurs: f.cardinality.to_string(),
            constraint: f.constraint.to_string(),
            formats: f
                .formats
                .iter()
                .map(|fmt| fmt.mime_type.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    println!("{}", "Inputs".bold());
    println!("{}", Table::new(inputs));
    println!();

    let outputs: Vec<OutputRow> = descriptor
        .outputs
        .iter()
        .map(|f| OutputRow {
            name: f.name.clone(),
            label: f.label.clone(),
            kind: f.kind.to_string(),
            uom: f.uom.as_ref().map(|u| u.as_str().to_string()).unwrap_or_default(),
        })
        .collect();
    println!("{}", "Outputs".bold());
    println!("{}", Table::new(outputs));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings;

    let log_dir = settings.log_dir().context("Invalid log directory")?;
    let _log_guard = logging::init_logging(settings.log_format, log_dir.as_deref())
        .context("Failed to initialize logging")?;

    info!("EO4A WPS host v{}", VERSION);

    // Schema defects surface here, before any request is handled
    let registry = Arc::new(
        ProcessRegistry::with_builtins(&settings.builtin_config())
            .context("Process registration failed")?,
    );

    match cli.command {
        Commands::List => print_list(&registry),

        Commands::Describe { process, json } => {
            let process = registry.get(&process)?;
            if json {
                println!("{}", serde_json::to_string_pretty(process.describe())?);
            } else {
                print_description(process.describe());
            }
        }

        Commands::Run {
            process,
            inputs,
            dry_run,
            json,
        } => {
            let definition = registry.get(&process)?;
            let request = bind_request(definition.describe(), &inputs)
                .with_context(|| format!("Invalid request for '{}'", process))?;

            let runner = build_runner(&settings, registry.clone())?;

            if dry_run {
                if let Err(e) = settings.check_runnable(&process) {
                    warn!(error = %e, "Plan only; a real run would be refused");
                }
                let plan = runner.plan(&process, &request)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&plan)?);
                } else {
                    println!("{}", plan.command);
                }
                return Ok(());
            }

            settings.check_runnable(&process)?;

            let outcome = runner
                .run(&process, &request)
                .await
                .with_context(|| format!("Process '{}' failed", process))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            println!(
                "{}",
                format!("✓ Invocation {} completed", outcome.invocation_id)
                    .green()
                    .bold()
            );
            println!("  {} {}", "Command:".bold(), outcome.command);
            println!(
                "  {} {} ms",
                "Duration:".bold(),
                outcome.execution.duration_ms
            );
            println!();

            let rows: Vec<ResultRow> = outcome
                .response
                .outputs()
                .map(|(name, value)| ResultRow {
                    output: name.to_string(),
                    data: value.data.clone(),
                    uom: value
                        .uom
                        .as_ref()
                        .map(|u| u.as_str().to_string())
                        .unwrap_or_default(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eo4a_core::AppError;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_run_inputs() {
        let cli = Cli::try_parse_from([
            "eo4a-wps",
            "run",
            "gdalwarp_ref",
            "-i",
            "input_dir=/vol/in",
            "--input",
            "input_dir=/vol/other",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                process,
                inputs,
                dry_run,
                json,
            } => {
                assert_eq!(process, "gdalwarp_ref");
                assert_eq!(
                    inputs,
                    vec![
                        RawInput::new("input_dir", "/vol/in"),
                        RawInput::new("input_dir", "/vol/other"),
                    ]
                );
                assert!(dry_run);
                assert!(!json);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_rejects_malformed_input() {
        let result = Cli::try_parse_from(["eo4a-wps", "run", "sleep", "-i", "sleep_sec"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_flags() {
        let cli = Cli::try_parse_from([
            "eo4a-wps",
            "list",
            "--data-dir",
            "/tmp/data",
            "--workflow-dir",
            "/tmp/workflow",
            "--env-allowlist",
            "PATH,LANG",
        ])
        .unwrap();

        let mapping = cli.settings.volume_mapping().unwrap();
        assert_eq!(mapping.local_root, PathBuf::from("/tmp/data"));
        assert_eq!(mapping.workflow_root, PathBuf::from("/tmp/workflow"));
        assert_eq!(cli.settings.env_allowlist, vec!["PATH", "LANG"]);
    }

    #[test]
    fn test_relative_dirs_resolved_against_cwd() {
        let cli = Cli::try_parse_from([
            "eo4a-wps",
            "list",
            "--data-dir",
            "data",
            "--scripts-dir",
            "scripts",
        ])
        .unwrap();
        let cwd = std::env::current_dir().unwrap();

        let config = cli.settings.runner_config().unwrap();
        assert_eq!(config.data_root, cwd.join("data"));
        assert_eq!(config.scripts_dir, cwd.join("scripts"));
        assert_eq!(cli.settings.volume_mapping().unwrap().local_root, cwd.join("data"));
    }

    #[test]
    fn test_sentinel_requires_credentials() {
        let without = Cli::try_parse_from([
            "eo4a-wps",
            "list",
            "--sentinel-user",
            "",
            "--sentinel-password",
            "",
        ])
        .unwrap();
        let err = without.settings.check_runnable("acquisition:sentinelsat").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(without.settings.check_runnable("sleep").is_ok());

        let with = Cli::try_parse_from([
            "eo4a-wps",
            "list",
            "--sentinel-user",
            "hub-user",
            "--sentinel-password",
            "hub-secret",
        ])
        .unwrap();
        assert!(with.settings.check_runnable("acquisition:sentinelsat").is_ok());
    }
}
