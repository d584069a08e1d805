//! release-prep CLI
//!
//! Release preparation helpers: task gating and documentation version updates

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use release_prep::{
    ConfigLoadOptions, ConfigLoader, GateRules, NexusCredentials, ReleaseConfig, ReleaseVersion,
    RewriteOutcome, RewriteRules, RewriteSummary, TaskDescriptor, TaskGate, VersionRewriter,
    VersionValidator,
};
use std::path::{Path, PathBuf};
use std::process;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

/// Release preparation helpers
#[derive(Parser)]
#[command(name = "release-prep")]
#[command(version)]
#[command(about = "Release preparation helpers: task gating and documentation version updates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide which build tasks run
    Gate {
        /// Task paths (read from --tasks-file or stdin when omitted)
        #[arg(value_name = "TASK")]
        tasks: Vec<String>,

        /// Project path (defaults to current directory)
        #[arg(short, long, value_name = "PROJECT_PATH")]
        project: Option<PathBuf>,

        /// File with one task path per line
        #[arg(long, conflicts_with = "tasks")]
        tasks_file: Option<PathBuf>,

        /// Print the decisions as JSON instead of log lines
        #[arg(long)]
        json: bool,
    },

    /// Update version references in the README
    UpdateDocs {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Release version (falls back to RELEASE_VERSION)
        #[arg(long)]
        release_version: Option<String>,

        /// Documentation file, relative to the project path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Only report what would change
        #[arg(long)]
        dry_run: bool,
    },

    /// Check configuration, release version and publishing credentials
    Check {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Release version (falls back to RELEASE_VERSION)
        #[arg(long)]
        release_version: Option<String>,
    },

    /// Print the resolved configuration
    ShowConfig {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gate {
            tasks,
            project,
            tasks_file,
            json,
        } => {
            let path = project.unwrap_or_else(|| PathBuf::from("."));
            gate_command(path, tasks, tasks_file, json).await
        }
        Commands::UpdateDocs {
            project_path,
            release_version,
            file,
            dry_run,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            update_docs_command(path, release_version, file, dry_run).await
        }
        Commands::Check {
            project_path,
            release_version,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            check_command(path, release_version).await
        }
        Commands::ShowConfig { project_path } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            show_config_command(path).await
        }
    }
}

async fn load_config(
    project_path: &Path,
    release_version: Option<String>,
    readme: Option<PathBuf>,
) -> Result<ReleaseConfig> {
    let config = ConfigLoader::load(ConfigLoadOptions {
        project_path: project_path.to_path_buf(),
        release_version,
        readme,
        env: std::env::vars().collect(),
    })
    .await?;
    Ok(config)
}

async fn gate_command(
    project_path: PathBuf,
    task_args: Vec<String>,
    tasks_file: Option<PathBuf>,
    json: bool,
) -> Result<i32> {
    let config = load_config(&project_path, None, None).await?;
    let gate = TaskGate::new(GateRules::from_config(&config.gate)?);

    let input = if !task_args.is_empty() {
        task_args
    } else if let Some(file) = tasks_file {
        let content = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read task list {}", file.display()))?;
        parse_task_list(&content)
    } else {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read task list from stdin")?;
        parse_task_list(&content)
    };

    let mut tasks: Vec<TaskDescriptor> = input.into_iter().map(TaskDescriptor::new).collect();

    if json {
        let report = gate.apply(&mut tasks);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        gate.filter(&mut tasks);
    }

    Ok(0)
}

fn parse_task_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

async fn update_docs_command(
    project_path: PathBuf,
    release_version: Option<String>,
    file: Option<PathBuf>,
    dry_run: bool,
) -> Result<i32> {
    let config = load_config(&project_path, release_version, file).await?;

    let Some(version) = config.release_version.as_deref() else {
        bail!("Release version is required (--release-version or RELEASE_VERSION)");
    };

    let rewriter = VersionRewriter::new(RewriteRules::from_config(&config.docs))?;
    let readme = project_path.join(&config.docs.readme);

    let outcome = if dry_run {
        rewriter.preview_file(version, &readme).await?
    } else {
        rewriter.rewrite_file(version, &readme).await?
    };

    match outcome {
        RewriteOutcome::Missing => {
            println!("⚠️  {} not found, nothing to update", readme.display());
        }
        RewriteOutcome::Unchanged { .. } => {
            println!("✅ {} is already at {}", readme.display(), version);
        }
        RewriteOutcome::Updated { summary, written } => {
            if written {
                println!("✅ Updated {} to {}", readme.display(), version);
            } else {
                println!("🔍 Dry run: {} would be updated to {}", readme.display(), version);
            }
            print_summary(&summary);
        }
    }

    Ok(0)
}

fn print_summary(summary: &RewriteSummary) {
    let rows = [
        ("<version> tags", summary.stable_tags),
        ("<version> snapshot tags", summary.snapshot_tags),
        ("implementation coordinates", summary.stable_coordinates),
        ("implementation snapshot coordinates", summary.snapshot_coordinates),
        ("VERSION_STABLE markers", summary.stable_markers),
        ("VERSION_UNSTABLE markers", summary.unstable_markers),
    ];
    for (label, count) in rows.iter().filter(|(_, count)| *count > 0) {
        println!("  - {}: {}", label, count);
    }
}

async fn check_command(project_path: PathBuf, release_version: Option<String>) -> Result<i32> {
    println!("\n🔍 Release Check\n");

    let config = load_config(&project_path, release_version, None).await?;
    let result = ConfigLoader::validate(&config);
    let mut error_count = result.errors.len();

    if result.valid {
        println!("  ✅ Configuration valid");
    } else {
        println!("  ❌ Configuration invalid");
        for error in &result.errors {
            println!("    - [{}] {}", error.field, error.message);
            match (&error.expected, &error.actual) {
                (Some(expected), Some(actual)) => {
                    println!("      expected: {}, actual: {}", expected, actual)
                }
                (Some(expected), None) => println!("      expected: {}", expected),
                (None, Some(actual)) => println!("      actual: {}", actual),
                (None, None) => {}
            }
        }
    }
    if !result.warnings.is_empty() {
        println!("  ⚠️  Warnings:");
        for warning in &result.warnings {
            println!("    - [{}] {}", warning.field, warning.message);
            if let Some(suggestion) = &warning.suggestion {
                println!("      suggestion: {}", suggestion);
            }
        }
    }

    match config.release_version.as_deref() {
        None => println!("  ⚠️  No release version set"),
        Some(raw) => match ReleaseVersion::parse(raw) {
            Ok(version) => {
                println!(
                    "  ✅ Release version {} (next snapshot {})",
                    version,
                    version.next_snapshot()
                );
                let semver = VersionValidator::new().validate(raw);
                if !semver.is_valid {
                    println!("  ⚠️  {} is not a full SemVer version", raw);
                }
                if version.is_prerelease() {
                    println!("  ⚠️  {} is a prerelease; docs will reference it as-is", raw);
                }
            }
            Err(e) => {
                println!("  ❌ {}", e);
                error_count += 1;
            }
        },
    }

    let nexus = &config.nexus;
    let credentials = NexusCredentials::from_env(nexus);
    if credentials.is_complete() {
        println!(
            "  ✅ Nexus credentials set (user {})",
            credentials.masked_username().unwrap_or_default()
        );
    } else {
        println!(
            "  ⚠️  Nexus credentials missing: {}",
            credentials.missing_variables(nexus).join(", ")
        );
    }
    println!(
        "  ℹ️  Transition checks: {} x {}s ({} min total)",
        nexus.transition_check.max_retries,
        nexus.transition_check.delay_between_secs,
        nexus.transition_check.total_wait().as_secs() / 60
    );

    println!();
    Ok(if error_count == 0 { 0 } else { 1 })
}

async fn show_config_command(project_path: PathBuf) -> Result<i32> {
    let config = load_config(&project_path, None, None).await?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(0)
}
