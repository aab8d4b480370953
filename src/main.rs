//! Beetmover CLI
//!
//! Entry point for the `beetmover` command-line tool.

use beetmover::config::{BeetmoverConfig, EffectiveConfig};
use beetmover::{
    collect_checksums, generate_manifest, generate_template_args, get_hash, plan_release_copy,
    render_checksums, write_checksums, ReleaseContext, Task,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beetmover")]
#[command(about = "Release artifact manifest generation", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the beetmover manifest for a task
    Manifest {
        #[command(flatten)]
        task: TaskArgs,

        /// Path to config file (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Extra exclude pattern (repeatable); replaces configured excludes
        #[arg(long)]
        exclude: Vec<String>,

        /// Write the manifest here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write the merged configuration with its sources
        #[arg(long)]
        effective_config: Option<PathBuf>,
    },

    /// Print the template arguments computed for a task
    TemplateArgs {
        #[command(flatten)]
        task: TaskArgs,
    },

    /// Print the digest of a file
    Hash {
        file: PathBuf,

        #[arg(long, default_value = "sha512")]
        hash_type: String,
    },

    /// Write a checksums file for a directory of artifacts
    Checksums {
        dir: PathBuf,

        /// Path to config file (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Overrides the configured hash type
        #[arg(long)]
        hash_type: Option<String>,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Plan the candidates -> releases copy for a task
    ReleasePlan {
        /// Path to task definition JSON
        #[arg(long)]
        task: PathBuf,

        /// File listing candidate keys, one per line
        #[arg(long)]
        keys: PathBuf,

        /// Path to config file (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct TaskArgs {
    /// Path to task definition JSON
    #[arg(long)]
    task: PathBuf,

    /// Action the task runs (push-to-nightly, push-to-candidates, ...)
    #[arg(long)]
    action: String,

    /// Destination bucket name
    #[arg(long)]
    bucket: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Manifest {
            task,
            config,
            exclude,
            output,
            effective_config,
        } => run_manifest(
            &task,
            config.as_deref(),
            exclude,
            output.as_deref(),
            effective_config.as_deref(),
        ),
        Commands::TemplateArgs { task } => run_template_args(&task),
        Commands::Hash { file, hash_type } => run_hash(&file, &hash_type),
        Commands::Checksums {
            dir,
            config,
            hash_type,
            output,
        } => run_checksums(&dir, config.as_deref(), hash_type, output.as_deref()),
        Commands::ReleasePlan { task, keys, config } => run_release_plan(&task, &keys, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_task(path: &Path) -> Result<Task, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("reading task {}: {}", path.display(), e))?;
    Task::from_json(&contents).map_err(|e| e.to_string())
}

fn load_context(args: &TaskArgs) -> Result<ReleaseContext, String> {
    let task = load_task(&args.task)?;
    ReleaseContext::new(task, args.action.as_str(), args.bucket.as_str()).map_err(|e| e.to_string())
}

fn build_effective(path: Option<&Path>, overrides: serde_json::Value) -> Result<EffectiveConfig, String> {
    let overrides = match overrides.as_object() {
        Some(map) if map.is_empty() => None,
        _ => Some(overrides),
    };
    EffectiveConfig::build(path, overrides).map_err(|e| e.to_string())
}

fn load_config(path: Option<&Path>, overrides: serde_json::Value) -> Result<BeetmoverConfig, String> {
    let effective = build_effective(path, overrides)?;
    BeetmoverConfig::from_effective(&effective).map_err(|e| e.to_string())
}

fn emit(json: &str) -> Result<(), String> {
    println!("{}", json);
    Ok(())
}

fn run_manifest(
    task: &TaskArgs,
    config_path: Option<&Path>,
    exclude: Vec<String>,
    output: Option<&Path>,
    effective_config: Option<&Path>,
) -> Result<(), String> {
    let ctx = load_context(task)?;

    let mut overrides = serde_json::Map::new();
    if !exclude.is_empty() {
        overrides.insert("excludes".to_string(), serde_json::json!(exclude));
    }
    let effective = build_effective(config_path, serde_json::Value::Object(overrides))?;
    if let Some(path) = effective_config {
        effective
            .write_to_file(path)
            .map_err(|e| format!("writing {}: {}", path.display(), e))?;
        eprintln!("Wrote: {}", path.display());
    }
    let config = BeetmoverConfig::from_effective(&effective).map_err(|e| e.to_string())?;

    let excludes = config.exclude_patterns().map_err(|e| e.to_string())?;
    let env = config.environment();

    let manifest = generate_manifest(&ctx, &env, &excludes).map_err(|e| e.to_string())?;
    match output {
        Some(path) => {
            manifest
                .write_to_file(path)
                .map_err(|e| format!("writing {}: {}", path.display(), e))?;
            eprintln!("Wrote: {}", path.display());
            Ok(())
        }
        None => emit(&manifest.to_json().map_err(|e| e.to_string())?),
    }
}

fn run_template_args(task: &TaskArgs) -> Result<(), String> {
    let ctx = load_context(task)?;
    let args = generate_template_args(&ctx).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&args).map_err(|e| e.to_string())?;
    emit(&json)
}

fn run_hash(file: &Path, hash_type: &str) -> Result<(), String> {
    let digest = get_hash(file, hash_type).map_err(|e| e.to_string())?;
    println!("{}  {}", digest, file.display());
    Ok(())
}

fn run_checksums(
    dir: &Path,
    config_path: Option<&Path>,
    hash_type: Option<String>,
    output: Option<&Path>,
) -> Result<(), String> {
    let mut overrides = serde_json::Map::new();
    if let Some(hash_type) = hash_type {
        overrides.insert("hash_type".to_string(), serde_json::Value::String(hash_type));
    }
    let config = load_config(config_path, serde_json::Value::Object(overrides))?;
    let algorithm = config.hash_algorithm().map_err(|e| e.to_string())?;

    let entries = collect_checksums(dir, algorithm).map_err(|e| e.to_string())?;
    tracing::info!(files = entries.len(), %algorithm, "checksums collected");

    match output {
        Some(path) => {
            write_checksums(path, &entries).map_err(|e| format!("writing {}: {}", path.display(), e))?;
            eprintln!("Wrote: {}", path.display());
        }
        None => print!("{}", render_checksums(&entries)),
    }
    Ok(())
}

fn run_release_plan(task_path: &Path, keys_path: &Path, config_path: Option<&Path>) -> Result<(), String> {
    let task = load_task(task_path)?;
    let payload = &task.payload;
    let props = payload
        .release_properties
        .as_ref()
        .ok_or("task has no releaseProperties")?;

    let product = props.app_name.to_lowercase();
    let version = payload
        .version
        .as_deref()
        .or(props.app_version.as_deref())
        .ok_or("task has no version")?;
    let build_number = payload.build_number.ok_or("task has no build_number")?;

    let keys_contents = fs::read_to_string(keys_path)
        .map_err(|e| format!("reading keys {}: {}", keys_path.display(), e))?;
    let keys: Vec<&str> = keys_contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let config = load_config(config_path, serde_json::json!({}))?;
    let excludes = config.release_exclude_patterns().map_err(|e| e.to_string())?;

    let plan = plan_release_copy(&product, version, build_number, &keys, &excludes);
    let json = serde_json::to_string_pretty(&plan).map_err(|e| e.to_string())?;
    emit(&json)
}
