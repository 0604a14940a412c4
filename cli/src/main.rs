use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use flatarg_core::{
    AnalyzeOptions, ArrayPolicy, FlattenOptions, Shape, ShapeDef, SynthesizeOptions, analyze,
    flatten, reconstruct_map, synthesize_arguments,
};

mod output;

use output::OutputFormat;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

/// CLI-specific array policy enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliArrayPolicy {
    Repeated,
    Json,
}

impl From<CliArrayPolicy> for ArrayPolicy {
    fn from(policy: CliArrayPolicy) -> Self {
        match policy {
            CliArrayPolicy::Repeated => Self::Repeated,
            CliArrayPolicy::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "flatarg")]
#[command(about = "Flatten nested shapes into flat argument tables and back")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Flatten a shape definition into flat keyed leaves.
    Flatten(FlattenArgs),
    /// Analyze a shape: collisions, requiredness, and structural validation.
    Analyze(AnalyzeArgs),
    /// Synthesize the generated argument table for a shape.
    Args(ArgsArgs),
    /// Rebuild a nested JSON tree from a flat key/value JSON object.
    Reconstruct(ReconstructArgs),
}

#[derive(Debug, Args)]
struct ShapeArgs {
    /// Shape definition file (.json, .yaml, or .yml).
    #[arg(long)]
    shape: PathBuf,
    /// Separator joining flat key segments.
    #[arg(long, default_value = "-")]
    separator: String,
    /// Maximum nesting depth (0 means no recursion at all).
    #[arg(long, default_value_t = 3)]
    max_depth: usize,
    /// Prefix prepended to every flat key.
    #[arg(long, default_value = "")]
    prefix: String,
}

impl ShapeArgs {
    fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            separator: self.separator.clone(),
            max_depth: self.max_depth,
            prefix: self.prefix.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct FlattenArgs {
    #[command(flatten)]
    shape: ShapeArgs,
    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    shape: ShapeArgs,
    /// Fail with the collision report when flat keys collide.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ArgsArgs {
    #[command(flatten)]
    shape: ShapeArgs,
    /// Array encoding policy.
    #[arg(long, value_enum, default_value = "repeated")]
    policy: CliArrayPolicy,
    /// Fail with the collision report when flat keys collide.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ReconstructArgs {
    /// Flat key/value JSON object file, or `-` for stdin.
    #[arg(long)]
    input: PathBuf,
    /// Separator to split flat keys on.
    #[arg(long, default_value = "-")]
    separator: String,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Flatten(args) => run_flatten(args),
        Command::Analyze(args) => run_analyze(args),
        Command::Args(args) => run_args(args),
        Command::Reconstruct(args) => run_reconstruct(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_flatten(args: FlattenArgs) -> Result<(), String> {
    let shape = load_shape(&args.shape.shape)?;
    let context = flatten(&shape, &args.shape.flatten_options());
    let rendered = output::format_context(&context, args.format.into())?;
    print!("{rendered}");
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let shape = load_shape(&args.shape.shape)?;
    let options = AnalyzeOptions {
        flatten: args.shape.flatten_options(),
        strict: args.strict,
    };
    let analysis = analyze(&shape, &options).map_err(|e| e.to_string())?;
    let rendered = output::format_analysis(&analysis, args.format.into())?;
    print!("{rendered}");
    Ok(())
}

fn run_args(args: ArgsArgs) -> Result<(), String> {
    let shape = load_shape(&args.shape.shape)?;
    let options = SynthesizeOptions {
        flatten: args.shape.flatten_options(),
        policy: args.policy.into(),
        strict: args.strict,
    };
    let arguments = synthesize_arguments(&shape, &HashMap::new(), &options)
        .map_err(|e| e.to_string())?;
    let rendered = output::format_arguments(&arguments, args.format.into())?;
    print!("{rendered}");
    Ok(())
}

fn run_reconstruct(args: ReconstructArgs) -> Result<(), String> {
    let raw = if args.input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        buffer
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| format!("failed to read {}: {e}", args.input.display()))?
    };

    let flat: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| format!("invalid flat value map: {e}"))?;
    let tree = reconstruct_map(&flat, &args.separator);
    let rendered = serde_json::to_string_pretty(&tree)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;
    println!("{rendered}");
    Ok(())
}

fn load_shape(path: &Path) -> Result<Shape, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("json");
    let def: ShapeDef = match extension {
        "yaml" | "yml" => {
            serde_yaml::from_str(&raw).map_err(|e| format!("invalid YAML shape: {e}"))?
        }
        _ => serde_json::from_str(&raw).map_err(|e| format!("invalid JSON shape: {e}"))?,
    };
    Ok(def.into_shape())
}
