//! entgqlgen: Generate a GraphQL schema and gqlgen model bindings from an ent schema
//!
//! Usage:
//!   entgqlgen --path ./ent/schema
//!   entgqlgen --path ./ent/schema --config ./gqlgen.yml --schema-out ent.graphql
//!
//! The user's gqlgen config is only read. The bindings and the schema
//! registration are written to `--config-out`, next to it, which gqlgen is
//! then pointed at.
//!
//! Exit codes: 1 graph load failure, 2 config load failure, 3 generation failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use entgql::{GeneratorError, GqlgenConfig, LoadError};
use tracing_subscriber::EnvFilter;

/// Default name of the generated gqlgen config
const CONFIG_OUT: &str = "entgql.gqlgen.yml";

#[derive(Parser, Debug)]
#[command(name = "entgqlgen")]
#[command(about = "Generate a GraphQL schema and gqlgen model bindings from an ent schema")]
struct Args {
    /// Path to the schema directory
    #[arg(long)]
    path: PathBuf,

    /// gqlgen config file; defaults to the nearest .gqlgen.yml, gqlgen.yml or gqlgen.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generated schema file, relative to the config file's directory
    #[arg(long, default_value = entgql::plugin::SOURCE_NAME)]
    schema_out: PathBuf,

    /// Generated gqlgen config with the model bindings, relative to the config file's directory
    #[arg(long, default_value = CONFIG_OUT)]
    config_out: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed loading ent graph: {0}")]
    Graph(LoadError),

    #[error("failed to load config: {0}")]
    Config(LoadError),

    #[error("failed generating schema: {0}")]
    Generate(#[from] GeneratorError),

    #[error("failed writing output: {0}")]
    Write(LoadError),

    #[error("refusing to overwrite {}; choose another --config-out", .0.display())]
    Overwrite(PathBuf),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Graph(_) => 1,
            CliError::Config(_) => 2,
            CliError::Generate(_) | CliError::Write(_) | CliError::Overwrite(_) => 3,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("entgqlgen: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let graph = entgql::load_graph(&args.path).map_err(CliError::Graph)?;
    let (config_path, mut cfg) = load_config(args.config.as_deref()).map_err(CliError::Config)?;

    let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let schema_out = dir.join(&args.schema_out);
    let config_out = dir.join(&args.config_out);
    if config_out == config_path {
        return Err(CliError::Overwrite(config_out));
    }

    let source = entgql::generate(&mut cfg, &graph, Vec::new())?;

    std::fs::write(&schema_out, &source.input).map_err(|source| {
        CliError::Write(LoadError::Io {
            path: schema_out.clone(),
            source,
        })
    })?;

    cfg.add_schema(args.schema_out.to_string_lossy());
    cfg.write(&config_out).map_err(CliError::Write)?;

    tracing::info!(
        schema = %schema_out.display(),
        config = %config_out.display(),
        types = graph.nodes.len(),
        "generated GraphQL schema"
    );

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<(PathBuf, GqlgenConfig), LoadError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), GqlgenConfig::load(path)?));
    }
    let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    entgql::load_config_from_default_locations(&cwd)
}
