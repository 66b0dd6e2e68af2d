//! Typed Validator CLI
//!
//! Checks, loads or saves a JSON document against a type definition.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use typed_descriptors::{TypeDef, TypedConfig, Value};

#[derive(Parser)]
#[command(name = "typed-validate")]
#[command(about = "Validate and convert JSON documents against a type definition")]
struct Cli {
    /// Type definition file (.json or .toml)
    #[arg(short, long)]
    schema: PathBuf,

    /// Extra configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether the document has the schema's shape
    Test {
        /// JSON document
        input: PathBuf,
    },

    /// Convert the document from external to internal form
    Load {
        /// JSON document
        input: PathBuf,
    },

    /// Convert the document from internal to external form
    Save {
        /// JSON document
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match TypedConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn read_document(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let json: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Value::from(json))
}

fn run(cli: Cli, config: &TypedConfig) -> anyhow::Result<bool> {
    let definition = TypeDef::from_path(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    let schema = config.apply(definition.build()?)?;
    tracing::debug!(schema = ?schema, "schema built");

    let (input, converted) = match &cli.command {
        Commands::Test { input } => {
            let ok = schema.test(&read_document(input)?);
            println!("{}", ok);
            return Ok(ok);
        }
        Commands::Load { input } => (input, schema.load(&read_document(input)?)),
        Commands::Save { input } => (input, schema.save(&read_document(input)?)),
    };

    match converted {
        Ok(value) => {
            println!("{}", config.output.format.render(&value)?);
            Ok(true)
        }
        Err(e) => {
            eprintln!("❌ {}: {}", input.display(), e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_document_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"a": [1, 2.5]}"#).unwrap();

        let value = read_document(&path).unwrap();
        assert_eq!(
            value,
            Value::dict([("a", Value::list([Value::Int(1), Value::Float(2.5)]))])
        );
        assert!(read_document(Path::new("missing.json")).is_err());
    }
}
