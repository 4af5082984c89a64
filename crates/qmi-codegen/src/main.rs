//! qmi-codegen — compiles QMI schema documents into typed Rust bindings.
//!
//! Two invocation shapes: with no arguments the canonical schema set under
//! `--data-dir` is regenerated into `--out-dir`; with two positional
//! arguments one schema is compiled into one output file, after first
//! loading `qmi-common.json` from the schema's directory so shared types
//! resolve.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use qmi_codegen::Generator;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// The canonical schema set and the modules it generates.
const CANONICAL: &[(&str, &str)] = &[
    ("qmi-common.json", "common.rs"),
    ("qmi-service-ctl.json", "ctl.rs"),
    ("qmi-service-dms.json", "dms.rs"),
    ("qmi-service-wds.json", "wds.rs"),
];

#[derive(Parser, Debug)]
#[command(name = "qmi-codegen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Schema document to compile (omit to regenerate the canonical set)
    input: Option<PathBuf>,

    /// Output file for the compiled schema
    output: Option<PathBuf>,

    /// Directory holding the canonical schema documents
    #[arg(long, default_value = "crates/qmi-codegen/data")]
    data_dir: PathBuf,

    /// Directory receiving the canonical generated modules
    #[arg(long, default_value = "crates/qmi/src/services")]
    out_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match (cli.input, cli.output) {
        (Some(input), Some(output)) => generate_one(&input, &output),
        (None, None) => regenerate_canonical(&cli.data_dir, &cli.out_dir),
        _ => bail!("usage: qmi-codegen [<input-schema> <output-file>]"),
    }
}

fn generate_one(input: &Path, output: &Path) -> Result<()> {
    let mut generator = Generator::new();
    let common = input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("qmi-common.json");
    generator
        .load(&common)
        .with_context(|| format!("loading the common schema next to {}", input.display()))?;

    let artifact = generator
        .convert(input)
        .with_context(|| format!("compiling {}", input.display()))?;
    fs::write(output, artifact).with_context(|| format!("writing {}", output.display()))?;
    info!(output = %output.display(), "generated");
    Ok(())
}

fn regenerate_canonical(data_dir: &Path, out_dir: &Path) -> Result<()> {
    let mut generator = Generator::new();
    for (schema, module) in CANONICAL {
        let input = data_dir.join(schema);
        let artifact = generator
            .convert(&input)
            .with_context(|| format!("compiling {}", input.display()))?;
        let output = out_dir.join(module);
        fs::write(&output, artifact).with_context(|| format!("writing {}", output.display()))?;
        info!(output = %output.display(), "generated");
    }
    Ok(())
}
