use std::{env, path::PathBuf};

use dynaform::{compile_dir, DynaformConfig};
use tracing_subscriber::EnvFilter;

fn usage() {
    eprintln!("Usage: compile_graph [definitions_dir] [config_toml]");
    eprintln!(
        "Example: cargo run --example compile_graph -- examples/definitions examples/dynaform.toml"
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage();
        return Ok(());
    }

    let config = if args.len() > 1 {
        DynaformConfig::from_file(args.remove(1))?
    } else {
        DynaformConfig::load_default()
    };
    let definitions_dir = if args.is_empty() {
        config.definitions_dir()
    } else {
        PathBuf::from(args.remove(0))
    };

    let graph = compile_dir(&definitions_dir, &config)?;
    let summary = graph.summary();
    tracing::info!(
        tables = summary.tables,
        assertions = summary.assertions,
        operations = summary.operations,
        "compiled definitions"
    );
    println!("{}", graph.to_json_pretty()?);
    Ok(())
}
