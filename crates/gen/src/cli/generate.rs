use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;
use typed_mongo_schema::load_registry;

use crate::codegen::{self, RenderPolicy};

const DEFAULT_OUTPUT: &str = "_generated_types.py";

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "SOURCES",
        required = true,
        help = "Model declaration files (JSON)"
    )]
    pub sources: Vec<PathBuf>,
    #[arg(
        long = "output",
        short = 'o',
        value_name = "OUTPUT",
        help = "Path of the generated runtime module. Defaults to _generated_types.py next to the first source"
    )]
    pub output: Option<PathBuf>,
    #[arg(
        long = "strict",
        help = "Fail on types that cannot be rendered instead of widening them to Any"
    )]
    pub strict: bool,
}

pub fn run(args: GenerateArgs) -> i32 {
    match run_inner(args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", style(err).red());
            1
        }
    }
}

fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let first = args
        .sources
        .first()
        .ok_or_else(|| "No declaration sources given".to_string())?;
    let output = match args.output {
        Some(path) => path,
        None => default_output(first),
    };
    let policy = if args.strict {
        RenderPolicy::Strict
    } else {
        RenderPolicy::Degrade
    };

    let registry = load_registry(&args.sources)
        .map_err(|err| format!("Failed to load model declarations: {err}"))?;
    debug!(
        models = registry.len(),
        sources = args.sources.len(),
        "Loaded model registry."
    );

    let pair = codegen::generate(&registry, policy)
        .map_err(|err| format!("Failed to generate field path types: {err}"))?;
    codegen::write_outputs(&pair, &output)
        .map_err(|err| format!("Failed to write outputs: {err}"))?;

    let mut names: Vec<&str> = registry.roots().map(|model| model.name.as_str()).collect();
    names.sort_unstable();
    println!(
        "{} {} model types:",
        style("Generated").green().bold(),
        names.len()
    );
    for name in &names {
        println!("  - {name}");
    }
    println!("Output written to:");
    println!("  {}", output.display());
    println!("  {}", codegen::stub_path(&output).display());
    Ok(())
}

fn default_output(first_source: &Path) -> PathBuf {
    first_source.with_file_name(DEFAULT_OUTPUT)
}
