//! Generator for typed MongoDB field path modules.
//!
//! Takes model declaration files, walks each collection-rooted model's field
//! graph, and emits a paired runtime module and typing stub. The runtime file
//! keeps every generated name importable with opaque types; the stub carries
//! the full path literals, query shapes, and field shapes for static checking.

use clap::{CommandFactory, Parser, Subcommand};

pub mod cli;
pub mod codegen;
pub mod error;
pub mod introspect;

pub use codegen::{generate, stub_path, write_outputs, GeneratedPair, RenderPolicy};
pub use error::GenerateError;

#[derive(Parser)]
#[command(
    name = "typed-mongo-gen",
    version,
    about = "Generate typed MongoDB field path modules from model declarations"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the runtime module and its typing stub
    Generate(cli::generate::GenerateArgs),
}

pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => cli::generate::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}
