use crate::transpiler::codegen::Target;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bladefn",
    about = "Compile @function / @endfunction template functions into output-language fragments",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to a discovered bladefn.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the directives of a template file
    Compile {
        /// Template file to compile
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the compiled template here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output language of the emitted fragments
        #[arg(short, long, value_enum)]
        target: Option<Target>,

        /// Name of the implicit context parameter
        #[arg(long)]
        context_var: Option<String>,
    },

    /// Compile a template and list the template functions it declares
    Check {
        /// Template file to check
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show the function name and parameter list parsed from declaration text
    Extract {
        /// Declaration text, e.g. "greet($name)"
        #[arg(value_name = "TEXT")]
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a sample template declaring one template function
    Init {
        /// Name of the template function
        #[arg(value_name = "FUNCTION_NAME")]
        name: String,

        /// Output file for the template
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
