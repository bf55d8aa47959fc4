use anyhow::Result;
use blade_function::cli;

fn main() -> Result<()> {
    cli::run()
}
