use crate::cli::args::{Cli, Commands};
use crate::config::{CliSettings, Config};
use crate::engine::TemplateCompiler;
use crate::transpiler::codegen::Target;
use crate::transpiler::extract::{extract, is_identifier};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing_subscriber::EnvFilter;

// Scaffold for a Blade view declaring one template function.
const INIT_TEMPLATE: &str = r#"@function({{ name }}($title, $items = []))
<section class="{{ name }}">
    <h2>{% raw %}{{ $title }}{% endraw %}</h2>
    <ul>
    @foreach($items as $item)
        <li>{% raw %}{{ $item }}{% endraw %}</li>
    @endforeach
    </ul>
</section>
@endfunction

@{{ name }}('{{ title }}', ['first', 'second'])
"#;

/// Result of compiling one template file.
pub struct CompiledTemplate {
    pub output: String,
    pub functions: Vec<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        eprintln!("bladefn v{}", env!("CARGO_PKG_VERSION"));
    }

    match cli.command {
        Commands::Compile {
            input,
            output,
            target,
            context_var,
        } => {
            let settings = CliSettings {
                target,
                context_var,
            };
            let config = Config::load(cli.config.as_deref(), Some(&settings))?;
            compile_command(&input, output.as_deref(), &config, cli.verbose)
        }
        Commands::Check { input } => {
            let config = Config::load(cli.config.as_deref(), None)?;
            check_command(&input, &config, cli.verbose)
        }
        Commands::Extract { text, json } => extract_command(&text, json),
        Commands::Init { name, output } => init_command(&name, output.as_deref(), cli.verbose),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("blade_function=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Compiles the template at `input` with a fresh directive table.
pub fn compile_file(input: &Path, config: &Config) -> Result<CompiledTemplate> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read template file: {}", input.display()))?;

    let mut compiler = TemplateCompiler::new(config.emitter(), &config.directives);
    let output = compiler
        .compile(&source)
        .with_context(|| format!("Failed to compile {}", input.display()))?;

    let functions = compiler
        .registry()
        .declared_functions()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(CompiledTemplate { output, functions })
}

pub fn compile_command(
    input: &Path,
    output: Option<&Path>,
    config: &Config,
    verbose: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    compile_command_to(&mut stdout, input, output, config, verbose)
}

/// Like [`compile_command`], writing the compiled template to `out` when no
/// output file is given. Status lines always go to stderr so that `out` only
/// ever receives template text.
pub fn compile_command_to(
    out: &mut dyn Write,
    input: &Path,
    output: Option<&Path>,
    config: &Config,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("🔧 Compiling template: {}", input.display());
        eprintln!("🎯 Target: {}", config.emit.target);
        if let Some(path) = &config.config_path {
            eprintln!("⚙️  Config: {}", path.display());
        }
    }

    let compiled = compile_file(input, config)?;

    match output {
        Some(path) => {
            fs::write(path, &compiled.output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Compiled template written to: {}", path.display());
        }
        None => {
            out.write_all(compiled.output.as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}

pub fn check_command(input: &Path, config: &Config, verbose: bool) -> Result<()> {
    if verbose {
        println!("🔍 Checking template: {}", input.display());
    }

    let compiled = compile_file(input, config)?;

    println!("✅ Template compiles");
    if compiled.functions.is_empty() {
        println!("📋 No template functions declared");
    } else {
        println!("📋 Template functions ({}):", compiled.functions.len());
        for name in &compiled.functions {
            println!("   @{}", name);
        }
    }

    Ok(())
}

pub fn extract_command(text: &str, json: bool) -> Result<()> {
    println!("{}", render_extraction(text, json)?);
    Ok(())
}

/// Formats the extraction of `text` as pretty JSON or as two labelled lines.
pub fn render_extraction(text: &str, json: bool) -> Result<String> {
    let extraction = extract(text)?;

    if json {
        Ok(serde_json::to_string_pretty(&extraction)?)
    } else {
        Ok(format!(
            "name:   {}\nparams: {}",
            extraction.name, extraction.params
        ))
    }
}

/// Renders the scaffold template for a function called `name`.
pub fn render_init_template(name: &str) -> Result<String> {
    if !is_identifier(name) {
        return Err(anyhow!("'{}' is not a valid template function name", name));
    }

    let mut context = tera::Context::new();
    context.insert("name", name);
    context.insert("title", &format!("{} example", name));

    Tera::one_off(INIT_TEMPLATE, &context, false)
        .map_err(|e| anyhow!("Failed to render scaffold: {}", e))
}

pub fn init_command(name: &str, output: Option<&Path>, verbose: bool) -> Result<()> {
    if verbose {
        println!("🏗️ Initializing template function: {}", name);
    }

    let content = render_init_template(name)?;

    let output_file = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.blade.php", name.to_lowercase())));

    fs::write(&output_file, content)?;

    println!("✅ Created template: {}", output_file.display());
    println!(
        "📝 Compile it with: bladefn compile {} --target {}",
        output_file.display(),
        Target::default()
    );

    Ok(())
}
