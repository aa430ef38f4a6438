use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dbio::widgets::traits::CheckResult;
use dbio::{Document, FormSchema, Mode, WidgetRegistry, build_form};

#[derive(Parser)]
#[command(name = "dbio")]
#[command(about = "Build database-bound forms from YAML schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the HTML of the form described by a schema
    Render {
        /// Path to the YAML schema
        schema: PathBuf,
        /// Render every widget in edit mode
        #[arg(long)]
        edit: bool,
        /// Append the shared stylesheet rules
        #[arg(long)]
        css: bool,
    },
    /// Run the input checks of every field and report failures
    Check {
        /// Path to the YAML schema
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Render { schema, edit, css } => render(&schema, edit, css),
        Commands::Check { schema } => check(&schema),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> Result<(Document, WidgetRegistry)> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("reading schema {}", path.display()))?;
    let schema = FormSchema::from_yaml(&source)
        .with_context(|| format!("parsing schema {}", path.display()))?;
    let mut doc = Document::new();
    let mut registry = WidgetRegistry::new();
    let root = doc.root();
    build_form(&mut doc, &mut registry, root, &schema).context("building the form")?;
    tracing::info!(fields = registry.len(), path = %path.display(), "schema loaded");
    Ok((doc, registry))
}

fn render(path: &Path, edit: bool, css: bool) -> Result<()> {
    let (mut doc, mut registry) = load(path)?;
    if edit {
        for proxy in registry.proxies(&doc) {
            if let Some(io) = registry.get_mut(&doc, proxy) {
                io.set_mode(&mut doc, Mode::Edit);
            }
        }
    }
    for child in doc.children(doc.root()) {
        println!("{}", doc.render_html(*child));
    }
    if css {
        println!("<style>\n{}</style>", doc.styles().render_css());
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let (mut doc, registry) = load(path)?;
    let mut failures = 0;
    for proxy in registry.proxies(&doc) {
        let Some(io) = registry.get(&doc, proxy) else {
            continue;
        };
        let field = io.field_name();
        match io
            .check_input(&mut doc)
            .with_context(|| format!("checking {field}"))?
        {
            CheckResult::Valid(value) => println!("ok    {field}: {value}"),
            CheckResult::Invalid(message) => {
                failures += 1;
                println!("error {field}: {message}");
            }
        }
    }
    if failures > 0 {
        bail!("{failures} field(s) failed their checks");
    }
    Ok(())
}
