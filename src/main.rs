//! Cleast CLI - enrich a clingo AST dump and report on it

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cleast::config::{self, CleastConfig};
use cleast::ui::{self, Icons};
use cleast::{load, Cleast, Signature};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cleast")]
#[command(version = "0.1.0")]
#[command(about = "Clingo Enriched AST - static analysis for ASP encodings")]
#[command(long_about = r#"
Cleast enriches the AST of an ASP encoding, as exported to JSON by a
clingo-based parser, with:
  • Source spans for every node
  • Variable binding/use classification and safety diagnostics
  • A predicate dependency graph

Example usage:
  cleast analyze --ast encoding.json --source encoding.lp
  cleast deps --ast encoding.json --source encoding.lp --predicate path/2
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "cleast.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
}

impl Format {
    fn parse(value: &str) -> anyhow::Result<Self> {
        <Format as ValueEnum>::from_str(value, true)
            .map_err(|_| anyhow::anyhow!("unknown output format '{}' (expected human or json)", value))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich an AST and report statements, safety and dependencies
    Analyze {
        /// JSON AST produced by the parser
        #[arg(short, long)]
        ast: PathBuf,

        /// ASP source file the AST was parsed from
        #[arg(short, long)]
        source: PathBuf,

        /// Root directory for module prefixes (defaults to the source's directory)
        #[arg(long)]
        src_dir: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Exit with an error if any statement is unsafe
        #[arg(long)]
        strict: bool,
    },

    /// Show which statements define and use predicates
    Deps {
        /// JSON AST produced by the parser
        #[arg(short, long)]
        ast: PathBuf,

        /// ASP source file the AST was parsed from
        #[arg(short, long)]
        source: PathBuf,

        /// Root directory for module prefixes
        #[arg(long)]
        src_dir: Option<String>,

        /// Only show one predicate, as name/arity
        #[arg(short, long)]
        predicate: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Write a default cleast.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = config::load_config(Some(&cli.config))?.unwrap_or_default();

    match cli.command {
        Commands::Analyze { ast, source, src_dir, format, strict } => {
            let cleast = open(&ast, &source, src_dir, &settings)?;
            let format = resolve_format(format, &settings)?;
            let strict = strict || settings.strict.unwrap_or(false);

            match format {
                Format::Json => print_analysis_json(&cleast)?,
                Format::Human => print_analysis(&cleast),
            }

            let unsafe_count = cleast.diagnostics().count();
            if strict && unsafe_count > 0 {
                anyhow::bail!("{} unsafe statement(s) in {}", unsafe_count, cleast.filename());
            }
        }

        Commands::Deps { ast, source, src_dir, predicate, format } => {
            let cleast = open(&ast, &source, src_dir, &settings)?;
            let format = resolve_format(format, &settings)?;
            let predicate = predicate
                .map(|p| Signature::parse(&p))
                .transpose()
                .context("invalid --predicate")?;

            match format {
                Format::Json => print_deps_json(&cleast, predicate.as_ref())?,
                Format::Human => print_deps(&cleast, predicate.as_ref()),
            }
        }

        Commands::Init { force } => {
            let defaults = CleastConfig {
                src_dir: Some(".".to_string()),
                strict: Some(false),
                format: Some("human".to_string()),
            };
            config::write_config(&cli.config, &defaults, force)?;
            ui::success(&format!("Wrote {}", cli.config.display()));
        }
    }

    Ok(())
}

fn open(ast: &Path, source: &Path, src_dir: Option<String>, settings: &CleastConfig) -> anyhow::Result<Cleast> {
    let src_dir = src_dir.or_else(|| settings.src_dir.clone());
    let cleast = load::open(ast, source, src_dir.as_deref())
        .with_context(|| format!("failed to enrich {}", source.display()))?;
    tracing::info!("Enriched {} statements from {}", cleast.len(), source.display());
    Ok(cleast)
}

fn resolve_format(flag: Option<Format>, settings: &CleastConfig) -> anyhow::Result<Format> {
    match (flag, settings.format.as_deref()) {
        (Some(format), _) => Ok(format),
        (None, Some(configured)) => Format::parse(configured),
        (None, None) => Ok(Format::Human),
    }
}

fn print_analysis(cleast: &Cleast) {
    ui::header(&format!("Analysis of {}", cleast.filename()));
    ui::status(Icons::FILE, "Source directory", cleast.src_dir());

    ui::section("Statements");
    let table = ui::statement_table(cleast);
    if table.is_empty() {
        ui::info("Statements", "none");
    } else {
        println!("{}", table);
    }

    ui::section("Safety");
    let diagnostics: Vec<_> = cleast.diagnostics().collect();
    if diagnostics.is_empty() {
        ui::success("All statements are safe");
    }
    for diagnostic in diagnostics {
        ui::warn(&diagnostic.to_string());
        if let Some(text) = cleast.statement(diagnostic.statement).and_then(|s| cleast.source_text(s.root)) {
            ui::summary_row("source", &ui::muted(&text));
        }
    }

    ui::section("Dependencies");
    let stats = cleast.dependency_graph().stats();
    let predicates = stats.predicates.to_string();
    let edges = format!(
        "{} defines, {} uses, {} conditions, {} shows",
        stats.defines, stats.uses, stats.conditions, stats.shows
    );
    let negative = stats.negative.to_string();
    println!(
        "{}",
        ui::stats_table(&[
            ("Predicates", predicates.as_str()),
            ("Edges", edges.as_str()),
            ("Negative edges", negative.as_str()),
            ("Acyclic", yes_no(stats.acyclic)),
            ("Stratified", yes_no(stats.stratified)),
        ])
    );
}

fn print_analysis_json(cleast: &Cleast) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "filename": cleast.filename(),
        "src_dir": cleast.src_dir(),
        "statements": cleast.statements(),
        "diagnostics": cleast.diagnostics().collect::<Vec<_>>(),
        "comments": cleast.comments(),
        "directives": cleast.directives(),
        "graph": cleast.dependency_graph().stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_deps(cleast: &Cleast, predicate: Option<&Signature>) {
    let graph = cleast.dependency_graph();
    ui::header(&format!("Dependencies of {}", cleast.filename()));

    let predicates: Vec<&Signature> = match predicate {
        Some(p) => vec![p],
        None => graph.predicates().collect(),
    };
    for predicate in predicates {
        ui::section(&predicate.to_string());
        if !graph.contains(predicate) {
            ui::warn(&format!("{} does not occur in the program", predicate));
            continue;
        }
        let describe = |statements: Vec<usize>| {
            statements
                .iter()
                .filter_map(|s| cleast.statement(*s))
                .map(|s| format!("{} ({})", s.qualified_identifier(), s.span))
                .collect::<Vec<_>>()
                .join(", ")
        };
        ui::status(Icons::LEFT, "defined by", &describe(graph.definers_of(predicate)));
        ui::status(Icons::RIGHT, "used by", &describe(graph.users_of(predicate)));
        let shown = graph.shown_by(predicate);
        if !shown.is_empty() {
            ui::status(Icons::FILE, "shown by", &describe(shown));
        }
        let table = ui::edge_table(graph.edges_to(predicate));
        if !table.is_empty() {
            println!("{}", table);
        }
    }

    ui::section("Graph");
    let undefined: Vec<String> = graph.undefined().iter().map(|p| p.to_string()).collect();
    if !undefined.is_empty() {
        ui::status(Icons::WRENCH, "undefined", &undefined.join(", "));
    }
    ui::status(Icons::CYCLE, "acyclic", yes_no(graph.is_acyclic()));
    ui::status(Icons::LINK, "stratified", yes_no(graph.is_stratified()));
    ui::info("Predicates", &ui::dim(&graph.predicates().count().to_string()));
}

fn print_deps_json(cleast: &Cleast, predicate: Option<&Signature>) -> anyhow::Result<()> {
    let graph = cleast.dependency_graph();
    let predicates: Vec<&Signature> = match predicate {
        Some(p) => vec![p],
        None => graph.predicates().collect(),
    };
    let entries: Vec<_> = predicates
        .into_iter()
        .map(|p| {
            serde_json::json!({
                "predicate": p,
                "defined_by": graph.definers_of(p),
                "used_by": graph.users_of(p),
                "shown_by": graph.shown_by(p),
                "edges": graph.edges_to(p),
            })
        })
        .collect();
    let report = serde_json::json!({
        "filename": cleast.filename(),
        "predicates": entries,
        "undefined": graph.undefined(),
        "stats": graph.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
