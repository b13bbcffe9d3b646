use anyhow::{Context as AnyhowContext, Result};
use archgen_catalog::{Catalog, DEFAULT_PROVIDER};
use archgen_generator::{DEFAULT_MODEL, DEFAULT_REGION};
use archgen_repair::{category_leaf, Repairer};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

mod audit;
mod config;
mod deps;
mod description;
mod runner;
mod workflow;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "archgen")]
#[command(about = "Generate AWS architecture diagrams from plain-language descriptions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Component catalog TOML to use instead of the bundled one
    #[arg(long, global = true, env = "ARCHGEN_CATALOG")]
    catalog: Option<PathBuf>,

    /// Provider namespace whose categories are indexed
    #[arg(long, global = true, default_value = DEFAULT_PROVIDER)]
    provider: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe an architecture, generate the diagram script, repair it and run it
    Generate(GenerateArgs),

    /// Validate and fix the component imports of an existing script
    Repair(RepairArgs),

    /// Inspect the component catalog
    Catalog(CatalogArgs),

    /// Check Python, Graphviz and AWS credentials
    Doctor(DoctorArgs),
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// AWS region for Bedrock
    #[arg(long, env = "AWS_DEFAULT_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Bedrock model id
    #[arg(long, env = "AWS_BEDROCK_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Read the description from this file instead of the terminal
    #[arg(long)]
    pub description_file: Option<PathBuf>,

    /// Replay a recorded model response instead of calling Bedrock
    #[arg(long)]
    pub response_file: Option<PathBuf>,

    /// Where the generated script is written
    #[arg(long, default_value = "generated_aws_diagram.py")]
    pub script: PathBuf,

    /// Where the description is saved
    #[arg(long, default_value = "aws_architecture_description.txt")]
    pub description_out: PathBuf,

    /// Repair audit log
    #[arg(long, default_value = audit::DEFAULT_AUDIT_LOG)]
    pub audit_log: PathBuf,

    /// Token usage log
    #[arg(long, default_value = "bedrock_token_usage.log")]
    pub usage_log: PathBuf,

    /// Run the script without asking
    #[arg(long, conflicts_with = "no_run")]
    pub run: bool,

    /// Never run the script
    #[arg(long)]
    pub no_run: bool,

    /// Skip the dependency checks
    #[arg(long)]
    pub skip_checks: bool,
}

#[derive(Args)]
struct RepairArgs {
    /// Script to repair
    script: PathBuf,

    /// Write the corrected script here instead of in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report only; exit 1 when a fix would apply
    #[arg(long)]
    check: bool,

    /// Output the repair report as JSON
    #[arg(long)]
    json: bool,

    /// Repair audit log
    #[arg(long, default_value = audit::DEFAULT_AUDIT_LOG)]
    audit_log: PathBuf,
}

#[derive(Args)]
struct CatalogArgs {
    #[command(subcommand)]
    action: Option<CatalogAction>,

    /// List the components of one category (`storage` or `diagrams.aws.storage`)
    #[arg(long)]
    category: Option<String>,

    /// Output JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print the canonical category of a component
    Lookup {
        /// Component type name, e.g. S3
        name: String,
    },
}

#[derive(Args)]
struct DoctorArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Repair(args) => args.json,
        Commands::Catalog(args) => args.json,
        Commands::Doctor(args) => args.json,
        Commands::Generate(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // AWS SDK internals are noisy below warn
    if !cli.verbose {
        builder.filter_module("aws_config", log::LevelFilter::Warn);
        builder.filter_module("aws_smithy_runtime", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let catalog = config::load_catalog(cli.catalog.as_deref(), &cli.provider)?;

    match cli.command {
        Commands::Generate(args) => workflow::run_generate(args, &catalog).await?,
        Commands::Repair(args) => run_repair(args, &catalog)?,
        Commands::Catalog(args) => run_catalog(args, &catalog)?,
        Commands::Doctor(args) => run_doctor(args).await?,
    }

    Ok(())
}

fn run_repair(args: RepairArgs, catalog: &Catalog) -> Result<()> {
    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;

    let report = Repairer::new(catalog)
        .context("Failed to initialise the Python parser")?
        .repair(&source);

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)?;
    } else {
        eprintln!("{}: {}", args.script.display(), report.status());
        for line in report.details() {
            eprintln!("  {line}");
        }
    }

    if args.check {
        if report.changed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let target = args.output.as_ref().unwrap_or(&args.script);
    if report.changed || args.output.is_some() {
        fs::write(target, &report.corrected_text)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        log::info!("Wrote {}", target.display());
    }
    audit::append_audit_line(&args.audit_log, target, &report)?;

    Ok(())
}

#[derive(Serialize)]
struct CategorySummary<'a> {
    category: &'a str,
    components: usize,
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    name: &'a str,
    category: Option<&'a str>,
    also_exported_by: Vec<&'a str>,
}

fn run_catalog(args: CatalogArgs, catalog: &Catalog) -> Result<()> {
    if let Some(CatalogAction::Lookup { name }) = &args.action {
        let category = catalog.category_of(name);
        let also_exported_by: Vec<&str> = catalog
            .categories_exporting(name)
            .filter(|other| Some(*other) != category)
            .collect();

        if args.json {
            let output = LookupOutput {
                name,
                category,
                also_exported_by,
            };
            print_stdout(&serde_json::to_string_pretty(&output)?)?;
        } else if let Some(category) = category {
            print_stdout(category)?;
            if !also_exported_by.is_empty() {
                eprintln!("also exported by: {}", also_exported_by.join(", "));
            }
        } else {
            eprintln!("{name} is not exported by any {} category", catalog.namespace());
        }

        if category.is_none() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Some(wanted) = &args.category {
        let path = if catalog.has_category(wanted) {
            wanted.clone()
        } else {
            format!("{}.{wanted}", catalog.namespace())
        };
        let components: Vec<&str> = catalog
            .components(&path)
            .with_context(|| format!("Unknown category '{wanted}' in {}", catalog.namespace()))?
            .collect();

        if args.json {
            print_stdout(&serde_json::to_string_pretty(&components)?)?;
        } else {
            print_stdout(&components.join("\n"))?;
        }
        return Ok(());
    }

    let summaries: Vec<CategorySummary> = catalog
        .categories()
        .map(|category| CategorySummary {
            category,
            components: catalog.components(category).map_or(0, Iterator::count),
        })
        .collect();

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&summaries)?)?;
    } else {
        eprintln!(
            "{} ({} categories, {} components)",
            catalog.source_label(),
            catalog.category_count(),
            catalog.component_count()
        );
        let lines: Vec<String> = summaries
            .iter()
            .map(|summary| {
                format!(
                    "{:<14} {:>4}  {}",
                    category_leaf(summary.category),
                    summary.components,
                    summary.category
                )
            })
            .collect();
        print_stdout(&lines.join("\n"))?;
    }
    for skipped in catalog.skipped() {
        eprintln!("warning: {skipped}");
    }

    Ok(())
}

async fn run_doctor(args: DoctorArgs) -> Result<()> {
    let report = deps::check_dependencies(true).await;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)?;
    } else {
        deps::print_report(&report);
    }

    if !report.ok() {
        std::process::exit(1);
    }

    Ok(())
}
