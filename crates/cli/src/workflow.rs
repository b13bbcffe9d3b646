use crate::{audit, config, deps, description, runner, GenerateArgs};
use anyhow::{bail, Context as AnyhowContext, Result};
use archgen_catalog::Catalog;
use archgen_generator::{
    append_usage_log, build_prompt, extract_code, BedrockGenerator, CannedGenerator,
    TextGenerator,
};
use archgen_repair::Repairer;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::time::Duration;

/// describe -> generate -> extract -> repair -> save -> (run)
pub(crate) async fn run_generate(args: GenerateArgs, catalog: &Catalog) -> Result<()> {
    eprintln!("\n=== AWS Architecture Diagram Generator ===\n");

    if !args.skip_checks {
        eprintln!("Checking dependencies...");
        let report = deps::check_dependencies(args.response_file.is_none()).await;
        deps::print_report(&report);
        eprintln!();
        if let Some(missing) = report.failed_required().next() {
            bail!("Required dependency missing: {}", missing.name);
        }
        if !report.checks.iter().all(|check| check.ok) {
            log::warn!("Continuing anyway, but diagram generation may fail");
        }
    }

    let description = description::capture(args.description_file.as_deref())?;
    if description.is_empty() {
        bail!("No description provided");
    }

    let generator: Box<dyn TextGenerator> = match &args.response_file {
        Some(path) => Box::new(CannedGenerator::new(path)),
        None => Box::new(
            BedrockGenerator::connect(config::bedrock_config(&args))
                .await
                .context("Failed to configure Amazon Bedrock")?,
        ),
    };

    let spinner = spinner(format!("Generating diagram code with {}", generator.describe()));
    let generation = generator.generate(&build_prompt(&description)).await;
    spinner.finish_and_clear();
    let generation = generation.context("Failed to generate diagram code")?;

    if generation.usage.total() > 0 {
        eprintln!("\n=== Token Usage ===");
        eprintln!("Input Tokens: {}", generation.usage.input_tokens);
        eprintln!("Output Tokens: {}", generation.usage.output_tokens);
        eprintln!("Total Tokens: {}", generation.usage.total());
        if let Err(e) = append_usage_log(&args.usage_log, &generation.usage) {
            log::warn!(
                "Could not append to token usage log {}: {e}",
                args.usage_log.display()
            );
        }
    }

    let code = extract_code(&generation.text);
    let report = Repairer::new(catalog)
        .context("Failed to initialise the Python parser")?
        .repair(&code);

    if report.parse_failed {
        log::warn!("Generated script does not parse, saving it unrepaired");
    }
    eprintln!("\nImport check: {}", report.status());
    for line in report.details() {
        eprintln!("  {line}");
    }

    let mut script = report.corrected_text.clone();
    if !script.ends_with('\n') {
        script.push('\n');
    }
    fs::write(&args.script, script)
        .with_context(|| format!("Failed to write {}", args.script.display()))?;
    eprintln!("\nDiagram script saved to: {}", args.script.display());
    audit::append_audit_line(&args.audit_log, &args.script, &report)?;

    description::save(&args.description_out, &description)?;
    eprintln!(
        "Your architecture description saved to: {}",
        args.description_out.display()
    );

    if should_run(&args)? {
        eprintln!("\nGenerating diagram...");
        let status = runner::run_script(&args.script).await?;
        if !status.success() {
            log::warn!("Diagram script exited with {status}");
        }
        let images = runner::find_images(&runner::script_dir(&args.script))?;
        match images.first() {
            Some(image) => eprintln!("\nGenerated diagram file: {}", image.display()),
            None => eprintln!("\nNo diagram image found next to the script"),
        }
    }

    eprintln!("\nDone!");
    Ok(())
}

/// Hidden when stderr is not a terminal
fn spinner(message: String) -> ProgressBar {
    if !console::user_attended_stderr() {
        eprintln!("{message}...");
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn should_run(args: &GenerateArgs) -> Result<bool> {
    if args.run {
        return Ok(true);
    }
    if args.no_run || !console::user_attended() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt("Run the generated script now?")
        .default(true)
        .interact()
        .context("Failed to read confirmation")
}
