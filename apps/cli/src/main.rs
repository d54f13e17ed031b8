//! `formcheck`: validate form submissions against declarative rule plans.
//!
//! Exit status is `0` when every rule passed, `1` when the submission is
//! invalid and `2` when the command itself failed (unreadable input, bad plan
//! or bad configuration).

mod cli;
mod config;
mod logging;
mod output;
mod plan;

use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use formcheck_validator::FormValidator;

use cli::{CheckArgs, Cli, Commands, MessagesArgs};
use config::Settings;
use plan::Plan;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    logging::init_logging(&settings.logging)?;

    match cli.command {
        Commands::Check(args) => check(args, settings),
        Commands::Messages(args) => messages(args, &settings),
    }
}

fn check(args: CheckArgs, mut settings: Settings) -> Result<ExitCode> {
    if let Some(format) = args.format {
        settings.output.format = format;
    }
    if let Some(joiner) = args.joiner {
        settings.output.joiner = joiner;
    }

    let plan = Plan::load(&args.rules)?;
    let input = read_input(&args.input)?;
    let submission: serde_json::Value = serde_json::from_str(&input)
        .with_context(|| format!("failed to parse submission {}", args.input.display()))?;

    let mut form = FormValidator::builder()
        .messages(settings.catalog())
        .build_json(&submission)
        .with_context(|| format!("invalid submission {}", args.input.display()))?;

    plan.apply(&mut form)?;
    tracing::info!(
        valid = form.is_group_valid(),
        failed_fields = form.group_errors().len(),
        "check finished"
    );

    let mut stdout = io::stdout().lock();
    output::write_report(&mut stdout, &form, settings.output.format, &settings.output.joiner)
        .context("failed to write report")?;

    Ok(if form.is_group_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn messages(args: MessagesArgs, settings: &Settings) -> Result<ExitCode> {
    let format = args.format.unwrap_or(settings.output.format);
    let mut stdout = io::stdout().lock();
    output::write_catalog(&mut stdout, &settings.catalog(), format)
        .context("failed to write message catalog")?;
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read submission from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submission {}", path.display()))
}
