use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use domain_pattern_core::pipeline::{
    run_discovered, run_job, run_status_only, ClassifyJob, JobReport, PipelineEvent, RunOptions,
    StatusReport,
};
use domain_pattern_core::{
    derive_pattern, label_of, Config, DomainPatternError, PatternSummary, Result, StatusSummary,
};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

const BASE_DIR_ENV: &str = "DOMAIN_PATTERN_BASE";

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let out = Printer {
        quiet: cli.quiet,
        json: cli.json,
    };
    let base_dir = resolve_base_dir(cli.base_dir.clone());

    let result = match cli.command {
        Some(Commands::Pattern { ref domains }) => handle_pattern(&cli, &base_dir, domains, &out),
        Some(Commands::Status {
            ref input,
            ref output,
        }) => handle_status(&cli, &base_dir, input, output, &out),
        Some(Commands::Config { ref action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => handle_classify(&cli, &base_dir, &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Debug logging goes to stderr; `--verbose` forces the debug level
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var(BASE_DIR_ENV) {
        return PathBuf::from(base);
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Priority: CLI options > config file > defaults
fn run_options(cli: &Cli, config: &Config) -> RunOptions {
    RunOptions {
        alphabet: cli
            .alphabet
            .map(Into::into)
            .unwrap_or(config.pattern.alphabet),
        clean: cli.clean,
    }
}

/// `--input` and `--output` come as a pair or not at all
fn explicit_job(
    input: Option<&Path>,
    output: Option<&Path>,
    by_status: bool,
) -> Result<Option<ClassifyJob>> {
    match (input, output) {
        (Some(input), Some(output)) => {
            Ok(Some(ClassifyJob::new(input, output).with_status(by_status)))
        }
        (None, None) if by_status => Err(DomainPatternError::InvalidInvocation {
            message: "--by-status requires --input and --output".to_string(),
        }),
        (None, None) => Ok(None),
        _ => Err(DomainPatternError::InvalidInvocation {
            message: "--input and --output must be given together, \
                      or omitted to classify all discovered scan results"
                .to_string(),
        }),
    }
}

fn handle_classify(cli: &Cli, base_dir: &Path, out: &Printer) -> Result<()> {
    let job = explicit_job(cli.input.as_deref(), cli.output.as_deref(), cli.by_status)?;
    let config = Config::load(base_dir)?;
    let options = run_options(cli, &config);

    match job {
        Some(job) => {
            let report = run_job(&job, &options)?;
            if out.json {
                return out.print_json(&report);
            }
            out.job_report(&report);
            out.line(format!(
                "{} {}",
                "Done:".green(),
                report.output_dir.display()
            ));
            Ok(())
        }
        None => handle_discovery(base_dir, &config, &options, out),
    }
}

fn handle_discovery(
    base_dir: &Path,
    config: &Config,
    options: &RunOptions,
    out: &Printer,
) -> Result<()> {
    let input_dir = base_dir.join(&config.discovery.input_dir);
    let output_dir = base_dir.join(&config.discovery.output_dir);

    out.line(String::new());
    out.line(format!("{}", "Classifying scan results".cyan().bold()));
    out.line(format!("  Input:  {}", input_dir.display().to_string().dimmed()));
    out.line(format!("  Output: {}", output_dir.display().to_string().dimmed()));

    let outcome = run_discovered(base_dir, config, options, |event| match event {
        PipelineEvent::Started(job) => {
            out.line(String::new());
            out.line(format!("{} {}", "Processing:".cyan(), job.input.display()));
        }
        PipelineEvent::Skipped(job) => {
            out.warn(format!("{} does not exist, skipping", job.input.display()));
        }
        PipelineEvent::Finished(report) => {
            out.job_report(report);
            out.line(format!(
                "  {} {}",
                "Saved to:".green(),
                report.output_dir.display()
            ));
        }
    })?;

    if out.json {
        return out.print_json(&outcome);
    }

    out.line(String::new());
    out.line(format!(
        "{} {} classified, {} skipped",
        "Finished:".green().bold(),
        outcome.reports.len(),
        outcome.skipped.len()
    ));
    Ok(())
}

fn handle_status(
    cli: &Cli,
    base_dir: &Path,
    input: &Path,
    output: &Path,
    out: &Printer,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let options = run_options(cli, &config);
    let report = run_status_only(&ClassifyJob::new(input, output), &options)?;

    if out.json {
        return out.print_json(&report);
    }
    out.status_report(&report);
    Ok(())
}

#[derive(Serialize)]
struct PatternLine<'a> {
    domain: &'a str,
    label: String,
    pattern: String,
}

fn handle_pattern(cli: &Cli, base_dir: &Path, domains: &[String], out: &Printer) -> Result<()> {
    let config = Config::load(base_dir)?;
    let alphabet = run_options(cli, &config).alphabet;

    let lines: Vec<PatternLine<'_>> = domains
        .iter()
        .map(|domain| {
            let label = label_of(domain);
            let pattern = derive_pattern(&label, alphabet);
            PatternLine {
                domain,
                label,
                pattern,
            }
        })
        .collect();

    if out.json {
        return out.print_json(&lines);
    }

    // printed even with --quiet
    for line in &lines {
        println!("{}\t{}", line.pattern, line.domain);
    }
    Ok(())
}

fn handle_config(action: &ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(DomainPatternError::ConfigKeyNotFound { key: key.clone() });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(key, value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "domain-pattern", &mut io::stdout());
}

/// Console output honoring --quiet and --json
struct Printer {
    quiet: bool,
    json: bool,
}

impl Printer {
    fn silent(&self) -> bool {
        self.quiet || self.json
    }

    fn line(&self, text: String) {
        if !self.silent() {
            println!("{}", text);
        }
    }

    fn warn(&self, text: String) {
        if !self.quiet {
            eprintln!("{} {}", "[WARN]".yellow().bold(), text);
        }
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
        println!("{}", text);
        Ok(())
    }

    fn job_report(&self, report: &JobReport) {
        self.pattern_summary(&report.patterns);
        if let Some(statuses) = &report.statuses {
            self.status_summary(statuses);
        }
    }

    fn pattern_summary(&self, summary: &PatternSummary) {
        self.line(format!("  Processed {} domains", summary.total.to_string().bold()));
        self.line(format!(
            "  Found {} distinct patterns:",
            summary.patterns.len().to_string().bold()
        ));
        for (pattern, count) in &summary.patterns {
            self.line(format!("    {}: {}", pattern.cyan(), count));
        }
    }

    fn status_summary(&self, summary: &StatusSummary) {
        self.line(format!(
            "  {} {} special domains",
            "By status:".cyan(),
            summary.total
        ));
        for (status, count) in &summary.statuses {
            self.line(format!("    {}: {}", status.yellow(), count));
        }
    }

    fn status_report(&self, report: &StatusReport) {
        self.status_summary(&report.statuses);
        self.line(format!(
            "{} {}",
            "Done:".green(),
            report.output_dir.display()
        ));
    }
}
