use anyhow::Context;
use clap::{Parser, Subcommand};
use schedule_json::diagnostics::{self, Diagnostic, Severity, TracingSink};
use schedule_json::{Parsed, Result, ScheduleSource, parser, render, report};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "schedule-json")]
#[command(about = "Conference schedule validator", long_about = None)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schedule, print every finding and a per-day listing.
    Validate {
        #[arg(long, default_value = "schedule.json")]
        schedule: String,

        /// Fail on any dropped session or warning, not just fatal errors.
        #[arg(long)]
        strict: bool,
    },

    /// Write the normalized schedule as JSON.
    Report {
        #[arg(long, default_value = "schedule.json")]
        schedule: String,

        #[arg(short = 'o', long)]
        out: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Commands::Validate { schedule, strict } => validate(&schedule, strict),
        Commands::Report { schedule, out } => {
            // 1) Load + parse.
            let source = load(&schedule)?;
            let mut sink = TracingSink::new(Vec::new());
            let (grouped, timezone) = parser::parse_with(&source, &mut sink)
                .with_context(|| format!("parse schedule {}", schedule))?;
            let parsed = Parsed {
                schedule: grouped,
                timezone,
                diagnostics: sink.into_inner(),
            };

            // 2) Build + write report.
            let data = report::build_report(&parsed);
            let json = serde_json::to_string_pretty(&data)?;
            std::fs::write(&out, json).with_context(|| format!("write report {}", out))?;
            println!("Wrote {}", out);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(path: &str) -> Result<ScheduleSource> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read schedule file {}", path))?;
    ScheduleSource::from_json(&text).with_context(|| format!("decode schedule file {}", path))
}

fn validate(path: &str, strict: bool) -> Result<ExitCode> {
    let mut audits: Vec<Diagnostic> = Vec::new();

    let source = match load(path) {
        Ok(source) => {
            audits.push(Diagnostic::new(Severity::Info, "Schedule is valid JSON"));
            source
        }
        Err(err) => {
            audits.push(Diagnostic::new(
                Severity::Drop,
                format!("Unable to load schedule: {:#}", err),
            ));
            print!("{}", diagnostics::render_audits(&audits));
            return Ok(ExitCode::FAILURE);
        }
    };

    let parsed = match parser::parse(&source) {
        Ok(parsed) => parsed,
        Err(err) => {
            audits.push(Diagnostic::new(Severity::Drop, err.to_string()));
            print!("{}", diagnostics::render_audits(&audits));
            return Ok(ExitCode::FAILURE);
        }
    };
    audits.extend(parsed.diagnostics.iter().cloned());

    print!("{}", diagnostics::render_audits(&audits));
    print!("{}", render::render_listing(&report::build_report(&parsed))?);

    let problems = diagnostics::problems(&parsed.diagnostics);
    if strict && problems > 0 {
        tracing::error!(problems, "strict validation failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
