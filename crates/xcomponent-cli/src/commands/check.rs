//! Implementation of the `xcomponent check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{miette, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;
use xcomponent::parse_markup;

use crate::output::TemplateDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct CheckResult {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CheckError>,
}

#[derive(Debug, Serialize)]
struct CheckError {
    line: usize,
    column: usize,
    message: String,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut results = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let content = read_to_string(path)
            .into_diagnostic()
            .map_err(|e| miette!("Failed to read template {}: {}", path.display(), e))?;
        debug!(file = %path.display(), bytes = content.len(), "checking template");

        match parse_markup(&content) {
            Ok(_) => {
                if !args.json {
                    println!("{} {}", "ok".green(), path.display());
                }
                results.push(CheckResult {
                    file: path.display().to_string(),
                    ok: true,
                    error: None,
                });
            }
            Err(e) => {
                if !args.json {
                    let diagnostic = TemplateDiagnostic::from_parse_error(path, &content, &e);
                    eprintln!("{:?}", miette::Report::new(diagnostic));
                }
                results.push(CheckResult {
                    file: path.display().to_string(),
                    ok: false,
                    error: Some(CheckError {
                        line: e.line(),
                        column: e.column(),
                        message: e.to_string(),
                    }),
                });
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results).into_diagnostic()?);
    }

    if results.iter().all(|r| r.ok) {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}
