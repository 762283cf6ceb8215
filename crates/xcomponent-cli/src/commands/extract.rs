//! Implementation of the `xcomponent extract` command.

use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;

use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use tracing::info;
use xcomponent::extract::{extract, ExtractedMessage};

use crate::output::table::{format_messages_table, FileMessages};

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Host source files containing templates
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only recognize these translation functions (repeatable)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Attach source comments starting with this tag (repeatable)
    #[arg(short, long = "comment-tag")]
    pub comment_tags: Vec<String>,

    /// Source file encoding
    #[arg(long, default_value = "utf-8")]
    pub encoding: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one extracted message.
#[derive(Debug, Serialize)]
struct MessageJson<'a> {
    file: &'a str,
    #[serde(flatten)]
    message: &'a ExtractedMessage,
}

/// Run the extract command.
pub fn run_extract(args: ExtractArgs) -> Result<i32> {
    let options = HashMap::from([("encoding".to_string(), args.encoding.clone())]);
    let mut files = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let file = File::open(path)
            .into_diagnostic()
            .map_err(|e| miette!("Failed to open {}: {}", path.display(), e))?;
        let messages = extract(file, args.keywords.as_slice(), args.comment_tags.as_slice(), &options)
            .map_err(|e| miette!("{}: {}", path.display(), e))?;
        info!(file = %path.display(), messages = messages.len(), "extracted messages");
        files.push(FileMessages {
            file: path.display().to_string(),
            messages,
        });
    }

    if args.json {
        let json: Vec<MessageJson<'_>> = files
            .iter()
            .flat_map(|f| {
                f.messages.iter().map(move |message| MessageJson {
                    file: &f.file,
                    message,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    } else {
        println!("{}", format_messages_table(&files));
    }

    Ok(exitcode::OK)
}
