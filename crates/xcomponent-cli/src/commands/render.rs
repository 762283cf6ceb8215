//! Implementation of the `xcomponent render` command.

use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use xcomponent::{Catalog, Signature, Value};

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Template to render, e.g. `<Card title={t}/>`
    pub template: String,

    /// Component definitions as NAME=PATH (repeatable); the signature is
    /// read from a first line of the form `{# name: str, count: int #}`
    #[arg(short = 'c', long = "component", value_parser = parse_key_val)]
    pub components: Vec<(String, String)>,

    /// Parameters in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for render results.
#[derive(Serialize)]
pub struct RenderResult {
    pub result: String,
}

/// Parse a key=value string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid format '{s}': expected name=value"))
}

/// Convert a command-line parameter to a value: booleans and integers are
/// recognized, anything else is a string.
fn parse_value(raw: String) -> Value {
    match raw.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Str(raw),
        },
    }
}

/// Split an optional `{# signature #}` header off a component file.
fn split_signature(content: &str) -> Result<(Signature, &str)> {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("{#") else {
        return Ok((Signature::new(), content));
    };
    let (header, body) = rest
        .split_once("#}")
        .ok_or_else(|| miette!("unterminated signature header"))?;
    let signature = header.parse().into_diagnostic()?;
    Ok((signature, body))
}

fn load_catalog(components: Vec<(String, String)>) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    for (name, path) in components {
        let path = PathBuf::from(path);
        let content = read_to_string(&path)
            .into_diagnostic()
            .map_err(|e| miette!("Cannot read component file {}: {}", path.display(), e))?;
        let (signature, body) = split_signature(&content)
            .map_err(|e| miette!("{}: {}", path.display(), e))?;
        catalog
            .register(name, body, signature)
            .map_err(|e| miette!("{}: {}", path.display(), e))?;
    }
    Ok(catalog)
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> Result<i32> {
    let catalog = load_catalog(args.components)?;
    let params: HashMap<String, Value> = args
        .params
        .into_iter()
        .map(|(k, v)| (k, parse_value(v)))
        .collect();

    match catalog.render_source(&args.template, params) {
        Ok(result) => {
            if args.json {
                let output = RenderResult { result };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{result}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string(),
                    "kind": format!("{:?}", e.kind()),
                });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Render error: {e}");
            }
            Ok(exitcode::DATAERR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_from_the_command_line() {
        assert_eq!(parse_value("true".into()), Value::Bool(true));
        assert_eq!(parse_value("-3".into()), Value::Int(-3));
        assert_eq!(parse_value("3px".into()), Value::from("3px"));
    }

    #[test]
    fn signature_header() {
        let (signature, body) = split_signature("{# title: str #}\n<h1>{title}</h1>").unwrap();
        assert_eq!(signature.to_string(), "title: str");
        assert_eq!(body.trim(), "<h1>{title}</h1>");

        let (signature, body) = split_signature("<br/>").unwrap();
        assert!(signature.is_empty());
        assert_eq!(body, "<br/>");
    }

    #[test]
    fn key_val() {
        assert_eq!(
            parse_key_val("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_key_val("abc").is_err());
    }
}
