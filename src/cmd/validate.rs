/*!
`validate.rs`

Local pipeline-config checks, used by `validate-pipeline` and before
`set-pipeline` uploads anything.

Rules:
  - the document root is a mapping
  - `jobs`, `resources`, `resource_types`, `groups` (when present) are lists
    of mappings, each with a non-empty string `name`, unique within the list
  - every job a group references is defined under `jobs`
  - strict mode: no top-level keys outside the known set
*/

use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;

use super::format::{Role, StyleOptions, badge, color};
use super::path_arg::PathArgument;
use crate::log_debug;

const NAMED_SECTIONS: &[&str] = &["jobs", "resources", "resource_types", "groups"];
const KNOWN_KEYS: &[&str] = &[
    "jobs",
    "resources",
    "resource_types",
    "groups",
    "var_sources",
    "display",
];

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Pipeline configuration (path, glob matching one file, or '-' for stdin)
    #[arg(short = 'c', long = "config", value_name = "PATH", value_parser = PathArgument::parse)]
    pub config: PathArgument,

    /// Also reject unknown top-level keys
    #[arg(long)]
    pub strict: bool,
}

pub fn execute_validate(args: ValidateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let problems = validate_config(&config, args.strict);
    let style = StyleOptions::detect();
    if !problems.is_empty() {
        for p in &problems {
            eprintln!("{}{}", badge("error", &style), color(Role::Error, p, &style));
        }
        bail!("configuration invalid ({} problem(s))", problems.len());
    }
    println!("{}looks good", badge("success", &style));
    Ok(())
}

/// Read and parse the YAML behind a resolved path argument.
pub fn load_config(arg: &PathArgument) -> Result<Value> {
    if arg.is_empty() {
        bail!("no pipeline configuration provided");
    }
    if arg.is_stdin_capture() {
        log_debug!("reading pipeline configuration from stdin");
    }
    let shown = arg
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let text = arg
        .read_to_string()
        .with_context(|| format!("Failed to read {shown}"))?
        .unwrap_or_default();
    parse_config(&text).with_context(|| format!("Invalid YAML in {shown}"))
}

pub fn parse_config(text: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(text)?;
    Ok(value)
}

/// Every problem found, in document order; empty means valid.
pub fn validate_config(config: &Value, strict: bool) -> Vec<String> {
    let mut problems = Vec::new();
    let Some(root) = config.as_object() else {
        problems.push("pipeline configuration must be a mapping".to_string());
        return problems;
    };

    if strict {
        for key in root.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                problems.push(format!("unknown top-level key '{key}'"));
            }
        }
    }

    for section in NAMED_SECTIONS {
        let Some(value) = root.get(*section) else {
            continue;
        };
        let Some(items) = value.as_array() else {
            problems.push(format!("'{section}' must be a list"));
            continue;
        };
        let mut seen = HashSet::new();
        for (i, item) in items.iter().enumerate() {
            match item.get("name").and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => {
                    if !seen.insert(name) {
                        problems.push(format!("{section}: duplicate name '{name}'"));
                    }
                }
                _ => problems.push(format!("{section}[{i}]: missing name")),
            }
        }
    }

    let jobs: HashSet<&str> = root
        .get("jobs")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|j| j.get("name")?.as_str()).collect())
        .unwrap_or_default();
    if let Some(groups) = root.get("groups").and_then(Value::as_array) {
        for group in groups {
            let group_name = group.get("name").and_then(Value::as_str).unwrap_or("?");
            let refs = group.get("jobs").and_then(Value::as_array);
            for job in refs.into_iter().flatten().filter_map(Value::as_str) {
                // Group entries may be globs over job names.
                if !job.contains('*') && !jobs.contains(job) {
                    problems.push(format!("group '{group_name}' references unknown job '{job}'"));
                }
            }
        }
    }

    problems
}
