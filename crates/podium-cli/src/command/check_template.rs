//! Page template check
//!
//! Resolves `{{ site.data.<prefix>.a.b.c }}` placeholders of a static-site
//! page against a report document, the same way the site generator would,
//! and fails if any placeholder does not resolve.

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Args;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::info;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct CheckTemplateArg {
    /// Page template containing data placeholders
    pub template: PathBuf,

    /// JSON document the placeholders refer to
    pub data: PathBuf,

    /// Data name used in placeholders [default: file stem of DATA]
    #[arg(long)]
    pub prefix: Option<String>,

    /// Write the rendered page to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CheckTemplateArg) -> anyhow::Result<()> {
    let template = fs::read_to_string(&arg.template)
        .with_context(|| format!("Failed to read template: {}", arg.template.display()))?;
    let data = util::read_json_file::<Value, _>("report data", &arg.data)?;
    let prefix = match &arg.prefix {
        Some(prefix) => prefix.clone(),
        None => arg
            .data
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_owned)
            .with_context(|| format!("Cannot derive a prefix from {}", arg.data.display()))?,
    };

    let rendered = render(&template, &data, &prefix)?;
    if !rendered.unresolved.is_empty() {
        for placeholder in &rendered.unresolved {
            eprintln!("  unresolved: {placeholder}");
        }
        anyhow::bail!(
            "{} of {} placeholders in {} do not resolve against {}",
            rendered.unresolved.len(),
            rendered.unresolved.len() + rendered.resolved,
            arg.template.display(),
            arg.data.display()
        );
    }

    if let Some(path) = &arg.output {
        Output::open(path.clone())?.write_text(&rendered.text)?;
    }
    info!(
        template = %arg.template.display(),
        resolved = rendered.resolved,
        "all placeholders resolve"
    );
    println!(
        "OK: all {} site.data.{prefix} placeholders resolve",
        rendered.resolved
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rendered {
    text: String,
    resolved: usize,
    /// Placeholders left in `text`, in order of appearance.
    unresolved: Vec<String>,
}

fn render(template: &str, data: &Value, prefix: &str) -> anyhow::Result<Rendered> {
    let prefix = regex::escape(prefix);
    let placeholder = Regex::new(&format!(
        r"\{{\{{\s*site\.data\.{prefix}\.([A-Za-z0-9_.]+)\s*\}}\}}"
    ))
    .context("Invalid placeholder pattern")?;
    let leftover = Regex::new(&format!(r"\{{\{{\s*site\.data\.{prefix}\.[^}}]*\}}\}}"))
        .context("Invalid placeholder pattern")?;

    let mut resolved = 0;
    let text = placeholder
        .replace_all(template, |caps: &Captures<'_>| match lookup(data, &caps[1]) {
            Some(value) => {
                resolved += 1;
                display(value)
            }
            None => caps[0].to_owned(),
        })
        .into_owned();
    let unresolved = leftover
        .find_iter(&text)
        .map(|m| m.as_str().to_owned())
        .collect();
    Ok(Rendered {
        text,
        resolved,
        unresolved,
    })
}

/// Follows a dotted path through objects and arrays.
fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data() -> Value {
        json!({
            "year_range": "2000–2025",
            "nc": { "Sr": { "count": 12, "pct": "48.0" } },
            "chalk": { "Final": { "matches": ["2010 157lbs: A (1→1), B (2→2)"] } },
        })
    }

    #[test]
    fn test_resolves_nested_paths() {
        let template = "Seniors won {{ site.data.report_stats.nc.Sr.count }} titles \
                        ({{site.data.report_stats.nc.Sr.pct}}%) in {{ site.data.report_stats.year_range }}.";
        let rendered = render(template, &data(), "report_stats").unwrap();
        assert_eq!(rendered.text, "Seniors won 12 titles (48.0%) in 2000–2025.");
        assert_eq!(rendered.resolved, 3);
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn test_array_index() {
        let template = "{{ site.data.report_03_stats.chalk.Final.matches.0 }}";
        let rendered = render(template, &data(), "report_03_stats").unwrap();
        assert_eq!(rendered.text, "2010 157lbs: A (1→1), B (2→2)");
    }

    #[test]
    fn test_reports_unresolved() {
        let template = "{{ site.data.report_stats.nc.SSr.count }} and \
                        {{ site.data.report_stats.nc.Sr.count }} and \
                        {{ site.data.report_stats.archetypes.Last Chance }}";
        let rendered = render(template, &data(), "report_stats").unwrap();
        assert_eq!(rendered.resolved, 1);
        assert_eq!(
            rendered.unresolved,
            vec![
                "{{ site.data.report_stats.nc.SSr.count }}".to_owned(),
                "{{ site.data.report_stats.archetypes.Last Chance }}".to_owned(),
            ]
        );
    }

    #[test]
    fn test_other_prefixes_are_ignored() {
        let template = "{{ site.data.other.nc.Sr.count }}";
        let rendered = render(template, &data(), "report_stats").unwrap();
        assert_eq!(rendered.text, template);
        assert_eq!(rendered.resolved, 0);
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn test_lookup_stops_at_scalars() {
        let data = data();
        assert_eq!(lookup(&data, "nc.Sr.count"), Some(&json!(12)));
        assert_eq!(lookup(&data, "nc.Sr.count.more"), None);
        assert_eq!(lookup(&data, "nc..Sr"), None);
    }
}
