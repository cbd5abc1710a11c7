//! Handler for `gavel rules`.

use console::Style;
use gavel_core::rules::{RuleSet, Severity};
use miette::Result;

pub fn exec(json: bool) -> Result<()> {
    let rules = RuleSet::load_bundled();
    if json {
        let rendered = serde_json::to_string_pretty(&rules).map_err(|e| {
            gavel_util::errors::GavelError::Generic {
                message: format!("Failed to serialize ruleset: {e}"),
            }
        })?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} known-problematic rules:", rules.len());
    for rule in &rules.known_problematic {
        let style = severity_style(rule.severity);
        println!("  [{}] {}", style.apply_to(rule.severity), rule.id());
        println!("        {}", rule.reason);
        if let Some(conditions) = &rule.conditions {
            if !conditions.when_present.is_empty() {
                println!("        only when present: {}", conditions.when_present.join(", "));
            }
        }
    }
    Ok(())
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::new().red().bold(),
        Severity::Warning => Style::new().yellow(),
        Severity::Info => Style::new().cyan(),
    }
}
