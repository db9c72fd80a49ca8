//! Terminal rendering for briefs, revisions and classifications

use std::fmt::Write;

use colored::Colorize;
use serde_json::Value;

use crate::artifacts::{BriefField, CampaignBrief};
use crate::classifier::Classification;
use crate::revision::{BriefChanges, RevisionHistory, Section};

/// The brief as titled sections
pub fn brief_text(brief: &CampaignBrief) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Campaign Brief".bright_cyan().bold());
    for field in BriefField::ALL {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", field.title().yellow().bold());
        match brief.field_value(field) {
            Value::Array(items) => {
                for item in items {
                    let _ = writeln!(out, "  • {}", value_text(&item));
                }
            }
            other => {
                let _ = writeln!(out, "{}", value_text(&other));
            }
        }
    }
    out
}

/// Field-level changes, grouped by section
pub fn changes_text(changes: &BriefChanges) -> String {
    if changes.is_empty() {
        return format!("{}\n", "No fields changed.".dimmed());
    }
    let mut out = String::new();
    let mut last: Option<Section> = None;
    for (section, field, change) in changes.iter() {
        if last != Some(section) {
            let _ = writeln!(out, "{}", format!("[{}]", section).bright_cyan());
            last = Some(section);
        }
        let _ = writeln!(out, "  {}", field.yellow());
        let _ = writeln!(out, "    {} {}", "-".red(), value_text(&change.old).red());
        let _ = writeln!(out, "    {} {}", "+".green(), value_text(&change.new).green());
    }
    out
}

/// One line per recorded revision
pub fn history_text(history: &RevisionHistory) -> String {
    if history.is_empty() {
        return format!("{}\n", "No revisions yet.".dimmed());
    }
    let mut out = String::new();
    for (i, record) in history.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} {} ({} fields; {})",
            i + 1,
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            record.feedback,
            record.changes.len(),
            record.sections
        );
    }
    out
}

pub fn classification_text(classification: &Classification) -> String {
    let mut out = String::new();
    for section in Section::ALL {
        let mark = if classification.flags.get(section) {
            "yes".green()
        } else {
            "no".dimmed()
        };
        let _ = writeln!(out, "{:<10} {}", section.name(), mark);
    }
    let _ = writeln!(out, "{}", format!("(classified by {})", classification.source).dimmed());
    out
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join("; "),
        other => other.to_string(),
    }
}
