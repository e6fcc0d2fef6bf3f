//! Audit linter over extractor output
//!
//! Re-applies the extraction invariants to the JSON records so
//! classification regressions surface before a translator starts work.
//! The linter never fixes anything; it only reports.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::debug;

use crate::error::Result;
use crate::script::{FileRecord, TextType};

/// Punctuation that must not appear in names or placeholder tokens.
const NAME_PUNCTUATION: [char; 7] = ['！', '？', '、', '。', '」', '』', '―'];

/// Longest reasonable character name, honorifics included.
const MAX_NAME_CHARS: usize = 12;

/// Which invariant an issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuditRule {
    PlaceholderTooLong,
    PlaceholderHasPunctuation,
    CharacterNameTooLong,
    CharacterNameHasPunctuation,
    ShortNarrationOnDialogueLine,
    PlaceholderNotPromoted,
}

impl AuditRule {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::PlaceholderTooLong => "Name placeholder longer than the token",
            Self::PlaceholderHasPunctuation => "Name placeholder has punctuation",
            Self::CharacterNameTooLong => "Character name too long",
            Self::CharacterNameHasPunctuation => "Character name has punctuation",
            Self::ShortNarrationOnDialogueLine => "Very short narration on a dialogue line",
            Self::PlaceholderNotPromoted => "Clean name placeholder left on a dialogue line",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditIssue {
    pub file: String,
    pub line: u32,
    pub rule: AuditRule,
    pub text: String,
}

/// Check one record against the invariants.
pub fn audit_record(record: &FileRecord) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    let file = &record.metadata.file;

    for (&line, entries) in &record.lines {
        let has_dialogue = entries.iter().any(|e| e.kind == TextType::Dialogue);
        let has_open_dialogue = entries
            .iter()
            .any(|e| e.kind == TextType::Dialogue && e.original.starts_with('「'));

        for entry in entries {
            let push = |issues: &mut Vec<AuditIssue>, rule| {
                issues.push(AuditIssue {
                    file: file.clone(),
                    line,
                    rule,
                    text: entry.original.clone(),
                });
            };

            match entry.kind {
                TextType::NamePlaceholder => {
                    if entry.char_len() > 4 {
                        push(&mut issues, AuditRule::PlaceholderTooLong);
                    }
                    let clean = !entry.original.contains(&NAME_PUNCTUATION[..]);
                    if !clean {
                        push(&mut issues, AuditRule::PlaceholderHasPunctuation);
                    }
                    if clean && entry.char_len() <= 4 && has_open_dialogue {
                        push(&mut issues, AuditRule::PlaceholderNotPromoted);
                    }
                }
                TextType::CharacterName => {
                    if entry.char_len() > MAX_NAME_CHARS {
                        push(&mut issues, AuditRule::CharacterNameTooLong);
                    }
                    if entry.original.contains(&NAME_PUNCTUATION[..]) {
                        push(&mut issues, AuditRule::CharacterNameHasPunctuation);
                    }
                }
                TextType::Narration => {
                    if entry.char_len() <= 2 && has_dialogue {
                        push(&mut issues, AuditRule::ShortNarrationOnDialogueLine);
                    }
                }
                _ => {}
            }
        }
    }

    issues
}

/// Audit every `.json` record in a directory.
pub fn audit_dir(dir: &Path) -> Result<Vec<AuditIssue>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut issues = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)?;
        let record: FileRecord = serde_json::from_str(&content)?;
        debug!("auditing {}", path.display());
        issues.extend(audit_record(&record));
    }

    Ok(issues)
}

/// Maximum examples shown per rule in the report.
const REPORT_EXAMPLES: usize = 5;

/// Render issues grouped by rule, a few examples each.
pub fn format_report(issues: &[AuditIssue]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Audit run {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    if issues.is_empty() {
        out.push_str("No issues found\n");
        return out;
    }

    let mut by_rule: BTreeMap<AuditRule, Vec<&AuditIssue>> = BTreeMap::new();
    for issue in issues {
        by_rule.entry(issue.rule).or_default().push(issue);
    }

    for (rule, group) in &by_rule {
        let _ = writeln!(out, "\n{}: {} occurrence(s)", rule.describe(), group.len());
        for issue in group.iter().take(REPORT_EXAMPLES) {
            let _ = writeln!(out, "  {}:{}  {}", issue.file, issue.line, issue.text);
        }
        if group.len() > REPORT_EXAMPLES {
            let _ = writeln!(out, "  ... and {} more", group.len() - REPORT_EXAMPLES);
        }
    }

    let _ = writeln!(out, "\nTotal: {} issue(s)", issues.len());
    out
}
