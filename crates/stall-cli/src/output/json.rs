//! JSON output formatter for diagnostic display
//!
//! Provides structured JSON and NDJSON output formats for programmatic integration.

use serde::Serialize;
use stall_core::diagnostic::Diagnostic;
use stall_core::rules::{RuleCategory, RuleRegistry, Severity};
use std::collections::HashMap;
use std::io::{self, Write};

#[derive(Serialize)]
pub struct JsonOutput {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub stall_version: &'static str,
    pub working_directory: String,
    pub analyzed_path: String,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_diagnostics: usize,
    pub by_severity: SeverityCounts,
    pub by_category: CategoryCounts,
}

#[derive(Serialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub hint: usize,
}

#[derive(Serialize)]
pub struct CategoryCounts {
    pub reliability: usize,
    pub api_design: usize,
}

#[derive(Serialize)]
pub struct JsonDiagnostic {
    pub rule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub severity: String,
    pub confidence: String,
    pub message: String,
    pub location: JsonLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Serialize)]
pub struct JsonLocation {
    pub file: String,
    pub start: JsonPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<JsonPosition>,
}

#[derive(Serialize)]
pub struct JsonPosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Serialize)]
#[serde(tag = "type")]
pub enum NdjsonRecord {
    #[serde(rename = "metadata")]
    Metadata(JsonMetadata),
    #[serde(rename = "diagnostic")]
    Diagnostic(JsonDiagnostic),
    #[serde(rename = "summary")]
    Summary(JsonSummary),
}

pub struct JsonFormatter<'a> {
    registry: Option<&'a RuleRegistry>,
}

impl<'a> JsonFormatter<'a> {
    pub fn new() -> Self {
        Self { registry: None }
    }

    pub fn with_registry(registry: &'a RuleRegistry) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    pub fn format(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
    ) -> String {
        let output = self.build_output(diagnostics, total_files, analyzed_path);
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_ndjson<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
        writer: &mut W,
    ) -> io::Result<()> {
        let metadata = self.build_metadata(analyzed_path);
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&NdjsonRecord::Metadata(metadata))?
        )?;

        for diag in diagnostics {
            let json_diag = self.convert_diagnostic(diag);
            writeln!(
                writer,
                "{}",
                serde_json::to_string(&NdjsonRecord::Diagnostic(json_diag))?
            )?;
        }

        let summary = self.build_summary(diagnostics, total_files);
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&NdjsonRecord::Summary(summary))?
        )?;

        Ok(())
    }

    fn build_output(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
    ) -> JsonOutput {
        JsonOutput {
            version: "1.0",
            metadata: self.build_metadata(analyzed_path),
            summary: self.build_summary(diagnostics, total_files),
            diagnostics: diagnostics
                .iter()
                .map(|d| self.convert_diagnostic(d))
                .collect(),
        }
    }

    fn build_metadata(&self, analyzed_path: &str) -> JsonMetadata {
        JsonMetadata {
            stall_version: env!("CARGO_PKG_VERSION"),
            working_directory: std::env::current_dir()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            analyzed_path: analyzed_path.to_string(),
        }
    }

    fn build_summary(&self, diagnostics: &[Diagnostic], total_files: usize) -> JsonSummary {
        let mut by_severity = SeverityCounts {
            error: 0,
            warning: 0,
            info: 0,
            hint: 0,
        };
        let mut by_category = CategoryCounts {
            reliability: 0,
            api_design: 0,
        };
        let mut files_with_issues: HashMap<&str, bool> = HashMap::new();

        for diag in diagnostics {
            match diag.severity {
                Severity::Error => by_severity.error += 1,
                Severity::Warning => by_severity.warning += 1,
                Severity::Info => by_severity.info += 1,
                Severity::Hint => by_severity.hint += 1,
            }

            if let Some(category) = self.get_category(&diag.rule_id) {
                match category {
                    RuleCategory::Reliability => by_category.reliability += 1,
                    RuleCategory::ApiDesign => by_category.api_design += 1,
                }
            }

            files_with_issues.insert(&diag.file, true);
        }

        JsonSummary {
            total_files,
            files_with_issues: files_with_issues.len(),
            total_diagnostics: diagnostics.len(),
            by_severity,
            by_category,
        }
    }

    fn convert_diagnostic(&self, diag: &Diagnostic) -> JsonDiagnostic {
        let (rule_name, category) = self.get_rule_info(&diag.rule_id);

        let end = match (diag.end_line, diag.end_column) {
            (Some(line), Some(column)) => Some(JsonPosition { line, column }),
            _ => None,
        };

        JsonDiagnostic {
            rule_id: diag.rule_id.clone(),
            rule_name,
            category,
            severity: format!("{:?}", diag.severity).to_lowercase(),
            confidence: format!("{:?}", diag.confidence).to_lowercase(),
            message: diag.message.clone(),
            location: JsonLocation {
                file: diag.file.clone(),
                start: JsonPosition {
                    line: diag.line,
                    column: diag.column,
                },
                end,
            },
            suggestion: diag.suggestion.clone(),
        }
    }

    fn get_rule_info(&self, rule_id: &str) -> (Option<String>, Option<String>) {
        if let Some(registry) = self.registry {
            if let Some(rule) = registry.get_rule(rule_id) {
                let metadata = rule.metadata();
                let category = match metadata.category {
                    RuleCategory::Reliability => "reliability",
                    RuleCategory::ApiDesign => "api-design",
                };
                return (Some(metadata.name.to_string()), Some(category.to_string()));
            }
        }
        (None, None)
    }

    fn get_category(&self, rule_id: &str) -> Option<RuleCategory> {
        self.registry
            .and_then(|r| r.get_rule(rule_id))
            .map(|rule| rule.metadata().category)
    }
}

impl Default for JsonFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
