//! Console output formatter for step results

use super::report::StepReport;
use colored::Colorize;
use std::path::Path;

/// Formats step reports and discovery results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One status line per report, outputs indented below
    pub fn format(report: &StepReport) -> String {
        let mut output = String::new();

        if report.success {
            output.push_str(&format!("{} {}\n", "✓".green().bold(), report.operation.bold()));
            for path in &report.outputs {
                output.push_str(&format!("    {}\n", path.display()));
            }
        } else {
            output.push_str(&format!("{} {}", "✗".red().bold(), report.operation.bold()));
            match &report.failure {
                Some(failure) => output.push_str(&format!(
                    ": {} {}\n",
                    failure,
                    format!("[{}]", failure.code()).dimmed()
                )),
                None => output.push_str(": failed\n"),
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(report: &StepReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Aligned found/missing table for `biorun check`
    pub fn format_discovery<'a>(
        entries: impl IntoIterator<Item = (&'a str, Option<&'a Path>)>,
    ) -> String {
        let entries: Vec<_> = entries.into_iter().collect();
        let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

        let mut output = String::new();
        for (name, path) in entries {
            let line = match path {
                Some(path) => format!(
                    "  {} {:<width$}  {}\n",
                    "✓".green(),
                    name,
                    path.display(),
                    width = width
                ),
                None => format!(
                    "  {} {:<width$}  {}\n",
                    "✗".red(),
                    name,
                    "not found".red(),
                    width = width
                ),
            };
            output.push_str(&line);
        }
        output
    }
}
