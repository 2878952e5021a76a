//! Markdown report generation for MathKit sessions.
//!
//! This module provides the [`MarkdownGenerator`] struct for converting a
//! [`SessionReport`] into a readable Markdown document with:
//!
//! - The current function machine and its history log
//! - The place-value columns, total and target feedback
//! - A footer with the generation timestamp

use std::fmt::Write;

use chrono::{DateTime, Utc};
use mathkit_core::{Run, START_STEP};

use crate::{BlocksSection, MachineSection, SessionReport};

/// Joins pipeline part names in the machine table.
const PIPELINE_ARROW: &str = " → ";

/// Generates Markdown documents from session reports.
pub struct MarkdownGenerator<'a> {
    report: &'a SessionReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    ///
    /// Sections the report does not carry are left out.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        if let Some(machine) = &self.report.machine {
            Self::write_machine(&mut output, machine);
        }
        if let Some(blocks) = &self.report.blocks {
            Self::write_blocks(&mut output, blocks);
        }
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "# MathKit Session: {}\n",
            escape_markdown(&self.report.title)
        );
    }

    /// Writes the machine table and the history log.
    fn write_machine(output: &mut String, machine: &MachineSection) {
        let _ = writeln!(output, "## Function Machine\n");
        let _ = writeln!(output, "| Pipeline | Input | Output |");
        let _ = writeln!(output, "|----------|-------|--------|");

        let pipeline = if machine.parts.is_empty() {
            "*empty*".to_string()
        } else {
            machine
                .parts
                .iter()
                .map(|part| escape_markdown(part))
                .collect::<Vec<_>>()
                .join(PIPELINE_ARROW)
        };
        let result = machine
            .output
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        let _ = writeln!(output, "| {pipeline} | {} | {result} |\n", machine.input);

        let _ = writeln!(output, "### History\n");
        if machine.history.is_empty() {
            let _ = writeln!(output, "*No runs recorded.*\n");
            return;
        }
        for (index, run) in machine.history.iter().enumerate() {
            Self::write_run(output, index + 1, run);
        }
    }

    fn write_run(output: &mut String, number: usize, run: &Run) {
        let _ = writeln!(output, "#### Run {number}\n");
        let _ = writeln!(output, "- Input: {}", run.input);
        for step in run.steps.iter().filter(|s| s.operation != START_STEP) {
            let _ = writeln!(
                output,
                "- {}: {}",
                escape_markdown(&step.operation),
                step.value
            );
        }
        let _ = writeln!(output, "- Output: {}\n", run.result);
    }

    /// Writes the place-value columns, highest tier first.
    fn write_blocks(output: &mut String, blocks: &BlocksSection) {
        let _ = writeln!(output, "## Place Value Blocks\n");

        let headings: Vec<_> = blocks.columns.iter().map(|c| c.tier.label()).collect();
        let _ = writeln!(output, "| {} |", headings.join(" | "));
        let rule: Vec<_> = headings.iter().map(|h| "-".repeat(h.len())).collect();
        let _ = writeln!(output, "|-{}-|", rule.join("-|-"));
        let counts: Vec<_> = blocks.columns.iter().map(|c| c.blocks.to_string()).collect();
        let _ = writeln!(output, "| {} |\n", counts.join(" | "));

        let _ = writeln!(
            output,
            "**Total**: {} (target {})\n",
            blocks.total, blocks.target
        );
        let _ = writeln!(output, "> {}\n", blocks.comparison.feedback());
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---");
        let timestamp = format_timestamp(&self.report.generated_at);
        let _ = writeln!(output, "*Generated by MathKit at {timestamp}*");
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes characters that would break Markdown formatting or table cells.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }
    result
}
