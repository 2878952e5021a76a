//! MathKit Report Generation
//!
//! This crate turns engine state into a [`SessionReport`]: a snapshot of a
//! function machine (pipeline and history log) and of a place-value
//! workspace. Reports can be serialized to JSON for programmatic access or
//! rendered to Markdown for reading.
//!
//! # Example
//!
//! ```rust
//! use mathkit_core::{Catalog, Machine, Tier, Workspace};
//! use mathkit_report::{MarkdownGenerator, SessionReport};
//!
//! let catalog = Catalog::standard();
//! let machine = Machine::default().add_operation("double").run_and_record(&catalog);
//! let workspace = Workspace::default().add_block(Tier::Hundreds);
//!
//! let report = SessionReport::builder()
//!     .title("practice")
//!     .machine(&machine, &catalog)
//!     .blocks(&workspace)
//!     .build();
//!
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("## Function Machine"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use mathkit_core::{Catalog, Machine, Run, TargetComparison, Tier, Workspace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used for pipeline slots the catalog does not know.
pub const UNKNOWN_PART: &str = "Unknown";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Sections
// ============================================================================

/// Snapshot of a function machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSection {
    /// Display names of the pipeline slots, in order.
    pub parts: Vec<String>,
    /// Current input value.
    pub input: f64,
    /// Current output, absent while the pipeline is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
    /// Completed runs, oldest first.
    pub history: Vec<Run>,
}

impl MachineSection {
    /// Captures `machine`, naming its parts through `catalog`.
    #[must_use]
    pub fn capture(machine: &Machine, catalog: &Catalog) -> Self {
        Self {
            parts: machine
                .pipeline
                .iter()
                .map(|id| {
                    catalog
                        .get(id)
                        .map_or_else(|| UNKNOWN_PART.to_string(), |op| op.name.clone())
                })
                .collect(),
            input: machine.input,
            output: machine.preview(catalog),
            history: machine.history.clone(),
        }
    }
}

/// Block count for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    /// The tier.
    pub tier: Tier,
    /// Blocks in it.
    pub blocks: u32,
}

/// Snapshot of a place-value workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksSection {
    /// Counts from thousands down to ones, the order the columns are drawn.
    pub columns: Vec<TierCount>,
    /// Number the blocks represent.
    pub total: u64,
    /// Number the learner was asked to build.
    pub target: u64,
    /// How `total` relates to `target`.
    pub comparison: TargetComparison,
}

impl BlocksSection {
    /// Captures `workspace`.
    #[must_use]
    pub fn capture(workspace: &Workspace) -> Self {
        Self {
            columns: Tier::ALL
                .iter()
                .rev()
                .map(|&tier| TierCount {
                    tier,
                    blocks: workspace.count(tier),
                })
                .collect(),
            total: workspace.total_value(),
            target: workspace.target(),
            comparison: workspace.comparison(),
        }
    }
}

// ============================================================================
// SessionReport
// ============================================================================

/// A rendered-agnostic snapshot of one learning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session title.
    pub title: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Function machine section, if the session used one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineSection>,
    /// Place-value section, if the session used one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlocksSection>,
}

impl SessionReport {
    /// Creates a new report builder.
    #[must_use]
    pub fn builder() -> SessionReportBuilder {
        SessionReportBuilder::default()
    }

    /// Number of recorded machine runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.machine.as_ref().map_or(0, |m| m.history.len())
    }

    /// Returns `true` if the workspace matches its target.
    #[must_use]
    pub fn target_reached(&self) -> bool {
        self.blocks
            .as_ref()
            .is_some_and(|b| b.comparison == TargetComparison::Exact)
    }
}

// ============================================================================
// SessionReportBuilder
// ============================================================================

/// Builder for constructing [`SessionReport`] instances.
#[derive(Debug, Clone, Default)]
pub struct SessionReportBuilder {
    title: Option<String>,
    generated_at: Option<DateTime<Utc>>,
    machine: Option<MachineSection>,
    blocks: Option<BlocksSection>,
}

impl SessionReportBuilder {
    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the generation timestamp.
    #[must_use]
    pub const fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Adds a function machine section.
    #[must_use]
    pub fn machine(mut self, machine: &Machine, catalog: &Catalog) -> Self {
        self.machine = Some(MachineSection::capture(machine, catalog));
        self
    }

    /// Adds a place-value section.
    #[must_use]
    pub fn blocks(mut self, workspace: &Workspace) -> Self {
        self.blocks = Some(BlocksSection::capture(workspace));
        self
    }

    /// Builds the report.
    #[must_use]
    pub fn build(self) -> SessionReport {
        SessionReport {
            title: self.title.unwrap_or_else(|| "session".to_string()),
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            machine: self.machine,
            blocks: self.blocks,
        }
    }
}
