//! Place-value engine behind the base-ten block widget.
//!
//! A [`Workspace`] counts unit blocks in four tiers. Counters may exceed 9
//! while the learner adds blocks; [`regroup`] carries the overflow upward so
//! each tier below thousands ends up in `0..=9`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MathKitError;

/// Target number a fresh workspace asks the learner to build.
pub const DEFAULT_TARGET: u64 = 402;

/// Units a tier holds before regrouping carries into the next tier.
const BASE: u32 = 10;

// ============================================================================
// Tier
// ============================================================================

/// One of the four place-value magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Units of 1.
    Ones,
    /// Units of 10.
    Tens,
    /// Units of 100.
    Hundreds,
    /// Units of 1000. The top tier; absorbs any overflow.
    Thousands,
}

impl Tier {
    /// All tiers in ascending order, the order regrouping walks them.
    pub const ALL: [Self; 4] = [Self::Ones, Self::Tens, Self::Hundreds, Self::Thousands];

    /// Numeric weight of one block in this tier.
    #[must_use]
    pub const fn weight(self) -> u64 {
        match self {
            Self::Ones => 1,
            Self::Tens => 10,
            Self::Hundreds => 100,
            Self::Thousands => 1000,
        }
    }

    /// Column heading for this tier.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ones => "Ones",
            Self::Tens => "Tens",
            Self::Hundreds => "Hundreds",
            Self::Thousands => "Thousands",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ones => write!(f, "ones"),
            Self::Tens => write!(f, "tens"),
            Self::Hundreds => write!(f, "hundreds"),
            Self::Thousands => write!(f, "thousands"),
        }
    }
}

impl FromStr for Tier {
    type Err = MathKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ones" => Ok(Self::Ones),
            "tens" => Ok(Self::Tens),
            "hundreds" => Ok(Self::Hundreds),
            "thousands" => Ok(Self::Thousands),
            _ => Err(MathKitError::invalid_tier(s)),
        }
    }
}

// ============================================================================
// TargetComparison
// ============================================================================

/// How the built number relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetComparison {
    /// Total is less than the target.
    Below,
    /// Total equals the target.
    Exact,
    /// Total is greater than the target.
    Above,
}

impl TargetComparison {
    /// Message shown under the blocks for this outcome.
    #[must_use]
    pub const fn feedback(self) -> &'static str {
        match self {
            Self::Below => "Keep going! Add more blocks to reach the target.",
            Self::Exact => "Perfect! You've built the target number!",
            Self::Above => "Too high! Try removing some blocks.",
        }
    }
}

/// Compares a total against a target.
#[must_use]
pub fn compare_to_target(total: u64, target: u64) -> TargetComparison {
    match total.cmp(&target) {
        Ordering::Less => TargetComparison::Below,
        Ordering::Equal => TargetComparison::Exact,
        Ordering::Greater => TargetComparison::Above,
    }
}

// ============================================================================
// Workspace
// ============================================================================

/// Block counts for each tier plus the fixed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Blocks in the ones column.
    pub ones: u32,
    /// Blocks in the tens column.
    pub tens: u32,
    /// Blocks in the hundreds column.
    pub hundreds: u32,
    /// Blocks in the thousands column.
    pub thousands: u32,
    target: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

impl Workspace {
    /// Creates an empty workspace with a fixed target.
    #[must_use]
    pub const fn new(target: u64) -> Self {
        Self {
            ones: 0,
            tens: 0,
            hundreds: 0,
            thousands: 0,
            target,
        }
    }

    /// Creates a workspace with explicit counts.
    #[must_use]
    pub const fn with_counts(
        target: u64,
        ones: u32,
        tens: u32,
        hundreds: u32,
        thousands: u32,
    ) -> Self {
        Self {
            ones,
            tens,
            hundreds,
            thousands,
            target,
        }
    }

    /// The number the learner is asked to build.
    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// Block count in `tier`.
    #[must_use]
    pub const fn count(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Ones => self.ones,
            Tier::Tens => self.tens,
            Tier::Hundreds => self.hundreds,
            Tier::Thousands => self.thousands,
        }
    }

    fn set_count(&mut self, tier: Tier, count: u32) {
        match tier {
            Tier::Ones => self.ones = count,
            Tier::Tens => self.tens = count,
            Tier::Hundreds => self.hundreds = count,
            Tier::Thousands => self.thousands = count,
        }
    }

    /// Returns the workspace with one more block in `tier`.
    #[must_use]
    pub fn add_block(self, tier: Tier) -> Self {
        add_block(&self, tier)
    }

    /// Returns the workspace with one fewer block in `tier`, if there is one.
    #[must_use]
    pub fn remove_block(self, tier: Tier) -> Self {
        remove_block(&self, tier)
    }

    /// Returns the regrouped workspace.
    #[must_use]
    pub fn regroup(self) -> Self {
        regroup(&self)
    }

    /// Number represented by the blocks.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        total_value(self)
    }

    /// Compares the current total against the target.
    #[must_use]
    pub fn comparison(&self) -> TargetComparison {
        compare_to_target(self.total_value(), self.target)
    }

    /// Returns `true` if every tier below the top holds at most 9 blocks.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        Tier::ALL[..3].iter().all(|&tier| self.count(tier) < BASE)
    }
}

/// Adds one block to `tier`. No upper bound is enforced.
#[must_use]
pub fn add_block(workspace: &Workspace, tier: Tier) -> Workspace {
    let mut next = *workspace;
    next.set_count(tier, workspace.count(tier).saturating_add(1));
    next
}

/// Removes one block from `tier`; a no-op when the tier is already empty.
#[must_use]
pub fn remove_block(workspace: &Workspace, tier: Tier) -> Workspace {
    let mut next = *workspace;
    if let Some(count) = workspace.count(tier).checked_sub(1) {
        next.set_count(tier, count);
    }
    next
}

/// Carries overflow upward in a single ascending pass.
///
/// Each tier's carry is computed from its count after the tier below has
/// carried into it, so one pass is enough to normalize every tier below
/// thousands. A carry that would overflow the upper counter is cut down to
/// what fits and the rest stays in the lower tier, so the total never
/// changes.
///
/// # Examples
///
/// ```
/// use mathkit_core::{regroup, Workspace};
///
/// let before = Workspace::with_counts(402, 23, 0, 0, 0);
/// let after = regroup(&before);
/// assert_eq!((after.ones, after.tens), (3, 2));
/// assert_eq!(after.total_value(), before.total_value());
/// ```
#[must_use]
pub fn regroup(workspace: &Workspace) -> Workspace {
    let mut next = *workspace;
    for pair in Tier::ALL.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let count = next.count(lower);
        let room = u32::MAX - next.count(upper);
        let carry = (count / BASE).min(room);
        if carry > 0 {
            next.set_count(upper, next.count(upper) + carry);
            next.set_count(lower, count - carry * BASE);
            debug!(from = %lower, to = %upper, carry, "Regrouped blocks");
        }
    }
    next
}

/// Number represented by the workspace's blocks.
#[must_use]
pub fn total_value(workspace: &Workspace) -> u64 {
    Tier::ALL
        .iter()
        .map(|&tier| u64::from(workspace.count(tier)) * tier.weight())
        .sum()
}

// ============================================================================
// Tests
// ============================================================================
