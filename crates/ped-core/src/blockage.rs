//! Time-windowed partial blockages of cells.
//!
//! A [`Blockage`] reduces the capacity of one named cell during an interval
//! window.  The [`BlockageRegistry`] holds at most one blockage per cell; a
//! second insert for the same cell replaces the first.
//!
//! # Activity rule
//!
//! Two rules are supported through [`BlockageWindow`]:
//!
//! | Variant     | Active when                            |
//! |-------------|----------------------------------------|
//! | `Inclusive` | `start_time <= t && t <= end_time`     |
//! | `Legacy`    | `start_time >= t && t <= end_time`     |
//!
//! `Legacy` reproduces the rule used by earlier model runs, which switches a
//! blockage on *before* its window opens.  It exists for regression
//! comparisons only.

use rustc_hash::FxHashMap;

use crate::{CoreError, CoreResult};

// ── BlockageWindow ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockageWindow {
    /// Active for `start_time <= t <= end_time`.
    #[default]
    Inclusive,
    /// Active for `start_time >= t && t <= end_time`.
    Legacy,
}

// ── Blockage ──────────────────────────────────────────────────────────────────

/// A partial obstruction of `cell` between two time intervals.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blockage {
    cell:             String,
    start_time:       i32,
    end_time:         i32,
    blockage_percent: f64,
}

impl Blockage {
    /// Create a blockage.  `blockage_percent` must be finite and not
    /// negative.
    ///
    /// Percents above 100 and reversed windows are accepted as recorded.  A
    /// reversed window is never active under `Inclusive`; under `Legacy` it is
    /// active whenever `t <= end_time`.
    pub fn new(
        cell:             impl Into<String>,
        start_time:       i32,
        end_time:         i32,
        blockage_percent: f64,
    ) -> CoreResult<Self> {
        let cell = cell.into();
        if !(blockage_percent.is_finite() && blockage_percent >= 0.0) {
            return Err(CoreError::InvalidBlockage {
                cell,
                reason: format!("percent {blockage_percent} must be finite and non-negative"),
            });
        }
        Ok(Self { cell, start_time, end_time, blockage_percent })
    }

    pub fn cell(&self) -> &str {
        &self.cell
    }

    pub fn start_time(&self) -> i32 {
        self.start_time
    }

    pub fn end_time(&self) -> i32 {
        self.end_time
    }

    pub fn blockage_percent(&self) -> f64 {
        self.blockage_percent
    }

    /// Whether the blockage applies at interval `t` under `window`.
    #[inline]
    pub fn is_active(&self, t: i32, window: BlockageWindow) -> bool {
        match window {
            BlockageWindow::Inclusive => self.start_time <= t && t <= self.end_time,
            BlockageWindow::Legacy => self.start_time >= t && t <= self.end_time,
        }
    }
}

// ── BlockageRegistry ──────────────────────────────────────────────────────────

/// Blockages keyed by cell name.
#[derive(Clone, Debug, Default)]
pub struct BlockageRegistry {
    by_cell: FxHashMap<String, Blockage>,
}

impl BlockageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blockage`, replacing any earlier one on the same cell.
    /// Returns the replaced blockage.
    pub fn insert(&mut self, blockage: Blockage) -> Option<Blockage> {
        let replaced = self.by_cell.insert(blockage.cell.clone(), blockage);
        if let Some(old) = &replaced {
            log::warn!(
                "blockage on cell {} [{}, {}] replaced by a later entry",
                old.cell, old.start_time, old.end_time
            );
        }
        replaced
    }

    pub fn get(&self, cell: &str) -> Option<&Blockage> {
        self.by_cell.get(cell)
    }

    /// Blockage percent of `cell` at interval `t`, or `None` if the cell has
    /// no blockage or it is inactive.
    pub fn active_percent(&self, cell: &str, t: i32, window: BlockageWindow) -> Option<f64> {
        self.by_cell
            .get(cell)
            .filter(|b| b.is_active(t, window))
            .map(|b| b.blockage_percent)
    }

    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }
}

impl FromIterator<Blockage> for BlockageRegistry {
    fn from_iter<I: IntoIterator<Item = Blockage>>(iter: I) -> Self {
        let mut registry = Self::new();
        for b in iter {
            registry.insert(b);
        }
        registry
    }
}
