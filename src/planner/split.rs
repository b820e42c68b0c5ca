//! Train / validation / test row-range planning.
//!
//! Ranges are 1-indexed and inclusive. Boundaries are signed so that edits
//! pushing a boundary outside `[1, N]` stay representable and are reported by
//! [`SplitPlan::is_valid_for`] instead of being clamped.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const FRACTION_SUM_TOLERANCE: f64 = 1e-6;
/// Fractions are snapped to parts per billion before flooring, so float drift
/// such as `0.7 + 0.1 == 0.7999999999999999` never moves a boundary.
const FRACTION_SCALE: i128 = 1_000_000_000;

/// Rejected split fractions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error(
        "Split fractions must be non-negative and sum to 1 (got {train}/{validation}/{test})"
    )]
    InvalidFractions {
        train: f64,
        validation: f64,
        test: f64,
    },
    #[error("Unknown split preset {0:?}; expected 6:2:2, 7:1:2 or 8:1:1")]
    UnknownPreset(String),
}

/// Validated train/validation/test fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitFractions {
    train: f64,
    validation: f64,
    test: f64,
}

impl SplitFractions {
    /// Accept finite, non-negative fractions summing to 1 (within 1e-6).
    pub fn new(train: f64, validation: f64, test: f64) -> Result<Self, SplitError> {
        let parts = [train, validation, test];
        let well_formed = parts.iter().all(|part| part.is_finite() && *part >= 0.0)
            && (parts.iter().sum::<f64>() - 1.0).abs() <= FRACTION_SUM_TOLERANCE;
        if !well_formed {
            return Err(SplitError::InvalidFractions {
                train,
                validation,
                test,
            });
        }
        Ok(Self {
            train,
            validation,
            test,
        })
    }

    pub fn train(&self) -> f64 {
        self.train
    }

    pub fn validation(&self) -> f64 {
        self.validation
    }

    pub fn test(&self) -> f64 {
        self.test
    }
}

/// Named presets offered next to the range editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitPreset {
    #[default]
    #[serde(rename = "6:2:2")]
    SixTwoTwo,
    #[serde(rename = "7:1:2")]
    SevenOneTwo,
    #[serde(rename = "8:1:1")]
    EightOneOne,
}

impl SplitPreset {
    pub const ALL: [SplitPreset; 3] = [Self::SixTwoTwo, Self::SevenOneTwo, Self::EightOneOne];

    pub fn fractions(self) -> SplitFractions {
        let (train, validation, test) = match self {
            Self::SixTwoTwo => (0.6, 0.2, 0.2),
            Self::SevenOneTwo => (0.7, 0.1, 0.2),
            Self::EightOneOne => (0.8, 0.1, 0.1),
        };
        SplitFractions {
            train,
            validation,
            test,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SixTwoTwo => "6:2:2",
            Self::SevenOneTwo => "7:1:2",
            Self::EightOneOne => "8:1:1",
        }
    }
}

impl fmt::Display for SplitPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SplitPreset {
    type Err = SplitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label() == value.trim())
            .ok_or_else(|| SplitError::UnknownPreset(value.to_string()))
    }
}

/// Editable split boundaries. `trainStart` and `testEnd` are pinned to `1` and `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitBoundary {
    TrainEnd,
    ValStart,
    ValEnd,
    TestStart,
}

/// Three contiguous row ranges over a dataset of `N` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPlan {
    train_start: i64,
    train_end: i64,
    val_start: i64,
    val_end: i64,
    test_start: i64,
    test_end: i64,
}

impl SplitPlan {
    /// Floor-round `fractions` against `row_count`; the test range takes the remainder.
    pub fn from_fractions(row_count: usize, fractions: SplitFractions) -> Self {
        let train_end = floor_rows(row_count, fractions.train);
        let val_end = floor_rows(row_count, fractions.train + fractions.validation);
        Self {
            train_start: 1,
            train_end,
            val_start: train_end + 1,
            val_end,
            test_start: val_end + 1,
            test_end: row_count as i64,
        }
    }

    pub fn from_preset(row_count: usize, preset: SplitPreset) -> Self {
        Self::from_fractions(row_count, preset.fractions())
    }

    /// Move one boundary and its neighbour (`value ± 1`). Nothing else moves.
    pub fn set_boundary(&mut self, boundary: SplitBoundary, value: i64) {
        match boundary {
            SplitBoundary::TrainEnd => {
                self.train_end = value;
                self.val_start = value + 1;
            }
            SplitBoundary::ValStart => {
                self.val_start = value;
                self.train_end = value - 1;
            }
            SplitBoundary::ValEnd => {
                self.val_end = value;
                self.test_start = value + 1;
            }
            SplitBoundary::TestStart => {
                self.test_start = value;
                self.val_end = value - 1;
            }
        }
    }

    /// True when the three ranges tile `[1, row_count]` with the validation
    /// range non-empty and the train range starting at row 1.
    pub fn is_valid_for(&self, row_count: usize) -> bool {
        let n = row_count as i64;
        self.train_start == 1
            && self.train_end >= 1
            && self.val_start == self.train_end + 1
            && self.train_end < self.val_end
            && self.test_start == self.val_end + 1
            && self.val_end <= n
            && self.test_end == n
    }

    pub fn boundary(&self, boundary: SplitBoundary) -> i64 {
        match boundary {
            SplitBoundary::TrainEnd => self.train_end,
            SplitBoundary::ValStart => self.val_start,
            SplitBoundary::ValEnd => self.val_end,
            SplitBoundary::TestStart => self.test_start,
        }
    }

    pub fn train(&self) -> RangeInclusive<i64> {
        self.train_start..=self.train_end
    }

    pub fn validation(&self) -> RangeInclusive<i64> {
        self.val_start..=self.val_end
    }

    pub fn test(&self) -> RangeInclusive<i64> {
        self.test_start..=self.test_end
    }

    /// Total rows covered by the three ranges; equals `N` for a valid plan.
    pub fn covered_rows(&self) -> i64 {
        [self.train(), self.validation(), self.test()]
            .iter()
            .map(|range| (range.end() - range.start() + 1).max(0))
            .sum()
    }

    /// Slice `rows` into train / validation / test when the plan is valid for them.
    pub fn partition<'a, T>(&self, rows: &'a [T]) -> Option<Partition<'a, T>> {
        if !self.is_valid_for(rows.len()) {
            return None;
        }
        let train_end = usize::try_from(self.train_end).ok()?;
        let val_end = usize::try_from(self.val_end).ok()?;
        Some(Partition {
            train: &rows[..train_end],
            validation: &rows[train_end..val_end],
            test: &rows[val_end..],
        })
    }
}

fn floor_rows(row_count: usize, fraction: f64) -> i64 {
    let parts = (fraction * FRACTION_SCALE as f64).round() as i128;
    (row_count as i128 * parts / FRACTION_SCALE) as i64
}

/// Borrowed row subsets produced by [`SplitPlan::partition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition<'a, T> {
    pub train: &'a [T],
    pub validation: &'a [T],
    pub test: &'a [T],
}
