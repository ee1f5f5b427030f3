//! FILENAME: core/pivot-engine/src/aggregate.rs
//! Grouping keys and aggregate accumulators.
//!
//! - `AxisValue`: hashable, ordered form of a key cell
//! - `GroupKey`: the tuple of key cells for one axis
//! - `AggregateAccumulator`: running state for every supported aggregation

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use engine::{format_number, CellValue};

use crate::definition::AggregationType;

// ============================================================================
// KEY VALUES
// ============================================================================

/// Wrapper around f64 that implements Eq, Ord and Hash for use as map keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_nan(), other.0.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal),
        }
    }
}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 compare equal, so they must hash equal
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

/// A normalized key cell. Numbers sort before text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisValue {
    Number(OrderedFloat),
    Text(String),
}

impl AxisValue {
    /// Converts a cell into a key. Empty cells have no key and are skipped.
    pub fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(AxisValue::Number(OrderedFloat(*n))),
            CellValue::Text(s) => Some(AxisValue::Text(s.clone())),
        }
    }

    pub fn label(&self) -> String {
        match self {
            AxisValue::Number(n) => format_number(n.0),
            AxisValue::Text(s) => s.clone(),
        }
    }
}

/// The key values of one axis, outer level first.
pub type GroupKey = SmallVec<[AxisValue; 4]>;

// ============================================================================
// ACCUMULATOR
// ============================================================================

/// Accumulator for computing aggregates incrementally.
/// Stores the intermediate state needed for all aggregation types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator {
            sum: 0.0,
            count: 0,
            min: None,
            max: None,
        }
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Adds a present but non-numeric value (only increments count).
    pub fn add_non_number(&mut self) {
        self.count += 1;
    }

    /// Computes the final aggregate value. Groups without values yield 0.
    pub fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Count => self.count as f64,
            AggregationType::Sum => self.sum,
            AggregationType::Mean => {
                if self.count > 0 {
                    self.sum / (self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
        }
    }

    pub fn merge(&mut self, other: &AggregateAccumulator) {
        if other.count == 0 {
            return;
        }
        self.sum += other.sum;
        self.count += other.count;
        if let Some(other_min) = other.min {
            self.min = Some(self.min.map_or(other_min, |m| m.min(other_min)));
        }
        if let Some(other_max) = other.max {
            self.max = Some(self.max.map_or(other_max, |m| m.max(other_max)));
        }
    }
}
