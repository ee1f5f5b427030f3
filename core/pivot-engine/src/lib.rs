//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot subsystem for the dashboard.
//!
//! This crate turns a loaded `DataTable` into a cross-tabulation with
//! "Grand Total" margins. It depends on `engine` only for the table model.
//!
//! Layers:
//! - `definition`: Configuration (what the pivot IS)
//! - `aggregate`: Group keys and accumulators (HOW we group)
//! - `engine`: Calculation engine (HOW we calculate)
//! - `ordering`: Axis ordering by dates and month names
//! - `view`: The computed grid (WHAT we display)
//! - `chart`: Long-form reshaping for charts

pub mod aggregate;
pub mod chart;
pub mod definition;
pub mod engine;
pub mod error;
pub mod ordering;
pub mod view;

pub use aggregate::{AggregateAccumulator, AxisValue, GroupKey, OrderedFloat};
pub use chart::{plan_chart, to_chart_series, ChartData, ChartKind, ChartPlan, ChartPoint, ChartWarning};
pub use definition::{AggregationType, PivotSpec, GRAND_TOTAL};
pub use self::engine::{compute, PivotCalculator};
pub use error::PivotError;
pub use ordering::{detect_ordering, ordering_permutation, parse_date_label, AxisOrdering};
pub use view::{AxisLabel, PivotResult, LABEL_SEPARATOR};
