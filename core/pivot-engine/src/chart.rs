//! FILENAME: core/pivot-engine/src/chart.rs
//! Chart Adapter - reshapes a pivot result into long-form series.
//!
//! Margins are dropped, multi-level column labels are flattened with " - ",
//! and every (row, column) cell becomes one (category, series, value) point.

use serde::{Deserialize, Serialize};

use crate::view::{PivotResult, LABEL_SEPARATOR};

/// Name of the series column in long form.
pub const SERIES_AXIS_NAME: &str = "Kategori";

/// Name of the value column in long form.
pub const VALUE_AXIS_NAME: &str = "Jumlah";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub category: String,
    pub series: String,
    pub value: f64,
}

/// Long-form chart data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    /// Name of the category axis (the row fields).
    pub category_name: String,
    /// Series in display order. A single entry when there were no column keys.
    pub series_names: Vec<String>,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_single_series(&self) -> bool {
        self.series_names.len() == 1
    }

    /// Points of one series, in category order.
    pub fn series<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ChartPoint> + 'a {
        self.points.iter().filter(move |p| p.series == name)
    }
}

/// Converts a pivot result into long-form chart data.
/// Returns empty data when the result has no rows besides the margin.
pub fn to_chart_series(result: &PivotResult) -> ChartData {
    if result.data_row_count() == 0 {
        return ChartData::default();
    }

    let series: Vec<(usize, String)> = result
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_grand_total)
        .map(|(i, c)| (i, c.joined(LABEL_SEPARATOR).trim().to_string()))
        .collect();

    let mut points = Vec::with_capacity(result.data_row_count() * series.len());
    for (row, label) in result.rows.iter().enumerate() {
        if label.is_grand_total {
            continue;
        }
        let category = label.joined(LABEL_SEPARATOR);
        for (col, name) in &series {
            points.push(ChartPoint {
                category: category.clone(),
                series: name.clone(),
                value: result.values[row][*col],
            });
        }
    }

    ChartData {
        category_name: result.row_fields.join(LABEL_SEPARATOR),
        series_names: series.into_iter().map(|(_, name)| name).collect(),
        points,
    }
}

// ============================================================================
// CHART PLANNING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::Bar
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            other => Err(format!("Unknown chart type: {}", other)),
        }
    }
}

/// What a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPlan {
    pub kind: ChartKind,
    /// Category axis (x for bar/line, slice names for pie).
    pub x_axis: String,
    /// Value axis.
    pub y_axis: String,
    /// Whether points are coloured/grouped by series.
    pub grouped: bool,
    /// Legend title for the series when grouped.
    pub series_axis: Option<String>,
    pub data: ChartData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartWarning {
    /// Nothing left to plot once margins are removed.
    NoData,
    /// Pie charts take exactly one series.
    PieNeedsSingleSeries { series: usize },
}

impl std::fmt::Display for ChartWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartWarning::NoData => write!(f, "Not enough data to draw a chart"),
            ChartWarning::PieNeedsSingleSeries { series } => {
                write!(f, "Pie charts need a single value column (got {})", series)
            }
        }
    }
}

/// Decides how `data` is drawn as `kind`.
pub fn plan_chart(kind: ChartKind, data: ChartData) -> Result<ChartPlan, ChartWarning> {
    if data.is_empty() {
        return Err(ChartWarning::NoData);
    }

    let single = data.is_single_series();
    if kind == ChartKind::Pie && !single {
        return Err(ChartWarning::PieNeedsSingleSeries {
            series: data.series_names.len(),
        });
    }

    let y_axis = if single {
        data.series_names[0].clone()
    } else {
        VALUE_AXIS_NAME.to_string()
    };

    Ok(ChartPlan {
        kind,
        x_axis: data.category_name.clone(),
        y_axis,
        grouped: !single,
        series_axis: (!single).then(|| SERIES_AXIS_NAME.to_string()),
        data,
    })
}
