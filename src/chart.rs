// Line-chart figure for the dashboard
// Serializes to the {data, layout} JSON that plotly.js renders in the browser

use crate::counts::{LeadCategory, YearlyLeadCounts, YEAR_COLUMN};
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LEAD_COUNTS_TITLE: &str = "Number of Female, Male, and Custom Leads Over Time";

// plotly_dark palette
const DARK_PAPER: &str = "rgb(17,17,17)";
const DARK_PLOT: &str = "rgb(17,17,17)";
const DARK_FONT: &str = "#f2f5fa";
const DARK_GRID: &str = "#283442";

/// What to plot and how: column names, colors, labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub x_column: String,
    pub y_columns: Vec<String>,
    pub color_map: BTreeMap<String, String>,
    pub x_label: String,
    pub y_label: String,
}

impl ChartSpec {
    /// Female red, male blue, custom green
    pub fn lead_counts() -> Self {
        let colors = [
            (LeadCategory::Female, "red"),
            (LeadCategory::Male, "blue"),
            (LeadCategory::Custom, "green"),
        ];

        ChartSpec {
            title: LEAD_COUNTS_TITLE.to_string(),
            x_column: YEAR_COLUMN.to_string(),
            y_columns: colors.iter().map(|(c, _)| c.column_name().to_string()).collect(),
            color_map: colors
                .iter()
                .map(|(c, color)| (c.column_name().to_string(), color.to_string()))
                .collect(),
            x_label: "Year".to_string(),
            y_label: "Count".to_string(),
        }
    }
}

// ============================================================================
// FIGURE (plotly.js schema subset)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub name: String,
    pub x: Vec<i32>,
    pub y: Vec<u64>,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    fn new(text: &str) -> Self {
        Text { text: text.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[u64; 2]>,
    pub gridcolor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Text,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: Font,
}

impl Figure {
    /// Build a line chart with one trace per y-column.
    ///
    /// The y-axis spans [0, max + 1] where max is taken over every plotted
    /// series; the x-axis ticks every year.
    pub fn line(table: &YearlyLeadCounts, spec: &ChartSpec) -> Result<Self> {
        let schema_err = |column: &str| {
            let mut available = vec![YEAR_COLUMN.to_string()];
            available.extend(LeadCategory::ALL.iter().map(|c| c.column_name().to_string()));
            PipelineError::schema("yearly_lead_counts", column, &available)
        };

        if spec.x_column != YEAR_COLUMN {
            return Err(schema_err(spec.x_column.as_str()));
        }

        let years = table.years();
        let mut data = Vec::with_capacity(spec.y_columns.len());
        let mut max = 0;

        for column in &spec.y_columns {
            let values = table.series(column).ok_or_else(|| schema_err(column.as_str()))?;
            max = values.iter().copied().fold(max, u64::max);

            let color = spec
                .color_map
                .get(column)
                .cloned()
                .unwrap_or_else(|| DARK_FONT.to_string());

            data.push(Trace {
                kind: "scatter".to_string(),
                mode: "lines".to_string(),
                name: column.clone(),
                x: years.clone(),
                y: values,
                line: LineStyle { color },
            });
        }

        let layout = Layout {
            title: Text::new(&spec.title),
            xaxis: Axis {
                title: Text::new(&spec.x_label),
                tickmode: Some("linear".to_string()),
                dtick: Some(1),
                range: None,
                gridcolor: DARK_GRID.to_string(),
            },
            yaxis: Axis {
                title: Text::new(&spec.y_label),
                tickmode: None,
                dtick: None,
                range: Some([0, max + 1]),
                gridcolor: DARK_GRID.to_string(),
            },
            legend: Legend {
                title: Text::new("variable"),
            },
            paper_bgcolor: DARK_PAPER.to_string(),
            plot_bgcolor: DARK_PLOT.to_string(),
            font: Font {
                color: DARK_FONT.to_string(),
            },
        };

        Ok(Figure { data, layout })
    }

    /// Upper bound of the y-axis
    pub fn y_max(&self) -> u64 {
        self.layout.yaxis.range.map(|[_, hi]| hi).unwrap_or(0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
