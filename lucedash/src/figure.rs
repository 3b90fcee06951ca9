//! Figure handed to the charting front end (Plotly.js on the page). Built from a
//! derived view plus the theme's chart template.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::projector::DerivedView;
use crate::theme::ThemeContext;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: FigureConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub x: Vec<String>,
    /// NaN readings serialise as null and show up as gaps.
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub hovermode: &'static str,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
    pub gridcolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureConfig {
    pub scroll_zoom: bool,
}

impl Figure {
    pub fn from_view(view: &DerivedView, ctx: &ThemeContext) -> Self {
        let chart = &ctx.chart;
        let axis = |name: &str| Axis {
            title: Title { text: name.into() },
            gridcolor: chart.grid_color,
        };
        Figure {
            data: vec![Trace {
                x: view
                    .series
                    .iter()
                    .map(|p| p.x.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                    .collect(),
                y: view.series.iter().map(|p| p.y).collect(),
                kind: "scatter",
                mode: "lines+markers",
                name: view.column.to_owned(),
                line: LineStyle {
                    color: view.trace_color.as_str(),
                },
            }],
            layout: Layout {
                title: Title {
                    text: view.title.clone(),
                },
                xaxis: axis("Timestamp"),
                yaxis: axis("Value"),
                hovermode: "x unified",
                paper_bgcolor: chart.paper_bgcolor,
                plot_bgcolor: chart.plot_bgcolor,
                font: Font {
                    color: chart.font_color,
                },
            },
            config: FigureConfig { scroll_zoom: true },
        }
    }

    /// JSON safe to embed inside a `<script>` element.
    pub fn to_script_json(&self) -> serde_json::Result<String> {
        Ok(serde_json::to_string(self)?
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"))
    }
}
