//! Light/dark theme, the style tokens each theme switches atomically, and the
//! mapping between the theme and the `theme` query parameter of the page URL.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::form_urlencoded;

use crate::error::DashError;

pub const THEME_PARAM: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }

    pub fn context(self) -> ThemeContext {
        match self {
            Theme::Light => ThemeContext {
                theme: self,
                background: "#ffffff",
                text: "#000000",
                chart: ChartTemplate::PLOTLY,
            },
            Theme::Dark => ThemeContext {
                theme: self,
                background: "#121212",
                text: "#ffffff",
                chart: ChartTemplate::PLOTLY_DARK,
            },
        }
    }
}

impl FromStr for Theme {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DashError::invalid_selection(THEME_PARAM, s))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colours the chart is drawn with. Switched together with the page colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartTemplate {
    pub name: &'static str,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font_color: &'static str,
    pub grid_color: &'static str,
}

impl ChartTemplate {
    pub const PLOTLY: ChartTemplate = ChartTemplate {
        name: "plotly",
        paper_bgcolor: "#ffffff",
        plot_bgcolor: "#e5ecf6",
        font_color: "#2a3f5f",
        grid_color: "#ffffff",
    };

    pub const PLOTLY_DARK: ChartTemplate = ChartTemplate {
        name: "plotly_dark",
        paper_bgcolor: "#111111",
        plot_bgcolor: "#111111",
        font_color: "#f2f5fa",
        grid_color: "#283442",
    };
}

/// Style tokens for one theme, threaded into the page and chart renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeContext {
    pub theme: Theme,
    pub background: &'static str,
    pub text: &'static str,
    pub chart: ChartTemplate,
}

/// Initial-state recovery: the first `theme` parameter if it names a theme, else light.
/// Unknown parameters and malformed values are ignored.
pub fn theme_from_query(query: Option<&str>) -> Theme {
    let Some(q) = query else {
        return Theme::default();
    };
    form_urlencoded::parse(q.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == THEME_PARAM)
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or_default()
}

/// Set `theme` in a query string. Every other segment is copied byte-for-byte and keeps
/// its position; only keys are decoded, to spot `theme`. The first `theme` is replaced
/// where it stood and later ones are dropped; with none present it is appended.
pub fn rewrite_query(query: Option<&str>, theme: Theme) -> String {
    let raw = query.map(|q| q.trim_start_matches('?')).unwrap_or_default();
    let own = format!("{THEME_PARAM}={}", theme.as_str());

    let mut segments: Vec<&str> = Vec::new();
    let mut placed = false;
    for segment in raw.split('&').filter(|s| !s.is_empty()) {
        if is_theme_segment(segment) {
            if !placed {
                segments.push(&own);
                placed = true;
            }
            continue;
        }
        segments.push(segment);
    }
    if !placed {
        segments.push(&own);
    }
    segments.join("&")
}

fn is_theme_segment(segment: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .is_some_and(|(k, _)| k == THEME_PARAM)
}
