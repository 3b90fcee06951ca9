//! Server-side HTML for the dashboard page. Only the active table's control group is
//! rendered; the other groups' values ride along as hidden fields so switching tables
//! keeps them.

use std::fmt::Write;

use lucedash::figure::Figure;
use lucedash::selection::{Column, CpuColumn, DiskColumn, MemoryColumn, Table};
use lucedash::session::{
    CPU_COLUMN_PARAM, DISK_COLUMN_PARAM, DISK_DEVICE_PARAM, MEMORY_COLUMN_PARAM, TABLE_PARAM,
};
use lucedash::theme::{Theme, ThemeContext};
use lucedash::visibility::ControlGroup;
use lucedash::Session;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";
const CHART_ID: &str = "data-visualization-graph";

pub fn render(session: &Session) -> serde_json::Result<String> {
    let view = session.view();
    let ctx = session.state().theme.context();
    let figure = Figure::from_view(&view, &ctx).to_script_json()?;

    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>SQLite Data Visualization</title>
<script src="{PLOTLY_JS}"></script>
<style>
  label {{ display: block; margin: 10px 0 5px; }}
  select {{ width: 50%; padding: 6px; color: #000000; }}
  .theme-toggle label {{ display: inline; margin: 0 10px 0 4px; }}
</style>
</head>
<body style="margin: 0;">
<div id="app-container" class="{theme}" style="background-color: {bg}; color: {fg}; min-height: 100vh; padding: 20px; margin: 0;">
<h1 style="text-align: center;">SQLite Data Visualization</h1>
"#,
        theme = ctx.theme.as_str(),
        bg = ctx.background,
        fg = ctx.text,
    );

    theme_toggle(&mut html, &ctx);

    html.push_str("<form id=\"selection\" method=\"get\" action=\"/\">\n");
    html.push_str("<label for=\"table-dropdown\">Select a table:</label>\n");
    let tables: Vec<(&str, &str)> = Table::ALL.iter().map(|t| (t.as_str(), t.label())).collect();
    select(
        &mut html,
        "table-dropdown",
        TABLE_PARAM,
        &tables,
        view.controls.table().as_str(),
    );

    let shown = control_group(&mut html, &view.controls);
    for (key, value) in session.query_pairs() {
        if key != TABLE_PARAM && !shown.contains(&key) {
            let _ = writeln!(
                html,
                r#"<input type="hidden" name="{key}" value="{}">"#,
                escape(&value)
            );
        }
    }
    html.push_str("</form>\n");

    let _ = write!(
        html,
        r#"<div id="{CHART_ID}" style="height: 70vh; margin-top: 20px;"></div>
</div>
<script>
  const fig = {figure};
  Plotly.newPlot("{CHART_ID}", fig.data, fig.layout, fig.config);
</script>
</body>
</html>
"#
    );
    Ok(html)
}

fn theme_toggle(html: &mut String, ctx: &ThemeContext) {
    html.push_str("<div class=\"theme-toggle\" style=\"text-align: center; margin-bottom: 20px;\">\n");
    html.push_str("<label style=\"display: inline;\">Select Theme:</label>\n");
    for t in Theme::ALL {
        let checked = if t == ctx.theme { " checked" } else { "" };
        let _ = writeln!(
            html,
            r#"<input type="radio" id="theme-{v}" name="theme-toggle" value="{v}"{checked} onchange="location.href='/theme/' + this.value + location.search"><label for="theme-{v}">{label}</label>"#,
            v = t.as_str(),
            label = t.label(),
        );
    }
    html.push_str("</div>\n");
}

/// Writes the one visible group and returns the parameter names it owns.
fn control_group(html: &mut String, controls: &ControlGroup) -> Vec<&'static str> {
    match controls {
        ControlGroup::Disk {
            column,
            device,
            devices,
        } => {
            html.push_str("<div id=\"disk-controls\">\n");
            html.push_str("<label for=\"disk-column-dropdown\">Select a column to visualize:</label>\n");
            select(
                html,
                "disk-column-dropdown",
                DISK_COLUMN_PARAM,
                &column_options::<DiskColumn>(),
                column.as_str(),
            );
            html.push_str("<label for=\"disk-device-dropdown\">Select a device (key):</label>\n");
            let options: Vec<(&str, &str)> =
                devices.iter().map(|d| (d.as_str(), d.as_str())).collect();
            select(
                html,
                "disk-device-dropdown",
                DISK_DEVICE_PARAM,
                &options,
                device.as_deref().unwrap_or_default(),
            );
            html.push_str("</div>\n");
            vec![DISK_COLUMN_PARAM, DISK_DEVICE_PARAM]
        }
        ControlGroup::Cpu { column } => {
            html.push_str("<div id=\"cpu-controls\">\n");
            html.push_str("<label for=\"cpu-column-dropdown\">CPU Usage (%):</label>\n");
            select(
                html,
                "cpu-column-dropdown",
                CPU_COLUMN_PARAM,
                &column_options::<CpuColumn>(),
                column.as_str(),
            );
            html.push_str("</div>\n");
            vec![CPU_COLUMN_PARAM]
        }
        ControlGroup::Memory { column } => {
            html.push_str("<div id=\"memory-controls\">\n");
            html.push_str("<label for=\"memory-column-dropdown\">Memory Usage:</label>\n");
            select(
                html,
                "memory-column-dropdown",
                MEMORY_COLUMN_PARAM,
                &column_options::<MemoryColumn>(),
                column.as_str(),
            );
            html.push_str("</div>\n");
            vec![MEMORY_COLUMN_PARAM]
        }
    }
}

fn column_options<C: Column>() -> Vec<(&'static str, &'static str)> {
    C::ALL.iter().map(|c| (c.as_str(), c.label())).collect()
}

fn select(html: &mut String, id: &str, name: &str, options: &[(&str, &str)], selected: &str) {
    let _ = writeln!(
        html,
        r#"<select id="{id}" name="{name}" onchange="this.form.submit()">"#
    );
    for (value, label) in options {
        let mark = if *value == selected { " selected" } else { "" };
        let _ = writeln!(
            html,
            r#"  <option value="{}"{mark}>{}</option>"#,
            escape(value),
            escape(label)
        );
    }
    html.push_str("</select>\n");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
