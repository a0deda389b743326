//! Chart rendering.
//!
//! A renderer turns a [`Table`] plus a [`ChartSpec`] into an artifact.
//! Specs are checked against the table shape before anything is written.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use super::table::{Cell, Table};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const BAR_WIDTH: usize = 40;

/// Errors raised while rendering a chart.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{chart} chart needs column '{field}'")]
    MissingField { chart: ChartKind, field: String },

    #[error("column '{field}' row {row}: expected a numeric value, got {value:?}")]
    NotNumeric {
        field: String,
        row: usize,
        value: String,
    },

    #[error("column '{field}' row {row}: expected a label, got {value:?}")]
    NotCategorical {
        field: String,
        row: usize,
        value: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
        };
        f.pad(name)
    }
}

/// A table column plus its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub field: String,
    pub label: String,
}

impl Axis {
    pub fn new(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
        }
    }
}

/// What to draw: `x` is the categorical axis, `y` the numeric one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: Axis,
    pub y: Axis,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: &str, x: Axis, y: Axis) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x,
            y,
        }
    }

    /// Check the table has the shape this chart needs.
    ///
    /// Every chart needs a numeric `y` per row. Bar and pie charts also need
    /// a text label per row; a line may use any ordered `x`. An empty table
    /// always passes.
    pub fn validate(&self, table: &Table) -> Result<(), RenderError> {
        let x = self.require(table, &self.x.field)?;
        let y = self.require(table, &self.y.field)?;

        for (i, row) in table.rows.iter().enumerate() {
            let (Some(label), Some(value)) = (row.get(x), row.get(y)) else {
                continue;
            };
            if !value.is_numeric() {
                return Err(RenderError::NotNumeric {
                    field: self.y.field.clone(),
                    row: i,
                    value: value.to_string(),
                });
            }
            if self.kind != ChartKind::Line && label.is_numeric() {
                return Err(RenderError::NotCategorical {
                    field: self.x.field.clone(),
                    row: i,
                    value: label.to_string(),
                });
            }
        }
        Ok(())
    }

    fn require(&self, table: &Table, field: &str) -> Result<usize, RenderError> {
        table
            .column_index(field)
            .ok_or_else(|| RenderError::MissingField {
                chart: self.kind,
                field: field.to_string(),
            })
    }
}

/// Something that can draw a report.
pub trait Renderer {
    fn render(&mut self, name: &str, table: &Table, chart: &ChartSpec) -> Result<(), RenderError>;
}

/// Writes one Vega-Lite v5 document per report into a directory.
pub struct VegaLiteRenderer {
    output_dir: PathBuf,
}

impl VegaLiteRenderer {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the document for a report.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.vl.json", name))
    }

    /// Build the Vega-Lite document with the table inlined.
    pub fn document(name: &str, table: &Table, chart: &ChartSpec) -> serde_json::Value {
        let x_type = match chart.kind {
            ChartKind::Line => "ordinal",
            ChartKind::Bar | ChartKind::Pie => "nominal",
        };
        let x = json!({
            "field": chart.x.field,
            "type": x_type,
            "title": chart.x.label,
            "sort": null,
        });
        let y = json!({
            "field": chart.y.field,
            "type": "quantitative",
            "title": chart.y.label,
        });

        let (mark, encoding) = match chart.kind {
            ChartKind::Bar => (
                json!({"type": "bar", "tooltip": true}),
                json!({"x": x, "y": y}),
            ),
            ChartKind::Line => (
                json!({"type": "line", "point": true, "tooltip": true}),
                json!({"x": x, "y": y}),
            ),
            ChartKind::Pie => (
                json!({"type": "arc", "tooltip": true}),
                json!({"theta": y, "color": x}),
            ),
        };

        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": chart.title,
            "data": {"values": table.to_json_rows()},
            "mark": mark,
            "encoding": encoding,
            "usermeta": {"report": name, "rows": table.len()},
        })
    }
}

impl Renderer for VegaLiteRenderer {
    fn render(&mut self, name: &str, table: &Table, chart: &ChartSpec) -> Result<(), RenderError> {
        chart.validate(table)?;
        fs::create_dir_all(&self.output_dir)?;

        let path = self.path_for(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &Self::document(name, table, chart))?;
        writeln!(writer)?;
        writer.flush()?;

        info!("Wrote {} chart for {} to {:?}", chart.kind, name, path);
        Ok(())
    }
}

/// Plain-text table with proportional bars.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl TextRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, _name: &str, table: &Table, chart: &ChartSpec) -> Result<(), RenderError> {
        chart.validate(table)?;

        writeln!(self.out, "== {} ==", chart.title)?;
        if table.is_empty() {
            writeln!(self.out, "(no rows)")?;
            writeln!(self.out)?;
            return Ok(());
        }

        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect();
        let widths: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(String::len)
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let y = table.column_index(&chart.y.field);
        let max = table
            .rows
            .iter()
            .filter_map(|row| y.and_then(|i| row.get(i)).and_then(Cell::as_f64))
            .fold(0.0_f64, f64::max);

        let header: Vec<String> = table
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, w)| format!("{:<w$}", name, w = *w))
            .collect();
        writeln!(self.out, "{}", header.join("  ").trim_end())?;

        for (row, text) in table.rows.iter().zip(&cells) {
            let padded: Vec<String> = text
                .iter()
                .zip(&widths)
                .zip(row)
                .map(|((s, w), cell)| {
                    if cell.is_numeric() {
                        format!("{:>w$}", s, w = *w)
                    } else {
                        format!("{:<w$}", s, w = *w)
                    }
                })
                .collect();

            let value = y.and_then(|i| row.get(i)).and_then(Cell::as_f64).unwrap_or(0.0);
            let bar = if max > 0.0 && value > 0.0 {
                "#".repeat(((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize)
            } else {
                String::new()
            };

            writeln!(self.out, "{}  {}", padded.join("  "), bar)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn wins_chart(kind: ChartKind) -> ChartSpec {
        ChartSpec::new(
            kind,
            "Team wins",
            Axis::new("team", "Team"),
            Axis::new("wins", "Wins"),
        )
    }

    fn wins_table() -> Table {
        Table::new(&["team", "wins"])
            .with_row(vec!["MI".into(), 4u32.into()])
            .with_row(vec!["CSK".into(), 2u32.into()])
    }

    #[test]
    fn test_validate_missing_field() {
        let table = Table::new(&["team", "losses"]);
        let err = wins_chart(ChartKind::Bar).validate(&table).unwrap_err();
        assert!(matches!(err, RenderError::MissingField { .. }));
    }

    #[test]
    fn test_validate_non_numeric_value() {
        let table = Table::new(&["team", "wins"]).with_row(vec!["MI".into(), "many".into()]);
        let err = wins_chart(ChartKind::Bar).validate(&table).unwrap_err();
        assert!(matches!(err, RenderError::NotNumeric { row: 0, .. }));
    }

    #[test]
    fn test_validate_pie_needs_labels() {
        let table = Table::new(&["team", "wins"]).with_row(vec![3u32.into(), 4u32.into()]);
        assert!(matches!(
            wins_chart(ChartKind::Pie).validate(&table),
            Err(RenderError::NotCategorical { .. })
        ));
        assert!(wins_chart(ChartKind::Line).validate(&table).is_ok());
    }

    #[test]
    fn test_text_renderer_bars_are_proportional() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer
            .render("team-wins", &wins_table(), &wins_chart(ChartKind::Bar))
            .unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "== Team wins ==");
        assert_eq!(lines[1], "team  wins");
        assert!(lines[2].starts_with("MI       4  "));
        assert_eq!(lines[2].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[3].matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_text_renderer_empty_table() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer
            .render("team-wins", &Table::new(&["team", "wins"]), &wins_chart(ChartKind::Bar))
            .unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();

        assert_eq!(out, "== Team wins ==\n(no rows)\n\n");
    }

    #[test]
    fn test_vega_lite_document_bar() {
        let doc =
            VegaLiteRenderer::document("team-wins", &wins_table(), &wins_chart(ChartKind::Bar));

        assert_eq!(doc["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(doc["mark"]["type"], "bar");
        assert_eq!(doc["encoding"]["x"]["field"], "team");
        assert_eq!(doc["encoding"]["x"]["sort"], serde_json::Value::Null);
        assert_eq!(doc["encoding"]["y"]["type"], "quantitative");
        assert_eq!(doc["data"]["values"][1]["team"], "CSK");
    }

    #[test]
    fn test_vega_lite_document_pie_uses_theta() {
        let doc =
            VegaLiteRenderer::document("team-wins", &wins_table(), &wins_chart(ChartKind::Pie));

        assert_eq!(doc["mark"]["type"], "arc");
        assert_eq!(doc["encoding"]["theta"]["field"], "wins");
        assert_eq!(doc["encoding"]["color"]["field"], "team");
    }

    #[test]
    fn test_vega_lite_renderer_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut renderer = VegaLiteRenderer::new(temp_dir.path().join("charts"));

        renderer
            .render("team-wins", &Table::new(&["team", "wins"]), &wins_chart(ChartKind::Line))
            .unwrap();

        let path = renderer.path_for("team-wins");
        assert!(path.ends_with("charts/team-wins.vl.json"));
        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(doc["mark"]["type"], "line");
        assert_eq!(doc["data"]["values"], serde_json::json!([]));
    }
}
