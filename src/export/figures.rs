//! Figure series export
//!
//! CSV output is long-format, one row per point:
//! `figure,series,label,x,y`. Bars leave `x` empty.

use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

use serde::Serialize;

use crate::{
    Error, Result,
    analysis::{Figure, FigureId},
};

/// One exported point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureRecord<'a> {
    pub figure: FigureId,
    pub series: &'a str,
    pub label: Option<&'a str>,
    pub x: Option<f64>,
    pub y: f64,
}

/// Flatten figures into rows, preserving figure, series and point order.
pub fn figure_records(figures: &[Figure]) -> impl Iterator<Item = FigureRecord<'_>> {
    figures.iter().flat_map(|figure| {
        figure.series.iter().flat_map(move |series| {
            series.points.iter().map(move |point| FigureRecord {
                figure: figure.id,
                series: &series.name,
                label: point.label.as_deref(),
                x: point.x,
                y: point.y,
            })
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Format implied by a file extension, if recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(Error::ParseToken {
                kind: "export format",
                input: s.to_string(),
                expected: "json, csv".to_string(),
            }),
        }
    }
}

pub fn write_figures_csv<W: Write>(writer: W, figures: &[Figure]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in figure_records(figures) {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_figures_json<W: Write>(writer: W, figures: &[Figure]) -> Result<()> {
    serde_json::to_writer_pretty(writer, figures)?;
    Ok(())
}

/// Write `figures` to `path` in `format`.
pub fn save_figures<P: AsRef<Path>>(path: P, figures: &[Figure], format: ExportFormat) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Json => write_figures_json(&mut writer, figures)?,
        ExportFormat::Csv => write_figures_csv(&mut writer, figures)?,
    }
    writer.flush()?;
    log::debug!("wrote {} figures to {}", figures.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{PlotKind, Point, Series};

    fn figures() -> Vec<Figure> {
        let mut bars = Series::new("high");
        bars.push(Point::bar("pair", 81.0));
        let mut scatter = Series::new("decision states");
        scatter.push(Point::scatter("pick", 0.5, 0.25));
        vec![
            Figure::new(FigureId::Fig4b, PlotKind::Bar, "State (pair)", "PE").with_series(bars),
            Figure::new(FigureId::Fig2b, PlotKind::Scatter, "R", "C").with_series(scatter),
        ]
    }

    #[test]
    fn csv_is_long_format() {
        let mut out = Vec::new();
        write_figures_csv(&mut out, &figures()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "figure,series,label,x,y");
        assert_eq!(lines[1], "4b,high,pair,,81.0");
        assert_eq!(lines[2], "2b,decision states,pick,0.5,0.25");
    }

    #[test]
    fn saved_json_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures.json");
        let format = ExportFormat::from_path(&path).unwrap();
        save_figures(&path, &figures(), format).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Figure> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, figures());
    }

    #[test]
    fn unknown_extension_has_no_format() {
        assert_eq!(ExportFormat::from_path(Path::new("out.txt")), None);
        assert_eq!(
            ExportFormat::from_path(Path::new("OUT.CSV")),
            Some(ExportFormat::Csv)
        );
    }
}
