//! Figure data: ordered series ready for an external plotting tool.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The reproduced figure panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FigureId {
    #[serde(rename = "2a")]
    Fig2a,
    #[serde(rename = "2b")]
    Fig2b,
    #[serde(rename = "2c")]
    Fig2c,
    #[serde(rename = "2d")]
    Fig2d,
    #[serde(rename = "4a")]
    Fig4a,
    #[serde(rename = "4b")]
    Fig4b,
    #[serde(rename = "4c")]
    Fig4c,
    #[serde(rename = "4d")]
    Fig4d,
    #[serde(rename = "4e")]
    Fig4e,
    #[serde(rename = "4f")]
    Fig4f,
}

impl FigureId {
    pub const ALL: [FigureId; 10] = [
        FigureId::Fig2a,
        FigureId::Fig2b,
        FigureId::Fig2c,
        FigureId::Fig2d,
        FigureId::Fig4a,
        FigureId::Fig4b,
        FigureId::Fig4c,
        FigureId::Fig4d,
        FigureId::Fig4e,
        FigureId::Fig4f,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FigureId::Fig2a => "2a",
            FigureId::Fig2b => "2b",
            FigureId::Fig2c => "2c",
            FigureId::Fig2d => "2d",
            FigureId::Fig4a => "4a",
            FigureId::Fig4b => "4b",
            FigureId::Fig4c => "4c",
            FigureId::Fig4d => "4d",
            FigureId::Fig4e => "4e",
            FigureId::Fig4f => "4f",
        }
    }
}

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FigureId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let token = token.strip_prefix("fig").unwrap_or(&token);
        FigureId::ALL
            .into_iter()
            .find(|id| id.as_str() == token)
            .ok_or_else(|| Error::ParseToken {
                kind: "figure",
                input: s.to_string(),
                expected: "2a, 2b, 2c, 2d, 4a, 4b, 4c, 4d, 4e, 4f".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlotKind {
    /// Labelled bars, one group per label and one bar per series
    Bar,
    /// (x, y) points
    Scatter,
}

/// One data point. Bars carry a label and no x; scatter points carry an x
/// and optionally the label of the entity they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: f64,
}

impl Point {
    pub fn bar(label: impl Into<String>, y: f64) -> Self {
        Self {
            label: Some(label.into()),
            x: None,
            y,
        }
    }

    pub fn scatter(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: Some(label.into()),
            x: Some(x),
            y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub id: FigureId,
    pub kind: PlotKind,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(
        id: FigureId,
        kind: PlotKind,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_ids_parse_loosely() {
        assert_eq!("4C".parse::<FigureId>().unwrap(), FigureId::Fig4c);
        assert_eq!("fig2b".parse::<FigureId>().unwrap(), FigureId::Fig2b);
        assert!("3a".parse::<FigureId>().is_err());
    }

    #[test]
    fn figure_id_serializes_as_panel_name() {
        let json = serde_json::to_string(&FigureId::Fig2d).unwrap();
        assert_eq!(json, "\"2d\"");
    }
}
