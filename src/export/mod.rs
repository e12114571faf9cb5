//! Export functionality for analysis results
//!
//! Figures can be written as JSON (one object per figure) or as long-format
//! CSV for plotting tools.

mod figures;

pub use figures::{
    ExportFormat, FigureRecord, figure_records, save_figures, write_figures_csv,
    write_figures_json,
};
