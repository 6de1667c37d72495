//! PCA scatter grid rendered with plotters.
//!
//! One image, a grid of (#instruments x #sectors) cells. Analysed pairs are
//! packed into the cells in order; cells beyond the last pair stay blank.
//! Text is drawn with a bundled DejaVu Sans, registered on first render.

use crate::analysis::PairAnalysis;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Preferred cell size in pixels; the canvas grows with the grid up to
/// `MAX_CANVAS`, after which cells shrink.
const MIN_CELL: (u32, u32) = (240, 180);

/// Largest canvas rendered, whatever the grid or configured size.
const MAX_CANVAS: (u32, u32) = (4000, 6000);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("plot grid has no cells ({rows} x {cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("{pairs} pairs do not fit a {rows} x {cols} grid")]
    Overflow { pairs: usize, rows: usize, cols: usize },

    #[error("failed to create plot directory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("bundled font could not be loaded")]
    Font,

    #[error("drawing failed: {0}")]
    Draw(String),
}

/// Grid shape and minimum canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub min_width: u32,
    pub min_height: u32,
}

impl GridLayout {
    pub fn new(rows: usize, cols: usize, min_width: u32, min_height: u32) -> Self {
        Self {
            rows,
            cols,
            min_width,
            min_height,
        }
    }

    /// Canvas size in pixels, never larger than `MAX_CANVAS`.
    pub fn canvas_size(&self) -> (u32, u32) {
        let cols = u32::try_from(self.cols).unwrap_or(u32::MAX);
        let rows = u32::try_from(self.rows).unwrap_or(u32::MAX);
        let w = cols.saturating_mul(MIN_CELL.0).max(self.min_width);
        let h = rows.saturating_mul(MIN_CELL.1).max(self.min_height);
        (w.min(MAX_CANVAS.0), h.min(MAX_CANVAS.1))
    }
}

fn draw_err(e: impl std::fmt::Display) -> PlotError {
    PlotError::Draw(e.to_string())
}

fn ensure_font() -> Result<(), PlotError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err(PlotError::Font)
    }
}

/// Render every analysed pair as a PC 1 / PC 2 scatter into a PNG at `path`.
pub fn render_pca_grid(
    path: &Path,
    pairs: &[PairAnalysis],
    layout: GridLayout,
) -> Result<(), PlotError> {
    if layout.rows == 0 || layout.cols == 0 {
        return Err(PlotError::EmptyGrid {
            rows: layout.rows,
            cols: layout.cols,
        });
    }
    if pairs.len() > layout.rows * layout.cols {
        return Err(PlotError::Overflow {
            pairs: pairs.len(),
            rows: layout.rows,
            cols: layout.cols,
        });
    }
    ensure_font()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let root = BitMapBackend::new(path, layout.canvas_size()).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let cells = root.split_evenly((layout.rows, layout.cols));
    for (pair, cell) in pairs.iter().zip(&cells) {
        draw_pair(cell, pair)?;
    }

    root.present().map_err(draw_err)?;
    tracing::debug!(path = %path.display(), pairs = pairs.len(), "plot rendered");
    Ok(())
}

fn draw_pair(area: &DrawingArea<BitMapBackend<'_>, Shift>, pair: &PairAnalysis) -> Result<(), PlotError> {
    let points = &pair.projection.points;
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{} vs {}", pair.instrument, pair.sector), (FONT_FAMILY, 14))
        .margin(6)
        .x_label_area_size(28)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("PC 1")
        .y_desc("PC 2")
        .x_labels(5)
        .y_labels(5)
        .label_style((FONT_FAMILY, 11))
        .axis_desc_style((FONT_FAMILY, 12))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLUE.mix(0.6).filled())),
        )
        .map_err(draw_err)?;

    Ok(())
}

/// Data range padded by 5% each side; never empty.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad)..(hi + pad)
}
