//! Output sinks: dataset CSV and the PCA scatter grid.

pub mod export;
pub mod plot;

pub use export::{dataset_csv, write_dataset_csv};
pub use plot::{render_pca_grid, GridLayout, PlotError};
