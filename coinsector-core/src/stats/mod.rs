//! Lead/lag pairing, correlation and PCA for (instrument, sector) pairs.

pub mod correlation;
pub mod lead;
pub mod pca;

pub use correlation::pearson;
pub use lead::{lead_join, JoinedPairs, DEFAULT_LEAD};
pub use pca::{pca_2d, PcaError, PcaProjection};
