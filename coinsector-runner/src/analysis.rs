//! Lead correlation and PCA for every (instrument, sector) pair.

use coinsector_core::stats::{lead_join, pca_2d, pearson, PcaProjection};
use coinsector_core::CombinedDataset;

/// Fewest joined rows a pair needs to be analysed.
pub const MIN_JOINED_ROWS: usize = 2;

/// Result for one (instrument, sector) pair that had enough joined rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PairAnalysis {
    pub instrument: String,
    pub sector: String,
    /// Rows surviving the lead shift and the missing-value drop.
    pub observations: usize,
    /// `None` when either side has zero variance.
    pub correlation: Option<f64>,
    pub projection: PcaProjection,
}

/// Analyse one pair. `None` when the pair is skipped.
pub fn analyze_pair(
    dataset: &CombinedDataset,
    instrument: &str,
    sector: &str,
    lead: usize,
) -> Option<PairAnalysis> {
    let instrument_values = dataset.instrument(instrument)?;
    let sector_values = dataset.sector(sector)?;

    let joined = lead_join(dataset.index(), instrument_values, sector_values, lead);
    if joined.len() < MIN_JOINED_ROWS {
        tracing::warn!(
            instrument,
            sector,
            rows = joined.len(),
            "not enough data after shift, pair skipped"
        );
        return None;
    }

    let projection = match pca_2d(&joined.points()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(instrument, sector, error = %e, "PCA failed, pair skipped");
            return None;
        }
    };

    let correlation = pearson(&joined.leading, &joined.sector);
    tracing::info!(
        instrument,
        sector,
        lead,
        observations = joined.len(),
        correlation,
        "lead correlation"
    );

    Some(PairAnalysis {
        instrument: instrument.to_string(),
        sector: sector.to_string(),
        observations: joined.len(),
        correlation,
        projection,
    })
}

/// Analyse every pair, instrument-major then sector-minor. Skipped pairs are
/// absent from the result.
pub fn analyze_pairs(dataset: &CombinedDataset, lead: usize) -> Vec<PairAnalysis> {
    let mut out = Vec::new();
    for instrument in dataset.instrument_names() {
        for sector in dataset.sector_names() {
            if let Some(pair) = analyze_pair(dataset, instrument, sector, lead) {
                out.push(pair);
            }
        }
    }
    out
}
