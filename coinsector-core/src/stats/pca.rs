//! Two-component principal component analysis of a two-column sample.
//!
//! The sample is centred (not scaled) and the 2x2 covariance matrix (n - 1
//! denominator) is diagonalised in closed form. Components are ordered by
//! explained variance; each is signed so its largest-magnitude loading is
//! positive, which keeps projections deterministic across runs.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PcaError {
    #[error("PCA needs at least 2 rows, got {0}")]
    TooFewRows(usize),

    #[error("PCA input contains non-finite values")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcaProjection {
    /// Unit loading vectors, first component first.
    pub components: [[f64; 2]; 2],
    pub explained_variance: [f64; 2],
    pub explained_variance_ratio: [f64; 2],
    pub mean: [f64; 2],
    /// Every input row projected onto (PC 1, PC 2).
    pub points: Vec<(f64, f64)>,
}

pub fn pca_2d(sample: &[(f64, f64)]) -> Result<PcaProjection, PcaError> {
    let n = sample.len();
    if n < 2 {
        return Err(PcaError::TooFewRows(n));
    }
    if sample.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(PcaError::NonFinite);
    }

    let mean_x = sample.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = sample.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in sample {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    let denom = (n - 1) as f64;
    let (a, c, b) = (sxx / denom, syy / denom, sxy / denom);

    let half_trace = (a + c) / 2.0;
    let disc = (((a - c) / 2.0).powi(2) + b * b).sqrt();
    let l1 = half_trace + disc;
    let l2 = (half_trace - disc).max(0.0);

    let first = if b == 0.0 {
        if a >= c {
            [1.0, 0.0]
        } else {
            [0.0, 1.0]
        }
    } else {
        let v = [l1 - c, b];
        let norm = v[0].hypot(v[1]);
        [v[0] / norm, v[1] / norm]
    };
    let second = [-first[1], first[0]];
    let components = [flip_sign(first), flip_sign(second)];

    let total = l1 + l2;
    let explained_variance_ratio = if total > 0.0 {
        [l1 / total, l2 / total]
    } else {
        [0.0, 0.0]
    };

    let points = sample
        .iter()
        .map(|(x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (
                dx * components[0][0] + dy * components[0][1],
                dx * components[1][0] + dy * components[1][1],
            )
        })
        .collect();

    Ok(PcaProjection {
        components,
        explained_variance: [l1, l2],
        explained_variance_ratio,
        mean: [mean_x, mean_y],
        points,
    })
}

fn flip_sign(v: [f64; 2]) -> [f64; 2] {
    let dominant = if v[1].abs() > v[0].abs() { v[1] } else { v[0] };
    if dominant < 0.0 {
        [-v[0], -v[1]]
    } else {
        v
    }
}
