//! Distribution fit and probit transform behind a narrow trait.

use crate::spi::error::SpiError;
use crate::spi::gamma::fit_gamma;
use statrs::distribution::{ContinuousCDF, Normal};

/// Turns a sample of accumulated precipitation into standard-normal scores.
///
/// Implementations receive only valid (non-missing) values and must return one score per
/// input value, in order. Swapping the implementation changes the statistics backend
/// without touching the rolling window or the per-scale orchestration.
pub trait Standardize {
    fn fit_and_standardize(&self, values: &[f64]) -> Result<Vec<f64>, SpiError>;
}

/// Gamma (location 0) fit followed by the inverse standard-normal CDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaStandardizer;

impl Standardize for GammaStandardizer {
    fn fit_and_standardize(&self, values: &[f64]) -> Result<Vec<f64>, SpiError> {
        let params = fit_gamma(values)?;
        let gamma = params.distribution()?;
        let normal = standard_normal()?;
        Ok(values
            .iter()
            .map(|&x| probit_with(&normal, gamma.cdf(x)))
            .collect())
    }
}

/// Standard-normal quantile of `p`. `p == 0` gives `-inf` and `p == 1` gives `+inf`.
///
/// ```
/// use era5_spi::probit;
///
/// assert!(probit(0.5).abs() < 1e-12);
/// assert_eq!(probit(1.0), f64::INFINITY);
/// assert!((probit(0.975) - 1.959963984540054).abs() < 1e-9);
/// ```
pub fn probit(p: f64) -> f64 {
    match standard_normal() {
        Ok(normal) => probit_with(&normal, p),
        Err(_) => f64::NAN,
    }
}

fn standard_normal() -> Result<Normal, SpiError> {
    Normal::new(0.0, 1.0)
        .map_err(|e| SpiError::DegenerateFit(format!("standard normal construction failed: {e}")))
}

fn probit_with(normal: &Normal, p: f64) -> f64 {
    if p.is_nan() {
        f64::NAN
    } else if p <= 0.0 {
        f64::NEG_INFINITY
    } else if p >= 1.0 {
        f64::INFINITY
    } else {
        normal.inverse_cdf(p)
    }
}

/// Applies `standardizer` to the non-missing entries of `accumulated`, writing each score
/// back at its original position. Missing entries stay missing.
pub fn standardize_series<S: Standardize + ?Sized>(
    accumulated: &[Option<f64>],
    standardizer: &S,
) -> Result<Vec<Option<f64>>, SpiError> {
    let (positions, sample): (Vec<usize>, Vec<f64>) = accumulated
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .unzip();

    let scores = standardizer.fit_and_standardize(&sample)?;
    if scores.len() != sample.len() {
        return Err(SpiError::DegenerateFit(format!(
            "standardizer returned {} scores for {} values",
            scores.len(),
            sample.len()
        )));
    }

    let mut output = vec![None; accumulated.len()];
    for (position, score) in positions.into_iter().zip(scores) {
        output[position] = Some(score);
    }
    Ok(output)
}
