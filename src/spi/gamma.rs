//! Maximum likelihood fit of a two-parameter gamma distribution with location fixed at zero.

use crate::spi::error::SpiError;
use log::debug;
use statrs::distribution::{ContinuousCDF, Gamma};
use statrs::function::gamma::digamma;

/// Smallest sample a gamma fit is attempted on.
pub const MIN_SAMPLE_SIZE: usize = 5;

/// `ln(mean) - mean(ln x)` at or below this is treated as a sample without spread.
const MIN_LOG_SPREAD: f64 = 1e-12;
const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-12;
/// Bracket width accepted when the iteration stalls in floating point noise.
const STALL_TOLERANCE: f64 = 1e-8;

/// Fitted gamma parameters (shape `k`, scale `θ`, location 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    shape: f64,
    scale: f64,
}

impl GammaParams {
    pub fn new(shape: f64, scale: f64) -> Result<Self, SpiError> {
        if !(shape.is_finite() && scale.is_finite() && shape > 0.0 && scale > 0.0) {
            return Err(SpiError::DegenerateFit(format!(
                "invalid parameters shape={shape}, scale={scale}"
            )));
        }
        Ok(Self { shape, scale })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// The matching `statrs` distribution. `statrs` parameterises by rate, so `rate = 1 / scale`.
    pub fn distribution(&self) -> Result<Gamma, SpiError> {
        Gamma::new(self.shape, 1.0 / self.scale)
            .map_err(|e| SpiError::DegenerateFit(format!("gamma construction failed: {e}")))
    }

    pub fn cdf(&self, x: f64) -> Result<f64, SpiError> {
        Ok(self.distribution()?.cdf(x))
    }
}

/// Fits shape and scale by maximum likelihood, location fixed at the origin.
///
/// The shape solves `ln(k) - ψ(k) = ln(mean) - mean(ln x)`; the scale follows as `mean / k`.
///
/// # Errors
///
/// * [`SpiError::InsufficientSample`] for fewer than [`MIN_SAMPLE_SIZE`] values.
/// * [`SpiError::DegenerateFit`] when a value is not strictly positive and finite, the sample
///   has no spread (e.g. all values identical), or the shape iteration does not converge.
pub fn fit_gamma(sample: &[f64]) -> Result<GammaParams, SpiError> {
    let n = sample.len();
    if n < MIN_SAMPLE_SIZE {
        return Err(SpiError::InsufficientSample {
            found: n,
            required: MIN_SAMPLE_SIZE,
        });
    }
    if let Some(bad) = sample.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
        return Err(SpiError::DegenerateFit(format!(
            "sample contains {bad}, values must be strictly positive"
        )));
    }

    let mean = sample.iter().sum::<f64>() / n as f64;
    let mean_log = sample.iter().map(|x| x.ln()).sum::<f64>() / n as f64;
    let spread = mean.ln() - mean_log;
    if !spread.is_finite() || spread <= MIN_LOG_SPREAD {
        return Err(SpiError::DegenerateFit(format!(
            "sample has no spread (log spread {spread:e})"
        )));
    }

    let shape = solve_shape(spread)?;
    let params = GammaParams::new(shape, mean / shape)?;
    debug!(
        "Fitted gamma to {} values: shape={}, scale={}",
        n, params.shape, params.scale
    );
    Ok(params)
}

/// Root of `ln(k) - ψ(k) - spread`, which falls monotonically from +∞ to 0 as `k` grows.
///
/// Newton steps from the Greenwood–Durand style starting point, kept inside a bracket that
/// shrinks on every iteration; a step leaving the bracket is replaced by bisection.
fn solve_shape(spread: f64) -> Result<f64, SpiError> {
    let objective = |k: f64| k.ln() - digamma(k) - spread;

    let initial = (3.0 - spread + ((spread - 3.0).powi(2) + 24.0 * spread).sqrt()) / (12.0 * spread);

    let mut lo = initial * 0.5;
    let mut hi = initial * 2.0;
    for _ in 0..MAX_ITERATIONS {
        if objective(lo) > 0.0 {
            break;
        }
        lo *= 0.5;
    }
    for _ in 0..MAX_ITERATIONS {
        if objective(hi) < 0.0 {
            break;
        }
        hi *= 2.0;
    }
    if !(objective(lo) > 0.0 && objective(hi) < 0.0) {
        return Err(SpiError::DegenerateFit(format!(
            "could not bracket shape for log spread {spread:e}"
        )));
    }

    let mut k = initial.clamp(lo, hi);
    for _ in 0..MAX_ITERATIONS {
        let f = objective(k);
        if f == 0.0 {
            return Ok(k);
        }
        if f > 0.0 {
            lo = k;
        } else {
            hi = k;
        }

        let derivative = 1.0 / k - trigamma(k);
        let newton = k - f / derivative;
        let next = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if (next - k).abs() <= TOLERANCE * k || (hi - lo) <= TOLERANCE * k {
            return Ok(next);
        }
        k = next;
    }

    if hi - lo <= STALL_TOLERANCE * k {
        return Ok(0.5 * (lo + hi));
    }
    Err(SpiError::DegenerateFit(format!(
        "shape estimate did not converge for log spread {spread:e}"
    )))
}

/// ψ'(x) for x > 0: recurrence up to x ≥ 12, then the asymptotic series.
fn trigamma(x: f64) -> f64 {
    let mut x = x;
    let mut acc = 0.0;
    while x < 12.0 {
        acc += 1.0 / (x * x);
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    acc + inv
        + inv2 / 2.0
        + inv * inv2 * (1.0 / 6.0 - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 / 30.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Gamma as GammaDist};

    #[test]
    fn test_trigamma_known_values() {
        // ψ'(1) = π²/6, ψ'(1/2) = π²/2
        let pi2 = std::f64::consts::PI.powi(2);
        assert_relative_eq!(trigamma(1.0), pi2 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(trigamma(0.5), pi2 / 2.0, epsilon = 1e-12);
        assert_relative_eq!(trigamma(100.0), 0.010050166663333571, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_matches_reference_mle() {
        let params = fit_gamma(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(params.shape(), 3.7016438100088167, max_relative = 1e-6);
        assert_relative_eq!(params.scale(), 0.8104507494449755, max_relative = 1e-6);

        let params = fit_gamma(&[12.0, 30.0, 45.0, 8.0, 60.0, 22.0, 17.0, 41.0]).unwrap();
        assert_relative_eq!(params.shape(), 2.758187782451694, max_relative = 1e-6);
        assert_relative_eq!(params.scale(), 10.650108809447772, max_relative = 1e-6);
    }

    #[test]
    fn test_fit_satisfies_likelihood_equations() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let dist = GammaDist::new(0.8, 40.0).unwrap();
        let values: Vec<f64> = (0..300).map(|_| dist.sample(&mut rng)).collect();

        let params = fit_gamma(&values).unwrap();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let mean_log = values.iter().map(|x| x.ln()).sum::<f64>() / n;

        assert_relative_eq!(params.mean(), mean, max_relative = 1e-12);
        assert_relative_eq!(
            params.shape().ln() - digamma(params.shape()),
            mean.ln() - mean_log,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_fit_recovers_parameters() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let dist = GammaDist::new(2.0, 3.0).unwrap();
        let values: Vec<f64> = (0..5000).map(|_| dist.sample(&mut rng)).collect();

        let params = fit_gamma(&values).unwrap();
        assert_relative_eq!(params.shape(), 2.0, max_relative = 0.1);
        assert_relative_eq!(params.scale(), 3.0, max_relative = 0.1);
    }

    #[test]
    fn test_small_sample_is_insufficient() {
        assert_eq!(
            fit_gamma(&[1.0, 2.0, 3.0, 4.0]),
            Err(SpiError::InsufficientSample {
                found: 4,
                required: MIN_SAMPLE_SIZE
            })
        );
    }

    #[test]
    fn test_constant_sample_is_degenerate() {
        let result = fit_gamma(&[50.0; 24]);
        assert!(matches!(result, Err(SpiError::DegenerateFit(_))));
    }

    #[test]
    fn test_zero_value_is_degenerate() {
        let result = fit_gamma(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(result, Err(SpiError::DegenerateFit(_))));
    }

    #[test]
    fn test_cdf_uses_scale_not_rate() {
        let params = GammaParams::new(1.0, 2.0).unwrap();
        // Exponential with mean 2: P(X <= 2) = 1 - e^-1
        assert_relative_eq!(
            params.cdf(2.0).unwrap(),
            1.0 - (-1.0f64).exp(),
            epsilon = 1e-12
        );
    }
}
