use crate::data::ObservedData;
use crate::math::xlogy;

/// Log of the Bernoulli likelihood `θ^z (1-θ)^(N-z)`.
///
/// Returns `-inf` for θ outside [0, 1]. Zero exponents contribute nothing,
/// so `0^0` evaluates to 1 at the boundaries.
#[inline]
pub fn bernoulli_ln_likelihood(theta: f64, successes: u64, trials: u64) -> f64 {
    if !(0. ..=1.).contains(&theta) {
        return f64::NEG_INFINITY;
    }
    let z = successes as f64;
    let failures = trials.saturating_sub(successes) as f64;
    xlogy(z, theta) + xlogy(failures, 1. - theta)
}

/// Bernoulli likelihood of a single parameter value.
#[inline]
pub fn bernoulli_density(theta: f64, data: &ObservedData) -> f64 {
    bernoulli_ln_likelihood(theta, data.successes(), data.trials()).exp()
}

/// Evaluate the Bernoulli likelihood of `data` at every value in `theta_values`.
///
/// Values outside [0, 1] evaluate to exactly 0.
pub fn bernoulli_likelihood(theta_values: &[f64], data: &ObservedData) -> Vec<f64> {
    theta_values
        .iter()
        .map(|&theta| bernoulli_density(theta, data))
        .collect()
}
