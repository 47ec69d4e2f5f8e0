//! Summaries of sampled draws.

use itertools::Itertools;

use crate::error::{invalid, Result};
use crate::metropolis::MetropolisChain;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSummary {
    pub num_draws: usize,
    pub mean: f64,
    pub sd: f64,
    /// Lower end of the shortest interval holding the credible mass.
    pub hdi_lower: f64,
    pub hdi_upper: f64,
    pub effective_sample_size: f64,
}

/// Summarize a sequence of draws.
///
/// `cred_mass` is the fraction of draws inside the reported HDI.
pub fn summarize(draws: &[f64], cred_mass: f64) -> Result<ChainSummary> {
    summarize_with_ess(draws, cred_mass, effective_sample_size(draws))
}

fn summarize_with_ess(
    draws: &[f64],
    cred_mass: f64,
    effective_sample_size: f64,
) -> Result<ChainSummary> {
    if draws.is_empty() {
        return invalid("can not summarize an empty set of draws");
    }
    let (hdi_lower, hdi_upper) = hdi_of_samples(draws, cred_mass)?;
    let (mean, var) = mean_var(draws);
    Ok(ChainSummary {
        num_draws: draws.len(),
        mean,
        sd: var.sqrt(),
        hdi_lower,
        hdi_upper,
        effective_sample_size,
    })
}

/// Summarize the retained draws of several chains pooled together.
///
/// The effective sample size is the sum over chains.
pub fn summarize_chains(
    chains: &[MetropolisChain],
    burn_in: usize,
    cred_mass: f64,
) -> Result<ChainSummary> {
    let pooled = chains
        .iter()
        .flat_map(|chain| chain.retained(burn_in).iter().copied())
        .collect_vec();
    // Per chain, never over the concatenated draws
    let ess = chains
        .iter()
        .map(|chain| chain.retained(burn_in))
        .filter(|draws| !draws.is_empty())
        .map(effective_sample_size)
        .sum();
    summarize_with_ess(&pooled, cred_mass, ess)
}

/// Sample mean and unbiased sample variance. The variance is 0 for a single draw.
fn mean_var(draws: &[f64]) -> (f64, f64) {
    let n = draws.len() as f64;
    let mean = draws.iter().sum::<f64>() / n;
    if draws.len() < 2 {
        return (mean, 0.);
    }
    let ss: f64 = draws.iter().map(|x| (x - mean) * (x - mean)).sum();
    (mean, ss / (n - 1.))
}

/// Shortest interval containing `ceil(cred_mass * n)` of the sorted draws.
pub fn hdi_of_samples(draws: &[f64], cred_mass: f64) -> Result<(f64, f64)> {
    if !(cred_mass > 0. && cred_mass <= 1.) {
        return invalid(format!("credible mass must be in (0, 1], got {cred_mass}"));
    }
    if draws.is_empty() {
        return invalid("can not compute an interval of an empty set of draws");
    }
    if draws.iter().any(|x| x.is_nan()) {
        return invalid("draws contain NaN");
    }
    let sorted = draws.iter().copied().sorted_by(f64::total_cmp).collect_vec();
    let n = sorted.len();
    let width_idx = ((cred_mass * n as f64).ceil() as usize).clamp(1, n) - 1;

    let (lower, upper) = (0..n - width_idx)
        .map(|i| (sorted[i], sorted[i + width_idx]))
        .min_by(|a, b| (a.1 - a.0).total_cmp(&(b.1 - b.0)))
        .unwrap_or((sorted[0], sorted[n - 1]));
    Ok((lower, upper))
}

/// Effective sample size from the initial positive sequence of autocorrelations.
///
/// Returns 1 for chains without variance. Anti-correlated chains are capped
/// at `n * log10(n)` draws.
pub fn effective_sample_size(draws: &[f64]) -> f64 {
    let n = draws.len();
    if n < 2 {
        return n as f64;
    }
    let (mean, _) = mean_var(draws);
    let autocov = |lag: usize| -> f64 {
        draws[..n - lag]
            .iter()
            .zip(&draws[lag..])
            .map(|(a, b)| (a - mean) * (b - mean))
            .sum::<f64>()
            / n as f64
    };
    let gamma0 = autocov(0);
    if gamma0 <= 0. {
        return 1.;
    }

    let mut tau = -1.;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = (autocov(lag) + autocov(lag + 1)) / gamma0;
        if pair <= 0. {
            break;
        }
        tau += 2. * pair;
        lag += 2;
    }
    let nf = n as f64;
    let max_ess = nf * nf.log10().max(1.);
    (nf / tau.max(1. / nf)).min(max_ess)
}

/// Gelman-Rubin potential scale reduction factor of several chains.
///
/// Chains are truncated to the length of the shortest one.
pub fn potential_scale_reduction(chains: &[&[f64]]) -> Result<f64> {
    if chains.len() < 2 {
        return invalid("potential scale reduction needs at least two chains");
    }
    let n = chains.iter().map(|c| c.len()).min().unwrap_or(0);
    if n < 2 {
        return invalid("potential scale reduction needs at least two draws per chain");
    }
    let m = chains.len() as f64;
    let stats = chains.iter().map(|c| mean_var(&c[..n])).collect_vec();
    let grand_mean = stats.iter().map(|(mean, _)| mean).sum::<f64>() / m;
    let between = n as f64 / (m - 1.)
        * stats
            .iter()
            .map(|(mean, _)| (mean - grand_mean).powi(2))
            .sum::<f64>();
    let within = stats.iter().map(|(_, var)| var).sum::<f64>() / m;
    if within <= 0. {
        return invalid("chains have no within-chain variance");
    }
    let nf = n as f64;
    let var_hat = (nf - 1.) / nf * within + between / nf;
    Ok((var_hat / within).sqrt())
}
