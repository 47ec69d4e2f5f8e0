//! Discretized Bayes' rule over a finite parameter grid.
//!
//! The prior is normalized first, then multiplied by the Bernoulli likelihood
//! at each grid point. All products are formed in log space and exponentiated
//! after subtracting the largest term, so long datasets do not underflow.

use itertools::izip;
use tracing::debug;

use crate::data::{ObservedData, ParameterGrid, PriorMass};
use crate::error::{invalid, BayesError, Result};
use crate::likelihood::bernoulli_ln_likelihood;
use crate::math::logsumexp;

/// Normalized posterior mass on a grid together with the evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorResult {
    grid: ParameterGrid,
    posterior: Box<[f64]>,
    evidence: f64,
    log_evidence: f64,
}

/// Highest density set of a grid posterior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHdi {
    /// Smallest grid value in the set.
    pub lower: f64,
    /// Largest grid value in the set.
    pub upper: f64,
    /// Posterior mass inside the set, at least the requested mass.
    pub mass: f64,
    /// Smallest posterior mass of a grid point in the set.
    pub height: f64,
}

/// Compute the grid posterior for Bernoulli `data`.
///
/// Fails with [`BayesError::InvalidArgument`] if the grid and the prior are not
/// aligned, and with [`BayesError::DegeneratePosterior`] if the prior puts no
/// mass where the likelihood is positive.
pub fn compute_posterior(
    grid: &ParameterGrid,
    prior_mass: &PriorMass,
    data: &ObservedData,
) -> Result<PosteriorResult> {
    if grid.len() != prior_mass.len() {
        return invalid(format!(
            "grid has {} points but prior mass has {} entries",
            grid.len(),
            prior_mass.len()
        ));
    }
    let ln_total = prior_mass.ln_total();
    let (z, n) = (data.successes(), data.trials());

    let terms: Vec<f64> = izip!(grid.values(), prior_mass.mass())
        .map(|(&theta, &mass)| {
            if mass == 0. {
                return f64::NEG_INFINITY;
            }
            let ln_lik = bernoulli_ln_likelihood(theta, z, n);
            mass.ln() - ln_total + ln_lik
        })
        .collect();

    let log_evidence = logsumexp(&terms);
    if log_evidence == f64::NEG_INFINITY {
        return Err(BayesError::DegeneratePosterior {
            reason: format!(
                "evidence is zero: the prior puts no mass where the likelihood of \
                 {z} successes in {n} trials is positive"
            ),
        });
    }

    let posterior: Box<[f64]> = terms.iter().map(|t| (t - log_evidence).exp()).collect();

    debug!(
        grid_size = grid.len(),
        successes = z,
        trials = n,
        log_evidence,
        "computed grid posterior"
    );

    Ok(PosteriorResult {
        grid: grid.clone(),
        posterior,
        evidence: log_evidence.exp(),
        log_evidence,
    })
}

impl PosteriorResult {
    pub fn grid(&self) -> &ParameterGrid {
        &self.grid
    }

    /// Posterior mass at each grid point, summing to one.
    pub fn posterior(&self) -> &[f64] {
        &self.posterior
    }

    /// The marginal likelihood `sum(p_theta * likelihood)`.
    ///
    /// This may underflow to zero for large datasets, see
    /// [`PosteriorResult::log_evidence`].
    pub fn evidence(&self) -> f64 {
        self.evidence
    }

    pub fn log_evidence(&self) -> f64 {
        self.log_evidence
    }

    /// Posterior mean of the parameter.
    pub fn mean(&self) -> f64 {
        izip!(self.grid.values(), self.posterior.iter())
            .map(|(theta, p)| theta * p)
            .sum()
    }

    /// Grid value with the largest posterior mass. Ties go to the smallest value.
    pub fn mode(&self) -> f64 {
        let mut best = 0;
        for (idx, &p) in self.posterior.iter().enumerate() {
            if p > self.posterior[best] {
                best = idx;
            }
        }
        self.grid.values()[best]
    }

    /// The highest density set holding at least `cred_mass` of the posterior.
    ///
    /// Grid points are added in order of decreasing mass until the requested
    /// mass is reached. For multimodal posteriors the reported bounds span all
    /// selected points.
    pub fn hdi(&self, cred_mass: f64) -> Result<GridHdi> {
        if !(cred_mass > 0. && cred_mass <= 1.) {
            return invalid(format!("credible mass must be in (0, 1], got {cred_mass}"));
        }
        let mut sorted: Vec<f64> = self.posterior.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));

        let mut cumulative = 0.;
        let mut height = sorted[0];
        // Zero mass points never join the set, even when rounding keeps the
        // sum below a credible mass of 1
        for &p in sorted.iter().take_while(|p| **p > 0.) {
            cumulative += p;
            height = p;
            // Rounding can leave the full sum slightly below 1
            if cumulative >= cred_mass * (1. - 1e-12) {
                break;
            }
        }

        let mut lower = f64::INFINITY;
        let mut upper = f64::NEG_INFINITY;
        let mut mass = 0.;
        for (&theta, &p) in izip!(self.grid.values(), self.posterior.iter()) {
            if p >= height {
                lower = lower.min(theta);
                upper = upper.max(theta);
                mass += p;
            }
        }
        Ok(GridHdi {
            lower,
            upper,
            mass,
            height,
        })
    }

    /// Use this posterior as the prior for further data on the same grid.
    ///
    /// The evidence of the result is that of the new data alone.
    pub fn update(&self, data: &ObservedData) -> Result<PosteriorResult> {
        let prior = PriorMass::new(self.posterior.to_vec())?;
        compute_posterior(&self.grid, &prior, data)
    }
}
