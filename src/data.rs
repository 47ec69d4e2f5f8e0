//! Typed inputs for the grid updater and the Metropolis sampler.

use crate::error::{invalid, Result};
use crate::prior::PriorDensity;

/// Strictly increasing, finite parameter values θ₀ … θₙ₋₁.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    values: Box<[f64]>,
}

impl ParameterGrid {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return invalid("parameter grid must contain at least one value");
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return invalid(format!("parameter grid contains non-finite value {bad}"));
        }
        if let Some(idx) = values.windows(2).position(|w| w[0] >= w[1]) {
            return invalid(format!(
                "parameter grid is not strictly increasing at index {}",
                idx + 1
            ));
        }
        Ok(ParameterGrid {
            values: values.into(),
        })
    }

    /// `num_points` evenly spaced values from `lower` to `upper`, both included.
    pub fn uniform(lower: f64, upper: f64, num_points: usize) -> Result<Self> {
        if num_points == 0 {
            return invalid("parameter grid must contain at least one value");
        }
        if num_points == 1 {
            return Self::new(vec![lower]);
        }
        let step = (upper - lower) / (num_points - 1) as f64;
        let mut values: Vec<f64> = (0..num_points)
            .map(|i| lower + step * i as f64)
            .collect();
        // Avoid rounding drift on the last point
        values[num_points - 1] = upper;
        Self::new(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Nonnegative prior weights aligned with a [`ParameterGrid`].
///
/// The weights need not be normalized, but they must have a positive sum.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorMass {
    mass: Box<[f64]>,
    // Largest weight and the sum of the weights divided by it, so that
    // finite weights whose sum overflows stay usable
    scale: f64,
    scaled_total: f64,
}

impl PriorMass {
    pub fn new(mass: Vec<f64>) -> Result<Self> {
        if let Some((idx, val)) = mass
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.)
        {
            return invalid(format!(
                "prior mass must be finite and nonnegative, got {val} at index {idx}"
            ));
        }
        let scale = mass.iter().copied().fold(0., f64::max);
        if scale <= 0. {
            return invalid("prior mass must have a strictly positive sum");
        }
        let scaled_total = mass.iter().map(|m| m / scale).sum();
        Ok(PriorMass {
            mass: mass.into(),
            scale,
            scaled_total,
        })
    }

    /// Evaluate a prior density at every grid point.
    pub fn from_density<P: PriorDensity + ?Sized>(grid: &ParameterGrid, prior: &P) -> Result<Self> {
        Self::new(grid.values().iter().map(|&theta| prior.density(theta)).collect())
    }

    /// The tent prior `min(θ, 1 - θ)`, zero outside [0, 1].
    pub fn triangular(grid: &ParameterGrid) -> Result<Self> {
        Self::new(
            grid.values()
                .iter()
                .map(|&theta| theta.min(1. - theta).max(0.))
                .collect(),
        )
    }

    pub fn mass(&self) -> &[f64] {
        &self.mass
    }

    /// Sum of the weights. This is infinite if the sum overflows, see
    /// [`PriorMass::ln_total`].
    pub fn total(&self) -> f64 {
        self.scale * self.scaled_total
    }

    pub fn ln_total(&self) -> f64 {
        self.scale.ln() + self.scaled_total.ln()
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    /// The weights divided by their sum.
    pub fn normalized(&self) -> Vec<f64> {
        self.mass
            .iter()
            .map(|m| m / self.scale / self.scaled_total)
            .collect()
    }
}

/// Outcomes of a sequence of Bernoulli trials.
///
/// Only the number of successes and the number of trials are kept,
/// the likelihood does not depend on the order of the outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservedData {
    successes: u64,
    trials: u64,
}

impl ObservedData {
    /// Build from 0/1 outcomes. Any other value is rejected.
    pub fn new(outcomes: &[u8]) -> Result<Self> {
        if let Some(idx) = outcomes.iter().position(|&v| v > 1) {
            return invalid(format!(
                "observed outcomes must be 0 or 1, got {} at index {idx}",
                outcomes[idx]
            ));
        }
        Ok(ObservedData {
            successes: outcomes.iter().filter(|&&v| v == 1).count() as u64,
            trials: outcomes.len() as u64,
        })
    }

    pub fn from_bools(outcomes: &[bool]) -> Self {
        ObservedData {
            successes: outcomes.iter().filter(|&&v| v).count() as u64,
            trials: outcomes.len() as u64,
        }
    }

    pub fn from_counts(successes: u64, trials: u64) -> Result<Self> {
        if successes > trials {
            return invalid(format!(
                "number of successes ({successes}) exceeds number of trials ({trials})"
            ));
        }
        Ok(ObservedData { successes, trials })
    }

    /// z, the number of ones.
    pub fn successes(&self) -> u64 {
        self.successes
    }

    /// N, the number of trials.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn failures(&self) -> u64 {
        self.trials - self.successes
    }

    pub fn is_empty(&self) -> bool {
        self.trials == 0
    }
}
