use statrs::function::beta::ln_beta;

use crate::error::{invalid, Result};
use crate::math::xlogy;

/// A prior density over a scalar parameter.
///
/// Implementations must return exactly 0 outside their support.
pub trait PriorDensity: Send + Sync {
    fn density(&self, theta: f64) -> f64;

    /// Log density, `-inf` outside the support.
    fn ln_density(&self, theta: f64) -> f64 {
        self.density(theta).ln()
    }
}

/// Constant density on `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPrior {
    lower: f64,
    upper: f64,
}

impl UniformPrior {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
            return invalid(format!(
                "uniform prior needs finite bounds with lower < upper, got [{lower}, {upper}]"
            ));
        }
        Ok(UniformPrior { lower, upper })
    }

    /// The uniform prior on [0, 1].
    pub fn unit() -> Self {
        UniformPrior {
            lower: 0.,
            upper: 1.,
        }
    }
}

impl PriorDensity for UniformPrior {
    fn density(&self, theta: f64) -> f64 {
        if (self.lower..=self.upper).contains(&theta) {
            1. / (self.upper - self.lower)
        } else {
            0.
        }
    }
}

/// Beta(a, b) density on [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaPrior {
    a: f64,
    b: f64,
    ln_norm: f64,
}

impl BetaPrior {
    pub fn new(a: f64, b: f64) -> Result<Self> {
        if !(a.is_finite() && b.is_finite() && a > 0. && b > 0.) {
            return invalid(format!(
                "beta prior shape parameters must be finite and positive, got ({a}, {b})"
            ));
        }
        Ok(BetaPrior {
            a,
            b,
            ln_norm: ln_beta(a, b),
        })
    }

    /// Beta prior with a given mode and concentration `kappa = a + b`.
    ///
    /// Needs `kappa > 2` and a mode strictly inside (0, 1).
    pub fn from_mode_concentration(mode: f64, kappa: f64) -> Result<Self> {
        if !(mode > 0. && mode < 1.) || !(kappa > 2.) {
            return invalid(format!(
                "beta prior needs 0 < mode < 1 and kappa > 2, got mode={mode}, kappa={kappa}"
            ));
        }
        Self::new(mode * (kappa - 2.) + 1., (1. - mode) * (kappa - 2.) + 1.)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn mean(&self) -> f64 {
        self.a / (self.a + self.b)
    }
}

impl PriorDensity for BetaPrior {
    fn density(&self, theta: f64) -> f64 {
        self.ln_density(theta).exp()
    }

    fn ln_density(&self, theta: f64) -> f64 {
        if !(0. ..=1.).contains(&theta) {
            return f64::NEG_INFINITY;
        }
        xlogy(self.a - 1., theta) + xlogy(self.b - 1., 1. - theta) - self.ln_norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_support() {
        let prior = UniformPrior::unit();
        assert_eq!(prior.density(-0.01), 0.);
        assert_eq!(prior.density(0.), 1.);
        assert_eq!(prior.density(1.), 1.);
        assert_eq!(prior.density(1.01), 0.);
        assert_eq!(prior.ln_density(2.), f64::NEG_INFINITY);

        let wide = UniformPrior::new(-1., 3.).unwrap();
        assert_eq!(wide.density(2.), 0.25);
        assert!(UniformPrior::new(1., 1.).is_err());
    }

    #[test]
    fn beta_density() {
        let flat = BetaPrior::new(1., 1.).unwrap();
        assert_relative_eq!(flat.density(0.3), 1., epsilon = 1e-12);
        assert_relative_eq!(flat.density(0.), 1., epsilon = 1e-12);

        // Beta(2, 2) has density 6 θ (1 - θ)
        let prior = BetaPrior::new(2., 2.).unwrap();
        assert_relative_eq!(prior.density(0.5), 1.5, epsilon = 1e-12);
        assert_relative_eq!(prior.density(0.25), 6. * 0.25 * 0.75, epsilon = 1e-12);
        assert_eq!(prior.density(0.), 0.);
        assert_eq!(prior.density(-0.5), 0.);
        assert_eq!(prior.density(1.5), 0.);
        assert!(BetaPrior::new(0., 1.).is_err());
    }

    #[test]
    fn beta_from_mode() {
        let prior = BetaPrior::from_mode_concentration(0.75, 12.).unwrap();
        assert_relative_eq!(prior.a(), 8.5);
        assert_relative_eq!(prior.b(), 3.5);
        assert!(BetaPrior::from_mode_concentration(0.5, 2.).is_err());
    }
}
