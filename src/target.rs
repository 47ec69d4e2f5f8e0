use crate::data::ObservedData;
use crate::likelihood::{bernoulli_density, bernoulli_ln_likelihood};
use crate::prior::PriorDensity;

/// An unnormalized target density `likelihood(θ; data) * prior(θ)`.
///
/// Both the likelihood and the prior must return exactly 0 for parameter
/// values outside the valid support. The sampler relies on this to reject
/// proposals that leave the support.
pub trait TargetSpecification: Send + Sync {
    fn likelihood(&self, theta: f64, data: &ObservedData) -> f64;

    fn prior(&self, theta: f64) -> f64;

    /// `likelihood * prior`.
    fn target_rel_prob(&self, theta: f64, data: &ObservedData) -> f64 {
        self.likelihood(theta, data) * self.prior(theta)
    }

    /// Log of [`TargetSpecification::target_rel_prob`], `-inf` where it is zero.
    ///
    /// Implementations can override this to avoid underflow for large datasets.
    fn ln_target_rel_prob(&self, theta: f64, data: &ObservedData) -> f64 {
        self.target_rel_prob(theta, data).ln()
    }
}

/// Bernoulli likelihood combined with an arbitrary prior density.
#[derive(Debug, Clone, Copy)]
pub struct BernoulliTarget<P: PriorDensity> {
    prior: P,
}

impl<P: PriorDensity> BernoulliTarget<P> {
    pub fn new(prior: P) -> Self {
        BernoulliTarget { prior }
    }

    pub fn prior_density(&self) -> &P {
        &self.prior
    }
}

impl<P: PriorDensity> TargetSpecification for BernoulliTarget<P> {
    fn likelihood(&self, theta: f64, data: &ObservedData) -> f64 {
        bernoulli_density(theta, data)
    }

    fn prior(&self, theta: f64) -> f64 {
        self.prior.density(theta)
    }

    fn ln_target_rel_prob(&self, theta: f64, data: &ObservedData) -> f64 {
        let ln_lik = bernoulli_ln_likelihood(theta, data.successes(), data.trials());
        if ln_lik == f64::NEG_INFINITY {
            return ln_lik;
        }
        ln_lik + self.prior.ln_density(theta)
    }
}

/// A target built from a likelihood closure and a prior closure.
pub struct FnTarget<L, P>
where
    L: Fn(f64, &ObservedData) -> f64 + Send + Sync,
    P: Fn(f64) -> f64 + Send + Sync,
{
    likelihood: L,
    prior: P,
}

impl<L, P> FnTarget<L, P>
where
    L: Fn(f64, &ObservedData) -> f64 + Send + Sync,
    P: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(likelihood: L, prior: P) -> Self {
        FnTarget { likelihood, prior }
    }
}

impl<L, P> TargetSpecification for FnTarget<L, P>
where
    L: Fn(f64, &ObservedData) -> f64 + Send + Sync,
    P: Fn(f64) -> f64 + Send + Sync,
{
    fn likelihood(&self, theta: f64, data: &ObservedData) -> f64 {
        (self.likelihood)(theta, data)
    }

    fn prior(&self, theta: f64) -> f64 {
        (self.prior)(theta)
    }
}
