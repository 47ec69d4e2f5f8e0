//! Grid approximation and random-walk Metropolis sampling for a single
//! probability parameter with Bernoulli data.
//!
//! The two entry points are independent:
//!
//! - [`compute_posterior`] applies Bayes' rule on a [`ParameterGrid`] with a
//!   [`PriorMass`] and returns a normalized [`PosteriorResult`].
//! - [`run_chain`] draws a [`MetropolisChain`] from `likelihood * prior`
//!   given by a [`TargetSpecification`], with a locally seeded generator.
//!
//! ```
//! use bayes_walk::{compute_posterior, ObservedData, ParameterGrid, PriorMass};
//!
//! let grid = ParameterGrid::new(vec![0.0, 0.25, 0.5, 0.75, 1.0])?;
//! let prior = PriorMass::new(vec![0.0, 1.0, 2.0, 1.0, 0.0])?;
//! let data = ObservedData::new(&[1])?;
//! let result = compute_posterior(&grid, &prior, &data)?;
//! assert!((result.evidence() - 0.5).abs() < 1e-12);
//! # Ok::<(), bayes_walk::BayesError>(())
//! ```

pub(crate) mod data;
pub(crate) mod error;
pub(crate) mod grid;
pub(crate) mod likelihood;
pub(crate) mod math;
pub(crate) mod metropolis;
pub(crate) mod prior;
pub(crate) mod storage;
pub(crate) mod summary;
pub(crate) mod target;

pub use data::{ObservedData, ParameterGrid, PriorMass};
pub use error::{BayesError, Result};
pub use grid::{compute_posterior, GridHdi, PosteriorResult};
pub use likelihood::{bernoulli_density, bernoulli_likelihood, bernoulli_ln_likelihood};
pub use metropolis::{
    run_chain, sample_parallel, MetropolisChain, MetropolisSettings, MetropolisWalk, Step,
};
pub use prior::{BetaPrior, PriorDensity, UniformPrior};
pub use storage::chains_to_arrow;
pub use summary::{
    effective_sample_size, hdi_of_samples, potential_scale_reduction, summarize,
    summarize_chains, ChainSummary,
};
pub use target::{BernoulliTarget, FnTarget, TargetSpecification};
