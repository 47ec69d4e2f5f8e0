use anyhow::{Context, Result as AnyResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::data::ObservedData;
use crate::error::{invalid, BayesError, Result};
use crate::target::TargetSpecification;

/// Settings for a random-walk Metropolis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetropolisSettings {
    /// Standard deviation of the Gaussian proposal jump.
    pub proposal_sd: f64,
    /// Total number of states in each chain, including the start value.
    pub chain_length: usize,
    /// Initial state of every chain.
    pub start_value: f64,
    /// Number of leading draws that summaries and traces treat as warmup.
    pub burn_in: usize,
    pub seed: u64,
    /// Number of chains for [`sample_parallel`].
    pub num_chains: usize,
}

impl Default for MetropolisSettings {
    fn default() -> Self {
        Self {
            proposal_sd: 0.2,
            chain_length: 50_000,
            start_value: 0.01,
            burn_in: 500,
            seed: 0,
            num_chains: 4,
        }
    }
}

impl MetropolisSettings {
    pub fn validate(&self) -> Result<()> {
        validate_proposal(self.proposal_sd, self.chain_length)?;
        if self.num_chains < 1 {
            return invalid("num_chains must be at least 1");
        }
        if self.burn_in >= self.chain_length {
            return invalid(format!(
                "burn_in ({}) must be smaller than chain_length ({})",
                self.burn_in, self.chain_length
            ));
        }
        Ok(())
    }

    /// Run a single chain with these settings.
    pub fn run<T: TargetSpecification + ?Sized>(
        &self,
        target: &T,
        data: &ObservedData,
    ) -> Result<MetropolisChain> {
        run_chain(
            target,
            data,
            self.proposal_sd,
            self.chain_length,
            self.start_value,
            self.seed,
        )
    }

    /// A lazy, unbounded walk with these settings.
    pub fn walk<'a, T: TargetSpecification + ?Sized>(
        &self,
        target: &'a T,
        data: &'a ObservedData,
    ) -> Result<MetropolisWalk<'a, T>> {
        MetropolisWalk::new(
            target,
            data,
            self.proposal_sd,
            self.start_value,
            ChaCha8Rng::seed_from_u64(self.seed),
        )
    }
}

fn validate_proposal(proposal_sd: f64, chain_length: usize) -> Result<()> {
    if !(proposal_sd.is_finite() && proposal_sd > 0.) {
        return invalid(format!(
            "proposal_sd must be finite and positive, got {proposal_sd}"
        ));
    }
    if chain_length < 1 {
        return invalid("chain_length must be at least 1");
    }
    Ok(())
}

/// One state of a Metropolis walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub theta: f64,
    /// Whether the proposal leading to this state was accepted.
    /// `None` for the start value.
    pub accepted: Option<bool>,
}

/// Random-walk Metropolis as an iterator over states.
///
/// The first item is the start value. Every following item consumes exactly
/// one Gaussian jump and then one uniform draw from the generator.
pub struct MetropolisWalk<'a, T: TargetSpecification + ?Sized, R: Rng = ChaCha8Rng> {
    target: &'a T,
    data: &'a ObservedData,
    jump: Normal<f64>,
    rng: R,
    current: f64,
    current_ln_prob: f64,
    started: bool,
    accepted: u64,
    rejected: u64,
}

impl<'a, T: TargetSpecification + ?Sized, R: Rng> MetropolisWalk<'a, T, R> {
    pub fn new(
        target: &'a T,
        data: &'a ObservedData,
        proposal_sd: f64,
        start_value: f64,
        rng: R,
    ) -> Result<Self> {
        validate_proposal(proposal_sd, 1)?;
        let jump = Normal::new(0., proposal_sd)
            .map_err(|err| BayesError::InvalidArgument(format!("proposal_sd: {err}")))?;
        let current_ln_prob = target.ln_target_rel_prob(start_value, data);
        if current_ln_prob == f64::NEG_INFINITY || current_ln_prob.is_nan() {
            warn!(
                start_value,
                current_ln_prob,
                "chain starts where the target density is zero or undefined, \
                 the first valid proposal is always accepted"
            );
        }
        Ok(MetropolisWalk {
            target,
            data,
            jump,
            rng,
            current: start_value,
            current_ln_prob,
            started: false,
            accepted: 0,
            rejected: 0,
        })
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    fn advance(&mut self) -> Step {
        let delta = self.jump.sample(&mut self.rng);
        let proposal = self.current + delta;
        let proposal_ln_prob = self.target.ln_target_rel_prob(proposal, self.data);

        // A zero or undefined density current state makes the ratio infinite
        let accept_prob = if proposal_ln_prob.is_nan() {
            0.
        } else if self.current_ln_prob == f64::NEG_INFINITY || self.current_ln_prob.is_nan() {
            1.
        } else {
            (proposal_ln_prob - self.current_ln_prob).exp().min(1.)
        };

        let u: f64 = self.rng.random();
        let accepted = u < accept_prob;
        if accepted {
            self.current = proposal;
            self.current_ln_prob = proposal_ln_prob;
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
        Step {
            theta: self.current,
            accepted: Some(accepted),
        }
    }
}

impl<T: TargetSpecification + ?Sized, R: Rng> Iterator for MetropolisWalk<'_, T, R> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if !self.started {
            self.started = true;
            return Some(Step {
                theta: self.current,
                accepted: None,
            });
        }
        Some(self.advance())
    }
}

/// A finished Metropolis trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct MetropolisChain {
    chain_id: u64,
    draws: Box<[f64]>,
    accepted: u64,
    rejected: u64,
}

impl MetropolisChain {
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// All states, starting with the start value.
    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    /// The draws after discarding the first `burn_in` states.
    pub fn retained(&self, burn_in: usize) -> &[f64] {
        &self.draws[burn_in.min(self.draws.len())..]
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Fraction of accepted proposals, 0 for a chain without proposals.
    pub fn acceptance_rate(&self) -> f64 {
        let proposed = self.accepted + self.rejected;
        if proposed == 0 {
            return 0.;
        }
        self.accepted as f64 / proposed as f64
    }
}

fn collect_chain<T: TargetSpecification + ?Sized, R: Rng>(
    mut walk: MetropolisWalk<'_, T, R>,
    chain_length: usize,
    chain_id: u64,
) -> MetropolisChain {
    let draws: Box<[f64]> = walk.by_ref().take(chain_length).map(|step| step.theta).collect();
    let chain = MetropolisChain {
        chain_id,
        draws,
        accepted: walk.accepted(),
        rejected: walk.rejected(),
    };
    debug!(
        chain = chain_id,
        accepted = chain.accepted,
        rejected = chain.rejected,
        acceptance_rate = chain.acceptance_rate(),
        "finished chain"
    );
    chain
}

/// Draw a chain of `chain_length` states from `likelihood * prior`.
///
/// The generator is a `ChaCha8Rng` seeded with `seed`, so identical arguments
/// produce bit-identical chains.
pub fn run_chain<T: TargetSpecification + ?Sized>(
    target: &T,
    data: &ObservedData,
    proposal_sd: f64,
    chain_length: usize,
    start_value: f64,
    seed: u64,
) -> Result<MetropolisChain> {
    validate_proposal(proposal_sd, chain_length)?;
    debug!(seed, proposal_sd, chain_length, start_value, "starting chain");
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let walk = MetropolisWalk::new(target, data, proposal_sd, start_value, rng)?;
    Ok(collect_chain(walk, chain_length, 0))
}

/// Run `settings.num_chains` independent chains on a thread pool.
///
/// Every chain uses `settings.seed` and its own generator stream, chain `k`
/// uses stream `k`. Chain 0 is therefore identical to [`run_chain`] with the
/// same arguments, and the result does not depend on `num_threads`.
pub fn sample_parallel<T: TargetSpecification + ?Sized>(
    target: &T,
    data: &ObservedData,
    settings: &MetropolisSettings,
    num_threads: usize,
) -> AnyResult<Vec<MetropolisChain>> {
    settings.validate().context("Invalid sampler settings")?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("metropolis-worker-{}", i))
        .build()
        .context("Could not start thread pool")?;

    info!(
        num_chains = settings.num_chains,
        num_threads,
        chain_length = settings.chain_length,
        "starting parallel sampling"
    );

    let chains = pool.install(|| {
        (0..settings.num_chains as u64)
            .into_par_iter()
            .map(|chain_id| -> AnyResult<MetropolisChain> {
                let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
                rng.set_stream(chain_id);
                let walk = MetropolisWalk::new(
                    target,
                    data,
                    settings.proposal_sd,
                    settings.start_value,
                    rng,
                )
                .with_context(|| format!("Could not start chain {chain_id}"))?;
                Ok(collect_chain(walk, settings.chain_length, chain_id))
            })
            .collect::<AnyResult<Vec<_>>>()
    })?;

    info!(num_chains = chains.len(), "finished parallel sampling");
    Ok(chains)
}
