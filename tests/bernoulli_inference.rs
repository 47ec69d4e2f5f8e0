use approx::assert_relative_eq;
use bayes_walk::{
    bernoulli_likelihood, compute_posterior, potential_scale_reduction, run_chain,
    sample_parallel, summarize, summarize_chains, BayesError, BernoulliTarget, BetaPrior,
    MetropolisSettings, ObservedData, ParameterGrid, PriorDensity, PriorMass,
    TargetSpecification, UniformPrior,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn grid_example_with_tent_prior() -> anyhow::Result<()> {
    let grid = ParameterGrid::new(vec![0.0, 0.25, 0.5, 0.75, 1.0])?;
    let prior = PriorMass::new(vec![0., 1., 2., 1., 0.])?;
    let data = ObservedData::new(&[1])?;

    let lik = bernoulli_likelihood(grid.values(), &data);
    for (got, want) in lik.iter().zip([0., 0.25, 0.5, 0.75, 1.]) {
        assert_relative_eq!(*got, want, epsilon = 1e-15);
    }

    let result = compute_posterior(&grid, &prior, &data)?;
    assert_relative_eq!(result.evidence(), 0.5, epsilon = 1e-12);
    for (got, want) in result.posterior().iter().zip([0., 0.125, 0.5, 0.375, 0.]) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn likelihood_boundaries() -> anyhow::Result<()> {
    let data = ObservedData::new(&[1, 1, 0])?;
    let lik = bernoulli_likelihood(&[-0.1, 0., 0.5, 1., 1.1], &data);
    assert_eq!([lik[0], lik[1], lik[3], lik[4]], [0.; 4]);
    assert_relative_eq!(lik[2], 0.125, epsilon = 1e-15);
    Ok(())
}

#[test]
fn grid_and_sampler_agree_with_conjugate_posterior() -> anyhow::Result<()> {
    // Beta(2, 2) prior with 7 of 10 successes gives a Beta(9, 5) posterior
    let prior_density = BetaPrior::new(2., 2.)?;
    let data = ObservedData::from_counts(7, 10)?;
    let exact_mean = 9. / 14.;

    let grid = ParameterGrid::uniform(0., 1., 1001)?;
    let prior = PriorMass::from_density(&grid, &prior_density)?;
    let posterior = compute_posterior(&grid, &prior, &data)?;
    assert_relative_eq!(posterior.mean(), exact_mean, epsilon = 1e-4);
    assert_relative_eq!(posterior.mode(), 8. / 12., epsilon = 1e-3);

    let target = BernoulliTarget::new(prior_density);
    let settings = MetropolisSettings {
        chain_length: 20_000,
        burn_in: 500,
        seed: 1,
        num_chains: 4,
        ..Default::default()
    };
    let chains = sample_parallel(&target, &data, &settings, 4)?;
    let summary = summarize_chains(&chains, settings.burn_in, 0.95)?;
    assert!((summary.mean - exact_mean).abs() < 0.01, "mean {}", summary.mean);
    assert!(summary.hdi_lower > 0.3 && summary.hdi_upper < 0.95);
    assert!(summary.effective_sample_size > 1000.);

    let retained: Vec<&[f64]> = chains.iter().map(|c| c.retained(settings.burn_in)).collect();
    let rhat = potential_scale_reduction(&retained)?;
    assert!(rhat < 1.05, "rhat {rhat}");
    Ok(())
}

#[test]
fn flat_prior_grid_matches_beta_density_shape() -> anyhow::Result<()> {
    let grid = ParameterGrid::uniform(0., 1., 201)?;
    let prior = PriorMass::from_density(&grid, &UniformPrior::unit())?;
    let data = ObservedData::from_counts(3, 12)?;
    let posterior = compute_posterior(&grid, &prior, &data)?;

    let exact = BetaPrior::new(4., 10.)?;
    let dens: Vec<f64> = grid.values().iter().map(|&t| exact.density(t)).collect();
    let total: f64 = dens.iter().sum();
    for (p, d) in posterior.posterior().iter().zip(&dens) {
        assert_relative_eq!(*p, d / total, epsilon = 1e-10);
    }
    Ok(())
}

#[test]
fn chain_reproducible_across_calls() -> anyhow::Result<()> {
    let target = BernoulliTarget::new(UniformPrior::unit());
    let data = ObservedData::new(&[0, 1, 1, 0, 1])?;
    let a = run_chain(&target, &data, 0.5, 3000, 0.2, 2024)?;
    let b = run_chain(&target, &data, 0.5, 3000, 0.2, 2024)?;
    assert_eq!(a, b);
    assert_eq!(a.accepted() + a.rejected(), 2999);
    let summary = summarize(a.retained(200), 0.95)?;
    assert!(summary.mean > 0.3 && summary.mean < 0.8);
    Ok(())
}

#[test]
fn error_kinds() {
    let target = BernoulliTarget::new(UniformPrior::unit());
    let data = ObservedData::default();
    assert!(matches!(
        run_chain(&target, &data, -0.1, 10, 0.5, 0),
        Err(BayesError::InvalidArgument(_))
    ));

    let grid = ParameterGrid::new(vec![0., 1.]).unwrap();
    let prior = PriorMass::new(vec![0., 1.]).unwrap();
    let data = ObservedData::new(&[0, 0, 1, 0]).unwrap();
    assert!(matches!(
        compute_posterior(&grid, &prior, &data),
        Err(BayesError::DegeneratePosterior { .. })
    ));
}

proptest! {
    #[test]
    fn posterior_sums_to_one(
        mass in prop::collection::vec(0.0f64..10.0, 1..60),
        successes in 0u64..300,
        failures in 0u64..300,
    ) {
        prop_assume!(mass.iter().sum::<f64>() > 0.);
        let grid = ParameterGrid::uniform(0.01, 0.99, mass.len()).unwrap();
        let prior = PriorMass::new(mass).unwrap();
        let data = ObservedData::from_counts(successes, successes + failures).unwrap();
        let result = compute_posterior(&grid, &prior, &data).unwrap();
        let total: f64 = result.posterior().iter().sum();
        prop_assert!((total - 1.).abs() < 1e-9);
        prop_assert!(result.posterior().iter().all(|p| *p >= 0.));
    }

    #[test]
    fn empty_data_returns_normalized_prior(
        mass in prop::collection::vec(0.0f64..10.0, 1..60),
    ) {
        prop_assume!(mass.iter().sum::<f64>() > 0.);
        let grid = ParameterGrid::uniform(0., 1., mass.len()).unwrap();
        let prior = PriorMass::new(mass).unwrap();
        let result = compute_posterior(&grid, &prior, &ObservedData::default()).unwrap();
        for (p, q) in result.posterior().iter().zip(prior.normalized()) {
            prop_assert!((p - q).abs() < 1e-12);
        }
    }

    #[test]
    fn point_mass_survives_any_data(
        len in 3usize..40,
        idx_frac in 0.0f64..1.0,
        outcomes in prop::collection::vec(0u8..2, 1..50),
    ) {
        // Interior points keep a positive likelihood for every dataset
        let idx = 1 + ((len - 2) as f64 * idx_frac) as usize % (len - 2);
        let grid = ParameterGrid::uniform(0., 1., len).unwrap();
        let mut mass = vec![0.; len];
        mass[idx] = 1.;
        let prior = PriorMass::new(mass).unwrap();
        let data = ObservedData::new(&outcomes).unwrap();
        let result = compute_posterior(&grid, &prior, &data).unwrap();
        for (i, p) in result.posterior().iter().enumerate() {
            if i == idx {
                prop_assert!((p - 1.).abs() < 1e-12);
            } else {
                prop_assert_eq!(*p, 0.);
            }
        }
    }

    #[test]
    fn chain_never_leaves_support(
        seed in any::<u64>(),
        proposal_sd in 0.01f64..5.0,
        start in 0.0f64..=1.0,
        successes in 0u64..20,
        failures in 0u64..20,
    ) {
        let target = BernoulliTarget::new(UniformPrior::unit());
        let data = ObservedData::from_counts(successes, successes + failures).unwrap();
        prop_assume!(target.ln_target_rel_prob(start, &data).is_finite());
        let chain = run_chain(&target, &data, proposal_sd, 500, start, seed).unwrap();
        prop_assert!(chain.draws().iter().all(|x| (0. ..=1.).contains(x)));
    }
}
