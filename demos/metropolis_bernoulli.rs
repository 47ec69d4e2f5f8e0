//! Random-walk Metropolis for a coin with a Beta(1, 1) prior, comparing three
//! proposal widths.

use arrow::array::Array;
use bayes_walk::{
    chains_to_arrow, sample_parallel, summarize, summarize_chains, BernoulliTarget, BetaPrior,
    MetropolisSettings, ObservedData,
};

fn main() -> anyhow::Result<()> {
    let data = ObservedData::new(&[1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 1])?;
    let target = BernoulliTarget::new(BetaPrior::new(1., 1.)?);

    for proposal_sd in [0.02, 0.2, 2.0] {
        let settings = MetropolisSettings {
            proposal_sd,
            seed: 47405,
            num_chains: 1,
            ..Default::default()
        };
        let chain = settings.run(&target, &data)?;
        let summary = summarize(chain.retained(settings.burn_in), 0.95)?;
        println!(
            "sd {proposal_sd:>4}: accepted {:.3}, mean {:.3}, HDI [{:.3}, {:.3}], ESS {:.0}",
            chain.acceptance_rate(),
            summary.mean,
            summary.hdi_lower,
            summary.hdi_upper,
            summary.effective_sample_size
        );
    }

    let settings = MetropolisSettings {
        seed: 47405,
        ..Default::default()
    };
    let chains = sample_parallel(&target, &data, &settings, 4)?;
    let summary = summarize_chains(&chains, settings.burn_in, 0.95)?;
    let trace = chains_to_arrow(&chains, settings.burn_in)?;
    println!(
        "{} chains: mean {:.3}, ESS {:.0}, {} rows in trace",
        chains.len(),
        summary.mean,
        summary.effective_sample_size,
        trace.len()
    );
    Ok(())
}
