//! Grid approximation for a coin with a tent prior, updated with one toss and
//! then with a longer run of tosses.

use bayes_walk::{compute_posterior, ObservedData, ParameterGrid, PriorMass};

fn main() -> anyhow::Result<()> {
    let grid = ParameterGrid::uniform(0., 1., 1001)?;
    let prior = PriorMass::triangular(&grid)?;

    let first = ObservedData::new(&[1])?;
    let posterior = compute_posterior(&grid, &prior, &first)?;
    println!(
        "after 1 toss: mean {:.4}, mode {:.3}, evidence {:.4}",
        posterior.mean(),
        posterior.mode(),
        posterior.evidence()
    );

    let more = ObservedData::from_counts(17, 40)?;
    let posterior = posterior.update(&more)?;
    let hdi = posterior.hdi(0.95)?;
    println!(
        "after 41 tosses: mean {:.4}, 95% HDI [{:.3}, {:.3}] (mass {:.4})",
        posterior.mean(),
        hdi.lower,
        hdi.upper,
        hdi.mass
    );
    Ok(())
}
