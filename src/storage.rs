use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, StructArray, UInt64Builder};

use crate::error::Result;
use crate::metropolis::MetropolisChain;

/// Collect the draws of several chains into one long-format arrow array.
///
/// The struct has the columns `chain`, `draw`, `theta` and `warmup`, where
/// `warmup` marks the first `burn_in` draws of each chain.
pub fn chains_to_arrow(chains: &[MetropolisChain], burn_in: usize) -> Result<StructArray> {
    let total = chains.iter().map(|c| c.len()).sum();
    let mut chain_ids = UInt64Builder::with_capacity(total);
    let mut draw_idx = UInt64Builder::with_capacity(total);
    let mut theta = Float64Builder::with_capacity(total);
    let mut warmup = BooleanBuilder::with_capacity(total);

    for chain in chains {
        for (idx, &value) in chain.draws().iter().enumerate() {
            chain_ids.append_value(chain.chain_id());
            draw_idx.append_value(idx as u64);
            theta.append_value(value);
            warmup.append_value(idx < burn_in);
        }
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("chain", Arc::new(chain_ids.finish())),
        ("draw", Arc::new(draw_idx.finish())),
        ("theta", Arc::new(theta.finish())),
        ("warmup", Arc::new(warmup.finish())),
    ];
    Ok(StructArray::try_from(columns)?)
}
