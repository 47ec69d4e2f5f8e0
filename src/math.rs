/// `ln(sum(exp(values)))`, returning `-inf` for an empty slice or if all
/// values are `-inf`.
pub(crate) fn logsumexp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    if max == f64::INFINITY {
        return max;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// `x * ln(y)` with the convention `0 * ln(0) = 0`.
#[inline]
pub(crate) fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0. {
        0.
    } else {
        x * y.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn logsumexp_survives_underflow() {
        let vals = [-1000., -1000., f64::NEG_INFINITY];
        assert_relative_eq!(logsumexp(&vals), -1000. + 2f64.ln(), epsilon = 1e-12);
        assert_eq!(logsumexp(&[]), f64::NEG_INFINITY);
        assert_eq!(logsumexp(&[f64::NEG_INFINITY; 3]), f64::NEG_INFINITY);
    }

    #[test]
    fn xlogy_zero() {
        assert_eq!(xlogy(0., 0.), 0.);
        assert_eq!(xlogy(2., 0.), f64::NEG_INFINITY);
        assert_relative_eq!(xlogy(2., 0.5), 2. * 0.5f64.ln());
    }
}
