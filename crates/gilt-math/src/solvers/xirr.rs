//! XNPV/XIRR for irregularly dated cash flows.
//!
//! Gilt present-value and index-linked yield calculations both need a
//! discount rate applied over actual/365.25 year fractions rather than the
//! whole-period compounding `newton_raphson`'s callers elsewhere assume.
//! These two functions isolate that one piece of date arithmetic so the
//! caller only has to supply `(year_fraction, amount)` pairs.

use crate::error::MathResult;
use crate::solvers::{newton_raphson_numerical, SolverConfig, SolverResult};

/// Net present value of cash flows at `rate`, each discounted by
/// `(1+rate)^year_fraction`.
///
/// `flows` pairs a year fraction from the anchor date (actual/365.25) with
/// the cash amount at that date; the anchor itself is flow `(0.0, amount)`.
#[must_use]
pub fn xnpv(rate: f64, flows: &[(f64, f64)]) -> f64 {
    flows
        .iter()
        .map(|&(t, amount)| amount / (1.0 + rate).powf(t))
        .sum()
}

/// Solves for the rate at which [`xnpv`] of `flows` is zero.
///
/// Uses Newton-Raphson with a numerically estimated derivative, seeded at
/// `initial_guess` (conventionally `0.05`).
///
/// # Errors
///
/// Returns `MathError::ConvergenceFailed` if the iteration does not settle
/// within `config.max_iterations`.
pub fn xirr(flows: &[(f64, f64)], initial_guess: f64, config: &SolverConfig) -> MathResult<SolverResult> {
    newton_raphson_numerical(|rate| xnpv(rate, flows), initial_guess, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn xnpv_of_flat_flows_at_zero_rate_is_sum() {
        let flows = [(0.0, -100.0), (1.0, 50.0), (2.0, 60.0)];
        assert_relative_eq!(xnpv(0.0, &flows), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn xirr_recovers_known_rate() {
        // -100 today, 110 in exactly one year => 10% IRR.
        let flows = [(0.0, -100.0), (1.0, 110.0)];
        let result = xirr(&flows, 0.05, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn xirr_handles_multiple_cash_flows() {
        let flows = [(0.0, -1000.0), (0.5, 20.0), (1.0, 20.0), (1.0, 1000.0)];
        let result = xirr(&flows, 0.05, &SolverConfig::default()).unwrap();
        assert!(result.root > 0.0 && result.root < 0.1);
    }
}
