//! Analytic European option prices (Black–Scholes–Merton).
//!
//! Monte Carlo estimates of vanilla payoffs under geometric Brownian motion
//! converge to these values, so the tests of the simulation compare against
//! them.

use mc_core::Real;
use mc_instruments::OptionType;
use mc_math::normal_cdf;

/// Black–Scholes–Merton price of a European option:
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// with $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$.
///
/// A non-positive `time_to_expiry` returns the intrinsic value.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    dividend_yield: Real,
    volatility: Real,
    time_to_expiry: Real,
) -> Real {
    let phi = option_type.sign();
    let t = time_to_expiry;

    if t <= 0.0 {
        return (phi * (spot - strike)).max(0.0);
    }

    let r = risk_free_rate;
    let q = dividend_yield;
    let sigma = volatility;
    let std_dev = sigma * t.sqrt();
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();
    let fwd = spot * ((r - q) * t).exp();

    let (d1, d2) = if std_dev > 1e-15 {
        let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
        (d1, d1 - std_dev)
    } else {
        // Degenerate volatility: the forward decides the sign.
        let big = if fwd > strike { 1e15 } else { -1e15 };
        (big, big)
    };

    phi * (spot * df_q * normal_cdf(phi * d1) - strike * df_r * normal_cdf(phi * d2))
}
