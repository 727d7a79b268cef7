//! Analytic knock-out barrier prices.
//!
//! Prices a European vanilla option that dies once the underlying touches a
//! barrier, with continuous monitoring and no rebate, using the
//! Reiner–Rubinstein (1991) decomposition. Discretely monitored Monte Carlo
//! prices sit above this value and approach it as the step shrinks; the
//! Brownian-bridge correction closes most of the gap.

use mc_core::Real;
use mc_instruments::{BarrierType, OptionType};
use mc_math::normal_cdf;

/// Closed-form price of a continuously monitored knock-out option.
///
/// Returns zero when the spot already breaches the barrier, and the
/// intrinsic value for a non-positive `t`.
///
/// # Examples
///
/// ```
/// use mc_instruments::{BarrierType, OptionType};
/// use mc_pricingengines::{analytic_knock_out_price, black_scholes_merton};
///
/// let knock_out = analytic_knock_out_price(
///     OptionType::Call, BarrierType::UpOut, 65.0, 65.0, 80.0, 0.08, 0.0, 0.3, 0.25,
/// );
/// let vanilla = black_scholes_merton(OptionType::Call, 65.0, 65.0, 0.08, 0.0, 0.3, 0.25);
/// assert!(knock_out > 0.0 && knock_out < vanilla);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn analytic_knock_out_price(
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Real,
    strike: Real,
    barrier: Real,
    r: Real,
    q: Real,
    sigma: Real,
    t: Real,
) -> Real {
    if barrier_type.is_breached(spot, barrier) {
        return 0.0;
    }
    let phi = option_type.sign();
    if t <= 0.0 {
        return (phi * (spot - strike)).max(0.0);
    }

    let sigma2 = sigma * sigma;
    let std_dev = sigma * t.sqrt();
    let mu = (r - q - 0.5 * sigma2) / sigma2;
    let eta = match barrier_type {
        BarrierType::DownOut => 1.0,
        BarrierType::UpOut => -1.0,
    };

    let x1 = (spot / strike).ln() / std_dev + (1.0 + mu) * std_dev;
    let x2 = (spot / barrier).ln() / std_dev + (1.0 + mu) * std_dev;
    let y1 = (barrier * barrier / (spot * strike)).ln() / std_dev + (1.0 + mu) * std_dev;
    let y2 = (barrier / spot).ln() / std_dev + (1.0 + mu) * std_dev;

    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();
    let ratio = barrier / spot;

    let a = phi * spot * df_q * normal_cdf(phi * x1)
        - phi * strike * df_r * normal_cdf(phi * (x1 - std_dev));
    let b = phi * spot * df_q * normal_cdf(phi * x2)
        - phi * strike * df_r * normal_cdf(phi * (x2 - std_dev));
    let c = phi * spot * df_q * ratio.powf(2.0 * (mu + 1.0)) * normal_cdf(eta * y1)
        - phi * strike * df_r * ratio.powf(2.0 * mu) * normal_cdf(eta * (y1 - std_dev));
    let d = phi * spot * df_q * ratio.powf(2.0 * (mu + 1.0)) * normal_cdf(eta * y2)
        - phi * strike * df_r * ratio.powf(2.0 * mu) * normal_cdf(eta * (y2 - std_dev));

    let price = match (barrier_type, option_type) {
        (BarrierType::DownOut, OptionType::Call) if strike >= barrier => a - c,
        (BarrierType::DownOut, OptionType::Call) => b - d,
        (BarrierType::DownOut, OptionType::Put) if strike >= barrier => a - b + c - d,
        (BarrierType::DownOut, OptionType::Put) => 0.0,
        (BarrierType::UpOut, OptionType::Call) if strike >= barrier => 0.0,
        (BarrierType::UpOut, OptionType::Call) => a - b + c - d,
        (BarrierType::UpOut, OptionType::Put) if strike >= barrier => b - d,
        (BarrierType::UpOut, OptionType::Put) => a - c,
    };
    price.max(0.0)
}
