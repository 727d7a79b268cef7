//! Option contract data and barrier conventions.

use crate::payoff::{OptionType, Payoff, PlainVanillaPayoff};
use mc_core::{ensure, DiscountFactor, Rate, Real, Result, Time, Volatility};

/// The data describing a European-style option.
///
/// Besides storing the contract terms, `OptionData` produces the two
/// closures a pricer consumes: the payoff of one real argument and the
/// discounter of no arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionData {
    /// Strike price `K`.
    pub strike: Real,
    /// Time to expiry `T` in years.
    pub expiry: Time,
    /// Risk-free rate `r`, also used for discounting.
    pub rate: Rate,
    /// Volatility `σ`.
    pub volatility: Volatility,
    /// Continuous dividend yield `q`.
    pub dividend: Rate,
    /// Call or put.
    pub option_type: OptionType,
}

impl OptionData {
    /// Create validated option data.
    pub fn new(
        strike: Real,
        expiry: Time,
        rate: Rate,
        volatility: Volatility,
        dividend: Rate,
        option_type: OptionType,
    ) -> Result<Self> {
        ensure!(strike.is_finite() && strike >= 0.0, "strike must be non-negative, got {strike}");
        ensure!(expiry.is_finite() && expiry > 0.0, "expiry must be positive, got {expiry}");
        ensure!(rate.is_finite() && dividend.is_finite(), "rate and dividend must be finite");
        ensure!(
            volatility.is_finite() && volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        Ok(Self {
            strike,
            expiry,
            rate,
            volatility,
            dividend,
            option_type,
        })
    }

    /// The vanilla payoff for these terms.
    pub fn vanilla_payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// Payoff closure `S ↦ max(φ(S − K), 0)`.
    pub fn payoff(&self) -> impl Fn(Real) -> Real + Clone + Send + Sync + 'static {
        let payoff = self.vanilla_payoff();
        move |s| payoff.value(s)
    }

    /// `e^{−rT}`.
    pub fn discount_factor(&self) -> DiscountFactor {
        (-self.rate * self.expiry).exp()
    }

    /// Discounter closure returning [`discount_factor`](Self::discount_factor).
    pub fn discounter(&self) -> impl Fn() -> DiscountFactor + Clone + Send + Sync + 'static {
        let (rate, expiry) = (self.rate, self.expiry);
        move || (-rate * expiry).exp()
    }
}

/// Knock-out barrier direction.
///
/// An out barrier voids the payoff once the underlying touches the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarrierType {
    /// Knocked out when the underlying rises to or above the barrier.
    #[default]
    UpOut,
    /// Knocked out when the underlying falls to or below the barrier.
    DownOut,
}

impl BarrierType {
    /// Whether `value` breaches a barrier at `level`.
    pub fn is_breached(self, value: Real, level: Real) -> bool {
        match self {
            BarrierType::UpOut => value >= level,
            BarrierType::DownOut => value <= level,
        }
    }
}
