//! Payoff accumulators fed by the mediator.
//!
//! A pricer is handed every simulated path through
//! [`process_path`](PathPricer::process_path) and turns the running sum of
//! payoffs into a discounted price when [`post_process`](PathPricer::post_process)
//! is called at the end of the run:
//!
//! ```text
//! price = discount_factor() · Σ payoff / paths_processed
//! ```

use super::Path;
use mc_core::{fail, DiscountFactor, Price, Real, Result, Size, Time};
use mc_instruments::BarrierType;
use mc_math::{MersenneTwisterUniformRng, Statistics};
use mc_processes::Sde;
use std::fmt;
use std::sync::Arc;

/// A payoff accumulator.
pub trait PathPricer {
    /// Fold one path into the running sum.
    fn process_path(&mut self, path: &Path);

    /// Finalize the price from the paths seen so far.
    ///
    /// Fails when no path has been processed. Calling it again without new
    /// paths yields the same price.
    fn post_process(&mut self) -> Result<()>;

    /// Discount factor applied to the average payoff.
    fn discount_factor(&self) -> DiscountFactor;

    /// The finalized price, `None` before the first `post_process`.
    fn price(&self) -> Option<Price>;

    /// Number of paths folded in so far.
    fn paths_processed(&self) -> Size;

    /// Discounted standard error of the price estimate, `None` with fewer
    /// than two paths.
    fn standard_error(&self) -> Option<Real>;

    /// Human-readable pricer name.
    fn name(&self) -> &'static str;
}

type PayoffFn = Box<dyn Fn(Real) -> Real>;
type DiscountFn = Box<dyn Fn() -> DiscountFactor>;

/// Running payoff statistics shared by every pricer.
struct Accumulator {
    payoff: PayoffFn,
    discounter: DiscountFn,
    stats: Statistics,
    price: Option<Price>,
}

impl Accumulator {
    fn new<F, D>(payoff: F, discounter: D) -> Self
    where
        F: Fn(Real) -> Real + 'static,
        D: Fn() -> DiscountFactor + 'static,
    {
        Self {
            payoff: Box::new(payoff),
            discounter: Box::new(discounter),
            stats: Statistics::new(),
            price: None,
        }
    }

    fn payoff(&self, x: Real) -> Real {
        (self.payoff)(x)
    }

    fn add(&mut self, value: Real) {
        self.stats.add(value);
    }

    fn discount_factor(&self) -> DiscountFactor {
        (self.discounter)()
    }

    fn finalize(&mut self, pricer: &'static str) -> Result<()> {
        let paths = self.stats.samples();
        if paths == 0 {
            fail!("{pricer}: cannot compute a price before any path was processed");
        }
        let price = self.discount_factor() * self.stats.sum() / paths as Real;
        tracing::info!(pricer, price, paths, "price finalized");
        self.price = Some(price);
        Ok(())
    }

    fn standard_error(&self) -> Option<Real> {
        self.stats
            .error_estimate()
            .map(|e| e * self.discount_factor())
    }
}

impl fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("stats", &self.stats)
            .field("price", &self.price)
            .finish_non_exhaustive()
    }
}

macro_rules! accumulator_methods {
    () => {
        fn post_process(&mut self) -> Result<()> {
            self.acc.finalize(Self::NAME)
        }

        fn discount_factor(&self) -> DiscountFactor {
            self.acc.discount_factor()
        }

        fn price(&self) -> Option<Price> {
            self.acc.price
        }

        fn paths_processed(&self) -> Size {
            self.acc.stats.samples()
        }

        fn standard_error(&self) -> Option<Real> {
            self.acc.standard_error()
        }

        fn name(&self) -> &'static str {
            Self::NAME
        }
    };
}

// ─── European ─────────────────────────────────────────────────────────────────

/// Payoff of the terminal value.
#[derive(Debug)]
pub struct EuropeanPricer {
    acc: Accumulator,
}

impl EuropeanPricer {
    /// Pricer name.
    pub const NAME: &'static str = "European";

    /// Create a pricer from a payoff and a discounter.
    pub fn new<F, D>(payoff: F, discounter: D) -> Self
    where
        F: Fn(Real) -> Real + 'static,
        D: Fn() -> DiscountFactor + 'static,
    {
        Self {
            acc: Accumulator::new(payoff, discounter),
        }
    }
}

impl PathPricer for EuropeanPricer {
    fn process_path(&mut self, path: &Path) {
        let value = self.acc.payoff(path.back());
        self.acc.add(value);
    }

    accumulator_methods!();
}

// ─── Asian ────────────────────────────────────────────────────────────────────

/// Payoff of the arithmetic average over every point of the path, the
/// initial value included.
#[derive(Debug)]
pub struct AsianPricer {
    acc: Accumulator,
}

impl AsianPricer {
    /// Pricer name.
    pub const NAME: &'static str = "Asian";

    /// Create a pricer from a payoff and a discounter.
    pub fn new<F, D>(payoff: F, discounter: D) -> Self
    where
        F: Fn(Real) -> Real + 'static,
        D: Fn() -> DiscountFactor + 'static,
    {
        Self {
            acc: Accumulator::new(payoff, discounter),
        }
    }
}

impl PathPricer for AsianPricer {
    fn process_path(&mut self, path: &Path) {
        let value = self.acc.payoff(path.mean());
        self.acc.add(value);
    }

    accumulator_methods!();
}

// ─── Barrier ──────────────────────────────────────────────────────────────────

/// Discretely monitored knock-out option.
///
/// If any sampled value breaches the barrier the path pays the rebate,
/// otherwise the payoff of its terminal value.
#[derive(Debug)]
pub struct BarrierPricer {
    acc: Accumulator,
    level: Real,
    rebate: Real,
    barrier_type: BarrierType,
}

impl BarrierPricer {
    /// Pricer name.
    pub const NAME: &'static str = "Barrier";

    /// Up-and-out barrier at `level` with zero rebate.
    pub fn new<F, D>(payoff: F, discounter: D, level: Real) -> Self
    where
        F: Fn(Real) -> Real + 'static,
        D: Fn() -> DiscountFactor + 'static,
    {
        Self {
            acc: Accumulator::new(payoff, discounter),
            level,
            rebate: 0.0,
            barrier_type: BarrierType::default(),
        }
    }

    /// Set the amount paid on knock-out.
    pub fn with_rebate(mut self, rebate: Real) -> Self {
        self.rebate = rebate;
        self
    }

    /// Set the barrier direction.
    pub fn with_barrier_type(mut self, barrier_type: BarrierType) -> Self {
        self.barrier_type = barrier_type;
        self
    }

    /// Barrier level.
    pub fn level(&self) -> Real {
        self.level
    }
}

impl PathPricer for BarrierPricer {
    fn process_path(&mut self, path: &Path) {
        let knocked_out = path
            .values()
            .iter()
            .any(|&x| self.barrier_type.is_breached(x, self.level));
        let value = if knocked_out {
            self.rebate
        } else {
            self.acc.payoff(path.back())
        };
        self.acc.add(value);
    }

    accumulator_methods!();
}

// ─── Brownian bridge ──────────────────────────────────────────────────────────

/// Knock-out option with a Brownian bridge correction for crossings between
/// monitoring dates.
///
/// For every interval `[t_{n−1}, t_n]` the probability that a diffusion
/// bridge between the two sampled values touched the barrier is
///
/// ```text
/// P = exp(−2·(L − x_{n−1})·(L − x_n) / (σ²·Δt)),   σ = b(x_{n−1}, t_{n−1})
/// ```
///
/// A uniform `u` from the pricer's own generator is drawn per interval and a
/// crossing is recorded when the sampled value breaches the barrier or
/// `P ≥ u`. Scanning stops at the first crossing, so the number of uniforms
/// consumed per path varies.
pub struct BrownianBridgePricer {
    acc: Accumulator,
    level: Real,
    rebate: Real,
    barrier_type: BarrierType,
    sde: Arc<dyn Sde>,
    dt: Time,
    uniform: MersenneTwisterUniformRng,
    bridge_hits: Size,
}

impl BrownianBridgePricer {
    /// Pricer name.
    pub const NAME: &'static str = "Brownian Bridge Barrier";

    /// Up-and-out barrier at `level` with zero rebate.
    ///
    /// `sde` supplies the local volatility, `dt` is the grid step of the
    /// simulated paths and `uniform` must be independent of the generator
    /// driving the paths.
    pub fn new<F, D>(
        payoff: F,
        discounter: D,
        level: Real,
        sde: Arc<dyn Sde>,
        dt: Time,
        uniform: MersenneTwisterUniformRng,
    ) -> Self
    where
        F: Fn(Real) -> Real + 'static,
        D: Fn() -> DiscountFactor + 'static,
    {
        Self {
            acc: Accumulator::new(payoff, discounter),
            level,
            rebate: 0.0,
            barrier_type: BarrierType::default(),
            sde,
            dt,
            uniform,
            bridge_hits: 0,
        }
    }

    /// Set the amount paid on knock-out.
    pub fn with_rebate(mut self, rebate: Real) -> Self {
        self.rebate = rebate;
        self
    }

    /// Set the barrier direction.
    pub fn with_barrier_type(mut self, barrier_type: BarrierType) -> Self {
        self.barrier_type = barrier_type;
        self
    }

    /// Number of intervals in which the bridge test fired.
    pub fn counted_bridge_hits(&self) -> Size {
        self.bridge_hits
    }

    fn crosses(&mut self, path: &Path) -> bool {
        let values = path.values();
        if self.barrier_type.is_breached(values[0], self.level) {
            return true;
        }
        for (n, pair) in values.windows(2).enumerate() {
            let (prev, next) = (pair[0], pair[1]);
            let local_vol = self.sde.diffusion(prev, n as Real * self.dt);
            let p = (-2.0 * (self.level - prev) * (self.level - next)
                / (local_vol * local_vol * self.dt))
                .exp();
            let bridge_hit = p >= self.uniform.next_real();
            if bridge_hit {
                self.bridge_hits += 1;
            }
            if bridge_hit || self.barrier_type.is_breached(next, self.level) {
                return true;
            }
        }
        false
    }
}

impl fmt::Debug for BrownianBridgePricer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrownianBridgePricer")
            .field("acc", &self.acc)
            .field("level", &self.level)
            .field("rebate", &self.rebate)
            .field("barrier_type", &self.barrier_type)
            .field("dt", &self.dt)
            .field("bridge_hits", &self.bridge_hits)
            .finish_non_exhaustive()
    }
}

impl PathPricer for BrownianBridgePricer {
    fn process_path(&mut self, path: &Path) {
        let value = if self.crosses(path) {
            self.rebate
        } else {
            self.acc.payoff(path.back())
        };
        self.acc.add(value);
    }

    accumulator_methods!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mc_core::Error;
    use mc_processes::GeometricBrownianMotion;

    fn call(strike: Real) -> impl Fn(Real) -> Real {
        move |s| (s - strike).max(0.0)
    }

    fn path(values: &[Real]) -> Path {
        Path::new(values.to_vec()).unwrap()
    }

    fn gbm() -> Arc<dyn Sde> {
        Arc::new(GeometricBrownianMotion::new(0.08, 0.3, 0.0, 65.0, 0.25).unwrap())
    }

    #[test]
    fn european_averages_terminal_payoffs() {
        let mut pricer = EuropeanPricer::new(call(65.0), || 0.5);
        assert!(pricer.price().is_none());
        pricer.process_path(&path(&[65.0, 80.0, 75.0]));
        pricer.process_path(&path(&[65.0, 50.0, 60.0]));
        pricer.post_process().unwrap();
        // 0.5 · (10 + 0) / 2
        assert_abs_diff_eq!(pricer.price().unwrap(), 2.5, epsilon = 1e-12);
        assert_eq!(pricer.paths_processed(), 2);
        assert_eq!(pricer.discount_factor(), 0.5);
        // sample std of {10, 0} is √50, error √50/√2 = 5, discounted 2.5
        assert_abs_diff_eq!(pricer.standard_error().unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn post_process_without_paths_fails() {
        let mut pricer = EuropeanPricer::new(call(65.0), || 1.0);
        assert!(matches!(pricer.post_process(), Err(Error::Runtime(_))));
        assert!(pricer.price().is_none());
        assert!(pricer.standard_error().is_none());
    }

    #[test]
    fn post_process_is_idempotent() {
        let mut pricer = AsianPricer::new(call(60.0), || 0.9);
        pricer.process_path(&path(&[65.0, 70.0, 75.0]));
        pricer.post_process().unwrap();
        let first = pricer.price();
        pricer.post_process().unwrap();
        assert_eq!(pricer.price(), first);
    }

    #[test]
    fn asian_uses_every_point() {
        let mut pricer = AsianPricer::new(call(60.0), || 1.0);
        // mean(65, 70, 75) = 70
        pricer.process_path(&path(&[65.0, 70.0, 75.0]));
        pricer.post_process().unwrap();
        assert_abs_diff_eq!(pricer.price().unwrap(), 10.0, epsilon = 1e-12);
        assert_eq!(pricer.name(), "Asian");
    }

    #[test]
    fn barrier_knocks_out_and_pays_rebate() {
        let mut pricer = BarrierPricer::new(call(65.0), || 1.0, 170.0).with_rebate(1.0);
        pricer.process_path(&path(&[65.0, 170.0, 80.0]));
        pricer.process_path(&path(&[65.0, 169.0, 85.0]));
        pricer.post_process().unwrap();
        // (1 + 20) / 2
        assert_abs_diff_eq!(pricer.price().unwrap(), 10.5, epsilon = 1e-12);
        assert_eq!(pricer.level(), 170.0);
    }

    #[test]
    fn down_barrier_checks_lower_side() {
        let mut pricer =
            BarrierPricer::new(call(65.0), || 1.0, 50.0).with_barrier_type(BarrierType::DownOut);
        pricer.process_path(&path(&[65.0, 49.0, 90.0]));
        pricer.process_path(&path(&[65.0, 51.0, 90.0]));
        pricer.post_process().unwrap();
        assert_abs_diff_eq!(pricer.price().unwrap(), 12.5, epsilon = 1e-12);
    }

    #[test]
    fn bridge_detects_sampled_breach() {
        let mut pricer = BrownianBridgePricer::new(
            call(65.0),
            || 1.0,
            170.0,
            gbm(),
            0.0025,
            MersenneTwisterUniformRng::new(1),
        );
        pricer.process_path(&path(&[65.0, 171.0, 80.0]));
        pricer.post_process().unwrap();
        assert_eq!(pricer.price(), Some(0.0));
    }

    #[test]
    fn bridge_ignores_far_barrier() {
        let mut pricer = BrownianBridgePricer::new(
            call(65.0),
            || 1.0,
            170.0,
            gbm(),
            0.0025,
            MersenneTwisterUniformRng::new(1),
        );
        pricer.process_path(&path(&[65.0, 66.0, 70.0]));
        pricer.post_process().unwrap();
        assert_abs_diff_eq!(pricer.price().unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(pricer.counted_bridge_hits(), 0);
    }

    #[test]
    fn bridge_catches_crossing_between_samples() {
        // Both points sit just below the barrier: P ≈ 1 for every interval.
        let mut pricer = BrownianBridgePricer::new(
            call(65.0),
            || 1.0,
            100.0,
            gbm(),
            0.01,
            MersenneTwisterUniformRng::new(3),
        );
        pricer.process_path(&path(&[99.999, 99.999, 99.999]));
        pricer.post_process().unwrap();
        assert_eq!(pricer.price(), Some(0.0));
        assert_eq!(pricer.counted_bridge_hits(), 1);
    }

    #[test]
    fn bridge_never_exceeds_discrete_barrier() {
        let sde = gbm();
        let mut barrier = BarrierPricer::new(call(65.0), || 1.0, 80.0);
        let mut bridge = BrownianBridgePricer::new(
            call(65.0),
            || 1.0,
            80.0,
            sde,
            0.05,
            MersenneTwisterUniformRng::new(11),
        );
        let paths = [
            path(&[65.0, 70.0, 78.0, 79.0, 77.0]),
            path(&[65.0, 72.0, 81.0, 70.0, 75.0]),
            path(&[65.0, 60.0, 62.0, 66.0, 70.0]),
            path(&[65.0, 75.0, 79.5, 79.8, 79.9]),
        ];
        for p in &paths {
            barrier.process_path(p);
            bridge.process_path(p);
        }
        barrier.post_process().unwrap();
        bridge.post_process().unwrap();
        assert!(bridge.price().unwrap() <= barrier.price().unwrap());
    }
}
