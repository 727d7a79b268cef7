//! Uniform time grid shared by a scheme and the mediator.

use mc_core::{ensure, Real, Result, Size, Time};

/// `N + 1` equally spaced points `t₀ = 0, …, t_N = T` with step `k = T/N`.
///
/// Built once when a scheme is constructed; the points never change.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
    dt: Time,
}

impl TimeGrid {
    /// Create a uniform grid on `[0, end]` with `steps` intervals.
    pub fn uniform(end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0, "number of time steps must be positive, got {steps}");
        ensure!(
            end.is_finite() && end > 0.0,
            "grid end time must be positive, got {end}"
        );
        let dt = end / steps as Real;
        let mut times: Vec<Time> = (0..steps).map(|i| i as Real * dt).collect();
        // Pin the last point so it is exactly the expiry.
        times.push(end);
        Ok(Self { times, dt })
    }

    /// Number of time points (= steps + 1).
    pub fn size(&self) -> Size {
        self.times.len()
    }

    /// Number of intervals `N`.
    pub fn steps(&self) -> Size {
        self.times.len() - 1
    }

    /// Step size `k`.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// The `i`-th time point.
    pub fn time(&self, i: Size) -> Time {
        self.times[i]
    }

    /// Final time point `T`.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }
}
