mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use common::*;
use mcsde::math::{BoxMuller, Statistics, VariateGenerator};
use mcsde::methods::fdm::{EulerFdm, ExactFdm, ExactMode, Fdm, MilsteinFdm};
use mcsde::methods::monte_carlo::{McBuilder, McMediator};
use mcsde::methods::SchemeKind;
use mcsde::processes::{GeometricBrownianMotion, Sde};
use proptest::prelude::*;

fn gbm(sigma: f64) -> GeometricBrownianMotion {
    GeometricBrownianMotion::new(RATE, sigma, DIVIDEND, SPOT, 1.0).unwrap()
}

#[test]
fn exact_scheme_terminal_moments() {
    let model = gbm(VOL);
    let config = config(50_000, 8, 77);
    let mut data = model_data();
    data.expiry = 1.0;
    let parts = McBuilder::new(data, &config)
        .scheme(SchemeKind::Exact)
        .build()
        .unwrap();
    let stats = Rc::new(RefCell::new(Statistics::new()));
    let mut mediator = McMediator::new(parts, &config).unwrap();
    {
        let stats = Rc::clone(&stats);
        mediator.on_path(move |path| {
            stats.borrow_mut().add(path.back());
            Ok(())
        });
    }
    mediator.start().unwrap();

    let stats = stats.borrow();
    let mean = stats.mean().unwrap();
    let variance = stats.variance().unwrap();
    let expected_mean = model.expected_value(1.0);
    let expected_variance = model.variance(1.0);
    assert!(
        (mean - expected_mean).abs() < 4.0 * stats.error_estimate().unwrap(),
        "mean = {mean}, expected {expected_mean}"
    );
    assert!(
        (variance / expected_variance - 1.0).abs() < 0.05,
        "variance = {variance}, expected {expected_variance}"
    );
    assert!(stats.minimum().unwrap() > 0.0);
}

/// Root-mean-square terminal error of `scheme` against the exact solution
/// driven by the same normals.
fn rms_strong_error(scheme: &dyn Fdm, exact: &ExactFdm, paths: usize) -> f64 {
    let mut rng = BoxMuller::new(31);
    let grid = scheme.grid();
    let dt = grid.dt();
    let mut total = 0.0;
    for _ in 0..paths {
        let (mut x, mut y) = (SPOT, SPOT);
        for n in 0..grid.steps() {
            let t = grid.time(n);
            let z = rng.generate();
            x = scheme.advance(x, t, dt, z);
            y = exact.advance(y, t, dt, z);
        }
        total += (x - y) * (x - y);
    }
    (total / paths as f64).sqrt()
}

/// Least-squares slope of `ln error` against `ln Δt`.
fn convergence_order(step_counts: &[usize], errors: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = step_counts
        .iter()
        .zip(errors)
        .map(|(&n, &e)| ((1.0 / n as f64).ln(), e.ln()))
        .collect();
    let k = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / k;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / k;
    let cov: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let var: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    cov / var
}

const STEP_COUNTS: [usize; 4] = [8, 16, 32, 64];

fn strong_errors(kind: SchemeKind) -> Vec<f64> {
    let model = gbm(0.5);
    let shared: Arc<dyn Sde> = Arc::new(model.clone());
    STEP_COUNTS
        .iter()
        .map(|&steps| {
            let exact = ExactFdm::new(&model, steps, ExactMode::Conditional).unwrap();
            let scheme: Box<dyn Fdm> = match kind {
                SchemeKind::Euler => Box::new(EulerFdm::new(Arc::clone(&shared), steps).unwrap()),
                SchemeKind::Milstein => {
                    Box::new(MilsteinFdm::new(Arc::clone(&shared), steps).unwrap())
                }
                other => panic!("no strong-order reference for {other}"),
            };
            rms_strong_error(scheme.as_ref(), &exact, 2_000)
        })
        .collect()
}

#[test]
fn milstein_converges_at_a_higher_strong_order_than_euler() {
    let euler = strong_errors(SchemeKind::Euler);
    let milstein = strong_errors(SchemeKind::Milstein);

    for (e, m) in euler.iter().zip(&milstein) {
        assert!(m < e, "milstein = {m}, euler = {e}");
    }
    assert!(euler.windows(2).all(|w| w[1] < w[0]), "euler = {euler:?}");
    assert!(milstein.windows(2).all(|w| w[1] < w[0]), "milstein = {milstein:?}");

    let euler_order = convergence_order(&STEP_COUNTS, &euler);
    let milstein_order = convergence_order(&STEP_COUNTS, &milstein);
    // Strong orders ½ and 1.
    assert!(
        (0.3..0.75).contains(&euler_order),
        "euler order = {euler_order}"
    );
    assert!(
        milstein_order > euler_order + 0.3,
        "milstein order = {milstein_order}, euler order = {euler_order}"
    );
}

#[test]
fn convergence_order_of_exact_power_laws() {
    let errors: Vec<f64> = STEP_COUNTS.iter().map(|&n| 3.0 / (n as f64).sqrt()).collect();
    assert!((convergence_order(&STEP_COUNTS, &errors) - 0.5).abs() < 1e-12);
    let errors: Vec<f64> = STEP_COUNTS.iter().map(|&n| 2.0 / n as f64).collect();
    assert!((convergence_order(&STEP_COUNTS, &errors) - 1.0).abs() < 1e-12);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn schemes_stay_finite_for_moderate_shocks(
        z in -4.0..4.0_f64,
        kind_index in 0..SchemeKind::ALL.len(),
    ) {
        let config = config(1, 10, 1);
        let parts = McBuilder::new(model_data(), &config)
            .scheme(SchemeKind::ALL[kind_index])
            .build()
            .unwrap();
        let scheme = parts.scheme;
        let dt = scheme.step_size();
        let x = scheme.advance(SPOT, 0.0, dt, z);
        prop_assert!(x.is_finite() && x > 0.0, "{}: {x}", scheme.name());
    }
}
