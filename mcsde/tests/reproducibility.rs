mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use common::*;
use mcsde::instruments::OptionType;
use mcsde::math::MersenneTwisterUniformRng;
use mcsde::methods::monte_carlo::{
    mc_price, BrownianBridgePricer, EuropeanPricer, GeneratorKind, McBuilder, McMediator, PathPricer, Phase,
};
use mcsde::methods::SchemeKind;
use mcsde::Error;

fn seeded_price(seed: u64, generator: GeneratorKind, scheme: SchemeKind) -> (f64, f64) {
    let option = option(OptionType::Call);
    let config = config(5_000, 40, seed);
    let parts = McBuilder::new(model_data(), &config)
        .generator(generator)
        .scheme(scheme)
        .build()
        .unwrap();
    let result = mc_price(
        parts,
        &config,
        EuropeanPricer::new(option.payoff(), option.discounter()),
    )
    .unwrap();
    (result.price, result.standard_error.unwrap())
}

#[test]
fn same_seed_reproduces_the_run() {
    for generator in [GeneratorKind::BoxMuller, GeneratorKind::PolarMarsaglia] {
        for scheme in [SchemeKind::Euler, SchemeKind::Heun2, SchemeKind::Exact] {
            let first = seeded_price(2024, generator, scheme);
            let second = seeded_price(2024, generator, scheme);
            assert_eq!(first, second, "{generator:?} / {scheme}");
        }
    }
}

/// Bit patterns of every simulated path of one seeded run.
fn seeded_paths(seed: u64, generator: GeneratorKind, scheme: SchemeKind) -> Vec<Vec<u64>> {
    let config = config(200, 30, seed);
    let parts = McBuilder::new(model_data(), &config)
        .generator(generator)
        .scheme(scheme)
        .build()
        .unwrap();
    let paths = Rc::new(RefCell::new(Vec::new()));
    let mut mediator = McMediator::new(parts, &config).unwrap();
    {
        let paths = Rc::clone(&paths);
        mediator.on_path(move |path| {
            let bits = path.values().iter().map(|v| v.to_bits()).collect();
            paths.borrow_mut().push(bits);
            Ok(())
        });
    }
    mediator.start().unwrap();
    paths.take()
}

#[test]
fn same_seed_reproduces_every_path_bit_for_bit() {
    for generator in [
        GeneratorKind::BoxMuller,
        GeneratorKind::PolarMarsaglia,
        GeneratorKind::MersenneTwister,
    ] {
        for scheme in SchemeKind::ALL {
            let first = seeded_paths(606, generator, scheme);
            let second = seeded_paths(606, generator, scheme);
            assert_eq!(first.len(), 200);
            assert!(first.iter().all(|p| p.len() == 31));
            assert_eq!(first, second, "{generator:?} / {scheme}");
        }
    }
}

/// Price and crossing count of a seeded bridge-corrected up-and-out run.
fn seeded_bridge_run(path_seed: u64, bridge_seed: u64) -> (u64, usize) {
    let option = option(OptionType::Call);
    let config = config(4_000, 20, path_seed);
    let parts = McBuilder::new(model_data(), &config)
        .scheme(SchemeKind::Exact)
        .build()
        .unwrap();
    let bridge = Rc::new(RefCell::new(BrownianBridgePricer::new(
        option.payoff(),
        option.discounter(),
        78.0,
        Arc::clone(&parts.sde),
        parts.scheme.step_size(),
        MersenneTwisterUniformRng::new(bridge_seed),
    )));
    let mut mediator = McMediator::new(parts, &config).unwrap();
    mediator.connect_pricer(&bridge);
    mediator.start().unwrap();

    let bridge = bridge.borrow();
    (bridge.price().unwrap().to_bits(), bridge.counted_bridge_hits())
}

#[test]
fn seeded_bridge_correction_is_reproducible() {
    let first = seeded_bridge_run(41, 4_242);
    let second = seeded_bridge_run(41, 4_242);
    assert_eq!(first, second);
    assert!(first.1 > 0, "the level should be crossed between monitoring dates");
}

#[test]
fn different_seeds_differ() {
    let a = seeded_price(1, GeneratorKind::BoxMuller, SchemeKind::Euler);
    let b = seeded_price(2, GeneratorKind::BoxMuller, SchemeKind::Euler);
    assert_ne!(a.0, b.0);
}

#[test]
fn post_process_after_the_run_is_idempotent() {
    let option = option(OptionType::Call);
    let config = config(1_000, 20, 17);
    let parts = McBuilder::default_parts(model_data(), &config).unwrap();
    let pricer = Rc::new(RefCell::new(EuropeanPricer::new(
        option.payoff(),
        option.discounter(),
    )));
    let mut mediator = McMediator::new(parts, &config).unwrap();
    mediator.connect_pricer(&pricer);
    mediator.start().unwrap();

    let first = pricer.borrow().price().unwrap();
    pricer.borrow_mut().post_process().unwrap();
    pricer.borrow_mut().post_process().unwrap();
    assert_eq!(pricer.borrow().price(), Some(first));
    assert_eq!(pricer.borrow().paths_processed(), 1_000);
}

#[test]
fn events_arrive_in_order_and_the_mediator_runs_once() {
    init_tracing();
    let config = config(250, 10, 3);
    let parts = McBuilder::default_parts(model_data(), &config).unwrap();
    let mut mediator = McMediator::new(parts, &config).unwrap();
    assert_eq!(mediator.phase(), Phase::Init);

    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    {
        let log = Rc::clone(&log);
        mediator.on_progress(move |i| {
            log.borrow_mut().push(format!("progress {i}"));
            Ok(())
        });
    }
    let paths = Rc::new(RefCell::new(0usize));
    {
        let paths = Rc::clone(&paths);
        let log = Rc::clone(&log);
        mediator.on_path(move |path| {
            assert_eq!(path.len(), 11);
            assert_eq!(path.front(), SPOT);
            *paths.borrow_mut() += 1;
            if *paths.borrow() == 250 {
                log.borrow_mut().push("last path".into());
            }
            Ok(())
        });
    }
    {
        let log = Rc::clone(&log);
        mediator.on_finish(move || {
            log.borrow_mut().push("finish".into());
            Ok(())
        });
    }

    let summary = mediator.start().unwrap();
    assert_eq!(summary.paths, 250);
    assert_eq!(*paths.borrow(), 250);
    assert_eq!(mediator.phase(), Phase::Finished);
    assert_eq!(
        *log.borrow(),
        vec!["progress 0".to_string(), "last path".into(), "finish".into()]
    );

    assert!(matches!(mediator.start(), Err(Error::Runtime(_))));
}

#[test]
fn failing_subscriber_aborts_the_run() {
    let config = config(100, 5, 3);
    let parts = McBuilder::default_parts(model_data(), &config).unwrap();
    let mut mediator = McMediator::new(parts, &config).unwrap();
    let finished = Rc::new(RefCell::new(false));
    mediator.on_path(|path| {
        if path.back() > 0.0 {
            Err(Error::Runtime("stop".into()))
        } else {
            Ok(())
        }
    });
    {
        let finished = Rc::clone(&finished);
        mediator.on_finish(move || {
            *finished.borrow_mut() = true;
            Ok(())
        });
    }
    assert!(mediator.start().is_err());
    assert!(!*finished.borrow());
    assert_eq!(mediator.phase(), Phase::Finished);
}
