//! The path mediator: generates paths and dispatches them to subscribers.

use super::{Path, PathPricer, SimulationConfig, SimulationParts};
use mc_core::patterns::signal::SlotId;
use mc_core::{ensure, fail, Error, Result, Signal, Size};
use mc_math::VariateGenerator;
use mc_processes::Sde;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::fdm::Fdm;

/// Lifecycle of a [`McMediator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Parts bound, subscribers may still connect.
    Init,
    /// Paths are being generated.
    Running,
    /// Every path was dispatched, or the run was aborted by a subscriber.
    Finished,
}

/// What a completed run saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Paths generated and dispatched.
    pub paths: Size,
    /// Steps per path.
    pub steps: Size,
    /// Paths containing a NaN or infinite value.
    pub non_finite_paths: Size,
    /// Finite paths that left the model's domain.
    pub out_of_domain_paths: Size,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Drives the simulation loop.
///
/// For each of the `M` paths the mediator seeds `path[0]` with the model's
/// initial condition, advances it through the scheme's grid with one
/// variate per step, and emits the finished path to every path subscriber.
/// Paths are generated and dispatched in order `0, 1, …, M − 1`; the finish
/// event follows the last path. A progress event carrying the path index is
/// emitted before every `progress_interval`-th path.
///
/// Subscribers are plain closures returning [`Result`]. The first error
/// aborts the run and is returned from [`start`](Self::start).
pub struct McMediator {
    sde: Arc<dyn Sde>,
    scheme: Box<dyn Fdm>,
    rng: Box<dyn VariateGenerator>,
    n_paths: Size,
    progress_interval: Size,
    path: Path,
    phase: Phase,
    path_event: Signal<Path>,
    finish_event: Signal<()>,
    progress_event: Signal<Size>,
}

impl McMediator {
    /// Bind the simulation parts for a run of `config.n_paths()` paths.
    ///
    /// A default progress subscriber logs every notification at debug level.
    ///
    /// # Errors
    ///
    /// `Error::Precondition` for an invalid configuration or a scheme grid
    /// whose step count differs from `config.n_steps()`, and
    /// `Error::InvalidArgument` when `parts.sde` and the scheme's model
    /// disagree on the initial condition or the expiry.
    pub fn new(parts: SimulationParts, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let SimulationParts { sde, scheme, generator } = parts;
        let bound = scheme.sde();
        if bound.initial_condition() != sde.initial_condition() || bound.expiry() != sde.expiry() {
            return Err(Error::InvalidArgument(format!(
                "{} is bound to a model starting at {} with expiry {}, not {} with expiry {}",
                scheme.name(),
                bound.initial_condition(),
                bound.expiry(),
                sde.initial_condition(),
                sde.expiry()
            )));
        }
        let steps = scheme.grid().steps();
        ensure!(
            steps == config.n_steps(),
            "scheme grid has {steps} steps but the configuration asks for {}",
            config.n_steps()
        );

        let mut progress_event = Signal::new();
        progress_event.connect(|i: &Size| {
            tracing::debug!(path = *i, "simulation progress");
            Ok(())
        });

        Ok(Self {
            path: Path::flat(sde.initial_condition(), steps),
            sde,
            scheme,
            rng: generator,
            n_paths: config.n_paths(),
            progress_interval: config.progress_interval(),
            phase: Phase::Init,
            path_event: Signal::new(),
            finish_event: Signal::new(),
            progress_event,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of paths the run will generate.
    pub fn n_paths(&self) -> Size {
        self.n_paths
    }

    /// Subscribe to finished paths.
    pub fn on_path<F>(&mut self, slot: F) -> SlotId
    where
        F: FnMut(&Path) -> Result<()> + 'static,
    {
        self.path_event.connect(slot)
    }

    /// Subscribe to the end of the run.
    pub fn on_finish<F>(&mut self, mut slot: F) -> SlotId
    where
        F: FnMut() -> Result<()> + 'static,
    {
        self.finish_event.connect(move |_: &()| slot())
    }

    /// Subscribe to progress notifications.
    pub fn on_progress<F>(&mut self, mut slot: F) -> SlotId
    where
        F: FnMut(Size) -> Result<()> + 'static,
    {
        self.progress_event.connect(move |i: &Size| slot(*i))
    }

    /// Wire a pricer's `process_path` to the path event and its
    /// `post_process` to the finish event.
    pub fn connect_pricer<P>(&mut self, pricer: &Rc<RefCell<P>>) -> (SlotId, SlotId)
    where
        P: PathPricer + 'static,
    {
        let on_path = Rc::clone(pricer);
        let path_slot = self.on_path(move |path| {
            borrow_pricer(&on_path)?.process_path(path);
            Ok(())
        });
        let on_finish = Rc::clone(pricer);
        let finish_slot = self.on_finish(move || borrow_pricer(&on_finish)?.post_process());
        (path_slot, finish_slot)
    }

    /// Run the simulation.
    ///
    /// # Errors
    ///
    /// `Error::Runtime` if the mediator already ran, or the first error
    /// returned by a subscriber. Either way the mediator ends up
    /// [`Finished`](Phase::Finished) and cannot be restarted.
    pub fn start(&mut self) -> Result<RunSummary> {
        if self.phase != Phase::Init {
            fail!("the simulation has already been started");
        }
        self.phase = Phase::Running;
        let result = self.run();
        self.phase = Phase::Finished;
        result
    }

    fn run(&mut self) -> Result<RunSummary> {
        let grid = self.scheme.grid().clone();
        let dt = grid.dt();
        let x0 = self.sde.initial_condition();
        tracing::info!(
            paths = self.n_paths,
            steps = grid.steps(),
            scheme = self.scheme.name(),
            generator = self.rng.name(),
            "Monte Carlo run started"
        );

        let started = Instant::now();
        let mut non_finite_paths: Size = 0;
        let mut out_of_domain_paths: Size = 0;

        for i in 0..self.n_paths {
            if i % self.progress_interval == 0 {
                self.progress_event.emit(&i)?;
            }

            let values = self.path.values_mut();
            values[0] = x0;
            for n in 1..values.len() {
                let z = self.rng.generate();
                values[n] = self.scheme.advance(values[n - 1], grid.time(n - 1), dt, z);
            }

            if !self.path.is_finite() {
                non_finite_paths += 1;
            } else if !self.path.values().iter().all(|&x| self.sde.in_domain(x)) {
                out_of_domain_paths += 1;
            }

            self.path_event.emit(&self.path)?;
        }

        self.finish_event.emit(&())?;
        let elapsed = started.elapsed();
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Monte Carlo run finished");

        if non_finite_paths > 0 || out_of_domain_paths > 0 {
            tracing::warn!(
                non_finite_paths,
                out_of_domain_paths,
                "paths left the model's domain; the price may be corrupted"
            );
        }

        Ok(RunSummary {
            paths: self.n_paths,
            steps: grid.steps(),
            non_finite_paths,
            out_of_domain_paths,
            elapsed,
        })
    }
}

fn borrow_pricer<P>(pricer: &Rc<RefCell<P>>) -> Result<std::cell::RefMut<'_, P>> {
    pricer
        .try_borrow_mut()
        .map_err(|_| Error::Runtime("pricer is borrowed elsewhere during the run".into()))
}

impl fmt::Debug for McMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McMediator")
            .field("sde", &self.sde)
            .field("scheme", &self.scheme.name())
            .field("generator", &self.rng.name())
            .field("n_paths", &self.n_paths)
            .field("phase", &self.phase)
            .field("path_subscribers", &self.path_event.len())
            .field("finish_subscribers", &self.finish_event.len())
            .finish()
    }
}
