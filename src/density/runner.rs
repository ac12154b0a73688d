//! Fractional-optimization controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::budget::Deadline;
use super::config::{DensityConfig, Strategy};
use super::error::DensityError;
use super::formulation::{CharnesCooperFormulation, Formulation, ParametricFormulation};
use crate::greedy::{GreedyConstructor, MultiStartGreedyConstructor, WaveConstructor};
use crate::oracle::{Oracle, OracleConfig, OracleSolution, OracleStatus};
use crate::wave::{compare_density, ProblemInstance, Solution, SolutionEvaluator, Units};

/// Why the controller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `|F(q)| < ε` on a surrogate the oracle solved to optimality, or the
    /// one-shot linearization was solved to optimality.
    Converged,
    /// `max_iterations` oracle calls made without converging.
    IterationLimit,
    /// Not enough budget left for another oracle call, or the oracle ran
    /// out of time (with or without an incumbent).
    BudgetExhausted,
    /// The oracle proved the sub-problem infeasible.
    OracleInfeasible,
    /// The oracle returned nothing usable.
    OracleStalled,
    /// The oracle's assignment did not beat the current ratio
    /// (`F(q) ≤ −ε`, only possible with an inexact oracle).
    NoImprovement,
    /// Cancelled externally.
    Cancelled,
}

/// Which component produced the returned selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionSource {
    Greedy,
    MultiStart,
    Oracle,
}

/// Result of a density solve.
#[derive(Debug, Clone)]
pub struct DensityResult {
    /// The densest verified-feasible selection, if any.
    pub best: Option<Solution>,

    /// Density of `best`; 0 without a selection.
    pub best_density: f64,

    /// Total units picked by `best`.
    pub best_units: Units,

    /// Dinkelbach parameter `q` at the start and after every update.
    /// For Charnes–Cooper: the initial density and the density recovered
    /// from the single call.
    pub ratio_history: Vec<f64>,

    /// Oracle calls whose assignment was evaluated.
    pub iterations: usize,

    /// Oracle calls made.
    pub oracle_calls: usize,

    /// Why the solve stopped.
    pub termination: Termination,

    /// Producer of `best`.
    pub source: Option<SolutionSource>,

    /// Wall time since the deadline was set.
    pub elapsed: Duration,
}

impl DensityResult {
    /// Whether a feasible selection was found.
    pub fn is_solution_found(&self) -> bool {
        self.best.is_some()
    }
}

/// Best verified selection across heuristics and oracle calls.
struct Incumbent<'a> {
    instance: &'a ProblemInstance,
    best: Option<(Solution, Units, SolutionSource)>,
}

impl<'a> Incumbent<'a> {
    fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            best: None,
        }
    }

    /// Keeps `candidate` if it is feasible and strictly denser.
    fn offer(&mut self, candidate: Solution, source: SolutionSource) {
        if let Err(violation) = SolutionEvaluator::check(&candidate, self.instance) {
            log::debug!("{source:?} candidate rejected: {violation}");
            return;
        }
        let units = SolutionEvaluator::total_units(&candidate, self.instance);
        let improves = match &self.best {
            None => true,
            Some((best, best_units, _)) => {
                compare_density(units, candidate.aisle_count(), *best_units, best.aisle_count())
                    .is_gt()
            }
        };
        if improves {
            log::debug!(
                "new incumbent from {source:?}: {units} units over {} aisles",
                candidate.aisle_count()
            );
            self.best = Some((candidate, units, source));
        }
    }

    fn solution(&self) -> Option<&Solution> {
        self.best.as_ref().map(|(s, _, _)| s)
    }

    fn density(&self) -> f64 {
        self.best
            .as_ref()
            .map_or(0.0, |(s, units, _)| *units as f64 / s.aisle_count() as f64)
    }
}

/// Loop state shared by both strategies.
struct Progress {
    ratio_history: Vec<f64>,
    iterations: usize,
    oracle_calls: usize,
}

/// What the controller does with one oracle outcome.
enum Step {
    /// An assignment decoded to a verified-feasible selection; `proven`
    /// when the oracle reported optimality.
    Candidate { solution: Solution, proven: bool },
    Stop(Termination),
}

/// Executes the density controller.
///
/// Runs the enabled greedy constructors, then drives the oracle with the
/// configured [`Strategy`]. The returned selection is always re-checked by
/// [`SolutionEvaluator`].
///
/// # Time limits
///
/// The deadline is checked before every oracle call, and each call is handed
/// the remaining budget as [`OracleConfig::time_limit`]. Enforcing it during
/// the call is up to the oracle. [`EnumerationOracle`](crate::oracle::EnumerationOracle)
/// stops at the limit; `MicroLpOracle` cannot be interrupted, so a single
/// call may run past the deadline.
///
/// # Examples
///
/// ```
/// use u_wavepick::density::{DensityConfig, DensityOptimizer};
/// use u_wavepick::oracle::EnumerationOracle;
/// use u_wavepick::wave::{Aisle, Order, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
///     vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
///     2,
///     1,
///     10,
/// );
/// let config = DensityConfig::default().with_min_oracle_budget(std::time::Duration::ZERO);
/// let result = DensityOptimizer::run(&instance, &EnumerationOracle::new(), &config).unwrap();
/// assert_eq!(result.best_density, 6.0);
/// ```
pub struct DensityOptimizer;

impl DensityOptimizer {
    /// Solves with a fresh deadline of `config.time_limit`.
    pub fn run<O: Oracle + ?Sized>(
        instance: &ProblemInstance,
        oracle: &O,
        config: &DensityConfig,
    ) -> Result<DensityResult, DensityError> {
        Self::run_until(instance, oracle, config, Deadline::after(config.time_limit))
    }

    /// Solves until `deadline`; `config.time_limit` is ignored.
    pub fn run_until<O: Oracle + ?Sized>(
        instance: &ProblemInstance,
        oracle: &O,
        config: &DensityConfig,
        deadline: Deadline,
    ) -> Result<DensityResult, DensityError> {
        Self::run_with_cancel(instance, oracle, config, deadline, None)
    }

    /// Solves until `deadline` with an optional cancellation token, checked
    /// before every oracle call.
    pub fn run_with_cancel<O: Oracle + ?Sized>(
        instance: &ProblemInstance,
        oracle: &O,
        config: &DensityConfig,
        deadline: Deadline,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<DensityResult, DensityError> {
        config.validate().map_err(DensityError::InvalidConfig)?;
        instance.validate().map_err(DensityError::InvalidInstance)?;

        log::info!(
            "density solve: {} orders, {} aisles, {} items, wave [{}, {}], {:?}",
            instance.order_count(),
            instance.aisle_count(),
            instance.n_items,
            instance.wave_size_lb,
            instance.wave_size_ub,
            config.strategy
        );

        let mut incumbent = Incumbent::new(instance);
        let greedy = GreedyConstructor::new();
        let multi_start = MultiStartGreedyConstructor::with_config(config.multi_start.clone());
        let constructors: [(bool, &dyn WaveConstructor, SolutionSource); 2] = [
            (config.use_greedy, &greedy, SolutionSource::Greedy),
            (config.use_multi_start, &multi_start, SolutionSource::MultiStart),
        ];
        for (enabled, constructor, source) in constructors {
            if !enabled {
                continue;
            }
            match constructor.construct(instance) {
                Some(candidate) => incumbent.offer(candidate, source),
                None => log::debug!("{} found no selection", constructor.name()),
            }
        }
        log::info!("heuristic density: {}", incumbent.density());

        let mut progress = Progress {
            ratio_history: vec![incumbent.density()],
            iterations: 0,
            oracle_calls: 0,
        };
        let ctx = Context {
            instance,
            oracle,
            config,
            deadline: &deadline,
            cancel: cancel.as_deref(),
        };

        let termination = match config.strategy {
            Strategy::Dinkelbach => ctx.dinkelbach(&mut incumbent, &mut progress)?,
            Strategy::CharnesCooper => ctx.charnes_cooper(&mut incumbent, &mut progress)?,
        };

        let best_density = incumbent.density();
        let (best, best_units, source) = match incumbent.best {
            Some((solution, units, source)) => (Some(solution), units, Some(source)),
            None => (None, 0, None),
        };
        let elapsed = deadline.elapsed();
        log::info!(
            "density solve finished: {termination:?}, density {best_density}, {} oracle calls, {:.3}s",
            progress.oracle_calls,
            elapsed.as_secs_f64()
        );

        Ok(DensityResult {
            best,
            best_density,
            best_units,
            ratio_history: progress.ratio_history,
            iterations: progress.iterations,
            oracle_calls: progress.oracle_calls,
            termination,
            source,
            elapsed,
        })
    }
}

/// Borrowed inputs of one solve.
struct Context<'a, O: ?Sized> {
    instance: &'a ProblemInstance,
    oracle: &'a O,
    config: &'a DensityConfig,
    deadline: &'a Deadline,
    cancel: Option<&'a AtomicBool>,
}

impl<O: Oracle + ?Sized> Context<'_, O> {
    /// Dinkelbach iteration from `q` = incumbent density (0 without one).
    fn dinkelbach(
        &self,
        incumbent: &mut Incumbent<'_>,
        progress: &mut Progress,
    ) -> Result<Termination, DensityError> {
        let mut formulation = ParametricFormulation::new(self.instance);
        let mut q = incumbent.density();

        for _ in 0..self.config.max_iterations {
            formulation.set_ratio(q);
            let (candidate, proven) = match self.call(&formulation, incumbent, progress)? {
                Step::Candidate { solution, proven } => (solution, proven),
                Step::Stop(termination) => return Ok(termination),
            };

            let units = SolutionEvaluator::total_units(&candidate, self.instance);
            let aisles = candidate.aisle_count();
            let f = units as f64 - q * aisles as f64;
            log::debug!("q = {q}: {units} units over {aisles} aisles, F(q) = {f}");
            incumbent.offer(candidate, SolutionSource::Oracle);

            if f.abs() < self.config.epsilon {
                // F(q) = 0 only proves q optimal if the surrogate was solved
                return Ok(if proven {
                    Termination::Converged
                } else {
                    Termination::BudgetExhausted
                });
            }
            if f < 0.0 {
                log::warn!("oracle assignment below current ratio (F(q) = {f}), stopping");
                return Ok(Termination::NoImprovement);
            }
            q = units as f64 / aisles as f64;
            progress.ratio_history.push(q);
        }
        Ok(Termination::IterationLimit)
    }

    /// Single call on the linearized model.
    fn charnes_cooper(
        &self,
        incumbent: &mut Incumbent<'_>,
        progress: &mut Progress,
    ) -> Result<Termination, DensityError> {
        let formulation =
            CharnesCooperFormulation::new(self.instance, self.config.normalization_tolerance);

        match self.call(&formulation, incumbent, progress)? {
            Step::Candidate { solution, proven } => {
                progress
                    .ratio_history
                    .push(SolutionEvaluator::density(&solution, self.instance));
                incumbent.offer(solution, SolutionSource::Oracle);
                Ok(if proven {
                    Termination::Converged
                } else {
                    Termination::BudgetExhausted
                })
            }
            Step::Stop(termination) => Ok(termination),
        }
    }

    /// One budget-checked oracle call.
    ///
    /// Never calls the oracle when cancelled or when no more than
    /// `min_oracle_budget` is left.
    fn call<F: Formulation>(
        &self,
        formulation: &F,
        incumbent: &Incumbent<'_>,
        progress: &mut Progress,
    ) -> Result<Step, DensityError> {
        if self.cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Ok(Step::Stop(Termination::Cancelled));
        }
        let remaining = self.deadline.remaining();
        if remaining.is_zero() || remaining <= self.config.min_oracle_budget {
            log::info!("{remaining:?} left, skipping oracle call");
            return Ok(Step::Stop(Termination::BudgetExhausted));
        }

        let mut oracle_config = OracleConfig::new(remaining);
        if self.config.warm_start {
            if let Some(solution) = incumbent.solution() {
                oracle_config = oracle_config.with_warm_start(formulation.warm_start(solution));
            }
        }

        let iteration = progress.oracle_calls;
        progress.oracle_calls += 1;
        let outcome = self.oracle.solve(formulation.model(), &oracle_config);
        log::debug!(
            "oracle call {iteration} on {}: {:?} in {:?}",
            formulation.model().name,
            outcome.status,
            outcome.solve_time
        );

        self.interpret(formulation, outcome, iteration, progress)
    }

    fn interpret<F: Formulation>(
        &self,
        formulation: &F,
        outcome: OracleSolution,
        iteration: usize,
        progress: &mut Progress,
    ) -> Result<Step, DensityError> {
        let termination = match outcome.status {
            OracleStatus::ModelInvalid => {
                return Err(DensityError::Formulation {
                    model: formulation.model().name.clone(),
                    iteration,
                })
            }
            OracleStatus::Infeasible => Termination::OracleInfeasible,
            OracleStatus::Timeout => Termination::BudgetExhausted,
            OracleStatus::Unknown => Termination::OracleStalled,
            OracleStatus::Optimal | OracleStatus::Feasible => {
                if !outcome.is_solution_found() {
                    log::warn!("oracle reported {:?} without an assignment", outcome.status);
                    return Ok(Step::Stop(Termination::OracleStalled));
                }
                let solution = formulation.decode(&outcome.values);
                if let Err(violation) = SolutionEvaluator::check(&solution, self.instance) {
                    log::warn!("oracle assignment decodes to an infeasible selection: {violation}");
                    return Ok(Step::Stop(Termination::OracleStalled));
                }
                progress.iterations += 1;
                return Ok(Step::Candidate {
                    solution,
                    proven: outcome.status == OracleStatus::Optimal,
                });
            }
        };
        Ok(Step::Stop(termination))
    }
}
