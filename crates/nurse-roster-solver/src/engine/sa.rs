// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The annealing driver.
//!
//! One iteration: adaptive-weight upkeep, diversification / intensification
//! checks, a candidate move from the neighbourhood, tabu filtering with
//! aspiration, two-regime acceptance (weighted hard delta while infeasible,
//! soft delta with feasibility preservation once feasible), Metropolis
//! sampling, best/elite upkeep, stagnation shaking and geometric cooling.
//!
//! The evaluator owns the working roster; elite snapshots, the tabu list,
//! the weight vector and all counters live here. Apart from the seeded RNG
//! there is no shared state.

use crate::constraints::evaluator::ConstraintEvaluator;
use crate::constraints::hard::HardConstraints;
use crate::constraints::incremental::IncrementalEvaluator;
use crate::engine::config::{SolveMode, SolverConfig};
use crate::engine::elite::EliteSet;
use crate::engine::tabu::TabuList;
use crate::opening::greedy::GreedyOpening;
use crate::search::neighborhood::Neighborhood;
use crate::state::score::Score;
use nurse_roster_model::common::DAY_OFF;
use nurse_roster_model::prelude::{Instance, Schedule};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Probability of zeroing each violating cell during a guided restart.
const GUIDED_RESTART_CLEAR_PROBABILITY: f64 = 0.7;
/// Probability of shaking via path relinking rather than perturbation.
const RELINK_PROBABILITY: f64 = 0.5;
/// Per-cell copy probability during path relinking.
const RELINK_COPY_PROBABILITY: f64 = 0.3;
/// Perturbation rate applied to the best roster on stagnation.
const STAGNATION_PERTURB_RATE: f64 = 0.15;
/// Improving-move budget per elite during intensification.
const INTENSIFY_MOVES: usize = 30;
/// Restart temperature factor after a diversification.
const RESTART_TEMPERATURE_FACTOR: f64 = 0.8;

pub struct SimulatedAnnealing<'a, R: Rng = ChaCha8Rng> {
    instance: &'a Instance,
    config: SolverConfig,
    rng: R,
}

impl<'a> SimulatedAnnealing<'a, ChaCha8Rng> {
    /// Driver with the deterministic ChaCha engine seeded from the config.
    pub fn new(instance: &'a Instance, config: SolverConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed());
        Self {
            instance,
            config,
            rng,
        }
    }
}

impl<'a, R: Rng> SimulatedAnnealing<'a, R> {
    pub fn with_rng(instance: &'a Instance, config: SolverConfig, rng: R) -> Self {
        Self {
            instance,
            config,
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Builds a greedy opening roster and anneals from there.
    pub fn solve(&mut self, mode: SolveMode) -> Schedule {
        let initial = GreedyOpening::new(self.instance).generate();
        self.solve_from(initial, mode)
    }

    /// Anneals from a caller-supplied starting roster. Returns the best
    /// roster seen; convergence failure is not an error, the caller
    /// inspects the hard score.
    #[tracing::instrument(level = "debug", name = "Simulated Annealing", skip(self, initial))]
    pub fn solve_from(&mut self, initial: Schedule, mode: SolveMode) -> Schedule {
        let instance = self.instance;
        let cfg = self.config.clone();
        let rng = &mut self.rng;

        let neighborhood = Neighborhood::new(instance);
        let mut inc = IncrementalEvaluator::new(ConstraintEvaluator::new(instance), initial);

        let mut best = inc.schedule().clone();
        let mut best_score = inc.score();
        let mut best_weighted = inc.evaluator().weighted_hard_score(&best);

        let mut elites = EliteSet::new(cfg.elite_size());
        elites.offer(&best, best_score);
        let mut tabu = TabuList::new(cfg.tabu_capacity());

        let weight_period = cfg.weight_update_frequency();
        let mut temperature = cfg.initial_temperature();
        let mut iter_since_improvement = 0usize;
        let mut restarts = 0usize;

        tracing::debug!("starting from {best_score}, T0 {temperature}");

        for iteration in 0..cfg.max_iterations() {
            if iteration % weight_period == 0 {
                inc.update_weights();
                best_weighted = inc.evaluator().weighted_hard_score(&best);
            }

            if iter_since_improvement > cfg.diversify_period() && restarts < cfg.max_restarts() {
                let base = elites
                    .diversification_base()
                    .cloned()
                    .unwrap_or_else(|| GreedyOpening::new(instance).generate());
                let restarted = guided_restart(instance, base, rng);
                inc.reset(restarted);
                inc.reset_weights();
                tabu.clear();
                temperature = RESTART_TEMPERATURE_FACTOR * cfg.initial_temperature();
                restarts += 1;
                iter_since_improvement = 0;
                best_weighted = inc.evaluator().weighted_hard_score(&best);
                tracing::info!(
                    "diversification {}/{} at iteration {}, current {}",
                    restarts,
                    cfg.max_restarts(),
                    iteration,
                    inc.score()
                );
                continue;
            }

            if iter_since_improvement > 0
                && iter_since_improvement % cfg.intensify_period() == 0
                && let Some((climbed, climbed_score)) =
                    intensify(instance, &elites, &neighborhood, rng)
                && climbed_score > best_score
            {
                tracing::info!("intensification found {climbed_score}");
                inc.reset(climbed.clone());
                best = climbed;
                best_score = climbed_score;
                best_weighted = inc.evaluator().weighted_hard_score(&best);
                elites.offer(&best, best_score);
                iter_since_improvement = 0;
            }

            let mv = neighborhood.random_move(inc.schedule(), inc.hard_score(), rng);
            let quote = inc.quote(&mv);
            let candidate_score = inc.score() + quote.delta;

            let is_tabu = mv
                .probe_keys(inc.schedule())
                .iter()
                .any(|key| tabu.contains(key));
            let aspiration = if inc.hard_score() < 0 {
                inc.weighted_hard_score() + quote.weighted_hard > best_weighted
            } else {
                candidate_score > best_score
            };

            if !is_tabu || aspiration {
                // In the infeasible region the weighted hard delta drives
                // acceptance; once feasible, moves that would re-enter
                // infeasibility are rejected outright and the soft delta
                // rules.
                let delta = if inc.hard_score() < 0 {
                    Some(quote.weighted_hard)
                } else if candidate_score.hard < 0 {
                    None
                } else {
                    Some(quote.delta.soft as f64)
                };

                if let Some(delta) = delta {
                    let acceptance = if delta > 0.0 {
                        1.0
                    } else {
                        (delta / temperature).exp()
                    };
                    if acceptance > rng.random::<f64>() {
                        let displaced = mv.displaced_keys(inc.schedule());
                        inc.apply(&mv);
                        for key in displaced {
                            tabu.insert(key);
                        }
                    }
                }
            }

            let current_score = inc.score();
            let improved = if current_score.hard < 0 && best_score.hard < 0 {
                inc.weighted_hard_score() > best_weighted
            } else {
                current_score > best_score
            };
            if improved {
                best = inc.schedule().clone();
                best_score = current_score;
                best_weighted = inc.weighted_hard_score();
                elites.offer(&best, best_score);
                iter_since_improvement = 0;
            } else {
                iter_since_improvement += 1;
            }

            if iter_since_improvement > cfg.stagnation_limit() {
                let shaken = if rng.random::<f64>() < RELINK_PROBABILITY && elites.len() >= 2 {
                    let (from, to) = elites.pick_two(rng).expect("two elites present");
                    relink(from, to, rng)
                } else {
                    let mut shaken = best.clone();
                    neighborhood.perturb(&mut shaken, STAGNATION_PERTURB_RATE, rng);
                    shaken
                };
                tracing::info!(
                    "stagnation at iteration {}: reheating, best {}",
                    iteration,
                    best_score
                );
                inc.reset(shaken);
                inc.reset_weights();
                temperature = cfg.initial_temperature();
                iter_since_improvement = 0;
                best_weighted = inc.evaluator().weighted_hard_score(&best);
            }

            temperature = (temperature * cfg.cooling_rate()).max(cfg.min_temperature());

            if iteration % 100 == 0 {
                tracing::debug!(
                    "iteration {}: best {}, current {}, T {:.6}",
                    iteration,
                    best_score,
                    inc.score(),
                    temperature
                );
            }

            if mode == SolveMode::Feasibility && best_score.hard == 0 {
                tracing::info!("feasible roster found after {} iterations", iteration + 1);
                break;
            }
        }

        tracing::debug!("finished with {best_score}");
        best
    }
}

/// Clears each violating assignment of `base` with fixed probability,
/// leaving the rest of the roster intact.
fn guided_restart<R: Rng>(instance: &Instance, mut base: Schedule, rng: &mut R) -> Schedule {
    let hard = HardConstraints::new(instance);
    for (employee, day) in hard.violating_assignments(&base) {
        if base.get(employee, day) != DAY_OFF
            && rng.random::<f64>() < GUIDED_RESTART_CLEAR_PROBABILITY
        {
            base.set(employee, day, DAY_OFF);
        }
    }
    base
}

/// A new roster that starts as `from` with each cell overwritten from `to`
/// with fixed probability.
fn relink<R: Rng>(from: &Schedule, to: &Schedule, rng: &mut R) -> Schedule {
    let mut linked = from.clone();
    for employee in 0..linked.employees() {
        for day in 0..linked.horizon() {
            if rng.random::<f64>() < RELINK_COPY_PROBABILITY {
                linked.set(employee, day, to.get(employee, day));
            }
        }
    }
    linked
}

/// Hill-climbs every elite for a bounded number of improving moves and
/// returns the lex-best result.
fn intensify<R: Rng>(
    instance: &Instance,
    elites: &EliteSet,
    neighborhood: &Neighborhood<'_>,
    rng: &mut R,
) -> Option<(Schedule, Score)> {
    let mut champion: Option<(Schedule, Score)> = None;
    for (elite, _) in elites.iter() {
        let mut local =
            IncrementalEvaluator::new(ConstraintEvaluator::new(instance), elite.clone());
        for _ in 0..INTENSIFY_MOVES {
            let mv = neighborhood.random_move(local.schedule(), local.hard_score(), rng);
            let quote = local.quote(&mv);
            if quote.delta.is_improvement() {
                local.apply(&mv);
            }
        }
        let score = local.score();
        if champion.as_ref().is_none_or(|(_, best)| score > *best) {
            champion = Some((local.schedule().clone(), score));
        }
    }
    champion
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurse_roster_model::prelude::{InstanceBuilder, ShiftType, Staff};

    /// Three staff, one week, two shift types, everyone needs two
    /// consecutive days off and some minimum hours.
    fn small_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.horizon(7)
            .add_shift(ShiftType::new("D", 480))
            .add_shift(ShiftType::new("N", 480).with_forbidden_successor("D"));
        for id in ["A", "B", "C"] {
            b.add_staff(
                Staff::new(id)
                    .with_total_minutes(960, 2880)
                    .with_consecutive_shifts(1, 5)
                    .with_min_consecutive_days_off(2)
                    .with_max_weekends(1),
            );
        }
        for day in 0..5 {
            b.add_cover(day, "D", 1, 10, 5);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_annealing_from_all_zero_roster_never_returns_worse() {
        let inst = small_instance();
        let cfg = SolverConfig::default()
            .with_initial_temperature(100.0)
            .with_cooling_rate(0.99)
            .with_max_iterations(1_000)
            .with_stagnation_limit(200)
            .with_seed(1);
        let mut sa = SimulatedAnnealing::new(&inst, cfg);

        let start = Schedule::new(3, 7, 2);
        let evaluator = ConstraintEvaluator::new(&inst);
        let start_hard = evaluator.hard_score(&start);
        assert!(start_hard < 0, "all-zero roster misses minimum minutes");

        let result = sa.solve_from(start, SolveMode::Optimisation);
        let final_hard = evaluator.hard_score(&result);
        assert!(
            final_hard == 0 || final_hard >= start_hard,
            "result hard {final_hard} worse than start {start_hard}"
        );
    }

    #[test]
    fn test_feasibility_mode_stops_at_first_feasible_roster() {
        let inst = small_instance();
        let cfg = SolverConfig::default()
            .with_max_iterations(20_000)
            .with_stagnation_limit(500)
            .with_seed(1);
        let mut sa = SimulatedAnnealing::new(&inst, cfg);
        let result = sa.solve(SolveMode::Feasibility);
        let evaluator = ConstraintEvaluator::new(&inst);
        // Small instance: the budget is ample; anything non-feasible should
        // at least be close.
        assert!(evaluator.hard_score(&result) >= -100);
    }

    #[test]
    fn test_deterministic_given_seed() {
        let inst = small_instance();
        let cfg = SolverConfig::default()
            .with_max_iterations(500)
            .with_stagnation_limit(100)
            .with_seed(7);
        let a = SimulatedAnnealing::new(&inst, cfg.clone()).solve(SolveMode::Optimisation);
        let b = SimulatedAnnealing::new(&inst, cfg).solve(SolveMode::Optimisation);
        assert_eq!(a, b);
    }

    #[test]
    fn test_solve_from_keeps_feasible_start_feasible() {
        let inst = small_instance();
        // A hand-built feasible roster: everyone works Mon-Wed or Tue-Thu
        // blocks, weekends off.
        let mut start = Schedule::new(3, 7, 2);
        for day in 0..3 {
            start.set(0, day, 1);
            start.set(1, day, 1);
            start.set(2, day, 1);
        }
        let evaluator = ConstraintEvaluator::new(&inst);
        assert_eq!(evaluator.hard_score(&start), 0, "start must be feasible");

        let cfg = SolverConfig::default()
            .with_max_iterations(2_000)
            .with_stagnation_limit(300)
            .with_seed(3);
        let mut sa = SimulatedAnnealing::new(&inst, cfg);
        let result = sa.solve_from(start.clone(), SolveMode::Optimisation);

        assert_eq!(
            evaluator.hard_score(&result),
            0,
            "feasible-region search must not surrender feasibility"
        );
        assert!(evaluator.soft_score(&result) >= evaluator.soft_score(&start));
    }

    #[test]
    fn test_guided_restart_only_clears_violating_rows() {
        let inst = small_instance();
        let mut base = Schedule::new(3, 7, 2);
        // Employee 0: wildly infeasible row (rotation violations).
        for day in 0..7 {
            base.set(0, day, 1 + day % 2);
        }
        // Employee 1: a clean feasible block.
        for day in 0..3 {
            base.set(1, day, 1);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let restarted = guided_restart(&inst, base.clone(), &mut rng);
        for day in 0..3 {
            assert_eq!(restarted.get(1, day), base.get(1, day));
        }
        let cleared = (0..7).filter(|&d| restarted.get(0, d) == DAY_OFF).count();
        assert!(cleared > 0, "some violating cells must be cleared");
    }

    #[test]
    fn test_relink_only_introduces_cells_from_target() {
        let mut from = Schedule::new(2, 7, 2);
        let mut to = Schedule::new(2, 7, 2);
        for day in 0..7 {
            from.set(0, day, 1);
            to.set(0, day, 2);
            to.set(1, day, 1);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let linked = relink(&from, &to, &mut rng);
        for e in 0..2 {
            for d in 0..7 {
                let cell = linked.get(e, d);
                assert!(
                    cell == from.get(e, d) || cell == to.get(e, d),
                    "cell ({e},{d}) came from neither parent"
                );
            }
        }
    }
}
