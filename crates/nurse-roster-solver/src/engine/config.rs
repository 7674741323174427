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

/// Operating mode of the annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    /// Stop as soon as a feasible roster (hard score 0) is found.
    Feasibility,
    /// Spend the full iteration budget optimising the soft score.
    Optimisation,
}

/// Annealing parameters. The defaults match the tuned configuration; the
/// `with_*` methods adjust individual knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    initial_temperature: f64,
    cooling_rate: f64,
    max_iterations: usize,
    stagnation_limit: usize,
    /// `None` resolves to half the stagnation limit.
    weight_update_frequency: Option<usize>,
    max_restarts: usize,
    intensify_period: usize,
    diversify_period: usize,
    elite_size: usize,
    min_temperature: f64,
    tabu_capacity: usize,
    seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.99,
            max_iterations: 100_000,
            stagnation_limit: 1_000,
            weight_update_frequency: None,
            max_restarts: 5,
            intensify_period: 200,
            diversify_period: 500,
            elite_size: 5,
            min_temperature: 1e-8,
            tabu_capacity: 50,
            seed: 1,
        }
    }
}

impl SolverConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_initial_temperature(mut self, t0: f64) -> Self {
        self.initial_temperature = t0;
        self
    }

    #[inline]
    pub fn with_cooling_rate(mut self, alpha: f64) -> Self {
        self.cooling_rate = alpha;
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[inline]
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit.max(1);
        self
    }

    #[inline]
    pub fn with_weight_update_frequency(mut self, period: usize) -> Self {
        self.weight_update_frequency = Some(period.max(1));
        self
    }

    #[inline]
    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts;
        self
    }

    #[inline]
    pub fn with_intensify_period(mut self, period: usize) -> Self {
        self.intensify_period = period.max(1);
        self
    }

    #[inline]
    pub fn with_diversify_period(mut self, period: usize) -> Self {
        self.diversify_period = period.max(1);
        self
    }

    #[inline]
    pub fn with_elite_size(mut self, size: usize) -> Self {
        self.elite_size = size.max(1);
        self
    }

    #[inline]
    pub fn with_min_temperature(mut self, t_min: f64) -> Self {
        self.min_temperature = t_min;
        self
    }

    #[inline]
    pub fn with_tabu_capacity(mut self, capacity: usize) -> Self {
        self.tabu_capacity = capacity.max(1);
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    #[inline]
    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    #[inline]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    #[inline]
    pub fn stagnation_limit(&self) -> usize {
        self.stagnation_limit
    }

    /// Explicit period, or half the stagnation limit.
    #[inline]
    pub fn weight_update_frequency(&self) -> usize {
        self.weight_update_frequency
            .unwrap_or_else(|| (self.stagnation_limit / 2).max(1))
    }

    #[inline]
    pub fn max_restarts(&self) -> usize {
        self.max_restarts
    }

    #[inline]
    pub fn intensify_period(&self) -> usize {
        self.intensify_period
    }

    #[inline]
    pub fn diversify_period(&self) -> usize {
        self.diversify_period
    }

    #[inline]
    pub fn elite_size(&self) -> usize {
        self.elite_size
    }

    #[inline]
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    #[inline]
    pub fn tabu_capacity(&self) -> usize {
        self.tabu_capacity
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.initial_temperature(), 100.0);
        assert_eq!(cfg.cooling_rate(), 0.99);
        assert_eq!(cfg.stagnation_limit(), 1_000);
        assert_eq!(cfg.weight_update_frequency(), 500);
        assert_eq!(cfg.max_restarts(), 5);
        assert_eq!(cfg.intensify_period(), 200);
        assert_eq!(cfg.diversify_period(), 500);
        assert_eq!(cfg.elite_size(), 5);
        assert_eq!(cfg.min_temperature(), 1e-8);
        assert_eq!(cfg.tabu_capacity(), 50);
    }

    #[test]
    fn test_weight_update_frequency_follows_stagnation_limit() {
        let cfg = SolverConfig::default().with_stagnation_limit(200);
        assert_eq!(cfg.weight_update_frequency(), 100);
        let cfg = cfg.with_weight_update_frequency(7);
        assert_eq!(cfg.weight_update_frequency(), 7);
    }

    #[test]
    fn test_builder_style_setters() {
        let cfg = SolverConfig::new()
            .with_initial_temperature(50.0)
            .with_cooling_rate(0.95)
            .with_max_iterations(10)
            .with_elite_size(3)
            .with_seed(42);
        assert_eq!(cfg.initial_temperature(), 50.0);
        assert_eq!(cfg.cooling_rate(), 0.95);
        assert_eq!(cfg.max_iterations(), 10);
        assert_eq!(cfg.elite_size(), 3);
        assert_eq!(cfg.seed(), 42);
    }
}
