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

pub mod constraints;
pub mod engine;
pub mod opening;
pub mod search;
pub mod state;

pub mod prelude {
    pub use crate::constraints::evaluator::ConstraintEvaluator;
    pub use crate::constraints::hard::{ConstraintFamily, HardConstraints};
    pub use crate::constraints::incremental::IncrementalEvaluator;
    pub use crate::constraints::soft::SoftConstraints;
    pub use crate::engine::config::{SolveMode, SolverConfig};
    pub use crate::engine::sa::SimulatedAnnealing;
    pub use crate::opening::greedy::GreedyOpening;
    pub use crate::search::moves::Move;
    pub use crate::search::neighborhood::Neighborhood;
    pub use crate::state::score::{Score, ScoreDelta};
}
