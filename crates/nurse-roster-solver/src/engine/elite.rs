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

use crate::state::score::Score;
use nurse_roster_model::prelude::Schedule;
use rand::Rng;

/// Fixed-capacity pool of the best rosters seen during a run. Snapshots are
/// independent copies; diversification and path relinking draw from here.
#[derive(Debug, Clone)]
pub struct EliteSet {
    capacity: usize,
    entries: Vec<(Schedule, Score)>,
}

impl EliteSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::with_capacity(capacity.max(1)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Schedule, Score)> {
        self.entries.iter().map(|(s, score)| (s, *score))
    }

    /// Snapshots `schedule` if the pool has room, or if it dominates the
    /// lex-worst member. Duplicates are rejected. Returns whether the pool
    /// changed.
    pub fn offer(&mut self, schedule: &Schedule, score: Score) -> bool {
        if self.entries.iter().any(|(s, _)| s == schedule) {
            return false;
        }
        if self.entries.len() < self.capacity {
            self.entries.push((schedule.clone(), score));
            return true;
        }
        let worst = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, s))| *s)
            .map(|(i, _)| i);
        if let Some(idx) = worst
            && score > self.entries[idx].1
        {
            self.entries[idx] = (schedule.clone(), score);
            return true;
        }
        false
    }

    /// The lex-best member.
    pub fn best(&self) -> Option<(&Schedule, Score)> {
        self.entries
            .iter()
            .max_by_key(|(_, score)| *score)
            .map(|(s, score)| (s, *score))
    }

    /// The member with the highest hard score, i.e. the least infeasible;
    /// diversification restarts from here.
    pub fn diversification_base(&self) -> Option<&Schedule> {
        self.entries
            .iter()
            .max_by_key(|(_, score)| (score.hard, score.soft))
            .map(|(s, _)| s)
    }

    /// Two distinct random members for path relinking.
    pub fn pick_two<R: Rng>(&self, rng: &mut R) -> Option<(&Schedule, &Schedule)> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = rng.random_range(0..self.entries.len());
        let mut second = rng.random_range(0..self.entries.len() - 1);
        if second >= first {
            second += 1;
        }
        Some((&self.entries[first].0, &self.entries[second].0))
    }
}
