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

/// The two-level objective of a roster: hard-constraint penalty first, soft
/// preference score second. Both are "higher is better"; a feasible roster
/// has `hard == 0` and hard can never be positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Score {
    pub hard: i64,
    pub soft: i64,
}

impl Score {
    #[inline]
    pub const fn new(hard: i64, soft: i64) -> Self {
        Self { hard, soft }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { hard: 0, soft: 0 }
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard == 0
    }

    #[inline]
    pub fn apply_delta(&self, delta: &ScoreDelta) -> Self {
        Self {
            hard: self
                .hard
                .checked_add(delta.hard)
                .expect("hard score addition overflowed"),
            soft: self
                .soft
                .checked_add(delta.soft)
                .expect("soft score addition overflowed"),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score(hard: {}, soft: {})", self.hard, self.soft)
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.hard.cmp(&other.hard) {
            std::cmp::Ordering::Equal => self.soft.cmp(&other.soft),
            ord => ord,
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The score change quoted for a move before it is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScoreDelta {
    pub hard: i64,
    pub soft: i64,
}

impl ScoreDelta {
    #[inline]
    pub const fn new(hard: i64, soft: i64) -> Self {
        Self { hard, soft }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { hard: 0, soft: 0 }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.hard == 0 && self.soft == 0
    }

    /// Lexicographic improvement test: strictly better hard score, or equal
    /// hard and strictly better soft.
    #[inline]
    pub fn is_improvement(&self) -> bool {
        self.hard > 0 || (self.hard == 0 && self.soft > 0)
    }
}

impl std::fmt::Display for ScoreDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScoreDelta(hard: {}, soft: {})", self.hard, self.soft)
    }
}

impl std::ops::Add for ScoreDelta {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            hard: self
                .hard
                .checked_add(rhs.hard)
                .expect("hard delta addition overflowed"),
            soft: self
                .soft
                .checked_add(rhs.soft)
                .expect("soft delta addition overflowed"),
        }
    }
}

impl std::ops::AddAssign for ScoreDelta {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Add<ScoreDelta> for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: ScoreDelta) -> Score {
        self.apply_delta(&rhs)
    }
}

impl std::ops::AddAssign<ScoreDelta> for Score {
    #[inline]
    fn add_assign(&mut self, rhs: ScoreDelta) {
        *self = self.apply_delta(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_score_feasibility_and_display() {
        let infeasible = Score::new(-120, 4);
        assert!(!infeasible.is_feasible());
        assert_eq!(infeasible.to_string(), "Score(hard: -120, soft: 4)");

        let feasible = Score::new(0, -7);
        assert!(feasible.is_feasible());
        assert!(Score::zero().is_feasible());
    }

    #[test]
    fn test_score_ordering_is_lexicographic() {
        let a = Score::new(0, 5);
        let b = Score::new(0, 3);
        let c = Score::new(-10, 100);
        let d = Score::new(-100, 0);

        assert!(a > b, "higher soft wins among equal hard");
        assert!(b > c, "feasible beats infeasible no matter the soft score");
        assert!(c > d, "less negative hard wins");
        assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));

        let mut v = vec![d, b, a, c];
        v.sort();
        assert_eq!(v, vec![d, c, b, a]);
    }

    #[test]
    fn test_delta_addition_and_improvement() {
        let d1 = ScoreDelta::new(10, -3);
        let d2 = ScoreDelta::new(-10, 5);
        assert_eq!(d1 + d2, ScoreDelta::new(0, 2));
        assert!((d1 + d2).is_improvement());
        assert!(d1.is_improvement());
        assert!(!d2.is_improvement());
        assert!(!ScoreDelta::zero().is_improvement());
        assert!(ScoreDelta::zero().is_zero());

        let mut acc = ScoreDelta::new(1, 1);
        acc += ScoreDelta::new(2, -4);
        assert_eq!(acc, ScoreDelta::new(3, -3));
    }

    #[test]
    fn test_apply_delta_to_score() {
        let s = Score::new(-100, 20);
        let s2 = s + ScoreDelta::new(100, -5);
        assert_eq!(s2, Score::new(0, 15));

        let mut s3 = s;
        s3 += ScoreDelta::new(10, 10);
        assert_eq!(s3, Score::new(-90, 30));
    }

    #[test]
    #[should_panic(expected = "hard score addition overflowed")]
    fn test_apply_delta_overflow_panics() {
        let s = Score::new(i64::MAX, 0);
        let _ = s + ScoreDelta::new(1, 0);
    }
}
