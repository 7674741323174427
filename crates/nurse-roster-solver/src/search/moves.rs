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

use nurse_roster_model::prelude::Schedule;
use smallvec::SmallVec;

/// A recently displaced assignment: putting `shift` back into
/// (`employee`, `day`) is tabu until the key ages out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabuKey {
    pub employee: usize,
    pub day: usize,
    pub shift: usize,
}

impl TabuKey {
    #[inline]
    pub fn new(employee: usize, day: usize, shift: usize) -> Self {
        Self {
            employee,
            day,
            shift,
        }
    }
}

impl std::fmt::Display for TabuKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.employee, self.day, self.shift)
    }
}

/// A proposed local modification of the roster. Value object: nothing here
/// touches a schedule until the incremental evaluator applies it.
///
/// `FixShiftRotation` is semantically a `Change`; the separate tag lets the
/// neighbourhood report how a move was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Change {
        employee: usize,
        day: usize,
        new_shift: usize,
    },
    Swap {
        employee1: usize,
        day1: usize,
        employee2: usize,
        day2: usize,
    },
    BlockSwap {
        employee1: usize,
        employee2: usize,
        start_day: usize,
        block_size: usize,
    },
    RuinAndRecreate {
        employee: usize,
    },
    FixShiftRotation {
        employee: usize,
        day: usize,
        new_shift: usize,
    },
}

impl Move {
    /// The (employee, day, shift) cells this move would write, used to probe
    /// the tabu set. Block moves are never tabu-filtered.
    pub fn probe_keys(&self, schedule: &Schedule) -> SmallVec<[TabuKey; 2]> {
        let mut keys = SmallVec::new();
        match *self {
            Move::Change {
                employee,
                day,
                new_shift,
            }
            | Move::FixShiftRotation {
                employee,
                day,
                new_shift,
            } => {
                keys.push(TabuKey::new(employee, day, new_shift));
            }
            Move::Swap {
                employee1,
                day1,
                employee2,
                day2,
            } => {
                let s1 = schedule.get(employee1, day1);
                let s2 = schedule.get(employee2, day2);
                keys.push(TabuKey::new(employee1, day1, s2));
                keys.push(TabuKey::new(employee2, day2, s1));
            }
            Move::BlockSwap { .. } | Move::RuinAndRecreate { .. } => {}
        }
        keys
    }

    /// The assignments this move displaces; these become tabu once the move
    /// is accepted.
    pub fn displaced_keys(&self, schedule: &Schedule) -> SmallVec<[TabuKey; 2]> {
        let mut keys = SmallVec::new();
        match *self {
            Move::Change { employee, day, .. } | Move::FixShiftRotation { employee, day, .. } => {
                keys.push(TabuKey::new(employee, day, schedule.get(employee, day)));
            }
            Move::Swap {
                employee1,
                day1,
                employee2,
                day2,
            } => {
                keys.push(TabuKey::new(employee1, day1, schedule.get(employee1, day1)));
                keys.push(TabuKey::new(employee2, day2, schedule.get(employee2, day2)));
            }
            Move::BlockSwap { .. } | Move::RuinAndRecreate { .. } => {}
        }
        keys
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Move::Change {
                employee,
                day,
                new_shift,
            } => write!(f, "Change({employee}, {day} -> {new_shift})"),
            Move::Swap {
                employee1,
                day1,
                employee2,
                day2,
            } => write!(f, "Swap(({employee1}, {day1}) <-> ({employee2}, {day2}))"),
            Move::BlockSwap {
                employee1,
                employee2,
                start_day,
                block_size,
            } => write!(
                f,
                "BlockSwap({employee1} <-> {employee2}, days {start_day}..+{block_size})"
            ),
            Move::RuinAndRecreate { employee } => write!(f, "RuinAndRecreate({employee})"),
            Move::FixShiftRotation {
                employee,
                day,
                new_shift,
            } => write!(f, "FixShiftRotation({employee}, {day} -> {new_shift})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_keys() {
        let mut s = Schedule::new(2, 7, 2);
        s.set(0, 3, 1);
        let mv = Move::Change {
            employee: 0,
            day: 3,
            new_shift: 2,
        };
        assert_eq!(mv.probe_keys(&s).as_slice(), &[TabuKey::new(0, 3, 2)]);
        assert_eq!(mv.displaced_keys(&s).as_slice(), &[TabuKey::new(0, 3, 1)]);
    }

    #[test]
    fn test_swap_keys_cross_over() {
        let mut s = Schedule::new(2, 7, 2);
        s.set(0, 0, 1);
        s.set(1, 4, 2);
        let mv = Move::Swap {
            employee1: 0,
            day1: 0,
            employee2: 1,
            day2: 4,
        };
        assert_eq!(
            mv.probe_keys(&s).as_slice(),
            &[TabuKey::new(0, 0, 2), TabuKey::new(1, 4, 1)]
        );
        assert_eq!(
            mv.displaced_keys(&s).as_slice(),
            &[TabuKey::new(0, 0, 1), TabuKey::new(1, 4, 2)]
        );
    }

    #[test]
    fn test_block_moves_have_no_keys() {
        let s = Schedule::new(2, 7, 2);
        let block = Move::BlockSwap {
            employee1: 0,
            employee2: 1,
            start_day: 2,
            block_size: 2,
        };
        let ruin = Move::RuinAndRecreate { employee: 0 };
        assert!(block.probe_keys(&s).is_empty());
        assert!(block.displaced_keys(&s).is_empty());
        assert!(ruin.probe_keys(&s).is_empty());
        assert!(ruin.displaced_keys(&s).is_empty());
    }
}
