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

use crate::common::{DAY_OFF, DAYS_PER_WEEK, weekend_saturday};
use crate::solution::err::ScheduleCodecError;
use rand::Rng;

/// The assignment matrix: one shift index (or `DAY_OFF`) per
/// (employee, day) cell.
///
/// Two aggregate tables are kept in sync eagerly inside [`Schedule::set`]:
/// per-employee shift counts and per-day coverage. Mutators with
/// out-of-range arguments are no-ops and `get` returns `DAY_OFF`; keeping
/// indices in range is the caller's job, and the sentinel behaviour keeps
/// the search loop total.
#[derive(Debug, Clone)]
pub struct Schedule {
    employees: usize,
    horizon: usize,
    num_shifts: usize,
    /// Row-major: `cells[employee * horizon + day]`.
    cells: Vec<u16>,
    /// `shift_counts[employee * (num_shifts + 1) + shift]`.
    shift_counts: Vec<u32>,
    /// `coverage[day * (num_shifts + 1) + shift]`.
    coverage: Vec<u32>,
}

impl Schedule {
    pub fn new(employees: usize, horizon: usize, num_shifts: usize) -> Self {
        let mut sched = Self {
            employees,
            horizon,
            num_shifts,
            cells: vec![DAY_OFF as u16; employees * horizon],
            shift_counts: vec![0; employees * (num_shifts + 1)],
            coverage: vec![0; horizon * (num_shifts + 1)],
        };
        sched.rebuild_caches();
        sched
    }

    #[inline]
    pub fn employees(&self) -> usize {
        self.employees
    }

    #[inline]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[inline]
    pub fn num_shifts(&self) -> usize {
        self.num_shifts
    }

    /// The assignment at (employee, day); `DAY_OFF` when out of range.
    #[inline]
    pub fn get(&self, employee: usize, day: usize) -> usize {
        if employee >= self.employees || day >= self.horizon {
            return DAY_OFF;
        }
        self.cells[employee * self.horizon + day] as usize
    }

    /// Writes `shift` at (employee, day), keeping the aggregate tables in
    /// sync. Out-of-range employee, day or shift is ignored.
    #[inline]
    pub fn set(&mut self, employee: usize, day: usize, shift: usize) {
        if employee >= self.employees || day >= self.horizon || shift > self.num_shifts {
            return;
        }
        let idx = employee * self.horizon + day;
        let old = self.cells[idx] as usize;
        if old == shift {
            return;
        }
        self.cells[idx] = shift as u16;

        let width = self.num_shifts + 1;
        self.shift_counts[employee * width + old] -= 1;
        self.shift_counts[employee * width + shift] += 1;
        self.coverage[day * width + old] -= 1;
        self.coverage[day * width + shift] += 1;
    }

    /// How many cells of `employee` hold `shift`. Counts `DAY_OFF` days when
    /// asked for shift 0.
    #[inline]
    pub fn shift_count(&self, employee: usize, shift: usize) -> u32 {
        if employee >= self.employees || shift > self.num_shifts {
            return 0;
        }
        self.shift_counts[employee * (self.num_shifts + 1) + shift]
    }

    /// How many employees work `shift` on `day`.
    #[inline]
    pub fn coverage(&self, day: usize, shift: usize) -> u32 {
        if day >= self.horizon || shift > self.num_shifts {
            return 0;
        }
        self.coverage[day * (self.num_shifts + 1) + shift]
    }

    /// Minutes worked by `employee`, with `minutes[shift]` giving each shift
    /// type's duration (`minutes[DAY_OFF]` must be 0).
    #[inline]
    pub fn total_minutes(&self, employee: usize, minutes: &[u32]) -> u64 {
        let mut total = 0u64;
        for shift in 1..=self.num_shifts {
            let dur = minutes.get(shift).copied().unwrap_or(0) as u64;
            total += dur * self.shift_count(employee, shift) as u64;
        }
        total
    }

    /// Length of the working run starting at `from_day`.
    #[inline]
    pub fn consecutive_working(&self, employee: usize, from_day: usize) -> usize {
        let mut count = 0;
        let mut day = from_day;
        while day < self.horizon && self.get(employee, day) != DAY_OFF {
            count += 1;
            day += 1;
        }
        count
    }

    /// Length of the day-off run starting at `from_day`.
    #[inline]
    pub fn consecutive_off(&self, employee: usize, from_day: usize) -> usize {
        let mut count = 0;
        let mut day = from_day;
        while day < self.horizon && self.get(employee, day) == DAY_OFF {
            count += 1;
            day += 1;
        }
        count
    }

    /// Whether `employee` works on weekend `w`. Only complete weekends
    /// (Sunday inside the horizon) are considered.
    #[inline]
    pub fn works_weekend(&self, employee: usize, weekend: usize) -> bool {
        let saturday = weekend_saturday(weekend);
        if saturday + 1 >= self.horizon {
            return false;
        }
        self.get(employee, saturday) != DAY_OFF || self.get(employee, saturday + 1) != DAY_OFF
    }

    /// The number of complete weekends on which `employee` works.
    #[inline]
    pub fn worked_weekends(&self, employee: usize) -> u32 {
        let mut count = 0;
        let mut saturday = weekend_saturday(0);
        while saturday + 1 < self.horizon {
            if self.get(employee, saturday) != DAY_OFF
                || self.get(employee, saturday + 1) != DAY_OFF
            {
                count += 1;
            }
            saturday += DAYS_PER_WEEK;
        }
        count
    }

    /// Resets every cell to `DAY_OFF`.
    pub fn clear(&mut self) {
        self.cells.fill(DAY_OFF as u16);
        self.rebuild_caches();
    }

    /// Fills every cell with a uniformly random value in `0..=num_shifts`.
    pub fn randomise<R: Rng>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = rng.random_range(0..=self.num_shifts) as u16;
        }
        self.rebuild_caches();
    }

    /// One employee's assignments, day by day.
    #[inline]
    pub fn row(&self, employee: usize) -> &[u16] {
        let start = employee * self.horizon;
        &self.cells[start..start + self.horizon]
    }

    fn rebuild_caches(&mut self) {
        let width = self.num_shifts + 1;
        self.shift_counts.fill(0);
        self.coverage.fill(0);
        for employee in 0..self.employees {
            for day in 0..self.horizon {
                let shift = self.cells[employee * self.horizon + day] as usize;
                self.shift_counts[employee * width + shift] += 1;
                self.coverage[day * width + shift] += 1;
            }
        }
    }

    /// Encodes the matrix as `E x D x S : cells`, the inverse of
    /// [`Schedule::from_compact_string`].
    pub fn to_compact_string(&self) -> String {
        let mut out = format!("{}x{}x{}:", self.employees, self.horizon, self.num_shifts);
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&cell.to_string());
        }
        out
    }

    pub fn from_compact_string(text: &str) -> Result<Self, ScheduleCodecError> {
        let (header, body) = text
            .split_once(':')
            .ok_or(ScheduleCodecError::MissingHeader)?;
        let mut dims = header.split('x');
        let employees: usize = dims
            .next()
            .ok_or(ScheduleCodecError::MalformedHeader)?
            .trim()
            .parse()?;
        let horizon: usize = dims
            .next()
            .ok_or(ScheduleCodecError::MalformedHeader)?
            .trim()
            .parse()?;
        let num_shifts: usize = dims
            .next()
            .ok_or(ScheduleCodecError::MalformedHeader)?
            .trim()
            .parse()?;
        if dims.next().is_some() {
            return Err(ScheduleCodecError::MalformedHeader);
        }

        let mut cells = Vec::with_capacity(employees * horizon);
        if !body.trim().is_empty() {
            for field in body.split(',') {
                let cell: usize = field.trim().parse()?;
                if cell > num_shifts {
                    return Err(ScheduleCodecError::CellOutOfRange {
                        cell,
                        max_shift: num_shifts,
                    });
                }
                cells.push(cell as u16);
            }
        }
        if cells.len() != employees * horizon {
            return Err(ScheduleCodecError::CellCountMismatch {
                expected: employees * horizon,
                actual: cells.len(),
            });
        }

        let mut sched = Self {
            employees,
            horizon,
            num_shifts,
            cells,
            shift_counts: vec![0; employees * (num_shifts + 1)],
            coverage: vec![0; horizon * (num_shifts + 1)],
        };
        sched.rebuild_caches();
        Ok(sched)
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.employees == other.employees
            && self.horizon == other.horizon
            && self.num_shifts == other.num_shifts
            && self.cells == other.cells
    }
}

impl Eq for Schedule {}

impl std::hash::Hash for Schedule {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.employees.hash(state);
        self.horizon.hash(state);
        self.cells.hash(state);
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Schedule({} employees x {} days, {} shift types)",
            self.employees, self.horizon, self.num_shifts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_schedule_is_all_days_off() {
        let s = Schedule::new(3, 7, 2);
        for e in 0..3 {
            for d in 0..7 {
                assert_eq!(s.get(e, d), DAY_OFF);
            }
            assert_eq!(s.shift_count(e, 0), 7);
            assert_eq!(s.shift_count(e, 1), 0);
        }
        for d in 0..7 {
            assert_eq!(s.coverage(d, 1), 0);
            assert_eq!(s.coverage(d, 0), 3);
        }
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut s = Schedule::new(2, 7, 2);
        s.set(0, 3, 1);
        s.set(1, 3, 2);
        assert_eq!(s.get(0, 3), 1);
        assert_eq!(s.get(1, 3), 2);
        assert_eq!(s.get(0, 4), DAY_OFF);
    }

    #[test]
    fn test_out_of_range_get_returns_day_off() {
        let s = Schedule::new(2, 7, 2);
        assert_eq!(s.get(2, 0), DAY_OFF);
        assert_eq!(s.get(0, 7), DAY_OFF);
        assert_eq!(s.get(99, 99), DAY_OFF);
    }

    #[test]
    fn test_out_of_range_set_is_ignored() {
        let mut s = Schedule::new(2, 7, 2);
        let before = s.clone();
        s.set(2, 0, 1);
        s.set(0, 7, 1);
        s.set(0, 0, 3); // shift index above S
        assert_eq!(s, before);
        assert_eq!(s.shift_count(0, 1), 0);
    }

    #[test]
    fn test_caches_track_writes() {
        let mut s = Schedule::new(2, 7, 2);
        s.set(0, 0, 1);
        s.set(0, 1, 1);
        s.set(1, 0, 1);
        assert_eq!(s.shift_count(0, 1), 2);
        assert_eq!(s.shift_count(1, 1), 1);
        assert_eq!(s.coverage(0, 1), 2);
        assert_eq!(s.coverage(1, 1), 1);

        s.set(0, 0, 2);
        assert_eq!(s.shift_count(0, 1), 1);
        assert_eq!(s.shift_count(0, 2), 1);
        assert_eq!(s.coverage(0, 1), 1);
        assert_eq!(s.coverage(0, 2), 1);

        s.set(0, 0, DAY_OFF);
        assert_eq!(s.shift_count(0, 2), 0);
        assert_eq!(s.coverage(0, 2), 0);
    }

    #[test]
    fn test_total_minutes_uses_duration_table() {
        let mut s = Schedule::new(1, 7, 2);
        s.set(0, 0, 1);
        s.set(0, 1, 1);
        s.set(0, 2, 2);
        let minutes = [0u32, 480, 600];
        assert_eq!(s.total_minutes(0, &minutes), 480 * 2 + 600);
    }

    #[test]
    fn test_consecutive_runs() {
        let mut s = Schedule::new(1, 7, 1);
        for d in [1, 2, 3, 5] {
            s.set(0, d, 1);
        }
        assert_eq!(s.consecutive_working(0, 1), 3);
        assert_eq!(s.consecutive_working(0, 0), 0);
        assert_eq!(s.consecutive_off(0, 0), 1);
        assert_eq!(s.consecutive_off(0, 4), 1);
        assert_eq!(s.consecutive_working(0, 5), 1);
        assert_eq!(s.consecutive_off(0, 6), 1);
    }

    #[test]
    fn test_worked_weekends_counts_complete_weekends_only() {
        // 13-day horizon: weekend 0 complete (days 5, 6); second Saturday
        // (day 12) has no Sunday, so it never counts.
        let mut s = Schedule::new(1, 13, 1);
        s.set(0, 5, 1);
        assert_eq!(s.worked_weekends(0), 1);
        assert!(s.works_weekend(0, 0));

        s.set(0, 12, 1);
        assert_eq!(s.worked_weekends(0), 1);
        assert!(!s.works_weekend(0, 1));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut s = Schedule::new(2, 7, 2);
        s.set(0, 0, 1);
        s.set(1, 6, 2);
        s.clear();
        assert_eq!(s, Schedule::new(2, 7, 2));
        assert_eq!(s.coverage(0, 1), 0);
        assert_eq!(s.shift_count(1, 2), 0);
    }

    #[test]
    fn test_randomise_fills_valid_cells_and_caches() {
        let mut s = Schedule::new(4, 14, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        s.randomise(&mut rng);
        let mut by_count = vec![0u32; 4];
        for e in 0..4 {
            for d in 0..14 {
                let cell = s.get(e, d);
                assert!(cell <= 3);
            }
            for shift in 0..=3 {
                by_count[shift] += s.shift_count(e, shift);
            }
        }
        assert_eq!(by_count.iter().sum::<u32>(), 4 * 14);
    }

    #[test]
    fn test_compact_string_roundtrip() {
        let mut s = Schedule::new(3, 5, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        s.randomise(&mut rng);
        let encoded = s.to_compact_string();
        let decoded = Schedule::from_compact_string(&encoded).unwrap();
        assert_eq!(decoded, s);
        assert_eq!(decoded.coverage(0, 1), s.coverage(0, 1));
    }

    #[test]
    fn test_compact_string_rejects_bad_input() {
        assert!(matches!(
            Schedule::from_compact_string("no header"),
            Err(ScheduleCodecError::MissingHeader)
        ));
        assert!(matches!(
            Schedule::from_compact_string("2x2:0,0,0"),
            Err(ScheduleCodecError::MalformedHeader)
        ));
        assert!(matches!(
            Schedule::from_compact_string("1x2x1:0"),
            Err(ScheduleCodecError::CellCountMismatch { .. })
        ));
        assert!(matches!(
            Schedule::from_compact_string("1x2x1:0,5"),
            Err(ScheduleCodecError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn test_structural_equality_and_hash_ignore_cache_state() {
        use std::collections::HashSet;
        let mut a = Schedule::new(2, 3, 1);
        let mut b = Schedule::new(2, 3, 1);
        a.set(0, 0, 1);
        b.set(0, 0, 1);
        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
