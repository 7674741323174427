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

use crate::common::DAY_OFF;
use crate::problem::{
    builder::{RawCover, RawDaysOff, RawShiftRequest},
    err::{
        DayOutOfHorizonError, DuplicateShiftIdError, DuplicateStaffIdError, EmptyShiftsError,
        EmptyStaffError, IdNotFoundError, InstanceError, NonPositiveHorizonError,
        UnknownShiftIdError, UnknownStaffIdError,
    },
    requests::{CoverRequirement, ShiftOffRequest, ShiftOnRequest},
    shift::ShiftType,
    staff::Staff,
};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};

/// The immutable problem input.
///
/// Everything the solver's hot loop needs is resolved to dense, index-based
/// tables at construction time: shift durations, per-employee shift caps,
/// forbidden successor sets, per-employee request buckets and a
/// (day, shift) → cover-row lookup.
#[derive(Debug, Clone)]
pub struct Instance {
    horizon: usize,
    staff: Vec<Staff>,
    shifts: Vec<ShiftType>,

    staff_lookup: HashMap<String, usize>,
    /// 1-based shift indices; `DAY_OFF` is never present.
    shift_lookup: HashMap<String, usize>,

    /// Duration per shift index, `minutes[DAY_OFF] == 0`. Length S + 1.
    minutes: Vec<u32>,
    /// Resolved forbidden successors per shift index. Length S + 1.
    forbidden_successors: Vec<SmallVec<[usize; 4]>>,
    /// `shift_caps[e][s]`: cap on shifts of type `s` for employee `e`,
    /// `None` meaning unlimited. Length per row S + 1.
    shift_caps: Vec<Vec<Option<u32>>>,

    days_off: Vec<BTreeSet<usize>>,
    on_requests: Vec<ShiftOnRequest>,
    off_requests: Vec<ShiftOffRequest>,
    on_by_employee: Vec<Vec<ShiftOnRequest>>,
    off_by_employee: Vec<Vec<ShiftOffRequest>>,

    covers: Vec<CoverRequirement>,
    /// `cover_lookup[d][s]` indexes into `covers`. Row length S + 1.
    cover_lookup: Vec<Vec<Option<usize>>>,
}

impl Instance {
    pub(crate) fn from_parts(
        horizon: usize,
        staff: Vec<Staff>,
        shifts: Vec<ShiftType>,
        days_off_rows: Vec<RawDaysOff>,
        on_rows: Vec<RawShiftRequest>,
        off_rows: Vec<RawShiftRequest>,
        cover_rows: Vec<RawCover>,
    ) -> Result<Self, InstanceError> {
        if horizon == 0 {
            return Err(NonPositiveHorizonError.into());
        }
        if staff.is_empty() {
            return Err(EmptyStaffError.into());
        }
        if shifts.is_empty() {
            return Err(EmptyShiftsError.into());
        }

        let mut staff_lookup = HashMap::with_capacity(staff.len());
        for (i, s) in staff.iter().enumerate() {
            if staff_lookup.insert(s.id().to_string(), i).is_some() {
                return Err(DuplicateStaffIdError::new(s.id()).into());
            }
        }

        let mut shift_lookup = HashMap::with_capacity(shifts.len());
        for (i, s) in shifts.iter().enumerate() {
            if shift_lookup.insert(s.id().to_string(), i + 1).is_some() {
                return Err(DuplicateShiftIdError::new(s.id()).into());
            }
        }

        let num_shifts = shifts.len();

        let mut minutes = vec![0u32; num_shifts + 1];
        for (i, s) in shifts.iter().enumerate() {
            minutes[i + 1] = s.minutes();
        }

        let mut forbidden_successors = vec![SmallVec::new(); num_shifts + 1];
        for (i, s) in shifts.iter().enumerate() {
            for succ in s.forbidden_successor_ids() {
                let idx = *shift_lookup
                    .get(succ)
                    .ok_or_else(|| UnknownShiftIdError::new(succ.clone()))?;
                forbidden_successors[i + 1].push(idx);
            }
        }

        let mut shift_caps = Vec::with_capacity(staff.len());
        for member in &staff {
            let mut row = vec![None; num_shifts + 1];
            for (shift_id, cap) in member.shift_caps() {
                let idx = *shift_lookup
                    .get(shift_id)
                    .ok_or_else(|| UnknownShiftIdError::new(shift_id.clone()))?;
                row[idx] = Some(*cap);
            }
            shift_caps.push(row);
        }

        let mut days_off = vec![BTreeSet::new(); staff.len()];
        for row in days_off_rows {
            let employee = *staff_lookup
                .get(&row.employee_id)
                .ok_or_else(|| UnknownStaffIdError::new(row.employee_id.clone()))?;
            for day in row.days {
                if day >= horizon {
                    return Err(DayOutOfHorizonError::new(day, horizon).into());
                }
                days_off[employee].insert(day);
            }
        }

        let resolve_request = |row: &RawShiftRequest| -> Result<(usize, usize), InstanceError> {
            let employee = *staff_lookup
                .get(&row.employee_id)
                .ok_or_else(|| UnknownStaffIdError::new(row.employee_id.clone()))?;
            let shift = *shift_lookup
                .get(&row.shift_id)
                .ok_or_else(|| UnknownShiftIdError::new(row.shift_id.clone()))?;
            if row.day >= horizon {
                return Err(DayOutOfHorizonError::new(row.day, horizon).into());
            }
            Ok((employee, shift))
        };

        let mut on_requests = Vec::with_capacity(on_rows.len());
        for row in &on_rows {
            let (employee, shift) = resolve_request(row)?;
            on_requests.push(ShiftOnRequest {
                employee,
                day: row.day,
                shift,
                weight: row.weight,
            });
        }

        let mut off_requests = Vec::with_capacity(off_rows.len());
        for row in &off_rows {
            let (employee, shift) = resolve_request(row)?;
            off_requests.push(ShiftOffRequest {
                employee,
                day: row.day,
                shift,
                weight: row.weight,
            });
        }

        let mut on_by_employee = vec![Vec::new(); staff.len()];
        for req in &on_requests {
            on_by_employee[req.employee].push(*req);
        }
        let mut off_by_employee = vec![Vec::new(); staff.len()];
        for req in &off_requests {
            off_by_employee[req.employee].push(*req);
        }

        let mut covers = Vec::with_capacity(cover_rows.len());
        let mut cover_lookup = vec![vec![None; num_shifts + 1]; horizon];
        for row in &cover_rows {
            let shift = *shift_lookup
                .get(&row.shift_id)
                .ok_or_else(|| UnknownShiftIdError::new(row.shift_id.clone()))?;
            if row.day >= horizon {
                return Err(DayOutOfHorizonError::new(row.day, horizon).into());
            }
            cover_lookup[row.day][shift] = Some(covers.len());
            covers.push(CoverRequirement {
                day: row.day,
                shift,
                requirement: row.requirement,
                weight_under: row.weight_under,
                weight_over: row.weight_over,
            });
        }

        Ok(Self {
            horizon,
            staff,
            shifts,
            staff_lookup,
            shift_lookup,
            minutes,
            forbidden_successors,
            shift_caps,
            days_off,
            on_requests,
            off_requests,
            on_by_employee,
            off_by_employee,
            covers,
            cover_lookup,
        })
    }

    #[inline]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[inline]
    pub fn num_employees(&self) -> usize {
        self.staff.len()
    }

    #[inline]
    pub fn num_shift_types(&self) -> usize {
        self.shifts.len()
    }

    #[inline]
    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    #[inline]
    pub fn shifts(&self) -> &[ShiftType] {
        &self.shifts
    }

    #[inline]
    pub fn staff_at(&self, employee: usize) -> &Staff {
        &self.staff[employee]
    }

    /// The shift type behind a 1-based shift index. `None` for `DAY_OFF` and
    /// out-of-range indices.
    #[inline]
    pub fn shift_at(&self, shift: usize) -> Option<&ShiftType> {
        if shift == DAY_OFF {
            return None;
        }
        self.shifts.get(shift - 1)
    }

    #[inline]
    pub fn staff_index(&self, id: &str) -> Result<usize, IdNotFoundError> {
        self.staff_lookup
            .get(id)
            .copied()
            .ok_or_else(|| IdNotFoundError::new(id))
    }

    /// 1-based shift index for `id`.
    #[inline]
    pub fn shift_index(&self, id: &str) -> Result<usize, IdNotFoundError> {
        self.shift_lookup
            .get(id)
            .copied()
            .ok_or_else(|| IdNotFoundError::new(id))
    }

    /// Duration of a shift index in minutes; 0 for `DAY_OFF` and anything
    /// out of range.
    #[inline]
    pub fn shift_minutes(&self, shift: usize) -> u32 {
        self.minutes.get(shift).copied().unwrap_or(0)
    }

    /// Duration table indexed by shift; `table[DAY_OFF] == 0`.
    #[inline]
    pub fn minutes_table(&self) -> &[u32] {
        &self.minutes
    }

    /// Resolved 1-based indices of shifts that must not follow `shift`.
    #[inline]
    pub fn forbidden_after(&self, shift: usize) -> &[usize] {
        self.forbidden_successors
            .get(shift)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether assigning `next` on the day after `current` violates the
    /// rotation rule. Day-off on either side never does.
    #[inline]
    pub fn is_forbidden_succession(&self, current: usize, next: usize) -> bool {
        if current == DAY_OFF || next == DAY_OFF {
            return false;
        }
        self.forbidden_after(current).contains(&next)
    }

    /// Cap on shifts of type `shift` for `employee`; `None` = unlimited.
    #[inline]
    pub fn shift_cap(&self, employee: usize, shift: usize) -> Option<u32> {
        self.shift_caps
            .get(employee)
            .and_then(|row| row.get(shift))
            .copied()
            .flatten()
    }

    #[inline]
    pub fn days_off(&self, employee: usize) -> &BTreeSet<usize> {
        &self.days_off[employee]
    }

    #[inline]
    pub fn is_blocked(&self, employee: usize, day: usize) -> bool {
        self.days_off
            .get(employee)
            .is_some_and(|set| set.contains(&day))
    }

    #[inline]
    pub fn shift_on_requests(&self) -> &[ShiftOnRequest] {
        &self.on_requests
    }

    #[inline]
    pub fn shift_off_requests(&self) -> &[ShiftOffRequest] {
        &self.off_requests
    }

    #[inline]
    pub fn on_requests_of(&self, employee: usize) -> &[ShiftOnRequest] {
        &self.on_by_employee[employee]
    }

    #[inline]
    pub fn off_requests_of(&self, employee: usize) -> &[ShiftOffRequest] {
        &self.off_by_employee[employee]
    }

    #[inline]
    pub fn cover_requirements(&self) -> &[CoverRequirement] {
        &self.covers
    }

    /// The cover row for (day, shift), if the instance demands coverage
    /// there.
    #[inline]
    pub fn cover_at(&self, day: usize, shift: usize) -> Option<&CoverRequirement> {
        let idx = *self.cover_lookup.get(day)?.get(shift)?;
        idx.map(|i| &self.covers[i])
    }

    /// Required head-count for (day, shift); 0 when no cover row exists.
    #[inline]
    pub fn cover_requirement(&self, day: usize, shift: usize) -> u32 {
        self.cover_at(day, shift).map(|c| c.requirement).unwrap_or(0)
    }

    #[inline]
    pub fn is_valid_day(&self, day: usize) -> bool {
        day < self.horizon
    }

    #[inline]
    pub fn is_valid_employee(&self, employee: usize) -> bool {
        employee < self.staff.len()
    }

    /// 1-based shift indices are valid; `DAY_OFF` is not a shift.
    #[inline]
    pub fn is_valid_shift(&self, shift: usize) -> bool {
        shift >= 1 && shift <= self.shifts.len()
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance({} days, {} staff, {} shift types, {} cover rows)",
            self.horizon,
            self.staff.len(),
            self.shifts.len(),
            self.covers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::builder::InstanceBuilder;

    fn instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.horizon(14)
            .add_shift(ShiftType::new("D", 480))
            .add_shift(ShiftType::new("N", 600).with_forbidden_successor("D"))
            .add_staff(
                Staff::new("A")
                    .with_shift_cap("D", 10)
                    .with_total_minutes(960, 4320),
            )
            .add_staff(Staff::new("B").with_shift_cap("N", 0))
            .add_days_off("A", [3, 4])
            .add_shift_on_request("A", 2, "D", 3)
            .add_shift_off_request("B", 5, "N", 2)
            .add_cover(0, "D", 2, 10, 5);
        b.build().unwrap()
    }

    #[test]
    fn test_lookups_resolve_ids() {
        let inst = instance();
        assert_eq!(inst.staff_index("A").unwrap(), 0);
        assert_eq!(inst.staff_index("B").unwrap(), 1);
        assert_eq!(inst.shift_index("D").unwrap(), 1);
        assert_eq!(inst.shift_index("N").unwrap(), 2);
        assert!(inst.staff_index("Z").is_err());
        assert!(inst.shift_index("Z").is_err());
    }

    #[test]
    fn test_minutes_table_has_day_off_slot() {
        let inst = instance();
        assert_eq!(inst.minutes_table(), &[0, 480, 600]);
        assert_eq!(inst.shift_minutes(0), 0);
        assert_eq!(inst.shift_minutes(2), 600);
        assert_eq!(inst.shift_minutes(99), 0);
    }

    #[test]
    fn test_forbidden_succession_is_resolved() {
        let inst = instance();
        // N (2) forbids D (1) the next day.
        assert!(inst.is_forbidden_succession(2, 1));
        assert!(!inst.is_forbidden_succession(1, 2));
        assert!(!inst.is_forbidden_succession(0, 1));
        assert!(!inst.is_forbidden_succession(2, 0));
        assert_eq!(inst.forbidden_after(2), &[1]);
        assert!(inst.forbidden_after(1).is_empty());
    }

    #[test]
    fn test_shift_caps_resolve_per_employee() {
        let inst = instance();
        assert_eq!(inst.shift_cap(0, 1), Some(10));
        assert_eq!(inst.shift_cap(0, 2), None);
        assert_eq!(inst.shift_cap(1, 2), Some(0));
    }

    #[test]
    fn test_days_off_and_blocked() {
        let inst = instance();
        assert!(inst.is_blocked(0, 3));
        assert!(inst.is_blocked(0, 4));
        assert!(!inst.is_blocked(0, 5));
        assert!(!inst.is_blocked(1, 3));
    }

    #[test]
    fn test_request_buckets() {
        let inst = instance();
        assert_eq!(inst.on_requests_of(0).len(), 1);
        assert_eq!(inst.on_requests_of(1).len(), 0);
        assert_eq!(inst.off_requests_of(1).len(), 1);
        let req = inst.on_requests_of(0)[0];
        assert_eq!((req.day, req.shift, req.weight), (2, 1, 3));
    }

    #[test]
    fn test_cover_lookup() {
        let inst = instance();
        assert_eq!(inst.cover_requirement(0, 1), 2);
        assert_eq!(inst.cover_requirement(0, 2), 0);
        assert_eq!(inst.cover_requirement(1, 1), 0);
        let cover = inst.cover_at(0, 1).unwrap();
        assert_eq!(cover.weight_under, 10);
        assert_eq!(cover.weight_over, 5);
    }

    #[test]
    fn test_validity_predicates() {
        let inst = instance();
        assert!(inst.is_valid_day(13));
        assert!(!inst.is_valid_day(14));
        assert!(inst.is_valid_employee(1));
        assert!(!inst.is_valid_employee(2));
        assert!(inst.is_valid_shift(1));
        assert!(inst.is_valid_shift(2));
        assert!(!inst.is_valid_shift(0));
        assert!(!inst.is_valid_shift(3));
    }
}
