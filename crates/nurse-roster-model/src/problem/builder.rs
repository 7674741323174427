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

use crate::problem::{
    err::InstanceError,
    instance::Instance,
    shift::ShiftType,
    staff::Staff,
};

/// Raw request rows carried by the builder; ids get resolved in
/// [`Instance::from_parts`].
#[derive(Debug, Clone)]
pub(crate) struct RawDaysOff {
    pub employee_id: String,
    pub days: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawShiftRequest {
    pub employee_id: String,
    pub day: usize,
    pub shift_id: String,
    pub weight: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct RawCover {
    pub day: usize,
    pub shift_id: String,
    pub requirement: u32,
    pub weight_under: i64,
    pub weight_over: i64,
}

/// Collects instance data in loader order and validates it in one pass.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    horizon: usize,
    staff: Vec<Staff>,
    shifts: Vec<ShiftType>,
    days_off: Vec<RawDaysOff>,
    on_requests: Vec<RawShiftRequest>,
    off_requests: Vec<RawShiftRequest>,
    covers: Vec<RawCover>,
}

impl InstanceBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn horizon(&mut self, days: usize) -> &mut Self {
        self.horizon = days;
        self
    }

    #[inline]
    pub fn add_staff(&mut self, staff: Staff) -> &mut Self {
        self.staff.push(staff);
        self
    }

    #[inline]
    pub fn add_shift(&mut self, shift: ShiftType) -> &mut Self {
        self.shifts.push(shift);
        self
    }

    #[inline]
    pub fn add_days_off(
        &mut self,
        employee_id: impl Into<String>,
        days: impl IntoIterator<Item = usize>,
    ) -> &mut Self {
        self.days_off.push(RawDaysOff {
            employee_id: employee_id.into(),
            days: days.into_iter().collect(),
        });
        self
    }

    #[inline]
    pub fn add_shift_on_request(
        &mut self,
        employee_id: impl Into<String>,
        day: usize,
        shift_id: impl Into<String>,
        weight: i64,
    ) -> &mut Self {
        self.on_requests.push(RawShiftRequest {
            employee_id: employee_id.into(),
            day,
            shift_id: shift_id.into(),
            weight,
        });
        self
    }

    #[inline]
    pub fn add_shift_off_request(
        &mut self,
        employee_id: impl Into<String>,
        day: usize,
        shift_id: impl Into<String>,
        weight: i64,
    ) -> &mut Self {
        self.off_requests.push(RawShiftRequest {
            employee_id: employee_id.into(),
            day,
            shift_id: shift_id.into(),
            weight,
        });
        self
    }

    #[inline]
    pub fn add_cover(
        &mut self,
        day: usize,
        shift_id: impl Into<String>,
        requirement: u32,
        weight_under: i64,
        weight_over: i64,
    ) -> &mut Self {
        self.covers.push(RawCover {
            day,
            shift_id: shift_id.into(),
            requirement,
            weight_under,
            weight_over,
        });
        self
    }

    pub fn build(self) -> Result<Instance, InstanceError> {
        Instance::from_parts(
            self.horizon,
            self.staff,
            self.shifts,
            self.days_off,
            self.on_requests,
            self.off_requests,
            self.covers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::err::InstanceError;

    fn two_shift_builder() -> InstanceBuilder {
        let mut b = InstanceBuilder::new();
        b.horizon(14)
            .add_shift(ShiftType::new("D", 480))
            .add_shift(ShiftType::new("N", 480).with_forbidden_successor("D"))
            .add_staff(Staff::new("A").with_total_minutes(960, 4320))
            .add_staff(Staff::new("B"));
        b
    }

    #[test]
    fn test_build_minimal_instance() {
        let instance = two_shift_builder().build().unwrap();
        assert_eq!(instance.horizon(), 14);
        assert_eq!(instance.num_employees(), 2);
        assert_eq!(instance.num_shift_types(), 2);
    }

    #[test]
    fn test_zero_horizon_is_rejected() {
        let mut b = two_shift_builder();
        b.horizon(0);
        assert!(matches!(
            b.build().unwrap_err(),
            InstanceError::NonPositiveHorizon(_)
        ));
    }

    #[test]
    fn test_empty_staff_is_rejected() {
        let mut b = InstanceBuilder::new();
        b.horizon(7).add_shift(ShiftType::new("D", 480));
        assert!(matches!(b.build().unwrap_err(), InstanceError::EmptyStaff(_)));
    }

    #[test]
    fn test_duplicate_shift_id_is_rejected() {
        let mut b = two_shift_builder();
        b.add_shift(ShiftType::new("D", 240));
        assert!(matches!(
            b.build().unwrap_err(),
            InstanceError::DuplicateShiftId(_)
        ));
    }

    #[test]
    fn test_unknown_successor_id_is_rejected() {
        let mut b = InstanceBuilder::new();
        b.horizon(7)
            .add_shift(ShiftType::new("D", 480).with_forbidden_successor("X"))
            .add_staff(Staff::new("A"));
        assert!(matches!(
            b.build().unwrap_err(),
            InstanceError::UnknownShiftId(_)
        ));
    }

    #[test]
    fn test_days_off_for_unknown_employee_is_rejected() {
        let mut b = two_shift_builder();
        b.add_days_off("Z", [3]);
        assert!(matches!(
            b.build().unwrap_err(),
            InstanceError::UnknownStaffId(_)
        ));
    }

    #[test]
    fn test_request_day_outside_horizon_is_rejected() {
        let mut b = two_shift_builder();
        b.add_shift_on_request("A", 14, "D", 3);
        assert!(matches!(
            b.build().unwrap_err(),
            InstanceError::DayOutOfHorizon(_)
        ));
    }
}
