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

/// A staff member together with their working-time, rotation and weekend
/// limits.
///
/// Shift caps are kept as `(shift id, cap)` pairs as they appear in the
/// instance file; [`crate::problem::instance::Instance`] resolves them into a
/// dense per-shift table at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    id: String,
    shift_caps: Vec<(String, u32)>,
    max_total_minutes: u32,
    min_total_minutes: u32,
    max_consecutive_shifts: u32,
    min_consecutive_shifts: u32,
    min_consecutive_days_off: u32,
    max_weekends: u32,
}

impl Staff {
    /// A staff member with fully permissive limits. Callers tighten the
    /// limits they care about through the `with_*` methods.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shift_caps: Vec::new(),
            max_total_minutes: u32::MAX,
            min_total_minutes: 0,
            max_consecutive_shifts: u32::MAX,
            min_consecutive_shifts: 1,
            min_consecutive_days_off: 1,
            max_weekends: u32::MAX,
        }
    }

    /// Caps the number of shifts of type `shift_id` this employee may work
    /// over the horizon. A cap of 0 forbids the shift type entirely.
    #[inline]
    pub fn with_shift_cap(mut self, shift_id: impl Into<String>, cap: u32) -> Self {
        self.shift_caps.push((shift_id.into(), cap));
        self
    }

    #[inline]
    pub fn with_total_minutes(mut self, min: u32, max: u32) -> Self {
        self.min_total_minutes = min;
        self.max_total_minutes = max;
        self
    }

    #[inline]
    pub fn with_consecutive_shifts(mut self, min: u32, max: u32) -> Self {
        self.min_consecutive_shifts = min;
        self.max_consecutive_shifts = max;
        self
    }

    #[inline]
    pub fn with_min_consecutive_days_off(mut self, min: u32) -> Self {
        self.min_consecutive_days_off = min;
        self
    }

    #[inline]
    pub fn with_max_weekends(mut self, max: u32) -> Self {
        self.max_weekends = max;
        self
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn shift_caps(&self) -> &[(String, u32)] {
        &self.shift_caps
    }

    #[inline]
    pub fn max_total_minutes(&self) -> u32 {
        self.max_total_minutes
    }

    #[inline]
    pub fn min_total_minutes(&self) -> u32 {
        self.min_total_minutes
    }

    #[inline]
    pub fn max_consecutive_shifts(&self) -> u32 {
        self.max_consecutive_shifts
    }

    #[inline]
    pub fn min_consecutive_shifts(&self) -> u32 {
        self.min_consecutive_shifts
    }

    #[inline]
    pub fn min_consecutive_days_off(&self) -> u32 {
        self.min_consecutive_days_off
    }

    #[inline]
    pub fn max_weekends(&self) -> u32 {
        self.max_weekends
    }
}

impl std::fmt::Display for Staff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Staff({}, minutes: {}..={}, consecutive: {}..={}, min off: {}, weekends: {})",
            self.id,
            self.min_total_minutes,
            self.max_total_minutes,
            self.min_consecutive_shifts,
            self.max_consecutive_shifts,
            self.min_consecutive_days_off,
            self.max_weekends
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_staff_is_fully_permissive() {
        let s = Staff::new("A");
        assert_eq!(s.id(), "A");
        assert_eq!(s.min_total_minutes(), 0);
        assert_eq!(s.max_total_minutes(), u32::MAX);
        assert_eq!(s.min_consecutive_shifts(), 1);
        assert_eq!(s.max_consecutive_shifts(), u32::MAX);
        assert_eq!(s.min_consecutive_days_off(), 1);
        assert_eq!(s.max_weekends(), u32::MAX);
        assert!(s.shift_caps().is_empty());
    }

    #[test]
    fn test_with_methods_set_limits() {
        let s = Staff::new("B")
            .with_shift_cap("D", 14)
            .with_shift_cap("N", 0)
            .with_total_minutes(1000, 4000)
            .with_consecutive_shifts(2, 5)
            .with_min_consecutive_days_off(2)
            .with_max_weekends(1);

        assert_eq!(s.shift_caps(), &[("D".into(), 14), ("N".into(), 0)]);
        assert_eq!(s.min_total_minutes(), 1000);
        assert_eq!(s.max_total_minutes(), 4000);
        assert_eq!(s.min_consecutive_shifts(), 2);
        assert_eq!(s.max_consecutive_shifts(), 5);
        assert_eq!(s.min_consecutive_days_off(), 2);
        assert_eq!(s.max_weekends(), 1);
    }
}
