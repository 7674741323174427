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

/// The reserved assignment value meaning "no shift on this day".
///
/// Shift-type indices in a [`crate::solution::schedule::Schedule`] are
/// 1-based; `DAY_OFF` is never a valid shift type.
pub const DAY_OFF: usize = 0;

/// Planning weeks run Monday through Sunday.
pub const DAYS_PER_WEEK: usize = 7;

const SATURDAY: usize = 5;
const SUNDAY: usize = 6;

/// Whether `day` (0-based within the horizon) falls on a weekend.
#[inline]
pub fn is_weekend(day: usize) -> bool {
    let dow = day % DAYS_PER_WEEK;
    dow == SATURDAY || dow == SUNDAY
}

/// The 0-based index of the week that `day` belongs to.
#[inline]
pub fn weekend_of(day: usize) -> usize {
    day / DAYS_PER_WEEK
}

/// Saturday of weekend `w`, which may lie outside the horizon.
#[inline]
pub fn weekend_saturday(w: usize) -> usize {
    w * DAYS_PER_WEEK + SATURDAY
}

/// The number of complete weekends (Saturday and Sunday both inside the
/// horizon). Incomplete trailing weekends do not count towards weekend
/// limits.
#[inline]
pub fn complete_weekends(horizon: usize) -> usize {
    let mut count = 0;
    let mut saturday = SATURDAY;
    while saturday + 1 < horizon {
        count += 1;
        saturday += DAYS_PER_WEEK;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_weekend_cycles_weekly() {
        assert!(!is_weekend(0));
        assert!(!is_weekend(4));
        assert!(is_weekend(5));
        assert!(is_weekend(6));
        assert!(!is_weekend(7));
        assert!(is_weekend(12));
        assert!(is_weekend(13));
    }

    #[test]
    fn test_weekend_of_groups_by_week() {
        assert_eq!(weekend_of(0), 0);
        assert_eq!(weekend_of(6), 0);
        assert_eq!(weekend_of(7), 1);
        assert_eq!(weekend_of(13), 1);
        assert_eq!(weekend_of(14), 2);
    }

    #[test]
    fn test_complete_weekends_requires_sunday_in_horizon() {
        assert_eq!(complete_weekends(0), 0);
        assert_eq!(complete_weekends(6), 0); // Saturday only
        assert_eq!(complete_weekends(7), 1); // Saturday + Sunday
        assert_eq!(complete_weekends(13), 1); // second Saturday only
        assert_eq!(complete_weekends(14), 2);
        assert_eq!(complete_weekends(28), 4);
    }
}
