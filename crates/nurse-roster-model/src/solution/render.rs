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
use crate::problem::instance::Instance;
use crate::solution::schedule::Schedule;

/// Renders a roster as one line per employee: the staff id, a colon, then
/// the shift id (or `-` for a day off) for every day of the horizon.
pub fn render_roster(instance: &Instance, schedule: &Schedule) -> String {
    let mut out = String::new();
    for (employee, staff) in instance.staff().iter().enumerate() {
        out.push_str(staff.id());
        out.push(':');
        for day in 0..instance.horizon() {
            if day > 0 {
                out.push(' ');
            }
            let shift = schedule.get(employee, day);
            if shift == DAY_OFF {
                out.push('-');
            } else if let Some(info) = instance.shift_at(shift) {
                out.push_str(info.id());
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::builder::InstanceBuilder;
    use crate::problem::shift::ShiftType;
    use crate::problem::staff::Staff;

    #[test]
    fn test_render_marks_days_off_with_dash() {
        let mut b = InstanceBuilder::new();
        b.horizon(3)
            .add_shift(ShiftType::new("D", 480))
            .add_shift(ShiftType::new("N", 480))
            .add_staff(Staff::new("A"))
            .add_staff(Staff::new("B"));
        let instance = b.build().unwrap();

        let mut schedule = Schedule::new(2, 3, 2);
        schedule.set(0, 0, 1);
        schedule.set(0, 2, 2);
        schedule.set(1, 1, 1);

        let rendered = render_roster(&instance, &schedule);
        assert_eq!(rendered, "A:D - N\nB:- D -\n");
    }
}
