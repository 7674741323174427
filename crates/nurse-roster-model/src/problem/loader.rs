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

//! Loader for the sectioned plain-text instance format.
//!
//! Sections are introduced by `SECTION_*` header lines; rows are
//! comma-separated, multi-valued fields use `|` as secondary delimiter and
//! `=` separates key from value inside multi-valued entries
//! (`D=14` caps shift `D` at 14). Blank lines and `#` comments are ignored.

use crate::problem::{
    builder::InstanceBuilder,
    err::InstanceLoaderError,
    instance::Instance,
    shift::ShiftType,
    staff::Staff,
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

const SECTION_HORIZON: &str = "SECTION_HORIZON";
const SECTION_SHIFTS: &str = "SECTION_SHIFTS";
const SECTION_STAFF: &str = "SECTION_STAFF";
const SECTION_DAYS_OFF: &str = "SECTION_DAYS_OFF";
const SECTION_SHIFT_ON_REQUESTS: &str = "SECTION_SHIFT_ON_REQUESTS";
const SECTION_SHIFT_OFF_REQUESTS: &str = "SECTION_SHIFT_OFF_REQUESTS";
const SECTION_COVER: &str = "SECTION_COVER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Horizon,
    Shifts,
    Staff,
    DaysOff,
    ShiftOnRequests,
    ShiftOffRequests,
    Cover,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader {
    allow_unknown_sections: bool,
}

impl Default for InstanceLoader {
    fn default() -> Self {
        Self {
            allow_unknown_sections: true,
        }
    }
}

impl InstanceLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// When disabled, rows under an unrecognised `SECTION_` header fail the
    /// load instead of being skipped.
    #[inline]
    pub fn allow_unknown_sections(mut self, yes: bool) -> Self {
        self.allow_unknown_sections = yes;
        self
    }

    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Instance, InstanceLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    pub fn from_str(&self, text: &str) -> Result<Instance, InstanceLoaderError> {
        self.from_bufread(text.as_bytes())
    }

    pub fn from_bufread<R: BufRead>(&self, br: R) -> Result<Instance, InstanceLoaderError> {
        let mut builder = InstanceBuilder::new();
        let mut section: Option<Section> = None;
        let mut saw_horizon = false;

        for (lineno, line) in br.lines().enumerate() {
            let lineno = lineno + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = parse_section_header(line) {
                if header == Section::Unknown && !self.allow_unknown_sections {
                    return Err(InstanceLoaderError::MalformedRow {
                        section: "unknown section",
                        line: lineno,
                    });
                }
                section = Some(header);
                continue;
            }

            match section {
                None => return Err(InstanceLoaderError::ContentOutsideSection { line: lineno }),
                Some(Section::Unknown) => continue,
                Some(Section::Horizon) => {
                    builder.horizon(line.parse::<usize>()?);
                    saw_horizon = true;
                }
                Some(Section::Shifts) => {
                    builder.add_shift(parse_shift_row(line, lineno)?);
                }
                Some(Section::Staff) => {
                    builder.add_staff(parse_staff_row(line, lineno)?);
                }
                Some(Section::DaysOff) => {
                    let fields = split_row(line);
                    let Some((employee, days)) = fields.split_first() else {
                        return Err(InstanceLoaderError::MalformedRow {
                            section: SECTION_DAYS_OFF,
                            line: lineno,
                        });
                    };
                    let days = days
                        .iter()
                        .map(|d| d.parse::<usize>())
                        .collect::<Result<Vec<_>, _>>()?;
                    builder.add_days_off(*employee, days);
                }
                Some(Section::ShiftOnRequests) => {
                    let (employee, day, shift, weight) =
                        parse_request_row(line, SECTION_SHIFT_ON_REQUESTS, lineno)?;
                    builder.add_shift_on_request(employee, day, shift, weight);
                }
                Some(Section::ShiftOffRequests) => {
                    let (employee, day, shift, weight) =
                        parse_request_row(line, SECTION_SHIFT_OFF_REQUESTS, lineno)?;
                    builder.add_shift_off_request(employee, day, shift, weight);
                }
                Some(Section::Cover) => {
                    let fields = split_row(line);
                    if fields.len() < 5 {
                        return Err(InstanceLoaderError::MalformedRow {
                            section: SECTION_COVER,
                            line: lineno,
                        });
                    }
                    builder.add_cover(
                        fields[0].parse()?,
                        fields[1],
                        fields[2].parse()?,
                        fields[3].parse()?,
                        fields[4].parse()?,
                    );
                }
            }
        }

        if !saw_horizon {
            return Err(InstanceLoaderError::MissingHorizon);
        }
        Ok(builder.build()?)
    }
}

fn parse_section_header(line: &str) -> Option<Section> {
    match line {
        SECTION_HORIZON => Some(Section::Horizon),
        SECTION_SHIFTS => Some(Section::Shifts),
        SECTION_STAFF => Some(Section::Staff),
        SECTION_DAYS_OFF => Some(Section::DaysOff),
        SECTION_SHIFT_ON_REQUESTS => Some(Section::ShiftOnRequests),
        SECTION_SHIFT_OFF_REQUESTS => Some(Section::ShiftOffRequests),
        SECTION_COVER => Some(Section::Cover),
        _ if line.starts_with("SECTION_") => Some(Section::Unknown),
        _ => None,
    }
}

fn split_row(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn parse_shift_row(line: &str, lineno: usize) -> Result<ShiftType, InstanceLoaderError> {
    let fields = split_row(line);
    if fields.len() < 2 || fields[0].is_empty() {
        return Err(InstanceLoaderError::MalformedRow {
            section: SECTION_SHIFTS,
            line: lineno,
        });
    }
    let mut shift = ShiftType::new(fields[0], fields[1].parse()?);
    if let Some(succ) = fields.get(2)
        && !succ.is_empty()
    {
        for id in succ.split('|').map(str::trim).filter(|s| !s.is_empty()) {
            shift = shift.with_forbidden_successor(id);
        }
    }
    Ok(shift)
}

fn parse_staff_row(line: &str, lineno: usize) -> Result<Staff, InstanceLoaderError> {
    let fields = split_row(line);
    if fields.len() < 8 || fields[0].is_empty() {
        return Err(InstanceLoaderError::MalformedRow {
            section: SECTION_STAFF,
            line: lineno,
        });
    }

    let mut staff = Staff::new(fields[0])
        .with_total_minutes(fields[3].parse()?, fields[2].parse()?)
        .with_consecutive_shifts(fields[5].parse()?, fields[4].parse()?)
        .with_min_consecutive_days_off(fields[6].parse()?)
        .with_max_weekends(fields[7].parse()?);

    // MaxShifts field: `D=14|N=8`, `None` meaning no cap for that shift.
    if !fields[1].is_empty() {
        for entry in fields[1].split('|').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((shift_id, cap)) = entry.split_once('=') else {
                return Err(InstanceLoaderError::MalformedRow {
                    section: SECTION_STAFF,
                    line: lineno,
                });
            };
            let cap = cap.trim();
            if cap.eq_ignore_ascii_case("none") {
                continue;
            }
            staff = staff.with_shift_cap(shift_id.trim(), cap.parse()?);
        }
    }

    Ok(staff)
}

fn parse_request_row<'a>(
    line: &'a str,
    section: &'static str,
    lineno: usize,
) -> Result<(&'a str, usize, &'a str, i64), InstanceLoaderError> {
    let fields = split_row(line);
    if fields.len() < 4 {
        return Err(InstanceLoaderError::MalformedRow {
            section,
            line: lineno,
        });
    }
    Ok((fields[0], fields[1].parse()?, fields[2], fields[3].parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# toy rostering instance
SECTION_HORIZON
14

SECTION_SHIFTS
D,480,
N,480,D

SECTION_STAFF
A,D=14|N=8,4320,3360,5,2,2,1
B,D=14|N=None,4320,3360,5,2,2,1

SECTION_DAYS_OFF
A,0,7

SECTION_SHIFT_ON_REQUESTS
A,2,D,3

SECTION_SHIFT_OFF_REQUESTS
B,3,N,4

SECTION_COVER
0,D,2,100,1
0,N,1,100,1
";

    #[test]
    fn test_load_sample_instance() {
        let inst = InstanceLoader::new().from_str(SAMPLE).unwrap();
        assert_eq!(inst.horizon(), 14);
        assert_eq!(inst.num_employees(), 2);
        assert_eq!(inst.num_shift_types(), 2);

        // N forbids D on the following day.
        let n = inst.shift_index("N").unwrap();
        let d = inst.shift_index("D").unwrap();
        assert!(inst.is_forbidden_succession(n, d));

        // Staff A: caps parsed out of `D=14|N=8`.
        let a = inst.staff_index("A").unwrap();
        assert_eq!(inst.shift_cap(a, d), Some(14));
        assert_eq!(inst.shift_cap(a, n), Some(8));
        assert_eq!(inst.staff_at(a).max_total_minutes(), 4320);
        assert_eq!(inst.staff_at(a).min_total_minutes(), 3360);
        assert_eq!(inst.staff_at(a).max_consecutive_shifts(), 5);
        assert_eq!(inst.staff_at(a).min_consecutive_shifts(), 2);
        assert_eq!(inst.staff_at(a).min_consecutive_days_off(), 2);
        assert_eq!(inst.staff_at(a).max_weekends(), 1);

        // `None` caps stay unlimited.
        let b = inst.staff_index("B").unwrap();
        assert_eq!(inst.shift_cap(b, n), None);

        assert!(inst.is_blocked(a, 0));
        assert!(inst.is_blocked(a, 7));
        assert_eq!(inst.on_requests_of(a).len(), 1);
        assert_eq!(inst.off_requests_of(b).len(), 1);
        assert_eq!(inst.cover_requirement(0, d), 2);
        assert_eq!(inst.cover_requirement(0, n), 1);
    }

    #[test]
    fn test_missing_horizon_is_rejected() {
        let err = InstanceLoader::new()
            .from_str("SECTION_SHIFTS\nD,480,\n")
            .unwrap_err();
        assert!(matches!(err, InstanceLoaderError::MissingHorizon));
    }

    #[test]
    fn test_content_before_section_is_rejected() {
        let err = InstanceLoader::new().from_str("14\n").unwrap_err();
        assert!(matches!(
            err,
            InstanceLoaderError::ContentOutsideSection { line: 1 }
        ));
    }

    #[test]
    fn test_malformed_staff_row_is_rejected() {
        let text = "SECTION_HORIZON\n7\nSECTION_STAFF\nA,D=1\n";
        let err = InstanceLoader::new().from_str(text).unwrap_err();
        assert!(matches!(
            err,
            InstanceLoaderError::MalformedRow {
                section: "SECTION_STAFF",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_section_skipped_by_default() {
        let text = "SECTION_HORIZON\n7\nSECTION_FUTURE\nx,y,z\nSECTION_SHIFTS\nD,480,\nSECTION_STAFF\nA,,4320,0,14,1,1,14\n";
        let inst = InstanceLoader::new().from_str(text).unwrap();
        assert_eq!(inst.horizon(), 7);
    }
}
