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

use std::num::ParseIntError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonPositiveHorizonError;

impl std::fmt::Display for NonPositiveHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The planning horizon must be positive.")
    }
}

impl std::error::Error for NonPositiveHorizonError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyStaffError;

impl std::fmt::Display for EmptyStaffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The instance contains no staff members.")
    }
}

impl std::error::Error for EmptyStaffError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyShiftsError;

impl std::fmt::Display for EmptyShiftsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The instance contains no shift types.")
    }
}

impl std::error::Error for EmptyShiftsError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateStaffIdError {
    id: String,
}

impl DuplicateStaffIdError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for DuplicateStaffIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Duplicate staff id {}", self.id)
    }
}

impl std::error::Error for DuplicateStaffIdError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateShiftIdError {
    id: String,
}

impl DuplicateShiftIdError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for DuplicateShiftIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Duplicate shift id {}", self.id)
    }
}

impl std::error::Error for DuplicateShiftIdError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownStaffIdError {
    id: String,
}

impl UnknownStaffIdError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for UnknownStaffIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown staff id {}", self.id)
    }
}

impl std::error::Error for UnknownStaffIdError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownShiftIdError {
    id: String,
}

impl UnknownShiftIdError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for UnknownShiftIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown shift id {}", self.id)
    }
}

impl std::error::Error for UnknownShiftIdError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOutOfHorizonError {
    day: usize,
    horizon: usize,
}

impl DayOutOfHorizonError {
    pub fn new(day: usize, horizon: usize) -> Self {
        Self { day, horizon }
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }
}

impl std::fmt::Display for DayOutOfHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Day {} lies outside the {}-day horizon",
            self.day, self.horizon
        )
    }
}

impl std::error::Error for DayOutOfHorizonError {}

/// Rejected instance construction. The core never observes a malformed
/// instance; everything here fires inside the builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceError {
    NonPositiveHorizon(NonPositiveHorizonError),
    EmptyStaff(EmptyStaffError),
    EmptyShifts(EmptyShiftsError),
    DuplicateStaffId(DuplicateStaffIdError),
    DuplicateShiftId(DuplicateShiftIdError),
    UnknownStaffId(UnknownStaffIdError),
    UnknownShiftId(UnknownShiftIdError),
    DayOutOfHorizon(DayOutOfHorizonError),
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::NonPositiveHorizon(e) => write!(f, "{}", e),
            InstanceError::EmptyStaff(e) => write!(f, "{}", e),
            InstanceError::EmptyShifts(e) => write!(f, "{}", e),
            InstanceError::DuplicateStaffId(e) => write!(f, "{}", e),
            InstanceError::DuplicateShiftId(e) => write!(f, "{}", e),
            InstanceError::UnknownStaffId(e) => write!(f, "{}", e),
            InstanceError::UnknownShiftId(e) => write!(f, "{}", e),
            InstanceError::DayOutOfHorizon(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InstanceError {}

impl From<NonPositiveHorizonError> for InstanceError {
    fn from(err: NonPositiveHorizonError) -> Self {
        InstanceError::NonPositiveHorizon(err)
    }
}

impl From<EmptyStaffError> for InstanceError {
    fn from(err: EmptyStaffError) -> Self {
        InstanceError::EmptyStaff(err)
    }
}

impl From<EmptyShiftsError> for InstanceError {
    fn from(err: EmptyShiftsError) -> Self {
        InstanceError::EmptyShifts(err)
    }
}

impl From<DuplicateStaffIdError> for InstanceError {
    fn from(err: DuplicateStaffIdError) -> Self {
        InstanceError::DuplicateStaffId(err)
    }
}

impl From<DuplicateShiftIdError> for InstanceError {
    fn from(err: DuplicateShiftIdError) -> Self {
        InstanceError::DuplicateShiftId(err)
    }
}

impl From<UnknownStaffIdError> for InstanceError {
    fn from(err: UnknownStaffIdError) -> Self {
        InstanceError::UnknownStaffId(err)
    }
}

impl From<UnknownShiftIdError> for InstanceError {
    fn from(err: UnknownShiftIdError) -> Self {
        InstanceError::UnknownShiftId(err)
    }
}

impl From<DayOutOfHorizonError> for InstanceError {
    fn from(err: DayOutOfHorizonError) -> Self {
        InstanceError::DayOutOfHorizon(err)
    }
}

/// Failed lookup of a user-supplied identifier on a built instance.
///
/// Lookups by id fail loudly; raw-index accessors clamp or ignore instead
/// (see the schedule contract).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdNotFoundError {
    id: String,
}

impl IdNotFoundError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for IdNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identifier {} not found", self.id)
    }
}

impl std::error::Error for IdNotFoundError {}

#[derive(Debug)]
pub enum InstanceLoaderError {
    Io(std::io::Error),
    ParseInt(ParseIntError),
    ContentOutsideSection { line: usize },
    MalformedRow { section: &'static str, line: usize },
    MissingHorizon,
    Instance(InstanceError),
}

impl From<std::io::Error> for InstanceLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseIntError> for InstanceLoaderError {
    fn from(e: ParseIntError) -> Self {
        Self::ParseInt(e)
    }
}

impl From<InstanceError> for InstanceLoaderError {
    fn from(e: InstanceError) -> Self {
        Self::Instance(e)
    }
}

impl std::fmt::Display for InstanceLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InstanceLoaderError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            ParseInt(e) => write!(f, "parse-int error: {e}"),
            ContentOutsideSection { line } => {
                write!(f, "line {line}: content before any SECTION_ header")
            }
            MalformedRow { section, line } => {
                write!(f, "line {line}: malformed row in {section}")
            }
            MissingHorizon => write!(f, "instance file declares no SECTION_HORIZON"),
            Instance(e) => write!(f, "instance error: {e}"),
        }
    }
}

impl std::error::Error for InstanceLoaderError {}
