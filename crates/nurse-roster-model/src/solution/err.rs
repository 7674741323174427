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

/// A compact-string roster that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCodecError {
    MissingHeader,
    MalformedHeader,
    ParseInt(ParseIntError),
    CellCountMismatch { expected: usize, actual: usize },
    CellOutOfRange { cell: usize, max_shift: usize },
}

impl From<ParseIntError> for ScheduleCodecError {
    fn from(e: ParseIntError) -> Self {
        Self::ParseInt(e)
    }
}

impl std::fmt::Display for ScheduleCodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ScheduleCodecError::*;
        match self {
            MissingHeader => write!(f, "compact schedule is missing its dimension header"),
            MalformedHeader => write!(f, "compact schedule header is malformed"),
            ParseInt(e) => write!(f, "parse-int error: {e}"),
            CellCountMismatch { expected, actual } => {
                write!(f, "expected {expected} cells, found {actual}")
            }
            CellOutOfRange { cell, max_shift } => {
                write!(f, "cell value {cell} exceeds the shift count {max_shift}")
            }
        }
    }
}

impl std::error::Error for ScheduleCodecError {}
