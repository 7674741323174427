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

//! Soft-preference rows with ids already resolved to stable indices.
//!
//! The builder accepts employee and shift ids as strings and resolves them
//! while constructing the [`crate::problem::instance::Instance`]; everything
//! the solver touches works on indices.

/// An employee wants to work `shift` on `day`; satisfying it scores `+weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftOnRequest {
    pub employee: usize,
    pub day: usize,
    /// 1-based shift index.
    pub shift: usize,
    pub weight: i64,
}

/// An employee wants to avoid `shift` on `day`; violating it scores `-weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftOffRequest {
    pub employee: usize,
    pub day: usize,
    /// 1-based shift index.
    pub shift: usize,
    pub weight: i64,
}

/// Demanded staffing level for one (day, shift) cell, with asymmetric
/// penalties for under- and over-staffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoverRequirement {
    pub day: usize,
    /// 1-based shift index.
    pub shift: usize,
    pub requirement: u32,
    pub weight_under: i64,
    pub weight_over: i64,
}

impl std::fmt::Display for CoverRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cover(day {}, shift {}, need {}, under {}, over {})",
            self.day, self.shift, self.requirement, self.weight_under, self.weight_over
        )
    }
}
