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

/// A shift type: duration in minutes plus the shift types that must not be
/// assigned on the directly following day.
///
/// Successors are kept by id here; the instance resolves them into 1-based
/// shift indices for the hot path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftType {
    id: String,
    minutes: u32,
    cannot_follow: Vec<String>,
}

impl ShiftType {
    #[inline]
    pub fn new(id: impl Into<String>, minutes: u32) -> Self {
        Self {
            id: id.into(),
            minutes,
            cannot_follow: Vec::new(),
        }
    }

    /// Forbids `successor_id` on the day immediately after this shift.
    #[inline]
    pub fn with_forbidden_successor(mut self, successor_id: impl Into<String>) -> Self {
        self.cannot_follow.push(successor_id.into());
        self
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    #[inline]
    pub fn forbidden_successor_ids(&self) -> &[String] {
        &self.cannot_follow
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ShiftType({}, {} min)", self.id, self.minutes)
    }
}
