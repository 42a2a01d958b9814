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

use std::fmt::Display;

use quay_plan_core::space::PierLength;

#[derive(Debug, Clone, PartialEq)]
pub struct PierTooShortError {
    pier_length: PierLength,
    required: PierLength,
}

impl PierTooShortError {
    pub fn new(pier_length: PierLength, required: PierLength) -> Self {
        Self {
            pier_length,
            required,
        }
    }
    pub fn pier_length(&self) -> PierLength {
        self.pier_length
    }
    pub fn required(&self) -> PierLength {
        self.required
    }
}

impl Display for PierTooShortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PierTooShortError: pier_length {} cannot hold the longest vessel plus clearances ({})",
            self.pier_length, self.required
        )
    }
}

impl std::error::Error for PierTooShortError {}

#[derive(Debug, Clone, PartialEq)]
pub enum StayGenConfigBuildError {
    PierTooShort(PierTooShortError),
    MissingPierLength,
    MissingLppRange,
    MissingCount,
    NonPositiveLpp,
    NegativeClearance,
    InvalidBeamRatio,
    NonPositiveInterarrival,
    NonPositiveDwell,
}

impl Display for StayGenConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use StayGenConfigBuildError::*;
        match self {
            PierTooShort(e) => write!(f, "{}", e),
            MissingPierLength => write!(f, "Missing pier_length"),
            MissingLppRange => write!(f, "Missing lpp_range"),
            MissingCount => write!(f, "Missing count"),
            NonPositiveLpp => write!(f, "Vessel lengths must be positive and finite"),
            NegativeClearance => write!(f, "Clearance must be non-negative and finite"),
            InvalidBeamRatio => write!(f, "beam_ratio must be positive and finite"),
            NonPositiveInterarrival => write!(f, "mean_interarrival must be positive"),
            NonPositiveDwell => write!(f, "dwell_mean must be positive and dwell_sigma non-negative"),
        }
    }
}

impl From<PierTooShortError> for StayGenConfigBuildError {
    fn from(err: PierTooShortError) -> Self {
        Self::PierTooShort(err)
    }
}

impl std::error::Error for StayGenConfigBuildError {}
