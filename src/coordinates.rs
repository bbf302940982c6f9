// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Validated genomic coordinates.
//!
//! Coordinates are stored zero-based and half-open on the strand they were built for.
//! An empty interval (`start == end`) denotes the point between two bases, which is how
//! insertions and breakends are anchored.

use anyhow::Result;

use crate::errors::Error;
use crate::reference::Contig;

/// Imprecision around a position, as given by the VCF `CIPOS`/`CIEND` tags.
#[derive(new, CopyGetters, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConfidenceInterval {
    #[getset(get_copy = "pub")]
    upstream: u64,
    #[getset(get_copy = "pub")]
    downstream: u64,
}

impl ConfidenceInterval {
    pub fn precise() -> Self {
        ConfidenceInterval::default()
    }

    /// Parse the two values of a VCF confidence interval tag, e.g. `CIPOS=-10,20`.
    pub fn from_vcf(lower: i64, upper: i64) -> Result<Self> {
        if lower > 0 || upper < 0 {
            return Err(Error::InvalidConfidenceInterval { lower, upper }.into());
        }
        Ok(ConfidenceInterval::new(lower.unsigned_abs(), upper as u64))
    }

    pub fn is_precise(&self) -> bool {
        self.upstream == 0 && self.downstream == 0
    }

    /// The same interval seen from the opposite strand.
    pub fn invert(&self) -> Self {
        ConfidenceInterval::new(self.downstream, self.upstream)
    }

    pub fn to_vcf(&self) -> [i64; 2] {
        [-(self.upstream as i64), self.downstream as i64]
    }
}

#[derive(CopyGetters, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    /// Zero-based inclusive start.
    #[getset(get_copy = "pub")]
    start: u64,
    /// Zero-based exclusive end.
    #[getset(get_copy = "pub")]
    end: u64,
    #[getset(get_copy = "pub")]
    start_ci: ConfidenceInterval,
    #[getset(get_copy = "pub")]
    end_ci: ConfidenceInterval,
}

impl Coordinates {
    /// Zero-based, half-open coordinates, validated against the contig bounds.
    pub fn new(contig: &Contig, start: u64, end: u64) -> Result<Self> {
        if start > end || end > contig.length() {
            return Err(Error::InvalidCoordinates {
                contig: contig.name().to_owned(),
                start,
                end,
                length: contig.length(),
            }
            .into());
        }
        Ok(Coordinates {
            start,
            end,
            start_ci: ConfidenceInterval::precise(),
            end_ci: ConfidenceInterval::precise(),
        })
    }

    /// One-based, fully closed coordinates. A zero-length interval is written with
    /// `start == end + 1`, as VCF does for the point right of base `end`.
    pub fn one_based(contig: &Contig, start: u64, end: u64) -> Result<Self> {
        if start == 0 {
            return Err(Error::InvalidCoordinates {
                contig: contig.name().to_owned(),
                start,
                end,
                length: contig.length(),
            }
            .into());
        }
        Coordinates::new(contig, start - 1, end)
    }

    /// Zero-length coordinates at the zero-based point `pos`, i.e. between base `pos` and
    /// base `pos + 1` in one-based terms.
    pub fn point(contig: &Contig, pos: u64, ci: ConfidenceInterval) -> Result<Self> {
        Ok(Coordinates::new(contig, pos, pos)?.with_confidence(ci, ci))
    }

    pub fn with_confidence(mut self, start_ci: ConfidenceInterval, end_ci: ConfidenceInterval) -> Self {
        self.start_ci = start_ci;
        self.end_ci = end_ci;
        self
    }

    /// Reflect the coordinates onto the opposite strand of the given contig.
    pub fn invert(&self, contig: &Contig) -> Result<Self> {
        if self.end > contig.length() {
            return Err(Error::InvalidCoordinates {
                contig: contig.name().to_owned(),
                start: self.start,
                end: self.end,
                length: contig.length(),
            }
            .into());
        }
        Ok(Coordinates {
            start: contig.length() - self.end,
            end: contig.length() - self.start,
            start_ci: self.end_ci.invert(),
            end_ci: self.start_ci.invert(),
        })
    }

    pub fn start_one_based(&self) -> u64 {
        self.start + 1
    }

    pub fn end_one_based(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_precise(&self) -> bool {
        self.start_ci.is_precise() && self.end_ci.is_precise()
    }
}
