// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsing of the VCF breakend ALT notation.
//!
//! # Examples
//!
//! * `t[p[`: piece extending to the right of p is joined after t
//! * `t]p]`: reverse complemented piece extending left of p is joined after t
//! * `]p]t`: piece extending to the left of p is joined before t
//! * `[p[t`: reverse complemented piece extending right of p is joined before t
//! * `t.` and `.t`: single breakend, the mate is unknown

use std::fmt;

use anyhow::Result;
use regex::Regex;

use crate::errors::Error;
use crate::variants::Strand;

lazy_static! {
    static ref MATED_RE: Regex = Regex::new(
        r"^(?P<head>[ACGTUNRYSWKMBDHVacgtunryswkmbdhv]*)(?P<bracket1>[\[\]])(?P<contig>[^\[\]]+):(?P<pos>\d+)(?P<bracket2>[\[\]])(?P<tail>[ACGTUNRYSWKMBDHVacgtunryswkmbdhv]*)$"
    )
    .unwrap();
    static ref UNRESOLVED_RE: Regex = Regex::new(
        r"^(?:(?P<head>[ACGTUNRYSWKMBDHVacgtunryswkmbdhv]+)\.|\.(?P<tail>[ACGTUNRYSWKMBDHVacgtunryswkmbdhv]+))$"
    )
    .unwrap();
}

/// Location of the mate breakend as written in the ALT field.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct MateLocator {
    #[getset(get = "pub")]
    contig: String,
    /// One-based position as written in the ALT field.
    #[getset(get_copy = "pub")]
    pos: u64,
    #[getset(get_copy = "pub")]
    strand: Strand,
}

/// A parsed breakend ALT field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakendAlt {
    /// `t[p[` or `t]p]`: REF anchors the start of the ALT, the mate follows.
    BracketRight { inserted: String, mate: MateLocator },
    /// `[p[t` or `]p]t`: REF anchors the end of the ALT, the mate precedes.
    BracketLeft { inserted: String, mate: MateLocator },
    /// `t.`: the sequence continues into an unknown location to the right.
    UnresolvedRight { inserted: String },
    /// `.t`: the sequence continues into an unknown location to the left.
    UnresolvedLeft { inserted: String },
}

impl BreakendAlt {
    /// Parse `alt` anchored by the single REF base `ref_allele`.
    pub fn parse(ref_allele: &str, alt: &str) -> Result<Self> {
        if ref_allele.len() != 1 {
            return Err(Error::InvalidRefLength {
                reference: ref_allele.to_owned(),
            }
            .into());
        }
        let anchor = ref_allele.as_bytes()[0];

        if let Some(caps) = MATED_RE.captures(alt) {
            let head = caps.name("head").map_or("", |m| m.as_str());
            let tail = caps.name("tail").map_or("", |m| m.as_str());
            if !head.is_empty() && !tail.is_empty() {
                return Err(Error::AmbiguousInsertion {
                    alt: alt.to_owned(),
                }
                .into());
            }

            let bracket = &caps["bracket1"];
            if bracket != &caps["bracket2"] {
                return Err(Error::AsymmetricBrackets {
                    alt: alt.to_owned(),
                }
                .into());
            }
            let mate_strand = if bracket == "[" {
                Strand::Positive
            } else {
                Strand::Negative
            };
            let pos = caps["pos"].parse().map_err(|_| Error::MalformedBreakendAlt {
                alt: alt.to_owned(),
            })?;
            let mate = MateLocator::new(caps["contig"].to_owned(), pos, mate_strand);

            match anchored(anchor, head, tail) {
                Some(Strand::Positive) => Ok(BreakendAlt::BracketRight {
                    inserted: head[1..].to_owned(),
                    mate,
                }),
                Some(Strand::Negative) => Ok(BreakendAlt::BracketLeft {
                    inserted: tail[..tail.len() - 1].to_owned(),
                    mate,
                }),
                None => Err(unanchored(ref_allele, alt)),
            }
        } else if let Some(caps) = UNRESOLVED_RE.captures(alt) {
            let head = caps.name("head").map_or("", |m| m.as_str());
            let tail = caps.name("tail").map_or("", |m| m.as_str());
            match anchored(anchor, head, tail) {
                Some(Strand::Positive) => Ok(BreakendAlt::UnresolvedRight {
                    inserted: head[1..].to_owned(),
                }),
                Some(Strand::Negative) => Ok(BreakendAlt::UnresolvedLeft {
                    inserted: tail[..tail.len() - 1].to_owned(),
                }),
                None => Err(unanchored(ref_allele, alt)),
            }
        } else {
            Err(Error::MalformedBreakendAlt {
                alt: alt.to_owned(),
            }
            .into())
        }
    }

    /// Strand of the breakend at the VCF record position.
    pub fn left_strand(&self) -> Strand {
        match self {
            BreakendAlt::BracketRight { .. } | BreakendAlt::UnresolvedRight { .. } => {
                Strand::Positive
            }
            BreakendAlt::BracketLeft { .. } | BreakendAlt::UnresolvedLeft { .. } => {
                Strand::Negative
            }
        }
    }

    /// Novel sequence between the REF anchor and the mate, on the positive strand.
    pub fn inserted(&self) -> &str {
        match self {
            BreakendAlt::BracketRight { inserted, .. }
            | BreakendAlt::BracketLeft { inserted, .. }
            | BreakendAlt::UnresolvedRight { inserted }
            | BreakendAlt::UnresolvedLeft { inserted } => inserted,
        }
    }

    pub fn mate(&self) -> Option<&MateLocator> {
        match self {
            BreakendAlt::BracketRight { mate, .. } | BreakendAlt::BracketLeft { mate, .. } => {
                Some(mate)
            }
            _ => None,
        }
    }

    /// Render the ALT field anchored by `ref_allele`. Inverse of `parse`.
    pub fn to_alt(&self, ref_allele: &str) -> String {
        match self {
            BreakendAlt::BracketRight { inserted, mate } => {
                format!("{}{}{}", ref_allele, inserted, mate)
            }
            BreakendAlt::BracketLeft { inserted, mate } => {
                format!("{}{}{}", mate, inserted, ref_allele)
            }
            BreakendAlt::UnresolvedRight { inserted } => format!("{}{}.", ref_allele, inserted),
            BreakendAlt::UnresolvedLeft { inserted } => format!(".{}{}", inserted, ref_allele),
        }
    }
}

impl fmt::Display for MateLocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bracket = match self.strand {
            Strand::Positive => '[',
            Strand::Negative => ']',
        };
        write!(f, "{}{}:{}{}", bracket, self.contig, self.pos, bracket)
    }
}

/// Determine which end of the ALT sequence the REF base anchors. The head is checked
/// first; at most one of head and tail is non-empty.
fn anchored(anchor: u8, head: &str, tail: &str) -> Option<Strand> {
    if head.as_bytes().first() == Some(&anchor) {
        Some(Strand::Positive)
    } else if tail.as_bytes().last() == Some(&anchor) {
        Some(Strand::Negative)
    } else {
        None
    }
}

fn unanchored(ref_allele: &str, alt: &str) -> anyhow::Error {
    Error::UnanchoredRef {
        reference: ref_allele.to_owned(),
        alt: alt.to_owned(),
    }
    .into()
}
