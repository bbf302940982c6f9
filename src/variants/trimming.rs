// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Minimal representation of REF/ALT allele pairs.
//!
//! Shared bases are removed from both ends of the alleles. The order in which the ends are
//! trimmed decides where an ambiguous difference ends up: trimming the right end first leaves
//! it at the leftmost possible position (VCF convention), trimming the left end first at the
//! rightmost (HGVS convention).

use std::cmp;

use crate::utils;
use crate::variants::Strand;

/// Convention for placing the remaining difference of a trimmed allele pair.
#[derive(
    Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    /// Leftmost position, as VCF expects.
    Left,
    /// Rightmost position, as HGVS expects.
    Right,
}

impl ShiftDirection {
    pub fn opposite(self) -> Self {
        match self {
            ShiftDirection::Left => ShiftDirection::Right,
            ShiftDirection::Right => ShiftDirection::Left,
        }
    }
}

/// Whether trimming keeps an anchor base on each allele or removes shared bases entirely.
#[derive(
    Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RetentionPolicy {
    /// Never trim an allele to empty (VCF style `A -> AT`).
    Retain,
    /// Trim shared bases down to empty alleles (`"" -> T`).
    Remove,
}

impl RetentionPolicy {
    /// True if the allele pair is left untouched under this policy.
    pub fn cant_trim(self, ref_allele: &str, alt_allele: &str) -> bool {
        let symbolic = utils::is_large_symbolic(alt_allele.as_bytes());
        match self {
            RetentionPolicy::Retain => {
                ref_allele.chars().count() <= 1 || alt_allele.chars().count() <= 1 || symbolic
            }
            RetentionPolicy::Remove => ref_allele.is_empty() || alt_allele.is_empty() || symbolic,
        }
    }

    /// Number of bases each allele keeps at least while trimming.
    fn min_len(self) -> usize {
        match self {
            RetentionPolicy::Retain => 1,
            RetentionPolicy::Remove => 0,
        }
    }

    fn trim_large_symbolic(self, start: u64, ref_allele: &str, alt_allele: &str) -> Trimmed {
        match self {
            RetentionPolicy::Retain => Trimmed::new(start, ref_allele.to_owned(), alt_allele.to_owned()),
            // the anchor base is the only REF base of a symbolic allele
            RetentionPolicy::Remove if !ref_allele.is_empty() => {
                Trimmed::new(start + 1, String::new(), alt_allele.to_owned())
            }
            RetentionPolicy::Remove => Trimmed::new(start, String::new(), alt_allele.to_owned()),
        }
    }
}

/// A trimmed allele pair and its new start.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Trimmed {
    #[getset(get_copy = "pub")]
    start: u64,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_allele: String,
}

/// Check whether the allele pair would be touched by trimming under the given policy.
pub fn can_trim(ref_allele: &str, alt_allele: &str, policy: RetentionPolicy) -> bool {
    !policy.cant_trim(ref_allele, alt_allele)
}

/// Trim an allele pair to its minimal representation.
///
/// `start` is the coordinate of the first REF base in whatever system the caller uses; it
/// advances by the number of bases removed from the left.
pub fn trim(
    direction: ShiftDirection,
    start: u64,
    ref_allele: &str,
    alt_allele: &str,
    policy: RetentionPolicy,
) -> Trimmed {
    if utils::is_large_symbolic(alt_allele.as_bytes()) {
        return policy.trim_large_symbolic(start, ref_allele, alt_allele);
    }
    if policy.cant_trim(ref_allele, alt_allele) {
        return Trimmed::new(start, ref_allele.to_owned(), alt_allele.to_owned());
    }

    let min_len = policy.min_len();
    let (start, ref_trimmed, alt_trimmed) = match direction {
        ShiftDirection::Left => {
            let (ref_trimmed, alt_trimmed) = trim_suffix(ref_allele, alt_allele, min_len);
            let (prefix, ref_trimmed, alt_trimmed) = trim_prefix(ref_trimmed, alt_trimmed, min_len);
            (start + prefix as u64, ref_trimmed, alt_trimmed)
        }
        ShiftDirection::Right => {
            let (prefix, ref_trimmed, alt_trimmed) = trim_prefix(ref_allele, alt_allele, min_len);
            let (ref_trimmed, alt_trimmed) = trim_suffix(ref_trimmed, alt_trimmed, min_len);
            (start + prefix as u64, ref_trimmed, alt_trimmed)
        }
    };

    let trimmed = Trimmed::new(start, ref_trimmed.to_owned(), alt_trimmed.to_owned());
    trace!(
        "trimmed {}>{} to {}:{}>{} ({}, {})",
        ref_allele,
        alt_allele,
        trimmed.start,
        trimmed.ref_allele,
        trimmed.alt_allele,
        direction,
        policy
    );
    trimmed
}

/// Maximum number of bases that may be trimmed from one end while every allele keeps
/// `min_len` bases.
fn max_trim(ref_allele: &str, alt_allele: &str, min_len: usize) -> usize {
    cmp::min(ref_allele.chars().count(), alt_allele.chars().count()).saturating_sub(min_len)
}

/// Byte length of the last `n` characters of `allele`.
fn suffix_len(allele: &str, n: usize) -> usize {
    allele.chars().rev().take(n).map(char::len_utf8).sum()
}

/// Byte length of the first `n` characters of `allele`.
fn prefix_len(allele: &str, n: usize) -> usize {
    allele.chars().take(n).map(char::len_utf8).sum()
}

fn trim_suffix<'a>(ref_allele: &'a str, alt_allele: &'a str, min_len: usize) -> (&'a str, &'a str) {
    let n = ref_allele
        .chars()
        .rev()
        .zip(alt_allele.chars().rev())
        .take(max_trim(ref_allele, alt_allele, min_len))
        .take_while(|(r, a)| r == a)
        .count();
    (
        &ref_allele[..ref_allele.len() - suffix_len(ref_allele, n)],
        &alt_allele[..alt_allele.len() - suffix_len(alt_allele, n)],
    )
}

fn trim_prefix<'a>(
    ref_allele: &'a str,
    alt_allele: &'a str,
    min_len: usize,
) -> (usize, &'a str, &'a str) {
    let n = ref_allele
        .chars()
        .zip(alt_allele.chars())
        .take(max_trim(ref_allele, alt_allele, min_len))
        .take_while(|(r, a)| r == a)
        .count();
    (
        n,
        &ref_allele[prefix_len(ref_allele, n)..],
        &alt_allele[prefix_len(alt_allele, n)..],
    )
}

/// A configured trimmer, combining a shift direction with a retention policy.
#[derive(new, CopyGetters, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleTrimmer {
    #[getset(get_copy = "pub")]
    direction: ShiftDirection,
    #[getset(get_copy = "pub")]
    policy: RetentionPolicy,
}

impl AlleleTrimmer {
    pub fn left_shifting(policy: RetentionPolicy) -> Self {
        AlleleTrimmer::new(ShiftDirection::Left, policy)
    }

    pub fn right_shifting(policy: RetentionPolicy) -> Self {
        AlleleTrimmer::new(ShiftDirection::Right, policy)
    }

    /// Trim alleles given on the given strand.
    ///
    /// On the negative strand the opposite direction is applied, so that the result is
    /// shifted towards the configured end of the positive strand. The alleles must already
    /// be expressed on `strand`.
    pub fn trim(&self, strand: Strand, start: u64, ref_allele: &str, alt_allele: &str) -> Trimmed {
        let direction = match strand {
            Strand::Positive => self.direction,
            Strand::Negative => self.direction.opposite(),
        };
        trim(direction, start, ref_allele, alt_allele, self.policy)
    }

    pub fn can_trim(&self, ref_allele: &str, alt_allele: &str) -> bool {
        can_trim(ref_allele, alt_allele, self.policy)
    }
}

impl Default for AlleleTrimmer {
    fn default() -> Self {
        AlleleTrimmer::left_shifting(RetentionPolicy::Retain)
    }
}
