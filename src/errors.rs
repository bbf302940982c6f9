// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

use crate::variants::AlleleClass;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid BND record: ALT {alt} does not follow the breakend grammar")]
    MalformedBreakendAlt { alt: String },
    #[error("invalid BND record: ALT {alt} carries sequence on both sides of the mate locator, the insertion placement is ambiguous")]
    AmbiguousInsertion { alt: String },
    #[error("invalid BND record: ALT {alt} uses asymmetric bracket orientation")]
    AsymmetricBrackets { alt: String },
    #[error("invalid BND record: REF {reference} does not anchor either end of ALT {alt}")]
    UnanchoredRef { reference: String, alt: String },
    #[error("invalid BND record: REF {reference} must be a single base")]
    InvalidRefLength { reference: String },
    #[error("unknown contig {name}")]
    UnknownContig { name: String },
    #[error("invalid BND record: mate contig {name} of ALT {alt} is unknown")]
    UnknownMateContig { name: String, alt: String },
    #[error("allele {alt} is {found}, expected {expected}")]
    WrongAlleleClass {
        expected: AlleleClass,
        found: AlleleClass,
        alt: String,
    },
    #[error("invalid coordinates {start}-{end} on contig {contig} of length {length}")]
    InvalidCoordinates {
        contig: String,
        start: u64,
        end: u64,
        length: u64,
    },
    #[error("invalid confidence interval {lower},{upper}, must enclose 0")]
    InvalidConfidenceInterval { lower: i64, upper: i64 },
    #[error("multi-allelic record at {chrom}:{pos} with ALT {alts} is unsupported, split the record first")]
    MultiallelicRecord { chrom: String, pos: u64, alts: String },
    #[error("breakend variant {event_id} has an unresolved mate and cannot be flipped to the opposite strand")]
    UnresolvedMate { event_id: String },
    #[error("record at position {pos} does not define a chromosome")]
    VcfRecordMissingChromosome { pos: i64 },
    #[error("invalid BCF record at {chrom}:{pos}: {msg}")]
    InvalidBcfRecord { chrom: String, pos: i64, msg: String },
}

pub(crate) fn invalid_bcf_record(chrom: &str, pos: i64, msg: &str) -> Error {
    Error::InvalidBcfRecord {
        chrom: chrom.to_owned(),
        pos,
        msg: msg.to_owned(),
    }
}
