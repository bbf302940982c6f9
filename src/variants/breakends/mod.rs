// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Breakends and the resolution of VCF BND records into two-ended variants.
//!
//! A breakend is stored as the zero-length point between two bases. The VCF record position
//! names the REF base left of the break, the mate position in the ALT field names the base
//! right of it. Both ends are first placed on the positive strand and inverted afterwards
//! if the ALT orientation says so.

use std::ops::Range;
use std::sync::Arc;

use anyhow::Result;
use bio_types::genome::{self, AbstractInterval};

use crate::coordinates::{ConfidenceInterval, Coordinates};
use crate::errors::Error;
use crate::reference::{Contig, ContigResolver};
use crate::utils::revcomp;
use crate::variants::Strand;

pub mod format;
pub mod grammar;

pub use format::{format_breakend, VcfBreakend};
pub use grammar::{BreakendAlt, MateLocator};

/// One end of a novel adjacency.
#[derive(Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct GenomicBreakend {
    #[getset(get = "pub")]
    contig: Arc<Contig>,
    #[getset(get = "pub")]
    id: String,
    #[getset(get_copy = "pub")]
    strand: Strand,
    #[getset(get_copy = "pub")]
    coordinates: Coordinates,
}

impl GenomicBreakend {
    pub fn new(contig: Arc<Contig>, id: &str, strand: Strand, coordinates: Coordinates) -> Self {
        GenomicBreakend {
            contig,
            id: id.to_owned(),
            strand,
            coordinates,
        }
    }

    pub fn with_strand(&self, strand: Strand) -> Result<Self> {
        if strand == self.strand {
            return Ok(self.clone());
        }
        Ok(GenomicBreakend {
            contig: Arc::clone(&self.contig),
            id: self.id.clone(),
            strand,
            coordinates: self.coordinates.invert(&self.contig)?,
        })
    }

    pub fn to_opposite_strand(&self) -> Result<Self> {
        self.with_strand(self.strand.opposite())
    }

    /// Coordinates as seen from the positive strand.
    pub fn positive_coordinates(&self) -> Result<Coordinates> {
        match self.strand {
            Strand::Positive => Ok(self.coordinates),
            Strand::Negative => self.coordinates.invert(&self.contig),
        }
    }
}

impl AbstractInterval for GenomicBreakend {
    fn contig(&self) -> &str {
        self.contig.name()
    }

    /// Zero-based (empty) range on the positive strand.
    fn range(&self) -> Range<genome::Position> {
        match self.strand {
            Strand::Positive => self.coordinates.start()..self.coordinates.end(),
            Strand::Negative => {
                let length = self.contig.length();
                length - self.coordinates.end()..length - self.coordinates.start()
            }
        }
    }
}

/// A breakend, or the sentinel for a mate at an unknown or unassembled location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breakend {
    Resolved(GenomicBreakend),
    Unresolved,
}

impl Breakend {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Breakend::Unresolved)
    }

    pub fn resolved(&self) -> Option<&GenomicBreakend> {
        match self {
            Breakend::Resolved(breakend) => Some(breakend),
            Breakend::Unresolved => None,
        }
    }

    pub fn strand(&self) -> Option<Strand> {
        self.resolved().map(GenomicBreakend::strand)
    }
}

/// A novel adjacency joining `left` to `right`, with `alt_allele` holding the inserted
/// sequence in between. Alleles are expressed on the strand of `left`.
#[derive(Getters, Debug, Clone, PartialEq, Eq)]
#[getset(get = "pub")]
pub struct BreakendVariant {
    event_id: String,
    left: GenomicBreakend,
    right: Breakend,
    ref_allele: String,
    alt_allele: String,
}

impl BreakendVariant {
    pub fn new(
        event_id: &str,
        left: GenomicBreakend,
        right: Breakend,
        ref_allele: &str,
        alt_allele: &str,
    ) -> Self {
        BreakendVariant {
            event_id: event_id.to_owned(),
            left,
            right,
            ref_allele: ref_allele.to_owned(),
            alt_allele: alt_allele.to_owned(),
        }
    }

    pub fn strand(&self) -> Strand {
        self.left.strand()
    }

    pub fn id(&self) -> &str {
        self.left.id()
    }

    pub fn mate_id(&self) -> Option<&str> {
        self.right.resolved().map(|mate| mate.id().as_str())
    }

    pub fn is_unresolved(&self) -> bool {
        self.right.is_unresolved()
    }

    /// True if both ends lie on the same contig.
    pub fn is_intrachromosomal(&self) -> bool {
        self.right
            .resolved()
            .map_or(false, |mate| mate.contig() == self.left.contig())
    }

    /// The same adjacency read in the opposite direction: the mate becomes the left end,
    /// both ends change strand and the alleles are reverse complemented.
    pub fn to_opposite_strand(&self) -> Result<Self> {
        let right = self.right.resolved().ok_or_else(|| Error::UnresolvedMate {
            event_id: self.event_id.clone(),
        })?;
        Ok(BreakendVariant {
            event_id: self.event_id.clone(),
            left: right.to_opposite_strand()?,
            right: Breakend::Resolved(self.left.to_opposite_strand()?),
            ref_allele: revcomp(&self.ref_allele),
            alt_allele: revcomp(&self.alt_allele),
        })
    }
}

/// The fields of a VCF BND record needed to resolve it.
#[derive(new, Debug, Clone)]
pub struct BreakendRecord<'a> {
    event_id: &'a str,
    id: &'a str,
    mate_id: &'a str,
    contig: Arc<Contig>,
    /// One-based VCF position of the REF base.
    pos: u64,
    ci_pos: ConfidenceInterval,
    ci_end: ConfidenceInterval,
    ref_allele: &'a str,
    alt_allele: &'a str,
}

/// Resolves BND records into `BreakendVariant`s, looking up mate contigs by name.
#[derive(new, Debug)]
pub struct BreakendResolver<'a, R: ContigResolver + ?Sized> {
    contigs: &'a R,
}

impl<'a, R: ContigResolver + ?Sized> BreakendResolver<'a, R> {
    pub fn resolve(&self, record: &BreakendRecord) -> Result<BreakendVariant> {
        let alt = BreakendAlt::parse(record.ref_allele, record.alt_allele)?;
        let left_strand = alt.left_strand();

        let right = match alt.mate() {
            Some(mate) => Breakend::Resolved(self.resolve_mate(record, mate)?),
            None => Breakend::Unresolved,
        };

        // the break lies right of the REF base
        let left = GenomicBreakend::new(
            Arc::clone(&record.contig),
            record.id,
            Strand::Positive,
            Coordinates::point(&record.contig, record.pos, record.ci_pos)?,
        )
        .with_strand(left_strand)?;

        let (ref_allele, alt_allele) = match left_strand {
            Strand::Positive => (record.ref_allele.to_owned(), alt.inserted().to_owned()),
            Strand::Negative => (revcomp(record.ref_allele), revcomp(alt.inserted())),
        };

        debug!(
            "resolved breakend {} at {}:{} with ALT {} (left strand {}, mate {})",
            record.id,
            record.contig.name(),
            record.pos,
            record.alt_allele,
            left_strand,
            alt.mate()
                .map_or_else(|| ".".to_owned(), |mate| format!("{}:{}", mate.contig(), mate.pos()))
        );

        Ok(BreakendVariant::new(
            record.event_id,
            left,
            right,
            &ref_allele,
            &alt_allele,
        ))
    }

    fn resolve_mate(&self, record: &BreakendRecord, mate: &MateLocator) -> Result<GenomicBreakend> {
        let contig = self.contigs.contig_by_name(mate.contig()).ok_or_else(|| {
            Error::UnknownMateContig {
                name: mate.contig().to_owned(),
                alt: record.alt_allele.to_owned(),
            }
        })?;
        // VCF reports a real base at the mate position, the break lies left of it
        if mate.pos() == 0 {
            return Err(Error::InvalidCoordinates {
                contig: contig.name().to_owned(),
                start: 0,
                end: 0,
                length: contig.length(),
            }
            .into());
        }
        let coordinates = Coordinates::point(&contig, mate.pos() - 1, record.ci_end)?;
        GenomicBreakend::new(contig, record.mate_id, Strand::Positive, coordinates)
            .with_strand(mate.strand())
    }
}
