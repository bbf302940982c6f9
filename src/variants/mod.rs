// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::ops::Range;
use std::sync::Arc;

use anyhow::Result;
use bio_types::genome::{self, AbstractInterval};

use crate::coordinates::Coordinates;
use crate::reference::Contig;
use crate::utils;

pub mod breakends;
pub mod trimming;

pub use breakends::{Breakend, BreakendVariant, GenomicBreakend};
pub use trimming::{AlleleTrimmer, RetentionPolicy, ShiftDirection, Trimmed};

/// Strand of the reference a variant or breakend is expressed on.
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
pub enum Strand {
    #[strum(serialize = "+")]
    Positive,
    #[strum(serialize = "-")]
    Negative,
}

impl Strand {
    pub fn opposite(self) -> Self {
        match self {
            Strand::Positive => Strand::Negative,
            Strand::Negative => Strand::Positive,
        }
    }
}

impl Default for Strand {
    fn default() -> Self {
        Strand::Positive
    }
}

/// Shape of a VCF ALT allele, deciding which conversion applies to it.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlleleClass {
    /// Explicit bases (also the missing `.` and upstream deletion `*` alleles).
    #[strum(serialize = "a sequence allele")]
    Sequence,
    /// Angle bracket shorthand like `<DEL>`.
    #[strum(serialize = "a symbolic allele")]
    Symbolic,
    /// Breakend notation like `G]17:198982]` or `C.`.
    #[strum(serialize = "a breakend allele")]
    Breakend,
}

impl AlleleClass {
    pub fn classify(alt: &str) -> Self {
        let alt = alt.as_bytes();
        if utils::is_symbolic(alt) {
            AlleleClass::Symbolic
        } else if utils::is_breakend(alt) {
            AlleleClass::Breakend
        } else {
            AlleleClass::Sequence
        }
    }
}

/// A sequence or symbolic variant placed on a contig.
#[derive(Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct GenomicVariant {
    #[getset(get = "pub")]
    contig: Arc<Contig>,
    #[getset(get = "pub")]
    id: String,
    #[getset(get_copy = "pub")]
    strand: Strand,
    #[getset(get_copy = "pub")]
    coordinates: Coordinates,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_allele: String,
    #[getset(get_copy = "pub")]
    change_length: i64,
}

impl GenomicVariant {
    /// A variant with explicit alleles, the change length follows from the allele lengths.
    pub fn sequence(
        contig: Arc<Contig>,
        id: &str,
        strand: Strand,
        coordinates: Coordinates,
        ref_allele: &str,
        alt_allele: &str,
    ) -> Self {
        GenomicVariant {
            contig,
            id: id.to_owned(),
            strand,
            coordinates,
            ref_allele: ref_allele.to_owned(),
            alt_allele: alt_allele.to_owned(),
            change_length: alt_allele.len() as i64 - ref_allele.len() as i64,
        }
    }

    pub fn symbolic(
        contig: Arc<Contig>,
        id: &str,
        strand: Strand,
        coordinates: Coordinates,
        ref_allele: &str,
        alt_allele: &str,
        change_length: i64,
    ) -> Self {
        GenomicVariant {
            contig,
            id: id.to_owned(),
            strand,
            coordinates,
            ref_allele: ref_allele.to_owned(),
            alt_allele: alt_allele.to_owned(),
            change_length,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        utils::is_symbolic(self.alt_allele.as_bytes())
    }

    /// Express the variant on the given strand, reverse complementing the alleles and
    /// inverting the coordinates if the strand changes.
    pub fn with_strand(&self, strand: Strand) -> Result<Self> {
        if strand == self.strand {
            return Ok(self.clone());
        }
        Ok(GenomicVariant {
            contig: Arc::clone(&self.contig),
            id: self.id.clone(),
            strand,
            coordinates: self.coordinates.invert(&self.contig)?,
            ref_allele: utils::revcomp(&self.ref_allele),
            alt_allele: utils::revcomp(&self.alt_allele),
            change_length: self.change_length,
        })
    }

    /// Coordinates as seen from the positive strand.
    pub fn positive_coordinates(&self) -> Result<Coordinates> {
        match self.strand {
            Strand::Positive => Ok(self.coordinates),
            Strand::Negative => self.coordinates.invert(&self.contig),
        }
    }
}

impl AbstractInterval for GenomicVariant {
    fn contig(&self) -> &str {
        self.contig.name()
    }

    /// Zero-based range on the positive strand.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand() {
        assert_eq!(Strand::Positive.opposite(), Strand::Negative);
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Negative);
        assert_eq!(Strand::Positive.to_string(), "+");
    }

    #[test]
    fn test_classify() {
        assert_eq!(AlleleClass::classify("ACGT"), AlleleClass::Sequence);
        assert_eq!(AlleleClass::classify("."), AlleleClass::Sequence);
        assert_eq!(AlleleClass::classify("*"), AlleleClass::Sequence);
        assert_eq!(AlleleClass::classify("<DEL>"), AlleleClass::Symbolic);
        assert_eq!(AlleleClass::classify("G]17:198982]"), AlleleClass::Breakend);
        assert_eq!(AlleleClass::classify(".TGCA"), AlleleClass::Breakend);
    }

    #[test]
    fn test_with_strand() {
        let contig = Arc::new(Contig::new(0, "1".to_owned(), 2000));
        let coords = Coordinates::one_based(&contig, 1003, 1004).unwrap();
        let variant =
            GenomicVariant::sequence(Arc::clone(&contig), "rs1", Strand::Positive, coords, "TT", "C");
        assert_eq!(variant.change_length(), -1);

        let negative = variant.with_strand(Strand::Negative).unwrap();
        assert_eq!(negative.ref_allele(), "AA");
        assert_eq!(negative.alt_allele(), "G");
        assert_eq!(negative.coordinates().start_one_based(), 997);
        assert_eq!(negative.coordinates().end_one_based(), 998);
        assert_eq!(negative.range(), variant.range());
        assert_eq!(negative.with_strand(Strand::Positive).unwrap(), variant);
    }
}
