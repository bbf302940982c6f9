// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of VCF alleles into normalized variants.
//!
//! The converter classifies an ALT allele and hands it to the allele trimmer (sequence and
//! symbolic alleles) or the breakend resolver (BND alleles). Each typed entry point insists
//! on its allele class, only `convert_record` dispatches.

use std::sync::Arc;

use anyhow::Result;

use crate::coordinates::{ConfidenceInterval, Coordinates};
use crate::errors::Error;
use crate::reference::{Contig, ContigResolver};
use crate::variants::breakends::{BreakendRecord, BreakendResolver, BreakendVariant};
use crate::variants::{AlleleClass, AlleleTrimmer, GenomicVariant, Strand};

pub mod output;

pub use output::{NormalizedRecord, OutputFormat, RecordWriter};

/// A single VCF data line, detached from the reader it came from.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord {
    #[getset(get = "pub")]
    chrom: String,
    /// One-based position.
    #[getset(get_copy = "pub")]
    pos: u64,
    #[getset(get = "pub")]
    id: String,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_alleles: Vec<String>,
    /// INFO/END, one-based and inclusive.
    #[new(default)]
    #[getset(get_copy = "pub")]
    end: Option<u64>,
    /// INFO/SVLEN.
    #[new(default)]
    #[getset(get_copy = "pub")]
    svlen: Option<i64>,
    #[new(default)]
    #[getset(get_copy = "pub")]
    ci_pos: ConfidenceInterval,
    #[new(default)]
    #[getset(get_copy = "pub")]
    ci_end: ConfidenceInterval,
    #[new(default)]
    #[getset(get = "pub")]
    mate_id: String,
    #[new(default)]
    #[getset(get = "pub")]
    event_id: String,
}

impl VcfRecord {
    pub fn with_end(mut self, end: Option<u64>) -> Self {
        self.end = end;
        self
    }

    pub fn with_svlen(mut self, svlen: Option<i64>) -> Self {
        self.svlen = svlen;
        self
    }

    pub fn with_confidence(mut self, ci_pos: ConfidenceInterval, ci_end: ConfidenceInterval) -> Self {
        self.ci_pos = ci_pos;
        self.ci_end = ci_end;
        self
    }

    pub fn with_mate(mut self, mate_id: &str, event_id: &str) -> Self {
        self.mate_id = mate_id.to_owned();
        self.event_id = event_id.to_owned();
        self
    }
}

/// Result of converting one VCF allele.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertedVariant {
    Sequence(GenomicVariant),
    Symbolic(GenomicVariant),
    Breakend(BreakendVariant),
}

impl ConvertedVariant {
    pub fn allele_class(&self) -> AlleleClass {
        match self {
            ConvertedVariant::Sequence(_) => AlleleClass::Sequence,
            ConvertedVariant::Symbolic(_) => AlleleClass::Symbolic,
            ConvertedVariant::Breakend(_) => AlleleClass::Breakend,
        }
    }
}

/// Converts VCF alleles against a set of known contigs, trimming with the configured trimmer.
#[derive(new, Getters, Debug)]
pub struct VcfConverter<R: ContigResolver> {
    #[getset(get = "pub")]
    contigs: R,
    #[getset(get = "pub")]
    trimmer: AlleleTrimmer,
}

impl<R: ContigResolver> VcfConverter<R> {
    pub fn parse_contig(&self, name: &str) -> Result<Arc<Contig>> {
        self.contigs.require_contig(name)
    }

    /// Convert a sequence allele at one-based `pos` into a trimmed positive strand variant.
    pub fn convert(
        &self,
        contig: &str,
        id: &str,
        pos: u64,
        ref_allele: &str,
        alt_allele: &str,
    ) -> Result<GenomicVariant> {
        expect_class(AlleleClass::Sequence, alt_allele)?;
        let contig = self.parse_contig(contig)?;

        let trimmed = self
            .trimmer
            .trim(Strand::Positive, pos, ref_allele, alt_allele);
        let end = (trimmed.start() + trimmed.ref_allele().len() as u64).saturating_sub(1);
        let coordinates = Coordinates::one_based(&contig, trimmed.start(), end)?;

        Ok(GenomicVariant::sequence(
            contig,
            id,
            Strand::Positive,
            coordinates,
            trimmed.ref_allele(),
            trimmed.alt_allele(),
        ))
    }

    /// Convert a symbolic allele spanning the one-based, inclusive range `start..=end`.
    #[allow(clippy::too_many_arguments)]
    pub fn convert_symbolic(
        &self,
        contig: &str,
        id: &str,
        start: u64,
        end: u64,
        ref_allele: &str,
        alt_allele: &str,
        change_length: i64,
    ) -> Result<GenomicVariant> {
        expect_class(AlleleClass::Symbolic, alt_allele)?;
        let contig = self.parse_contig(contig)?;

        let trimmed = self
            .trimmer
            .trim(Strand::Positive, start, ref_allele, alt_allele);
        let coordinates = Coordinates::one_based(&contig, trimmed.start(), end)?;

        Ok(GenomicVariant::symbolic(
            contig,
            id,
            Strand::Positive,
            coordinates,
            trimmed.ref_allele(),
            trimmed.alt_allele(),
            change_length,
        ))
    }

    /// Resolve a breakend allele. Breakend alleles are never trimmed.
    #[allow(clippy::too_many_arguments)]
    pub fn convert_breakend(
        &self,
        contig: &str,
        id: &str,
        pos: u64,
        ref_allele: &str,
        alt_allele: &str,
        ci_pos: ConfidenceInterval,
        ci_end: ConfidenceInterval,
        mate_id: &str,
        event_id: &str,
    ) -> Result<BreakendVariant> {
        expect_class(AlleleClass::Breakend, alt_allele)?;
        let contig = self.parse_contig(contig)?;

        BreakendResolver::new(&self.contigs).resolve(&BreakendRecord::new(
            event_id, id, mate_id, contig, pos, ci_pos, ci_end, ref_allele, alt_allele,
        ))
    }

    /// Classify the single ALT allele of `record` and convert it accordingly.
    pub fn convert_record(&self, record: &VcfRecord) -> Result<ConvertedVariant> {
        let alt_allele = match record.alt_alleles.as_slice() {
            [] => ".",
            [alt] => alt.as_str(),
            alts => {
                return Err(Error::MultiallelicRecord {
                    chrom: record.chrom.clone(),
                    pos: record.pos,
                    alts: alts.join(","),
                }
                .into())
            }
        };
        let class = AlleleClass::classify(alt_allele);
        debug!(
            "converting {}:{} {}>{} as {}",
            record.chrom, record.pos, record.ref_allele, alt_allele, class
        );

        Ok(match class {
            AlleleClass::Sequence => ConvertedVariant::Sequence(self.convert(
                &record.chrom,
                &record.id,
                record.pos,
                &record.ref_allele,
                alt_allele,
            )?),
            AlleleClass::Symbolic => {
                let end = record.end.unwrap_or_else(|| {
                    (record.pos + record.ref_allele.len() as u64).saturating_sub(1)
                });
                ConvertedVariant::Symbolic(self.convert_symbolic(
                    &record.chrom,
                    &record.id,
                    record.pos,
                    end,
                    &record.ref_allele,
                    alt_allele,
                    record.svlen.unwrap_or(0),
                )?)
            }
            AlleleClass::Breakend => ConvertedVariant::Breakend(self.convert_breakend(
                &record.chrom,
                &record.id,
                record.pos,
                &record.ref_allele,
                alt_allele,
                record.ci_pos,
                record.ci_end,
                &record.mate_id,
                &record.event_id,
            )?),
        })
    }
}

fn expect_class(expected: AlleleClass, alt_allele: &str) -> Result<()> {
    let found = AlleleClass::classify(alt_allele);
    if found != expected {
        return Err(Error::WrongAlleleClass {
            expected,
            found,
            alt: alt_allele.to_owned(),
        }
        .into());
    }
    Ok(())
}
