// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

use anyhow::Result;
use bio_types::genome::AbstractInterval;

use crate::conversion::ConvertedVariant;
use crate::variants::breakends::{format_breakend, BreakendVariant};
use crate::variants::GenomicVariant;

#[derive(
    Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Tsv,
}

/// One output row. Positions are one-based and refer to the positive strand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    chrom: String,
    start: u64,
    end: u64,
    id: String,
    class: &'static str,
    strand: &'static str,
    #[serde(rename = "ref")]
    ref_allele: String,
    #[serde(rename = "alt")]
    alt_allele: String,
    change_length: Option<i64>,
    mate_chrom: Option<String>,
    mate_pos: Option<u64>,
    mate_strand: Option<&'static str>,
    event_id: Option<String>,
    vcf_alt: Option<String>,
}

impl NormalizedRecord {
    pub fn from_variant(variant: &ConvertedVariant) -> Result<Self> {
        let class = match variant {
            ConvertedVariant::Sequence(_) => "sequence",
            ConvertedVariant::Symbolic(_) => "symbolic",
            ConvertedVariant::Breakend(_) => "breakend",
        };
        match variant {
            ConvertedVariant::Sequence(variant) | ConvertedVariant::Symbolic(variant) => {
                Ok(Self::from_genomic_variant(class, variant))
            }
            ConvertedVariant::Breakend(variant) => Self::from_breakend_variant(class, variant),
        }
    }

    fn from_genomic_variant(class: &'static str, variant: &GenomicVariant) -> Self {
        let range = variant.range();
        NormalizedRecord {
            chrom: variant.contig().name().to_owned(),
            start: range.start + 1,
            end: range.end,
            id: variant.id().to_owned(),
            class,
            strand: variant.strand().into(),
            ref_allele: variant.ref_allele().to_owned(),
            alt_allele: variant.alt_allele().to_owned(),
            change_length: Some(variant.change_length()),
            mate_chrom: None,
            mate_pos: None,
            mate_strand: None,
            event_id: None,
            vcf_alt: None,
        }
    }

    fn from_breakend_variant(class: &'static str, variant: &BreakendVariant) -> Result<Self> {
        let left = variant.left();
        let range = left.range();
        let mate = variant.right().resolved();
        let event_id = Some(variant.event_id().to_owned()).filter(|id| !id.is_empty());

        Ok(NormalizedRecord {
            chrom: left.contig().name().to_owned(),
            start: range.start + 1,
            end: range.end,
            id: variant.id().to_owned(),
            class,
            strand: left.strand().into(),
            ref_allele: variant.ref_allele().to_owned(),
            alt_allele: variant.alt_allele().to_owned(),
            change_length: None,
            mate_chrom: mate.map(|mate| mate.contig().name().to_owned()),
            mate_pos: mate.map(|mate| mate.range().start + 1),
            mate_strand: mate.map(|mate| mate.strand().into()),
            event_id,
            vcf_alt: Some(format_breakend(variant)?.alt_allele().to_owned()),
        })
    }
}

/// Writes normalized records as JSON lines or as a tab separated table with header.
pub enum RecordWriter<W: io::Write> {
    Json(W),
    Tsv(csv::Writer<W>),
}

impl<W: io::Write> RecordWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => RecordWriter::Json(writer),
            OutputFormat::Tsv => RecordWriter::Tsv(
                csv::WriterBuilder::new()
                    .delimiter(b'\t')
                    .from_writer(writer),
            ),
        }
    }

    pub fn write(&mut self, record: &NormalizedRecord) -> Result<()> {
        match self {
            RecordWriter::Json(writer) => {
                serde_json::to_writer(&mut *writer, record)?;
                writer.write_all(b"\n")?;
            }
            RecordWriter::Tsv(writer) => writer.serialize(record)?,
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        match self {
            RecordWriter::Json(writer) => writer.flush()?,
            RecordWriter::Tsv(writer) => writer.flush()?,
        }
        Ok(())
    }
}
