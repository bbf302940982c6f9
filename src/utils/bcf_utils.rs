//! bcf_utils.rs
//!
//! Utilities for VCF/BCF file handling and parsing.
//!
//! This module provides:
//! 1. Contig extraction from the VCF header
//! 2. Record field extraction (chromosome, END, SVLEN, confidence intervals, mate and event ids)

use anyhow::{Context, Result};
use rust_htslib::bcf::{self, header::HeaderView, record::Numeric};

use crate::conversion::VcfRecord;
use crate::coordinates::ConfidenceInterval;
use crate::errors::{invalid_bcf_record, Error};
use crate::reference::{Contig, GenomicAssembly};
use crate::utils::genomics::vcf_id;

/* ========= Header Functions ===================== */

/// Build the contig registry from the `##contig` lines of a VCF header.
///
/// Contigs without a `length` cannot be validated against and are skipped with a warning.
///
/// # Arguments
/// * `header` - VCF header
///
/// # Errors
/// Returns error if a contig length is not a number.
pub fn assembly_from_header(header: &HeaderView) -> Result<GenomicAssembly> {
    let mut assembly = GenomicAssembly::new("vcf-header", Vec::new());
    for rec in header.header_records() {
        if let bcf::header::HeaderRecord::Contig { values, .. } = rec {
            let name = match values.get("ID") {
                Some(name) => name,
                None => continue,
            };
            match values.get("length") {
                Some(len) => {
                    let len = len
                        .parse()
                        .with_context(|| format!("invalid length {} of contig {}", len, name))?;
                    assembly.push(Contig::new(assembly.len(), name.to_owned(), len));
                }
                None => warn!("contig {} has no length in VCF header, skipping it", name),
            }
        }
    }
    debug!("found {} contigs in VCF header", assembly.len());
    Ok(assembly)
}

/* ================================================ */

/* ========= BCF Extraction Functions ============= */

/// Get chromosome name from a VCF record
///
/// # Errors
/// Returns error if the RID is missing or cannot be resolved by the header.
pub(crate) fn get_chrom(record: &bcf::Record, header: &HeaderView) -> Result<String> {
    let rid = record.rid().ok_or(Error::VcfRecordMissingChromosome {
        pos: record.pos(),
    })?;
    let chrom = header
        .rid2name(rid)
        .map_err(|_| Error::VcfRecordMissingChromosome { pos: record.pos() })?;
    Ok(String::from_utf8_lossy(chrom).into_owned())
}

/// First value of an integer INFO tag, `None` if the tag is undefined, absent or missing.
fn info_integer(record: &bcf::Record, tag: &[u8]) -> Option<i32> {
    match record.info(tag).integer() {
        Ok(Some(values)) => values.first().copied().filter(|value| !value.is_missing()),
        _ => None,
    }
}

/// First value of a string INFO tag, `None` if the tag is undefined or absent.
fn info_string(record: &bcf::Record, tag: &[u8]) -> Option<String> {
    match record.info(tag).string() {
        Ok(Some(values)) => values
            .first()
            .map(|value| String::from_utf8_lossy(value).into_owned()),
        _ => None,
    }
}

/// Read a `CIPOS`/`CIEND` style confidence interval, precise if the tag is absent.
fn info_confidence_interval(
    record: &bcf::Record,
    chrom: &str,
    tag: &[u8],
) -> Result<ConfidenceInterval> {
    let values = match record.info(tag).integer() {
        Ok(Some(values)) => values.to_vec(),
        _ => return Ok(ConfidenceInterval::precise()),
    };
    match values.as_slice() {
        [lower, upper] if !lower.is_missing() && !upper.is_missing() => {
            ConfidenceInterval::from_vcf(*lower as i64, *upper as i64)
        }
        _ => Err(invalid_bcf_record(
            chrom,
            record.pos(),
            &format!(
                "{} must hold two values, found {:?}",
                String::from_utf8_lossy(tag),
                values
            ),
        )
        .into()),
    }
}

/// Detach a record from htslib, collecting everything conversion needs.
///
/// # Arguments
/// * `record` - VCF record
/// * `header` - VCF header (for resolving RID to name)
pub fn vcf_record(record: &bcf::Record, header: &HeaderView) -> Result<VcfRecord> {
    let chrom = get_chrom(record, header)?;
    let alleles = record.alleles();
    let (ref_allele, alt_alleles) = match alleles.split_first() {
        Some((ref_allele, alt_alleles)) => (
            String::from_utf8_lossy(ref_allele).into_owned(),
            alt_alleles
                .iter()
                .map(|alt| String::from_utf8_lossy(alt).into_owned())
                .collect(),
        ),
        None => return Err(invalid_bcf_record(&chrom, record.pos(), "record has no REF allele").into()),
    };

    let ci_pos = info_confidence_interval(record, &chrom, b"CIPOS")?;
    let ci_end = info_confidence_interval(record, &chrom, b"CIEND")?;
    let end = info_integer(record, b"END").map(|end| end as u64);
    let svlen = info_integer(record, b"SVLEN").map(i64::from);
    let mate_id = info_string(record, b"MATEID").unwrap_or_default();
    let event_id = info_string(record, b"EVENT").unwrap_or_default();

    Ok(VcfRecord::new(
        chrom,
        record.pos() as u64 + 1,
        vcf_id(&record.id()),
        ref_allele,
        alt_alleles,
    )
    .with_end(end)
    .with_svlen(svlen)
    .with_confidence(ci_pos, ci_end)
    .with_mate(&mate_id, &event_id))
}

/* ================================================ */
