// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use itertools::Itertools;
use rust_htslib::bcf::{self, Read};
use structopt::StructOpt;
use strum::IntoEnumIterator;

use crate::conversion::{NormalizedRecord, OutputFormat, RecordWriter, VcfConverter};
use crate::reference::{ContigResolver, GenomicAssembly};
use crate::utils::bcf_utils;
use crate::variants::{AlleleTrimmer, RetentionPolicy, ShiftDirection, Strand, Trimmed};

#[derive(Debug, StructOpt, Clone)]
#[structopt(
    name = "varnorm",
    about = "Normalize VCF variants into a minimal, strand aware representation."
)]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
pub struct Varnorm {
    #[structopt(long, short, global = true, help = "Print debug information.")]
    pub verbose: bool,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt, Clone)]
pub enum Command {
    #[structopt(
        name = "normalize",
        about = "Trim sequence and symbolic alleles and resolve breakends of a VCF/BCF file."
    )]
    Normalize {
        #[structopt(
            parse(from_os_str),
            long,
            help = "VCF/BCF file to process (if omitted, read from STDIN)."
        )]
        input: Option<PathBuf>,
        #[structopt(
            parse(from_os_str),
            long = "reference-index",
            help = "FASTA index (.fai) defining the contigs. If omitted, the ##contig lines of the VCF header are used."
        )]
        reference_index: Option<PathBuf>,
        #[structopt(
            long,
            default_value = "left",
            possible_values = &ShiftDirection::iter().map(<&str>::from).collect_vec(),
            help = "Shift ambiguous variants to the leftmost (VCF) or rightmost (HGVS) position."
        )]
        shift: ShiftDirection,
        #[structopt(
            long,
            default_value = "retain",
            possible_values = &RetentionPolicy::iter().map(<&str>::from).collect_vec(),
            help = "Keep one anchor base per allele (retain) or trim shared bases to empty alleles (remove)."
        )]
        retention: RetentionPolicy,
        #[structopt(
            long,
            default_value = "tsv",
            possible_values = &OutputFormat::iter().map(<&str>::from).collect_vec(),
            help = "Output format, one row per record."
        )]
        format: OutputFormat,
        #[structopt(
            long,
            help = "Fail on the first record that cannot be converted instead of skipping it."
        )]
        strict: bool,
    },
    #[structopt(
        name = "trim",
        about = "Trim a single REF/ALT pair and print start, REF and ALT."
    )]
    Trim {
        #[structopt(long, help = "Start position of the alleles.")]
        start: u64,
        #[structopt(long = "ref", help = "Reference allele.")]
        ref_allele: String,
        #[structopt(long = "alt", help = "Alternative allele.")]
        alt_allele: String,
        #[structopt(
            long,
            default_value = "left",
            possible_values = &ShiftDirection::iter().map(<&str>::from).collect_vec()
        )]
        shift: ShiftDirection,
        #[structopt(
            long,
            default_value = "retain",
            possible_values = &RetentionPolicy::iter().map(<&str>::from).collect_vec()
        )]
        retention: RetentionPolicy,
        #[structopt(
            long,
            default_value = "+",
            possible_values = &Strand::iter().map(<&str>::from).collect_vec(),
            allow_hyphen_values = true,
            help = "Strand the alleles are given on."
        )]
        strand: Strand,
    },
}

/// Counts of a normalization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct NormalizationStats {
    converted: usize,
    skipped: usize,
}

/// Convert every record of `reader`, writing one normalized row per record.
///
/// Records that fail to convert are skipped with a warning, or abort the run if `strict`.
pub fn normalize<R, W>(
    reader: &mut bcf::Reader,
    converter: &VcfConverter<R>,
    writer: &mut RecordWriter<W>,
    strict: bool,
) -> Result<NormalizationStats>
where
    R: ContigResolver,
    W: io::Write,
{
    let header = reader.header().clone();
    let mut stats = NormalizationStats::default();

    for record in reader.records() {
        let record = record?;
        let locus = record_locus(&record, &header);
        let normalized = bcf_utils::vcf_record(&record, &header)
            .and_then(|record| converter.convert_record(&record))
            .and_then(|variant| NormalizedRecord::from_variant(&variant));
        match normalized {
            Ok(normalized) => {
                writer.write(&normalized)?;
                stats.converted += 1;
            }
            Err(e) if !strict => {
                warn!("skipping record {}: {}", locus, e);
                stats.skipped += 1;
            }
            Err(e) => return Err(e.context(format!("failed to normalize record {}", locus))),
        }
    }
    writer.flush()?;

    Ok(stats)
}

/// `CHROM:POS` of a record for log messages, the record ID if the chromosome is unknown.
fn record_locus(record: &bcf::Record, header: &bcf::header::HeaderView) -> String {
    match bcf_utils::get_chrom(record, header) {
        Ok(chrom) => format!("{}:{}", chrom, record.pos() + 1),
        Err(_) => format!(
            "{} (unknown chromosome, position {})",
            String::from_utf8_lossy(&record.id()),
            record.pos() + 1
        ),
    }
}

/// Trim a single allele pair and write `start`, REF and ALT as one tab separated line.
pub fn trim_alleles<W: io::Write>(
    trimmer: AlleleTrimmer,
    strand: Strand,
    start: u64,
    ref_allele: &str,
    alt_allele: &str,
    out: &mut W,
) -> Result<Trimmed> {
    let trimmed = trimmer.trim(strand, start, ref_allele, alt_allele);
    writeln!(
        out,
        "{}\t{}\t{}",
        trimmed.start(),
        trimmed.ref_allele(),
        trimmed.alt_allele()
    )?;
    Ok(trimmed)
}

pub fn run(opt: Varnorm) -> Result<()> {
    match opt.command {
        Command::Normalize {
            input,
            reference_index,
            shift,
            retention,
            format,
            strict,
        } => {
            let mut reader = match input {
                Some(ref path) => bcf::Reader::from_path(path)
                    .with_context(|| format!("failed to open VCF/BCF {}", path.display()))?,
                None => bcf::Reader::from_stdin()?,
            };
            let assembly = match reference_index {
                Some(path) => GenomicAssembly::from_fai(path)?,
                None => bcf_utils::assembly_from_header(reader.header())?,
            };
            info!(
                "normalizing against {} contigs, shift {}, retention {}",
                assembly.len(),
                shift,
                retention
            );

            let converter = VcfConverter::new(assembly, AlleleTrimmer::new(shift, retention));
            let stdout = io::stdout();
            let mut writer = RecordWriter::new(stdout.lock(), format);
            let stats = normalize(&mut reader, &converter, &mut writer, strict)?;
            info!(
                "normalized {} records, skipped {}",
                stats.converted(),
                stats.skipped()
            );
            Ok(())
        }
        Command::Trim {
            start,
            ref_allele,
            alt_allele,
            shift,
            retention,
            strand,
        } => {
            let stdout = io::stdout();
            trim_alleles(
                AlleleTrimmer::new(shift, retention),
                strand,
                start,
                &ref_allele,
                &alt_allele,
                &mut stdout.lock(),
            )?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalize() {
        let opt = Varnorm::from_iter_safe(&[
            "varnorm",
            "normalize",
            "--shift",
            "right",
            "--retention",
            "remove",
            "--format",
            "json",
            "--strict",
            "-v",
        ])
        .unwrap();
        assert!(opt.verbose);
        match opt.command {
            Command::Normalize {
                input,
                shift,
                retention,
                format,
                strict,
                ..
            } => {
                assert!(input.is_none());
                assert_eq!(shift, ShiftDirection::Right);
                assert_eq!(retention, RetentionPolicy::Remove);
                assert_eq!(format, OutputFormat::Json);
                assert!(strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_trim() {
        let opt = Varnorm::from_iter_safe(&[
            "varnorm", "trim", "--start", "1000", "--ref", "AGTTC", "--alt", "AGCC", "--strand",
            "-",
        ])
        .unwrap();
        match opt.command {
            Command::Trim {
                start,
                shift,
                strand,
                ..
            } => {
                assert_eq!(start, 1000);
                assert_eq!(shift, ShiftDirection::Left);
                assert_eq!(strand, Strand::Negative);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_trim_alleles() {
        let mut out = Vec::new();
        let trimmed = trim_alleles(
            AlleleTrimmer::new(ShiftDirection::Right, RetentionPolicy::Remove),
            Strand::Positive,
            1001,
            "CTCC",
            "CCC",
            &mut out,
        )
        .unwrap();
        assert_eq!(trimmed.start(), 1002);
        assert_eq!(String::from_utf8(out).unwrap(), "1002\tT\t\n");

        let mut out = Vec::new();
        trim_alleles(
            AlleleTrimmer::default(),
            Strand::Positive,
            1000,
            "AGTTC",
            "AGCC",
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1002\tTT\tC\n");
    }

    #[test]
    fn test_record_locus_without_chromosome() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut header = bcf::Header::new();
        header.push_record(br"##contig=<ID=chr1,length=1000>");
        let writer = bcf::Writer::from_path(tmp.path(), &header, true, bcf::Format::Vcf).unwrap();

        let mut record = writer.empty_record();
        record.set_rid(Some(0));
        record.set_pos(41);
        record.set_id(b"rs42").unwrap();
        assert_eq!(record_locus(&record, writer.header()), "chr1:42");

        record.set_rid(None);
        assert_eq!(
            record_locus(&record, writer.header()),
            "rs42 (unknown chromosome, position 42)"
        );
    }

    #[test]
    fn test_invalid_shift() {
        assert!(Varnorm::from_iter_safe(&["varnorm", "normalize", "--shift", "up"]).is_err());
    }
}
