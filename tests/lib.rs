use std::fs;
use std::path::Path;

use rust_htslib::bcf;
use rust_htslib::bcf::Read as BCFRead;

use varnorm::conversion::{ConvertedVariant, OutputFormat, RecordWriter};
use varnorm::coordinates::ConfidenceInterval;
use varnorm::errors::Error;
use varnorm::utils::bcf_utils::assembly_from_header;
use varnorm::variants::breakends::format_breakend;
use varnorm::{
    AlleleTrimmer, Contig, ContigResolver, GenomicAssembly, RetentionPolicy, ShiftDirection,
    Strand, VcfConverter, VcfRecord,
};

mod common;

use common::load_testcase;

fn testcase_path(name: &str) -> std::path::PathBuf {
    Path::new(file!())
        .parent()
        .unwrap()
        .join("resources/testcases")
        .join(name)
}

macro_rules! testcase {
    ($name:ident) => {
        #[test]
        fn $name() {
            let name = stringify!($name);
            let testcase = load_testcase(&testcase_path(name)).unwrap();
            testcase.check();
        }
    };
}

testcase!(sequence_left_retain);
testcase!(sequence_right_remove);
testcase!(symbolic_left_remove);
testcase!(breakends);
testcase!(skip_invalid);

#[test]
fn test_strict_aborts_on_first_invalid_record() {
    let testcase = load_testcase(&testcase_path("skip_invalid"))
        .unwrap()
        .strict();
    let err = testcase.run().unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::MultiallelicRecord {
            chrom: "chr1".to_owned(),
            pos: 10,
            alts: "C,G".to_owned(),
        })
    );
}

#[test]
fn test_breakend_alts_round_trip() {
    let path = testcase_path("breakends").join("input.vcf");
    let mut reader = bcf::Reader::from_path(&path).unwrap();
    let header = reader.header().clone();
    let assembly = assembly_from_header(&header).unwrap();
    let converter = VcfConverter::new(&assembly, AlleleTrimmer::default());

    let mut n = 0;
    for record in reader.records() {
        let record = record.unwrap();
        let vcf_record = varnorm::utils::bcf_utils::vcf_record(&record, &header).unwrap();
        match converter.convert_record(&vcf_record).unwrap() {
            ConvertedVariant::Breakend(variant) => {
                let formatted = format_breakend(&variant).unwrap();
                assert_eq!(formatted.pos(), vcf_record.pos());
                assert_eq!(formatted.ref_allele(), vcf_record.ref_allele());
                assert_eq!(&vec![formatted.alt_allele().to_owned()], vcf_record.alt_alleles());
                n += 1;
            }
            other => panic!("expected breakend, got {:?}", other),
        }
    }
    assert_eq!(n, 5);
}

#[test]
fn test_json_output() {
    let testcase = load_testcase(&testcase_path("symbolic_left_remove")).unwrap();
    let mut reader = bcf::Reader::from_path(testcase.input()).unwrap();
    let assembly = assembly_from_header(reader.header()).unwrap();
    let converter = VcfConverter::new(
        assembly,
        AlleleTrimmer::left_shifting(RetentionPolicy::Remove),
    );

    let mut buf = Vec::new();
    {
        let mut writer = RecordWriter::new(&mut buf, OutputFormat::Json);
        varnorm::cli::normalize(&mut reader, &converter, &mut writer, true).unwrap();
    }
    let rows: Vec<serde_json::Value> = String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["alt"], "<DEL>");
    assert_eq!(rows[0]["change_length"], -500);
    assert_eq!(rows[2]["chrom"], "chr2");
    assert!(rows[2]["mate_chrom"].is_null());
}

#[test]
fn test_trimmer_config_from_json() {
    let trimmer: AlleleTrimmer =
        serde_json::from_str(r#"{"direction": "right", "policy": "remove"}"#).unwrap();
    assert_eq!(trimmer.direction(), ShiftDirection::Right);
    assert_eq!(trimmer.policy(), RetentionPolicy::Remove);

    let trimmed = trimmer.trim(Strand::Positive, 1001, "CTCC", "CCC");
    assert_eq!(trimmed.start(), 1002);
    assert_eq!(trimmed.ref_allele(), "T");
    assert_eq!(trimmed.alt_allele(), "");
}

#[test]
fn test_assembly_from_fai() {
    let tmp = tempfile::tempdir().unwrap();
    let fai = tmp.path().join("GRCh38.fa.fai");
    fs::write(
        &fai,
        "chr1\t248956422\t112\t70\t71\nchr17\t83257441\t252513167\t70\t71\n",
    )
    .unwrap();
    let assembly = GenomicAssembly::from_fai(&fai).unwrap();
    assert_eq!(assembly.len(), 2);
    assert_eq!(assembly.contig_by_name("17").unwrap().length(), 83_257_441);

    let converter = VcfConverter::new(assembly, AlleleTrimmer::default());
    let variant = converter
        .convert_breakend(
            "chr1",
            "bnd_U",
            321681,
            "G",
            "G]17:198982]",
            ConfidenceInterval::precise(),
            ConfidenceInterval::precise(),
            "bnd_V",
            "",
        )
        .unwrap();
    assert_eq!(variant.right().strand(), Some(Strand::Negative));
    assert_eq!(
        format_breakend(&variant).unwrap().alt_allele(),
        "G]chr17:198982]"
    );
}

#[test]
fn test_opposite_strand_twice_is_identity() {
    let assembly = GenomicAssembly::new(
        "test",
        vec![
            Contig::new(0, "2".to_owned(), 243_199_373),
            Contig::new(1, "13".to_owned(), 115_169_878),
        ],
    );
    let converter = VcfConverter::new(&assembly, AlleleTrimmer::default());
    let record = VcfRecord::new(
        "2".to_owned(),
        321682,
        "bnd_V".to_owned(),
        "T".to_owned(),
        vec!["]13:123456]AGTNNNNNCAT".to_owned()],
    )
    .with_mate("bnd_U", "ev1");
    let variant = match converter.convert_record(&record).unwrap() {
        ConvertedVariant::Breakend(variant) => variant,
        other => panic!("expected breakend, got {:?}", other),
    };
    let flipped = variant.to_opposite_strand().unwrap();
    assert_eq!(flipped.left().contig().name(), "13");
    assert_eq!(flipped.strand(), Strand::Positive);
    assert_eq!(flipped.to_opposite_strand().unwrap(), variant);
}
