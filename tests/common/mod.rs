use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_htslib::bcf;
use serde_derive::Deserialize;

use varnorm::cli::{normalize, NormalizationStats};
use varnorm::conversion::{OutputFormat, RecordWriter};
use varnorm::utils::bcf_utils::assembly_from_header;
use varnorm::{AlleleTrimmer, VcfConverter};

/// Expectations of a testcase directory, read from `testcase.json`.
#[derive(Debug, Deserialize)]
struct TestcaseConfig {
    trimmer: AlleleTrimmer,
    #[serde(default)]
    strict: bool,
    converted: usize,
    skipped: usize,
}

#[derive(Debug)]
pub struct Testcase {
    path: PathBuf,
    config: TestcaseConfig,
}

pub fn load_testcase(path: &Path) -> Result<Testcase> {
    let config: TestcaseConfig = serde_json::from_reader(
        File::open(path.join("testcase.json"))
            .with_context(|| format!("missing testcase.json in {}", path.display()))?,
    )?;
    Ok(Testcase {
        path: path.to_owned(),
        config,
    })
}

impl Testcase {
    pub fn strict(mut self) -> Self {
        self.config.strict = true;
        self
    }

    pub fn input(&self) -> PathBuf {
        self.path.join("input.vcf")
    }

    /// Normalize the input VCF and return the TSV output.
    pub fn run(&self) -> Result<(String, NormalizationStats)> {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut reader = bcf::Reader::from_path(self.input())?;
        let assembly = assembly_from_header(bcf::Read::header(&reader))?;
        let converter = VcfConverter::new(assembly, self.config.trimmer);

        let mut buf = Vec::new();
        let stats = {
            let mut writer = RecordWriter::new(&mut buf, OutputFormat::Tsv);
            normalize(&mut reader, &converter, &mut writer, self.config.strict)?
        };
        Ok((String::from_utf8(buf)?, stats))
    }

    pub fn check(&self) {
        let (output, stats) = self.run().unwrap();
        let expected = fs::read_to_string(self.path.join("expected.tsv")).unwrap();
        assert_eq!(output, expected);
        assert_eq!(stats.converted(), self.config.converted);
        assert_eq!(stats.skipped(), self.config.skipped);
    }
}
