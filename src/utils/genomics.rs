//! genomics.rs
//!
//! Utility functions for contig naming conventions.

/// Strip "chr" prefix, so both "chr1" and "1" normalize to "1".
pub(crate) fn normalize_chrom(chrom: &str) -> String {
    chrom.trim_start_matches("chr").to_string()
}

/// Switch between UCSC ("chr1") and Ensembl/NCBI ("1") style contig names.
pub(crate) fn toggle_chr_prefix(chrom: &str) -> String {
    if chrom.starts_with("chr") {
        normalize_chrom(chrom)
    } else {
        format!("chr{}", chrom)
    }
}

/// Render a VCF ID column value, mapping the missing value to an empty identifier.
pub(crate) fn vcf_id(id: &[u8]) -> String {
    if id == b"." {
        String::new()
    } else {
        String::from_utf8_lossy(id).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_chrom() {
        assert_eq!(normalize_chrom("chr1"), "1");
        assert_eq!(normalize_chrom("1"), "1");
        assert_eq!(normalize_chrom("chrX"), "X");
        assert_eq!(normalize_chrom("MT"), "MT");
    }

    #[test]
    fn test_toggle_chr_prefix() {
        assert_eq!(toggle_chr_prefix("chr17"), "17");
        assert_eq!(toggle_chr_prefix("17"), "chr17");
        assert_eq!(toggle_chr_prefix("chrM"), "M");
    }

    #[test]
    fn test_vcf_id() {
        assert_eq!(vcf_id(b"."), "");
        assert_eq!(vcf_id(b"bnd_W"), "bnd_W");
    }
}
