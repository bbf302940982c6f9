// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use bio::alphabets::dna;

pub mod bcf_utils;
pub mod genomics;

/// Reverse complement an allele.
///
/// Uses the IUPAC complement table (case preserving, ambiguity codes included), with
/// uracil complemented to adenine. Symbolic alleles (`<DEL>`), the missing allele (`.`) and
/// the upstream deletion allele (`*`) are returned unchanged.
pub fn revcomp(allele: &str) -> String {
    let bytes = allele.as_bytes();
    if is_symbolic(bytes) || is_missing(bytes) || is_spanning_deletion(bytes) {
        return allele.to_owned();
    }
    bytes
        .iter()
        .rev()
        .map(|&base| char::from(complement(base)))
        .collect()
}

fn complement(base: u8) -> u8 {
    match base {
        b'U' => b'A',
        b'u' => b'a',
        _ => dna::complement(base),
    }
}

/// Check if allele is symbolic (`<DEL>`, `<INS:ME>`, `<NON_REF>`, ...).
pub fn is_symbolic(allele: &[u8]) -> bool {
    allele.len() >= 3 && allele.starts_with(b"<") && allele.ends_with(b">")
}

/// Check if allele is written in breakend notation.
///
/// Matches the bracket forms (`A[chr2:100[`, `]chr2:100]A`) as well as the single breakend
/// shorthand with a missing mate (`A.`, `.A`).
pub fn is_breakend(allele: &[u8]) -> bool {
    allele.iter().any(|&c| c == b'[' || c == b']')
        || (allele.len() > 1 && (allele.starts_with(b".") || allele.ends_with(b".")))
}

/// Symbolic and breakend alleles describe events too large to be trimmed base by base.
pub fn is_large_symbolic(allele: &[u8]) -> bool {
    is_symbolic(allele) || is_breakend(allele)
}

/// Check if allele is the missing allele (`.`).
pub fn is_missing(allele: &[u8]) -> bool {
    allele == b"."
}

/// Check if allele is a spanning deletion (`*`).
pub fn is_spanning_deletion(allele: &[u8]) -> bool {
    allele == b"*"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revcomp() {
        assert_eq!(revcomp("AGTTC"), "GAACT");
        assert_eq!(revcomp("acgtN"), "Nacgt");
        assert_eq!(revcomp("RYKM"), "KMRY");
        assert_eq!(revcomp("UUG"), "CAA");
        assert_eq!(revcomp(""), "");
    }

    #[test]
    fn test_revcomp_passthrough() {
        assert_eq!(revcomp("<DEL>"), "<DEL>");
        assert_eq!(revcomp("."), ".");
        assert_eq!(revcomp("*"), "*");
    }

    #[test]
    fn test_allele_shapes() {
        assert!(is_symbolic(b"<INS:ME:ALU>"));
        assert!(!is_symbolic(b"<>"));
        assert!(is_breakend(b"G]17:198982]"));
        assert!(is_breakend(b"[13:123457[T"));
        assert!(is_breakend(b"C."));
        assert!(is_breakend(b".TGCA"));
        assert!(!is_breakend(b"."));
        assert!(!is_breakend(b"ACGT"));
        assert!(is_large_symbolic(b"<DUP>"));
        assert!(is_large_symbolic(b"C[2:7["));
        assert!(!is_large_symbolic(b"*"));
    }
}
