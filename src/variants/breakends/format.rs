// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Result;

use crate::utils::revcomp;
use crate::variants::breakends::grammar::{BreakendAlt, MateLocator};
use crate::variants::breakends::{Breakend, BreakendVariant};
use crate::variants::Strand;

/// POS, REF and ALT of a VCF BND record.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcfBreakend {
    /// One-based VCF position.
    #[getset(get_copy = "pub")]
    pos: u64,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_allele: String,
}

/// Reconstruct the VCF representation of a resolved breakend variant.
///
/// Mate contigs are written under their canonical name.
pub fn format_breakend(variant: &BreakendVariant) -> Result<VcfBreakend> {
    let left = variant.left();
    let pos = left.positive_coordinates()?.start_one_based() - 1;

    let (ref_allele, inserted) = match left.strand() {
        Strand::Positive => (
            variant.ref_allele().to_owned(),
            variant.alt_allele().to_owned(),
        ),
        Strand::Negative => (revcomp(variant.ref_allele()), revcomp(variant.alt_allele())),
    };

    let alt = match variant.right() {
        Breakend::Resolved(mate) => {
            let mate = MateLocator::new(
                mate.contig().name().to_owned(),
                mate.positive_coordinates()?.start_one_based(),
                mate.strand(),
            );
            match left.strand() {
                Strand::Positive => BreakendAlt::BracketRight { inserted, mate },
                Strand::Negative => BreakendAlt::BracketLeft { inserted, mate },
            }
        }
        Breakend::Unresolved => match left.strand() {
            Strand::Positive => BreakendAlt::UnresolvedRight { inserted },
            Strand::Negative => BreakendAlt::UnresolvedLeft { inserted },
        },
    };

    let alt_allele = alt.to_alt(&ref_allele);
    Ok(VcfBreakend::new(pos, ref_allele, alt_allele))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::ConfidenceInterval;
    use crate::reference::{Contig, ContigResolver, GenomicAssembly};
    use crate::variants::breakends::{BreakendRecord, BreakendResolver};

    fn assembly() -> GenomicAssembly {
        GenomicAssembly::new(
            "test",
            vec![
                Contig::new(0, "2".to_owned(), 243_199_373),
                Contig::new(1, "13".to_owned(), 115_169_878),
                Contig::new(2, "17".to_owned(), 81_195_210).with_aliases(vec!["NC_000017.10"]),
                Contig::new(3, "MT".to_owned(), 16569),
            ],
        )
    }

    fn round_trip(contig: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> VcfBreakend {
        let assembly = assembly();
        let contig = assembly.require_contig(contig).unwrap();
        let variant = BreakendResolver::new(&assembly)
            .resolve(&BreakendRecord::new(
                "",
                "bnd_1",
                "bnd_2",
                contig,
                pos,
                ConfidenceInterval::precise(),
                ConfidenceInterval::new(3, 7),
                ref_allele,
                alt_allele,
            ))
            .unwrap();
        format_breakend(&variant).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            ("2", 321681, "G", "G]17:198982]"),
            ("2", 321682, "T", "]13:123456]AGTNNNNNCAT"),
            ("13", 123456, "C", "C[2:321682["),
            ("13", 123457, "A", "[17:198983[A"),
            ("17", 198982, "A", "A]2:321681]"),
            ("17", 198983, "C", "[13:123457[C"),
            ("2", 1, "n", "nACGT[MT:16569["),
            ("MT", 16569, "T", "]2:1]T"),
            ("2", 3, "C", "C."),
            ("2", 3, "C", "CTTA."),
            ("2", 3, "A", ".TGCA"),
        ];
        for &(contig, pos, ref_allele, alt_allele) in cases.iter() {
            let formatted = round_trip(contig, pos, ref_allele, alt_allele);
            assert_eq!(
                formatted,
                VcfBreakend::new(pos, ref_allele.to_owned(), alt_allele.to_owned())
            );
        }
    }

    #[test]
    fn test_alias_is_written_canonically() {
        let formatted = round_trip("2", 321681, "G", "G]NC_000017.10:198982]");
        assert_eq!(formatted.alt_allele(), "G]17:198982]");
    }
}
