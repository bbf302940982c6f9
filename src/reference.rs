// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bio::io::fasta;

use crate::errors::Error;
use crate::utils::genomics::toggle_chr_prefix;

/// A named reference sequence of known length.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contig {
    #[getset(get_copy = "pub")]
    id: usize,
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    length: u64,
    #[new(default)]
    #[getset(get = "pub")]
    aliases: Vec<String>,
}

impl Contig {
    /// Alternative names (e.g. accessions or UCSC names) under which the contig is found.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}

/// Lookup of contigs by name, used to resolve breakend mates and record chromosomes.
pub trait ContigResolver {
    fn contig_by_name(&self, name: &str) -> Option<Arc<Contig>>;

    /// Like `contig_by_name`, but unknown names are an error.
    fn require_contig(&self, name: &str) -> Result<Arc<Contig>> {
        self.contig_by_name(name).ok_or_else(|| {
            Error::UnknownContig {
                name: name.to_owned(),
            }
            .into()
        })
    }
}

impl<R: ContigResolver + ?Sized> ContigResolver for &R {
    fn contig_by_name(&self, name: &str) -> Option<Arc<Contig>> {
        (**self).contig_by_name(name)
    }
}

/// A read-only registry of the contigs of one reference assembly.
#[derive(Getters, Debug, Clone, Default)]
pub struct GenomicAssembly {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    contigs: Vec<Arc<Contig>>,
    by_name: HashMap<String, usize>,
}

impl GenomicAssembly {
    pub fn new<I>(name: &str, contigs: I) -> Self
    where
        I: IntoIterator<Item = Contig>,
    {
        let mut assembly = GenomicAssembly {
            name: name.to_owned(),
            ..Default::default()
        };
        for contig in contigs {
            assembly.push(contig);
        }
        assembly
    }

    /// Build the assembly from a samtools faidx index (`.fai`).
    pub fn from_fai<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let index = fasta::Index::from_file(&path)
            .with_context(|| format!("failed to read FASTA index {:?}", path))?;
        let name = path
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(GenomicAssembly::new(
            &name,
            index
                .sequences()
                .into_iter()
                .enumerate()
                .map(|(i, seq)| Contig::new(i, seq.name, seq.len)),
        ))
    }

    /// Register a contig; an already known name keeps pointing to the first contig registered.
    pub fn push(&mut self, contig: Contig) {
        let idx = self.contigs.len();
        self.by_name.entry(contig.name().to_owned()).or_insert(idx);
        for alias in contig.aliases() {
            self.by_name.entry(alias.to_owned()).or_insert(idx);
        }
        self.contigs.push(Arc::new(contig));
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

impl ContigResolver for GenomicAssembly {
    fn contig_by_name(&self, name: &str) -> Option<Arc<Contig>> {
        self.by_name
            .get(name)
            .or_else(|| self.by_name.get(&toggle_chr_prefix(name)))
            .map(|&idx| Arc::clone(&self.contigs[idx]))
    }
}
