// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Normalization of VCF variants: minimal allele trimming under VCF (left) and HGVS (right)
//! shifting, and resolution of breakend (BND) records into strand aware adjacencies that can
//! be formatted back into their original VCF text.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate strum_macros;

pub mod cli;
pub mod conversion;
pub mod coordinates;
pub mod errors;
pub mod reference;
pub mod utils;
pub mod variants;

pub use crate::conversion::{ConvertedVariant, VcfConverter, VcfRecord};
pub use crate::reference::{Contig, ContigResolver, GenomicAssembly};
pub use crate::variants::{AlleleTrimmer, BreakendVariant, RetentionPolicy, ShiftDirection, Strand};
