//! Checksummed, human-readable identifiers for ChemReg entities.
//!
//! Compounds, substances and list records are keyed by identifiers such as
//! `DTXCID802345678`: a configurable prefix, a domain tag, a checksum digit,
//! a literal `0`, and a payload drawn from a per-domain sequence.
//!
//! - [`IdentifierFormat`] formats, parses and validates identifiers.
//! - [`Allocator`] draws payloads from a shared [`SequenceStore`] and rebuilds
//!   the sequence from an [`IdentifierSource`] when the counter is lost.
//! - [`AllocatorAsyncExt`] does the same without blocking an async executor.
//! - [`validate_registry_number`] checks externally assigned registry numbers,
//!   which use a different check digit.
//!
//! ```
//! use chemreg_id::{Allocator, AllocatorConfig, Domain, MemorySequenceStore};
//!
//! let store = MemorySequenceStore::new();
//! let compounds =
//!     Allocator::new(AllocatorConfig::new(Domain::Compound), &store, Vec::<String>::new())
//!         .unwrap();
//!
//! let id = compounds.build_identifier(None).unwrap();
//! assert_eq!(id, "DTXCID202000000");
//! assert!(compounds.validate_identifier_checksum(&id).is_ok());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocator;
mod config;
mod domain;
mod error;
mod format;
mod futures;
mod registry;
mod store;

pub use crate::allocator::*;
pub use crate::config::*;
pub use crate::domain::*;
pub use crate::error::*;
pub use crate::format::*;
pub use crate::futures::*;
pub use crate::registry::*;
pub use crate::store::*;
