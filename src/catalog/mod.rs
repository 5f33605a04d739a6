//! Curated haplotype definition storage.
//!
//! The catalog holds, for every gene, the ordered positions it is called on and
//! its curated definitions (exactly one of which is the reference). Definitions are
//! validated and initialized once at load time and then shared read-only by every
//! matching run.
//!
//! ## Format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "genes": [
//!     {
//!       "gene": "CYP2C19",
//!       "chromosome": "chr10",
//!       "positions": [
//!         {"chromosome": "chr10", "position": 94781859, "ref": "G", "rsid": "rs4244285"}
//!       ],
//!       "namedAlleles": [
//!         {"id": "CA10000.1", "name": "*1", "alleles": ["G"], "reference": true},
//!         {"id": "CA10001.1", "name": "*2", "alleles": ["A"]}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A gene whose data fails validation is rejected on its own; the rest of the
//! catalog still loads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use allele_matcher::DefinitionCatalog;
//! use std::path::Path;
//!
//! let catalog = DefinitionCatalog::load_from_file(Path::new("definitions.json")).unwrap();
//! if let Some(gene) = catalog.get("CYP2C19") {
//!     println!("{} definitions, reference {}", gene.len(), gene.reference().name());
//! }
//! ```

pub mod store;
