//! Ontology reading for ldcontext.
//!
//! Two passes over the discovered Turtle files:
//! 1. [`prefixes`] scans raw lines for namespace declarations into a
//!    [`PrefixTable`](ldcontext_shared::PrefixTable);
//! 2. [`properties`] parses each file into an RDF graph and records the
//!    datatype and object properties it declares, with their SHACL cardinality.

pub mod graph;
pub mod naming;
pub mod prefixes;
pub mod properties;
pub mod vocab;

pub use graph::{load_graph, parse_turtle};
pub use naming::{PropertyName, datatype_name, property_name};
pub use prefixes::{PrefixDecl, collect_prefixes, record_prefixes, scan_prefixes};
pub use properties::{ExtractStats, extract_from_graph, extract_properties};
pub use vocab::{WELL_KNOWN_PREFIXES, naming_table};
