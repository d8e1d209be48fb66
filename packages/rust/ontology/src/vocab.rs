//! Constant `NamedNodeRef`s for the RDF, RDFS, OWL and SHACL terms the
//! extractor looks for, plus the namespaces every graph knows by default.

use ldcontext_shared::PrefixTable;
use oxrdf::NamedNodeRef;

pub mod rdf {
    use super::NamedNodeRef;

    pub const TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
}

pub mod rdfs {
    use super::NamedNodeRef;

    pub const RANGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#range");
}

pub mod owl {
    use super::NamedNodeRef;

    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
}

pub mod sh {
    use super::NamedNodeRef;

    pub const PATH: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#path");
    pub const MAX_COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxCount");
}

/// Bindings used to render range datatypes even when a file does not declare them.
pub const WELL_KNOWN_PREFIXES: [(&str, &str); 6] = [
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("sh", "http://www.w3.org/ns/shacl#"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// The declared prefixes, completed with [`WELL_KNOWN_PREFIXES`] where a
/// prefix is not declared. Declared bindings always win.
pub fn naming_table(declared: &PrefixTable) -> PrefixTable {
    let mut table = declared.clone();
    for (prefix, iri) in WELL_KNOWN_PREFIXES {
        table.insert_default(prefix, iri);
    }
    table
}
