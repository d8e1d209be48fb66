//! Namespace-prefix and local-name derivation for property IRIs.
//!
//! Ontology IRIs follow the `<base>/<ontology>/<module>/<localName>` layout,
//! e.g. `https://ontology.unifiedcyberontology.org/uco/core/hasFacet`, whose
//! context key is `uco-core:hasFacet`. That positional convention is applied
//! only to IRIs that actually have this shape. Anything else (hash
//! namespaces, short paths) is compacted against the declared prefixes.

use ldcontext_shared::PrefixTable;
use url::Url;

/// Prefix label and local name of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyName {
    pub ns_prefix: String,
    pub name: String,
}

/// Derive the context name of `iri`, or `None` if neither rule applies.
pub fn property_name(iri: &str, prefixes: &PrefixTable) -> Option<PropertyName> {
    from_path_segments(iri).or_else(|| {
        prefixes.compact(iri).map(|(prefix, local)| PropertyName {
            ns_prefix: prefix.to_string(),
            name: local,
        })
    })
}

/// Segments N-3 and N-2 of the IRI path, hyphenated, and segment N-1.
fn from_path_segments(iri: &str) -> Option<PropertyName> {
    let url = Url::parse(iri).ok()?;
    if url.fragment().is_some() || url.query().is_some() {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    let [.., ontology, module, local] = segments.as_slice() else {
        return None;
    };
    if ontology.is_empty() || module.is_empty() || local.is_empty() {
        return None;
    }

    Some(PropertyName {
        ns_prefix: format!("{ontology}-{module}"),
        name: (*local).to_string(),
    })
}

/// Render a range IRI as a prefixed name, falling back to the absolute IRI.
pub fn datatype_name(iri: &str, prefixes: &PrefixTable) -> String {
    prefixes
        .prefixed_name(iri)
        .unwrap_or_else(|| iri.to_string())
}
