//! `owl:DatatypeProperty` / `owl:ObjectProperty` extraction.
//!
//! For each declared property we record its context name, its range datatype
//! (datatype properties only) and the `sh:maxCount` of any SHACL property
//! shape whose `sh:path` is the property.

use std::path::{Path, PathBuf};

use ldcontext_shared::{
    DatatypePropertyInfo, ObjectPropertyInfo, OntologyCatalog, PrefixTable, Result,
};
use oxrdf::{Graph, NamedNodeRef, NamedOrBlankNodeRef, TermRef};
use tracing::{debug, info, instrument, warn};

use crate::graph::load_graph;
use crate::naming::{PropertyName, datatype_name, property_name};
use crate::vocab::{naming_table, owl, rdf, rdfs, sh};

/// Counts of what one file (or a whole run) contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub datatype_properties: usize,
    pub object_properties: usize,
    /// Declarations that could not be turned into a context name.
    pub skipped: usize,
}

impl std::ops::AddAssign for ExtractStats {
    fn add_assign(&mut self, rhs: Self) {
        self.datatype_properties += rhs.datatype_properties;
        self.object_properties += rhs.object_properties;
        self.skipped += rhs.skipped;
    }
}

/// Parse every file and append its property declarations to `catalog`.
///
/// `on_file` is called after each file with `(path, current, total)`.
#[instrument(skip_all, fields(files = files.len()))]
pub fn extract_properties(
    files: &[PathBuf],
    prefixes: &PrefixTable,
    catalog: &mut OntologyCatalog,
    mut on_file: impl FnMut(&Path, usize, usize),
) -> Result<ExtractStats> {
    let names = naming_table(prefixes);
    let mut stats = ExtractStats::default();

    for (idx, path) in files.iter().enumerate() {
        let graph = load_graph(path)?;
        stats += extract_from_graph(&graph, path, &names, catalog);
        on_file(path, idx + 1, files.len());
    }

    info!(
        datatype_properties = stats.datatype_properties,
        object_properties = stats.object_properties,
        skipped = stats.skipped,
        "property extraction complete"
    );
    Ok(stats)
}

/// Extract both property kinds from one parsed graph.
///
/// `names` should already include the well-known namespaces
/// (see [`naming_table`]).
pub fn extract_from_graph(
    graph: &Graph,
    source: &Path,
    names: &PrefixTable,
    catalog: &mut OntologyCatalog,
) -> ExtractStats {
    let mut stats = ExtractStats::default();

    for property in declared(graph, owl::DATATYPE_PROPERTY, source, &mut stats) {
        let Some(PropertyName { ns_prefix, name }) = named(property, names, &mut stats) else {
            continue;
        };
        let info = DatatypePropertyInfo {
            ns_prefix,
            name,
            datatype: range_datatype(graph, property, names),
            max_count: shacl_max_count(graph, property),
            source: source.to_path_buf(),
        };
        if catalog.datatype_properties.push(info) {
            debug!(property = %property.as_str(), "local name already recorded, keeping both");
        }
        stats.datatype_properties += 1;
    }

    for property in declared(graph, owl::OBJECT_PROPERTY, source, &mut stats) {
        let Some(PropertyName { ns_prefix, name }) = named(property, names, &mut stats) else {
            continue;
        };
        let info = ObjectPropertyInfo {
            ns_prefix,
            name,
            max_count: shacl_max_count(graph, property),
            source: source.to_path_buf(),
        };
        if catalog.object_properties.push(info) {
            debug!(property = %property.as_str(), "local name already recorded, keeping both");
        }
        stats.object_properties += 1;
    }

    stats
}

/// Named subjects typed `class`. Blank-node subjects are counted as skipped.
fn declared<'a>(
    graph: &'a Graph,
    class: NamedNodeRef<'static>,
    source: &Path,
    stats: &mut ExtractStats,
) -> Vec<NamedNodeRef<'a>> {
    let mut found = Vec::new();
    for subject in graph.subjects_for_predicate_object(rdf::TYPE, class) {
        match subject {
            NamedOrBlankNodeRef::NamedNode(node) => found.push(node),
            NamedOrBlankNodeRef::BlankNode(node) => {
                debug!(path = %source.display(), %node, %class, "anonymous declaration skipped");
                stats.skipped += 1;
            }
        }
    }
    found
}

fn named(
    property: NamedNodeRef<'_>,
    names: &PrefixTable,
    stats: &mut ExtractStats,
) -> Option<PropertyName> {
    let name = property_name(property.as_str(), names);
    if name.is_none() {
        warn!(
            property = %property.as_str(),
            "no context name can be derived for property, skipping"
        );
        stats.skipped += 1;
    }
    name
}

/// First named `rdfs:range` of `property`, as a prefixed name.
fn range_datatype(graph: &Graph, property: NamedNodeRef<'_>, names: &PrefixTable) -> Option<String> {
    let mut datatype: Option<String> = None;

    for range in graph.objects_for_subject_predicate(property, rdfs::RANGE) {
        match range {
            TermRef::NamedNode(node) => {
                let rendered = datatype_name(node.as_str(), names);
                match &datatype {
                    None => datatype = Some(rendered),
                    Some(kept) => debug!(
                        property = %property.as_str(),
                        %kept,
                        ignored = %rendered,
                        "several ranges declared, keeping the first"
                    ),
                }
            }
            TermRef::BlankNode(_) => warn!(
                property = %property.as_str(),
                "anonymous range has no prefixed name, leaving datatype unset"
            ),
            other => debug!(property = %property.as_str(), range = %other, "non-IRI range ignored"),
        }
    }

    datatype
}

/// Smallest `sh:maxCount` over the property shapes whose `sh:path` is `property`.
///
/// One shape limiting the property to a single value is enough to make it
/// single-valued, whatever the other shapes allow.
fn shacl_max_count(graph: &Graph, property: NamedNodeRef<'_>) -> Option<i64> {
    let mut smallest: Option<i64> = None;

    for shape in graph.subjects_for_predicate_object(sh::PATH, property) {
        for value in graph.objects_for_subject_predicate(shape, sh::MAX_COUNT) {
            let Some(count) = integer_literal(value) else {
                warn!(property = %property.as_str(), value = %value, "sh:maxCount is not an integer, ignoring");
                continue;
            };
            match smallest {
                None => smallest = Some(count),
                Some(kept) => {
                    debug!(
                        property = %property.as_str(),
                        kept,
                        other = count,
                        "maxCount defined more than once, keeping the smallest"
                    );
                    smallest = Some(kept.min(count));
                }
            }
        }
    }

    smallest
}

fn integer_literal(term: TermRef<'_>) -> Option<i64> {
    match term {
        TermRef::Literal(literal) => literal.value().trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse_turtle;
    use crate::prefixes::record_prefixes;
    use ldcontext_shared::PropertyRecord;

    const HEADER: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/ex#> .
@prefix uco-core: <https://ontology.example.org/uco/core/> .
"#;

    fn extract(body: &str) -> OntologyCatalog {
        let ttl = format!("{HEADER}{body}");
        let source = Path::new("mem.ttl");
        let mut prefixes = PrefixTable::new();
        record_prefixes(source, &ttl, &mut prefixes).unwrap();
        let graph = parse_turtle(ttl.as_bytes(), source).unwrap();

        let mut catalog = OntologyCatalog::new();
        extract_from_graph(&graph, source, &naming_table(&prefixes), &mut catalog);
        catalog
    }

    #[test]
    fn datatype_property_with_xsd_range() {
        let catalog = extract(
            "ex:hasName a owl:DatatypeProperty ; rdfs:range xsd:string .\n",
        );
        let props = catalog.datatype_properties.get("hasName");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].key(), "ex:hasName");
        assert_eq!(props[0].datatype.as_deref(), Some("xsd:string"));
        assert_eq!(props[0].max_count, None);
    }

    #[test]
    fn anonymous_range_leaves_datatype_unset() {
        let catalog = extract(
            r#"
uco-core:tag a owl:DatatypeProperty ;
    rdfs:range [
        a rdfs:Datatype ;
        owl:oneOf ( "a" "b" ) ;
    ] .
"#,
        );
        let props = catalog.datatype_properties.get("tag");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].key(), "uco-core:tag");
        assert_eq!(props[0].datatype, None);
    }

    #[test]
    fn max_count_one_is_single_valued() {
        let catalog = extract(
            r#"
uco-core:hasFacet a owl:ObjectProperty .
uco-core:Thing a owl:Class ;
    sh:property [ sh:path uco-core:hasFacet ; sh:maxCount "1"^^xsd:integer ] .
"#,
        );
        let props = catalog.object_properties.get("hasFacet");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].max_count, Some(1));
        assert!(props[0].single_valued());
    }

    #[test]
    fn large_or_missing_max_count_repeats() {
        let catalog = extract(
            r#"
uco-core:many a owl:ObjectProperty .
uco-core:none a owl:ObjectProperty .
uco-core:Thing sh:property [ sh:path uco-core:many ; sh:maxCount 5 ] .
"#,
        );
        let many = &catalog.object_properties.get("many")[0];
        assert_eq!(many.max_count, Some(5));
        assert!(!many.single_valued());

        let none = &catalog.object_properties.get("none")[0];
        assert_eq!(none.max_count, None);
        assert!(!none.single_valued());
    }

    #[test]
    fn duplicate_max_count_is_not_an_error() {
        let catalog = extract(
            r#"
uco-core:twice a owl:DatatypeProperty ; rdfs:range xsd:integer .
uco-core:A sh:property [ sh:path uco-core:twice ; sh:maxCount 1 ] .
uco-core:B sh:property [ sh:path uco-core:twice ; sh:maxCount 1 ] .
"#,
        );
        let props = catalog.datatype_properties.get("twice");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].datatype.as_deref(), Some("xsd:integer"));
        assert_eq!(props[0].max_count, Some(1));
        assert_eq!(props[0].source, Path::new("mem.ttl"));
    }

    #[test]
    fn any_single_valued_shape_wins_regardless_of_order() {
        for (first, second) in [(1, 5), (5, 1)] {
            let catalog = extract(&format!(
                r#"
uco-core:p a owl:ObjectProperty .
uco-core:A sh:property [ sh:path uco-core:p ; sh:maxCount {first} ] .
uco-core:B sh:property [ sh:path uco-core:p ; sh:maxCount {second} ] .
"#
            ));
            let p = &catalog.object_properties.get("p")[0];
            assert_eq!(p.max_count, Some(1), "shapes {first} then {second}");
            assert!(p.single_valued(), "shapes {first} then {second}");
        }
    }

    #[test]
    fn several_large_max_counts_stay_repeatable() {
        let catalog = extract(
            r#"
uco-core:p a owl:ObjectProperty .
uco-core:A sh:property [ sh:path uco-core:p ; sh:maxCount 5 ] .
uco-core:B sh:property [ sh:path uco-core:p ; sh:maxCount 3 ] .
"#,
        );
        let p = &catalog.object_properties.get("p")[0];
        assert_eq!(p.max_count, Some(3));
        assert!(!p.single_valued());
    }

    #[test]
    fn non_integer_max_count_is_ignored() {
        let catalog = extract(
            r#"
uco-core:odd a owl:ObjectProperty .
uco-core:Thing sh:property [ sh:path uco-core:odd ; sh:maxCount "one" ] .
"#,
        );
        assert_eq!(catalog.object_properties.get("odd")[0].max_count, None);
    }

    #[test]
    fn same_local_name_under_two_prefixes_is_preserved() {
        let catalog = extract(
            r#"
uco-core:name a owl:DatatypeProperty ; rdfs:range xsd:string .
ex:name a owl:DatatypeProperty .
"#,
        );
        let mut keys: Vec<String> = catalog
            .datatype_properties
            .get("name")
            .iter()
            .map(PropertyRecord::key)
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["ex:name", "uco-core:name"]);
    }

    #[test]
    fn unnamed_and_blank_declarations_are_skipped() {
        let ttl = format!(
            "{HEADER}<urn:x:prop> a owl:ObjectProperty .\n[] a owl:ObjectProperty .\n"
        );
        let source = Path::new("mem.ttl");
        let mut prefixes = PrefixTable::new();
        record_prefixes(source, &ttl, &mut prefixes).unwrap();
        let graph = parse_turtle(ttl.as_bytes(), source).unwrap();

        let mut catalog = OntologyCatalog::new();
        let stats = extract_from_graph(&graph, source, &naming_table(&prefixes), &mut catalog);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.object_properties, 0);
        assert!(catalog.object_properties.is_empty());
    }

    #[test]
    fn extract_properties_reports_each_file() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.ttl");
        let b = tmp.path().join("b.ttl");
        std::fs::write(&a, format!("{HEADER}uco-core:p a owl:ObjectProperty .\n")).unwrap();
        std::fs::write(&b, format!("{HEADER}uco-core:q a owl:DatatypeProperty .\n")).unwrap();

        let mut prefixes = PrefixTable::new();
        record_prefixes(&a, HEADER, &mut prefixes).unwrap();

        let mut seen = Vec::new();
        let mut catalog = OntologyCatalog::new();
        let stats = extract_properties(&[a, b], &prefixes, &mut catalog, |_, current, total| {
            seen.push((current, total))
        })
        .unwrap();

        assert_eq!(seen, vec![(1, 2), (2, 2)]);
        assert_eq!(stats.object_properties, 1);
        assert_eq!(stats.datatype_properties, 1);
    }
}
