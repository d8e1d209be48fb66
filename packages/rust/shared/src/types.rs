//! Core domain types for ldcontext: the prefix table and property records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LdContextError, Result};

/// Local part of a prefixed name that needs no escaping (`PN_LOCAL` subset).
static LOCAL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?$").expect("local name regex")
});

// ---------------------------------------------------------------------------
// PrefixTable
// ---------------------------------------------------------------------------

/// Prefix → namespace IRI bindings, kept sorted by prefix.
///
/// A prefix is bound to exactly one IRI for the whole run. Re-binding it to
/// the same IRI is a no-op; re-binding it to a different IRI is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    entries: BTreeMap<String, String>,
}

impl PrefixTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `iri`. `source` is only used for error reporting.
    ///
    /// Returns `true` if the binding is new.
    pub fn insert(&mut self, prefix: &str, iri: &str, source: &Path) -> Result<bool> {
        match self.entries.get(prefix) {
            Some(existing) if existing == iri => Ok(false),
            Some(existing) => Err(LdContextError::PrefixConflict {
                prefix: prefix.to_string(),
                existing: existing.clone(),
                conflicting: iri.to_string(),
                path: source.to_path_buf(),
            }),
            None => {
                self.entries.insert(prefix.to_string(), iri.to_string());
                Ok(true)
            }
        }
    }

    /// Bind `prefix` only if it is not bound yet. Never fails.
    pub fn insert_default(&mut self, prefix: &str, iri: &str) {
        self.entries
            .entry(prefix.to_string())
            .or_insert_with(|| iri.to_string());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    /// Iterate `(prefix, iri)` pairs in ascending prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split `iri` into `(prefix, local)` using the longest matching namespace.
    ///
    /// Only namespaces whose remainder is a plain prefixed-name local part are
    /// considered, so `xsd:string` compacts but `ex:a/b` never appears.
    pub fn compact(&self, iri: &str) -> Option<(&str, String)> {
        self.entries
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.len() > ns.len() && iri.starts_with(ns.as_str()))
            .filter(|(_, ns)| LOCAL_NAME_RE.is_match(&iri[ns.len()..]))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix.as_str(), iri[ns.len()..].to_string()))
    }

    /// Render `iri` as `prefix:local`, or `None` if no namespace applies.
    pub fn prefixed_name(&self, iri: &str) -> Option<String> {
        self.compact(iri)
            .map(|(prefix, local)| format!("{prefix}:{local}"))
    }
}

// ---------------------------------------------------------------------------
// Property records
// ---------------------------------------------------------------------------

/// Behaviour shared by both property kinds for ordering and keying.
pub trait PropertyRecord {
    /// Namespace-prefix label, e.g. `uco-core`.
    fn ns_prefix(&self) -> &str;
    /// Local property name, e.g. `hasFacet`.
    fn name(&self) -> &str;
    /// Smallest SHACL `maxCount` over the property's shapes, if any.
    fn max_count(&self) -> Option<i64>;

    /// Context key, `prefix:name`.
    fn key(&self) -> String {
        format!("{}:{}", self.ns_prefix(), self.name())
    }

    /// `true` when a SHACL shape limits the property to at most one value.
    fn single_valued(&self) -> bool {
        self.max_count().is_some_and(|n| n <= 1)
    }
}

/// One parsed `owl:DatatypeProperty` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatatypePropertyInfo {
    pub ns_prefix: String,
    pub name: String,
    /// Range datatype as a prefixed name (or absolute IRI). `None` for
    /// anonymous or missing ranges.
    pub datatype: Option<String>,
    pub max_count: Option<i64>,
    /// File the declaration was read from.
    pub source: PathBuf,
}

impl PropertyRecord for DatatypePropertyInfo {
    fn ns_prefix(&self) -> &str {
        &self.ns_prefix
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn max_count(&self) -> Option<i64> {
        self.max_count
    }
}

/// One parsed `owl:ObjectProperty` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPropertyInfo {
    pub ns_prefix: String,
    pub name: String,
    pub max_count: Option<i64>,
    pub source: PathBuf,
}

impl PropertyRecord for ObjectPropertyInfo {
    fn ns_prefix(&self) -> &str {
        &self.ns_prefix
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn max_count(&self) -> Option<i64> {
        self.max_count
    }
}

// ---------------------------------------------------------------------------
// PropertyIndex / OntologyCatalog
// ---------------------------------------------------------------------------

/// Occurrences grouped by local name.
///
/// Append-only: the same name declared under several prefixes, or several
/// times, keeps every occurrence in recording order.
#[derive(Debug, Clone)]
pub struct PropertyIndex<T> {
    by_name: BTreeMap<String, Vec<T>>,
}

impl<T> Default for PropertyIndex<T> {
    fn default() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }
}

impl<T: PropertyRecord> PropertyIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an occurrence. Returns `true` if the local name was already known.
    pub fn push(&mut self, record: T) -> bool {
        let slot = self.by_name.entry(record.name().to_string()).or_default();
        let seen = !slot.is_empty();
        slot.push(record);
        seen
    }

    /// All occurrences recorded under a local name.
    pub fn get(&self, name: &str) -> &[T] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occurrences in ascending local-name order, then recording order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.by_name.values().flatten()
    }

    /// Number of distinct local names.
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    /// Total number of occurrences.
    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Everything extracted from the ontology files.
#[derive(Debug, Clone, Default)]
pub struct OntologyCatalog {
    pub datatype_properties: PropertyIndex<DatatypePropertyInfo>,
    pub object_properties: PropertyIndex<ObjectPropertyInfo>,
}

impl OntologyCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(prefix: &str, name: &str, max_count: Option<i64>) -> ObjectPropertyInfo {
        ObjectPropertyInfo {
            ns_prefix: prefix.into(),
            name: name.into(),
            max_count,
            source: PathBuf::from("a.ttl"),
        }
    }

    #[test]
    fn prefix_table_rejects_conflicting_iri() {
        let mut table = PrefixTable::new();
        let src = Path::new("a.ttl");
        assert!(table.insert("ex", "http://example.org/ex#", src).unwrap());
        assert!(!table.insert("ex", "http://example.org/ex#", src).unwrap());

        let err = table
            .insert("ex", "http://example.org/other#", Path::new("b.ttl"))
            .unwrap_err();
        assert!(matches!(err, LdContextError::PrefixConflict { ref prefix, .. } if prefix == "ex"));
        assert_eq!(table.get("ex"), Some("http://example.org/ex#"));
    }

    #[test]
    fn prefix_table_iterates_sorted() {
        let mut table = PrefixTable::new();
        let src = Path::new("a.ttl");
        table.insert("xsd", "http://www.w3.org/2001/XMLSchema#", src).unwrap();
        table.insert("core", "https://example.org/core/", src).unwrap();
        table.insert("action", "https://example.org/action/", src).unwrap();

        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["action", "core", "xsd"]);
    }

    #[test]
    fn compact_prefers_longest_namespace() {
        let mut table = PrefixTable::new();
        let src = Path::new("a.ttl");
        table.insert("ex", "http://example.org/", src).unwrap();
        table.insert("exv", "http://example.org/vocab/", src).unwrap();

        assert_eq!(
            table.prefixed_name("http://example.org/vocab/name").as_deref(),
            Some("exv:name")
        );
        assert_eq!(
            table.prefixed_name("http://example.org/thing").as_deref(),
            Some("ex:thing")
        );
    }

    #[test]
    fn compact_refuses_invalid_local_parts() {
        let mut table = PrefixTable::new();
        table
            .insert("ex", "http://example.org/", Path::new("a.ttl"))
            .unwrap();

        assert_eq!(table.prefixed_name("http://example.org/a/b"), None);
        assert_eq!(table.prefixed_name("http://example.org/"), None);
        assert_eq!(table.prefixed_name("http://other.org/x"), None);
    }

    #[test]
    fn insert_default_never_overrides() {
        let mut table = PrefixTable::new();
        table
            .insert("xsd", "http://example.org/not-xsd#", Path::new("a.ttl"))
            .unwrap();
        table.insert_default("xsd", "http://www.w3.org/2001/XMLSchema#");
        assert_eq!(table.get("xsd"), Some("http://example.org/not-xsd#"));
    }

    #[test]
    fn property_index_keeps_duplicates_in_order() {
        let mut index = PropertyIndex::new();
        assert!(!index.push(object("uco-core", "hasFacet", None)));
        assert!(index.push(object("uco-other", "hasFacet", Some(1))));
        index.push(object("uco-core", "alpha", None));

        let keys: Vec<String> = index.iter().map(PropertyRecord::key).collect();
        assert_eq!(
            keys,
            vec!["uco-core:alpha", "uco-core:hasFacet", "uco-other:hasFacet"]
        );
        assert_eq!(index.get("hasFacet").len(), 2);
        assert_eq!(index.name_count(), 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn single_valued_follows_max_count() {
        assert!(object("p", "a", Some(1)).single_valued());
        assert!(object("p", "a", Some(0)).single_valued());
        assert!(!object("p", "a", Some(5)).single_valued());
        assert!(!object("p", "a", None).single_valued());
    }
}
