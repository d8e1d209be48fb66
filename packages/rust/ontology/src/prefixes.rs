//! Prefix declaration scanner.
//!
//! Reads Turtle files line by line and records every namespace declaration:
//! - Turtle: `@prefix name: <iri> .`
//! - SPARQL style: `PREFIX name: <iri>` (keyword is case-insensitive)
//!
//! The first binding of a prefix is the reference value; a later binding to a
//! different IRI anywhere in the input aborts the run.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use ldcontext_shared::{LdContextError, PrefixTable, Result};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single declaration found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDecl {
    /// Prefix without the trailing colon. May be empty.
    pub prefix: String,
    /// Namespace IRI without angle brackets.
    pub iri: String,
    /// 1-based line number.
    pub line: usize,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches one `@prefix name: <iri> .` declaration. Unanchored at the end so
/// several declarations, or a declaration followed by triples, share a line.
static TURTLE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@prefix\s+([^\s:]*):\s*<([^>]*)>\s*\.").expect("turtle prefix regex")
});

/// Matches a leading `PREFIX name: <iri>` (no terminating dot).
static SPARQL_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^prefix\s+([^\s:]*):\s*<([^>]*)>").expect("sparql prefix regex")
});

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Scan Turtle source text for prefix declarations.
///
/// `source` is only used in error messages. A line that starts with
/// `@prefix` must open with a well-formed declaration; whatever follows it on
/// the same line is scanned for more declarations and otherwise left to the
/// RDF parser.
pub fn scan_prefixes(source: &Path, content: &str) -> Result<Vec<PrefixDecl>> {
    let mut decls = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let mut push = |caps: regex::Captures<'_>| {
            decls.push(PrefixDecl {
                prefix: caps[1].to_string(),
                iri: caps[2].to_string(),
                line: idx + 1,
            });
        };

        if line.starts_with("@prefix") {
            let mut matches = TURTLE_PREFIX_RE.captures_iter(line).peekable();
            if !matches
                .peek()
                .is_some_and(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
            {
                return Err(LdContextError::parse(format!(
                    "{}:{}: malformed prefix declaration: {line}",
                    source.display(),
                    idx + 1
                )));
            }
            matches.for_each(&mut push);
        } else if let Some(caps) = SPARQL_PREFIX_RE.captures(line) {
            push(caps);
        }
    }

    Ok(decls)
}

/// Record the declarations of every file into `table`.
///
/// Fails with [`LdContextError::NoInputFiles`] when `files` is empty and with
/// [`LdContextError::PrefixConflict`] on the first inconsistent redefinition.
/// Returns the number of new bindings.
#[instrument(skip_all, fields(files = files.len()))]
pub fn collect_prefixes(files: &[PathBuf], table: &mut PrefixTable) -> Result<usize> {
    if files.is_empty() {
        return Err(LdContextError::NoInputFiles);
    }

    let mut added = 0;
    for path in files {
        let content = std::fs::read_to_string(path).map_err(|e| LdContextError::io(path, e))?;
        added += record_prefixes(path, &content, table)?;
    }

    info!(prefixes = table.len(), added, "prefix collection complete");
    Ok(added)
}

/// Scan one file's content and add its declarations to `table`.
pub fn record_prefixes(source: &Path, content: &str, table: &mut PrefixTable) -> Result<usize> {
    let mut added = 0;
    for decl in scan_prefixes(source, content)? {
        if decl.prefix.is_empty() {
            warn!(
                path = %source.display(),
                line = decl.line,
                iri = %decl.iri,
                "empty prefix cannot be a JSON-LD term, skipping"
            );
            continue;
        }
        if table.insert(&decl.prefix, &decl.iri, source)? {
            debug!(prefix = %decl.prefix, iri = %decl.iri, "new prefix");
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CORE: &str = r#"# baseURI: https://ontology.example.org/uco/core
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix uco-core: <https://ontology.example.org/uco/core/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .   # datatypes

uco-core:hasFacet
	a owl:ObjectProperty ;
	.
"#;

    #[test]
    fn scans_turtle_declarations() {
        let decls = scan_prefixes(Path::new("core.ttl"), CORE).unwrap();
        let pairs: Vec<(&str, &str)> = decls
            .iter()
            .map(|d| (d.prefix.as_str(), d.iri.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("owl", "http://www.w3.org/2002/07/owl#"),
                ("uco-core", "https://ontology.example.org/uco/core/"),
                ("xsd", "http://www.w3.org/2001/XMLSchema#"),
            ]
        );
        assert_eq!(decls[0].line, 2);
    }

    #[test]
    fn scans_sparql_style_declarations() {
        let content = "PREFIX ex: <http://example.org/ex#>\nprefix foo: <http://foo.org/>\n";
        let decls = scan_prefixes(Path::new("a.ttl"), content).unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].prefix, "foo");
    }

    #[test]
    fn prose_starting_with_prefix_is_ignored() {
        let content = "ex:a rdfs:comment \"\"\"\nPrefixes are described elsewhere.\n\"\"\" .\n";
        assert!(scan_prefixes(Path::new("a.ttl"), content).unwrap().is_empty());
    }

    #[test]
    fn declaration_followed_by_statements_on_one_line() {
        let content = "@prefix ex: <http://example.org/ex#> . ex:a ex:b ex:c .\n\
                       @prefix owl: <http://www.w3.org/2002/07/owl#> . @prefix sh: <http://www.w3.org/ns/shacl#> .\n";
        let decls = scan_prefixes(Path::new("a.ttl"), content).unwrap();
        let pairs: Vec<(&str, usize)> = decls.iter().map(|d| (d.prefix.as_str(), d.line)).collect();
        assert_eq!(pairs, vec![("ex", 1), ("owl", 2), ("sh", 2)]);
        assert_eq!(decls[0].iri, "http://example.org/ex#");
    }

    #[test]
    fn malformed_turtle_declaration_is_an_error() {
        let content = "@prefix ex <http://example.org/> .\n";
        let err = scan_prefixes(Path::new("bad.ttl"), content).unwrap_err();
        assert!(matches!(err, LdContextError::Parse { .. }));
        assert!(err.to_string().contains("bad.ttl:1"));
    }

    #[test]
    fn empty_prefix_is_skipped() {
        let mut table = PrefixTable::new();
        let added = record_prefixes(
            Path::new("a.ttl"),
            "@prefix : <http://example.org/> .\n@prefix ex: <http://example.org/ex#> .\n",
            &mut table,
        )
        .unwrap();
        assert_eq!(added, 1);
        assert_eq!(table.get(""), None);
    }

    #[test]
    fn no_files_is_an_error() {
        let mut table = PrefixTable::new();
        let err = collect_prefixes(&[], &mut table).unwrap_err();
        assert!(matches!(err, LdContextError::NoInputFiles));
    }

    #[test]
    fn conflicting_files_abort() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.ttl");
        let b = tmp.path().join("b.ttl");
        fs::write(&a, "@prefix ex: <http://example.org/ex#> .\n").unwrap();
        fs::write(&b, "@prefix ex: <http://example.org/other#> .\n").unwrap();

        let mut table = PrefixTable::new();
        let err = collect_prefixes(&[a, b.clone()], &mut table).unwrap_err();
        match err {
            LdContextError::PrefixConflict {
                prefix,
                existing,
                conflicting,
                path,
            } => {
                assert_eq!(prefix, "ex");
                assert_eq!(existing, "http://example.org/ex#");
                assert_eq!(conflicting, "http://example.org/other#");
                assert_eq!(path, b);
            }
            other => panic!("expected PrefixConflict, got {other:?}"),
        }
    }

    #[test]
    fn collection_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("core.ttl");
        fs::write(&a, CORE).unwrap();
        let files = vec![a.clone(), a];

        let mut once = PrefixTable::new();
        collect_prefixes(&files[..1], &mut once).unwrap();

        let mut twice = PrefixTable::new();
        collect_prefixes(&files, &mut twice).unwrap();
        assert_eq!(collect_prefixes(&files, &mut twice).unwrap(), 0);

        assert_eq!(once, twice);
    }
}
