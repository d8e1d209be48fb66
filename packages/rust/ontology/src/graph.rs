//! Turtle → in-memory graph loading via `oxrdfio`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ldcontext_shared::{LdContextError, Result};
use oxrdf::{Graph, Triple};
use oxrdfio::{RdfFormat, RdfParser};
use tracing::debug;
use url::Url;

/// Parse a Turtle file into a graph. Relative IRIs resolve against the file's URL.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let file = File::open(path).map_err(|e| LdContextError::io(path, e))?;
    parse_turtle(BufReader::new(file), path)
}

/// Parse Turtle from any reader. `source` names the input in errors and
/// provides the base IRI.
pub fn parse_turtle<R: Read>(reader: R, source: &Path) -> Result<Graph> {
    let mut parser = RdfParser::from_format(RdfFormat::Turtle);

    if let Some(base) = base_iri(source) {
        parser = parser
            .with_base_iri(base.as_str())
            .map_err(|e| LdContextError::rdf(source, format!("invalid base IRI {base}: {e}")))?;
    }

    let mut graph = Graph::new();
    for quad in parser.for_reader(reader) {
        let quad = quad.map_err(|e| LdContextError::rdf(source, e.to_string()))?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }

    debug!(path = %source.display(), triples = graph.len(), "parsed graph");
    Ok(graph)
}

fn base_iri(path: &Path) -> Option<Url> {
    let absolute = std::path::absolute(path).ok()?;
    Url::from_file_path(absolute).ok()
}
