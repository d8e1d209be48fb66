//! JSON-LD context assembler.
//!
//! Takes the prefix table and the property catalog and builds the ordered
//! `@context` document, then serializes or writes it.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use ldcontext_shared::{
    DatatypePropertyInfo, LdContextError, ObjectPropertyInfo, OntologyCatalog, PrefixTable,
    PropertyRecord, Result,
};

/// Keys that let instance data use plain JSON names for JSON-LD keywords.
pub const KEY_ALIASES: [(&str, &str); 4] = [
    ("uco-core:id", "@id"),
    ("uco-core:type", "@type"),
    ("value", "@value"),
    ("graph", "@graph"),
];

// ---------------------------------------------------------------------------
// Entry shapes
// ---------------------------------------------------------------------------

/// `{"@type": "@id"}` plus `"@container": "@set"` for repeatable properties.
#[derive(Debug, Serialize)]
struct ObjectPropertyEntry {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@container", skip_serializing_if = "Option::is_none")]
    container: Option<&'static str>,
}

impl From<&ObjectPropertyInfo> for ObjectPropertyEntry {
    fn from(info: &ObjectPropertyInfo) -> Self {
        Self {
            kind: "@id",
            container: (!info.single_valued()).then_some("@set"),
        }
    }
}

/// `{"@id": "prefix:name"}` plus `"@type"` when a range datatype is known.
#[derive(Debug, Serialize)]
struct DatatypePropertyEntry {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    datatype: Option<String>,
}

impl From<&DatatypePropertyInfo> for DatatypePropertyEntry {
    fn from(info: &DatatypePropertyInfo) -> Self {
        Self {
            id: info.key(),
            datatype: info.datatype.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// ContextDocument
// ---------------------------------------------------------------------------

/// The assembled `{"@context": {...}}` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDocument {
    context: Map<String, Value>,
}

impl ContextDocument {
    /// The inner `@context` object, in emission order.
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Context keys in emission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.context.keys().map(String::as_str)
    }

    /// Number of entries in `@context`.
    pub fn len(&self) -> usize {
        self.context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    /// The full document as a JSON value.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("@context".into(), Value::Object(self.context.clone()));
        Value::Object(root)
    }

    /// Serialize to JSON text.
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let value = self.to_value();
        let text = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|e| LdContextError::Serialization(e.to_string()))
    }

    /// Write the document to `path`.
    ///
    /// The file is written next to the target and renamed into place, so a
    /// failure never leaves a truncated document behind.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        let mut text = self.to_json_string(pretty)?;
        text.push('\n');

        let file_name = path
            .file_name()
            .ok_or_else(|| LdContextError::config(format!("not a file path: {}", path.display())))?;
        let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

        let mut file = std::fs::File::create(&temp).map_err(|e| LdContextError::io(&temp, e))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| LdContextError::io(&temp, e))?;
        drop(file);

        std::fs::rename(&temp, path).map_err(|e| LdContextError::io(path, e))?;
        info!(bytes = text.len(), "context written");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the context document.
///
/// Entry order: prefixes (ascending), object properties, datatype properties
/// (each ascending by local name, then recording order), then [`KEY_ALIASES`].
/// A key that is already present keeps its first value. Alias keys are
/// reserved: a prefix or property with the same key is dropped.
#[instrument(skip_all, fields(prefixes = prefixes.len()))]
pub fn assemble(prefixes: &PrefixTable, catalog: &OntologyCatalog) -> ContextDocument {
    let mut entries = EntryMap::default();

    for (prefix, iri) in prefixes.iter() {
        entries.insert(prefix.to_string(), Value::String(iri.to_string()));
    }

    for info in catalog.object_properties.iter() {
        entries.insert_entry(info.key(), &ObjectPropertyEntry::from(info));
    }

    for info in catalog.datatype_properties.iter() {
        entries.insert_entry(info.key(), &DatatypePropertyEntry::from(info));
    }

    for (alias, keyword) in KEY_ALIASES {
        entries.context.insert(alias.to_string(), Value::String(keyword.to_string()));
    }

    let document = ContextDocument {
        context: entries.context,
    };
    debug!(entries = document.len(), duplicates = entries.duplicates, "context assembled");
    document
}

fn is_alias(key: &str) -> bool {
    KEY_ALIASES.iter().any(|(alias, _)| *alias == key)
}

#[derive(Default)]
struct EntryMap {
    context: Map<String, Value>,
    duplicates: usize,
}

impl EntryMap {
    fn insert(&mut self, key: String, value: Value) {
        if is_alias(&key) {
            warn!(%key, "entry collides with a keyword alias, dropping it");
            self.duplicates += 1;
            return;
        }
        if self.context.contains_key(&key) {
            warn!(%key, "duplicate context key, keeping the first definition");
            self.duplicates += 1;
            return;
        }
        self.context.insert(key, value);
    }

    fn insert_entry<T: Serialize>(&mut self, key: String, entry: &T) {
        // Entry structs only hold strings, so this cannot fail.
        match serde_json::to_value(entry) {
            Ok(value) => self.insert(key, value),
            Err(e) => warn!(%key, error = %e, "could not encode context entry"),
        }
    }
}
