//! LAPPS Interchange Format documents
//!
//! A LIF document is a JSON object holding the primary text and a list of
//! views, each view a list of annotations over the text:
//!
//! ```json
//! {
//!   "@context": "http://vocab.lappsgrid.org/context-1.0.0.jsonld",
//!   "metadata": {},
//!   "text": { "@value": "...", "language": "en" },
//!   "views": [ { "id": "tokens", "metadata": {}, "annotations": [ ... ] } ]
//! }
//! ```
//!
//! Offsets are character offsets into the text.

use crate::config::ViewConfig;
use crate::error::{EngineError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use termgraph_core::annotation::VOCAB_PREFIX;
use termgraph_core::{Annotation, AnnotationKind, DependencyRecord, GraphInput, SpanKind};

/// JSON-LD context of LIF documents
pub const LIF_CONTEXT: &str = "http://vocab.lappsgrid.org/context-1.0.0.jsonld";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn default_context() -> String {
    LIF_CONTEXT.to_string()
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// A LIF document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lif {
    /// JSON-LD context
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,
    /// Document metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Primary text
    pub text: LifText,
    /// Annotation views
    #[serde(default)]
    pub views: Vec<View>,
}

/// Primary text of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifText {
    /// The text itself
    #[serde(rename = "@value", default)]
    pub value: String,
    /// Language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A named list of annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// View id, used as the collection id of node ids
    pub id: String,
    /// View metadata, including the `contains` map
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Annotations in document order
    #[serde(default)]
    pub annotations: Vec<LifAnnotation>,
}

/// An annotation as stored in a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifAnnotation {
    /// Identifier, unique within the view
    pub id: String,
    /// Type URI
    #[serde(rename = "@type")]
    pub type_uri: String,
    /// Start character offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// End character offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    /// Target of the annotation, for annotations without offsets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Features, usually strings
    #[serde(default)]
    pub features: Map<String, Value>,
}

impl Lif {
    /// Create a document around a text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            context: default_context(),
            metadata: Map::new(),
            text: LifText {
                value: text.into(),
                language: Some("en".to_string()),
            },
            views: Vec::new(),
        }
    }

    /// Parse a document from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a document from a JSON file, gzipped or plain
    ///
    /// Compression is detected from the gzip magic bytes, not the file name.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        if bytes.starts_with(&GZIP_MAGIC) {
            let mut json = String::new();
            GzDecoder::new(bytes.as_slice()).read_to_string(&mut json)?;
            return Self::from_json_str(&json);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Serialize, pretty-printed or compact
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the document to a file, gzipped when the name ends in `.gz`
    pub fn write_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let mut json = self.to_json_string(pretty)?;
        json.push('\n');
        if is_gzip_path(path) {
            let mut encoder = GzEncoder::new(fs::File::create(path)?, Compression::default());
            encoder.write_all(json.as_bytes())?;
            encoder.finish()?;
        } else {
            fs::write(path, json)?;
        }
        Ok(())
    }

    /// Look up a view by id
    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|view| view.id == id)
    }

    /// Look up a view by id, failing when it is missing
    pub fn require_view(&self, id: &str) -> Result<&View> {
        self.view(id).ok_or_else(|| EngineError::MissingView {
            view: id.to_string(),
        })
    }

    /// Add a view, replacing any view with the same id in place
    pub fn set_view(&mut self, view: View) {
        match self.views.iter_mut().find(|v| v.id == view.id) {
            Some(existing) => *existing = view,
            None => self.views.push(view),
        }
    }

    /// Character index over the primary text
    pub fn char_index(&self) -> CharIndex<'_> {
        CharIndex::new(&self.text.value)
    }

    /// Annotations of a view converted to core annotations
    ///
    /// Annotations without their own text get the covered slice of the
    /// primary text.
    pub fn annotations(&self, view_id: &str) -> Result<Vec<Annotation>> {
        let index = self.char_index();
        self.require_view(view_id)?
            .annotations
            .iter()
            .map(|a| a.to_annotation(&index))
            .collect()
    }
}

impl std::fmt::Display for Lif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let views: Vec<String> = self
            .views
            .iter()
            .map(|v| format!("{}:{}", v.id, v.annotations.len()))
            .collect();
        write!(f, "<LIF with views {}>", views.join(" "))
    }
}

impl View {
    /// Create an empty view
    pub fn new(id: impl Into<String>) -> Self {
        let mut metadata = Map::new();
        metadata.insert("contains".to_string(), Value::Object(Map::new()));
        Self {
            id: id.into(),
            metadata,
            annotations: Vec::new(),
        }
    }

    /// Record an annotation type in the `contains` metadata
    pub fn declare(&mut self, kind: &AnnotationKind, producer: &str) {
        let contains = self
            .metadata
            .entry("contains")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(contains) = contains {
            let mut info = Map::new();
            info.insert("producer".to_string(), Value::String(producer.to_string()));
            contains.insert(kind.vocab_uri(), Value::Object(info));
        }
    }

    /// Append a core annotation
    pub fn push(&mut self, annotation: &Annotation) {
        self.annotations.push(LifAnnotation::from_annotation(annotation));
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the view has no annotations
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl LifAnnotation {
    /// Annotation type derived from the type URI
    pub fn kind(&self) -> AnnotationKind {
        AnnotationKind::from_type(&self.type_uri)
    }

    /// String value of a feature
    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features.get(name).and_then(Value::as_str)
    }

    /// Convert to a core annotation
    ///
    /// Non-string feature values are kept as their JSON text. Annotations
    /// without offsets get `0..0`.
    pub fn to_annotation(&self, index: &CharIndex<'_>) -> Result<Annotation> {
        let start = self.start.unwrap_or(0);
        let end = self.end.unwrap_or(start);
        let mut annotation = Annotation::new(self.id.clone(), self.kind(), start, end);
        for (name, value) in &self.features {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            annotation.features.insert(name.clone(), value);
        }

        let own_text = self.feature("text").or_else(|| self.feature("word"));
        annotation.text = match own_text {
            Some(text) => text.to_string(),
            None if self.start.is_some() => index
                .slice(start, end)
                .ok_or_else(|| EngineError::InvalidOffsets {
                    id: self.id.clone(),
                    start,
                    end,
                    length: index.len(),
                })?
                .to_string(),
            None => String::new(),
        };
        Ok(annotation)
    }

    /// Convert from a core annotation, storing its text as the `text` feature
    /// unless it is a token
    pub fn from_annotation(annotation: &Annotation) -> Self {
        let mut features: Map<String, Value> = annotation
            .features
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if annotation.kind != AnnotationKind::Token
            && !annotation.text.is_empty()
            && !features.contains_key("text")
        {
            features.insert("text".to_string(), Value::String(annotation.text.clone()));
        }
        Self {
            id: annotation.id.clone(),
            type_uri: format!("{VOCAB_PREFIX}{}", annotation.kind.short_name()),
            start: Some(annotation.start),
            end: Some(annotation.end),
            target: None,
            features,
        }
    }
}

/// Collect graph input from a document
///
/// Tokens and sentences come from the token view. Dependencies come from
/// the dependency view when the document has one. The span view must exist.
pub fn graph_input(
    lif: &Lif,
    views: &ViewConfig,
    span_view: &str,
    span_kind: SpanKind,
) -> Result<GraphInput> {
    let (tokens, sentences): (Vec<Annotation>, Vec<Annotation>) = lif
        .annotations(&views.tokens)?
        .into_iter()
        .filter(|a| matches!(a.kind, AnnotationKind::Token | AnnotationKind::Sentence))
        .partition(|a| a.kind == AnnotationKind::Token);
    let spans = lif.annotations(span_view)?;
    let dependencies = match lif.view(&views.dependencies) {
        Some(_) => lif
            .annotations(&views.dependencies)?
            .iter()
            .filter_map(DependencyRecord::from_annotation)
            .collect(),
        None => Vec::new(),
    };
    Ok(GraphInput::new(views.tokens.clone())
        .with_tokens(tokens)
        .with_sentences(sentences)
        .with_spans(span_view, span_kind, spans)
        .with_dependencies(dependencies))
}

/// Maps character offsets to byte offsets of a text
#[derive(Debug, Clone)]
pub struct CharIndex<'t> {
    text: &'t str,
    bytes: Vec<usize>,
}

impl<'t> CharIndex<'t> {
    /// Index a text
    pub fn new(text: &'t str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bytes.push(text.len());
        Self { text, bytes }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Whether the text is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text between two character offsets
    pub fn slice(&self, start: usize, end: usize) -> Option<&'t str> {
        if start > end {
            return None;
        }
        let (from, to) = (*self.bytes.get(start)?, *self.bytes.get(end)?);
        self.text.get(from..to)
    }
}
