//! # Collaborator Doubles
//!
//! Small, deterministic stand-ins for a JSON-LD processor and a graph
//! canonicalizer, sufficient for documents that use a single `@vocab`
//! context and plain string values.
//!
//! - [`MiniJsonLd`] expands, compacts, frames (explicit, embed by `@id`) and
//!   converts to and from N-Quads.
//! - [`FirstDegreeCanonicalizer`] labels blank nodes by the hash of the
//!   statements they occur in, breaking ties by input label.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use sdp_core::{
    relabel_blank_nodes, sort_statements, split_statements, BoxError, CanonicalIdMap, LabelMap,
    Literal, LiteralAnnotation, Quad, Term,
};
use sdp_crypto::{sha256_hex, HmacIdLabelMapFactory, HmacKey};
use sdp_disclose::{
    CanonicalOutput, CanonicalizeInput, Canonicalizer, DocumentTransformer, Grouper,
    TransformOptions,
};
use serde_json::{json, Map, Value};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const VOCAB: &str = "urn:example:";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const MAX_EMBED_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn context() -> Value {
    json!({"@vocab": VOCAB})
}

pub fn dl_credential() -> Value {
    json!({
        "@context": context(),
        "id": "urn:uuid:36245ee9-9074-4b05-a777-febff2e69757",
        "type": ["VerifiableCredential", "DriverLicenseCredential"],
        "issuer": "did:key:zDnaekGZTbQBerwcehBSXLqAg6s55hVEBms1zFy89VHXtJSa9",
        "issuanceDate": "2010-01-01T19:23:24Z",
        "credentialSubject": {
            "id": "urn:uuid:1a0e4ef5-091f-4060-842e-18e519ab9440",
            "driverLicense": {
                "type": "DriverLicense",
                "documentIdentifier": "T21387yc328c7y32h23f23",
                "dateOfBirth": "01-01-1990",
                "expirationDate": "01-01-2030",
                "issuingAuthority": "VA"
            }
        }
    })
}

pub fn dl_credential_no_ids() -> Value {
    let mut document = dl_credential();
    if let Some(map) = document.as_object_mut() {
        map.remove("id");
    }
    if let Some(subject) = document["credentialSubject"].as_object_mut() {
        subject.remove("id");
    }
    document
}

pub fn hmac_factory() -> HmacIdLabelMapFactory<HmacKey> {
    let key = HmacKey::from_hex("00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff")
        .unwrap();
    HmacIdLabelMapFactory::new(key)
}

pub fn grouper() -> Grouper {
    Grouper::new(
        Arc::new(FirstDegreeCanonicalizer::default()),
        Arc::new(MiniJsonLd),
        TransformOptions::default(),
    )
}

pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// MiniJsonLd
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJsonLd;

struct Context {
    vocab: String,
}

impl Context {
    fn from_value(context: Option<&Value>) -> Self {
        let vocab = match context {
            Some(Value::Array(entries)) => entries.iter().find_map(vocab_of),
            Some(entry) => vocab_of(entry),
            None => None,
        };
        Self {
            vocab: vocab.unwrap_or_else(|| VOCAB.to_string()),
        }
    }

    fn expand_iri(&self, term: &str) -> String {
        if term.contains(':') {
            term.to_string()
        } else {
            format!("{}{term}", self.vocab)
        }
    }

    fn compact_iri(&self, iri: &str) -> String {
        match iri.strip_prefix(self.vocab.as_str()) {
            Some(term) if !term.is_empty() && !term.contains(':') => term.to_string(),
            _ => iri.to_string(),
        }
    }
}

fn vocab_of(entry: &Value) -> Option<String> {
    entry.get("@vocab").and_then(Value::as_str).map(str::to_string)
}

fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn unwrap_single(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

fn expand_document(document: &Value) -> Result<Vec<Value>, BoxError> {
    match document {
        Value::Array(items) => Ok(items.clone()),
        Value::Object(map) => {
            let context = Context::from_value(map.get("@context"));
            match map.get("@graph") {
                Some(graph) => as_list(graph)
                    .into_iter()
                    .map(|node| expand_value(&context, node))
                    .collect(),
                None => Ok(vec![expand_node(&context, map)?]),
            }
        }
        _ => Err("document must be an object or an expanded array".into()),
    }
}

fn expand_node(context: &Context, map: &Map<String, Value>) -> Result<Value, BoxError> {
    let mut node = Map::new();
    for (key, value) in map {
        match key.as_str() {
            "@context" => {}
            "id" | "@id" => {
                node.insert("@id".to_string(), value.clone());
            }
            "type" | "@type" => {
                let types = as_list(value)
                    .into_iter()
                    .map(|t| {
                        t.as_str()
                            .map(|t| Value::String(context.expand_iri(t)))
                            .ok_or_else(|| BoxError::from("type must be a string"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                node.insert("@type".to_string(), Value::Array(types));
            }
            _ => {
                let values = as_list(value)
                    .into_iter()
                    .map(|v| expand_value(context, v))
                    .collect::<Result<Vec<_>, _>>()?;
                node.insert(context.expand_iri(key), Value::Array(values));
            }
        }
    }
    Ok(Value::Object(node))
}

fn expand_value(context: &Context, value: &Value) -> Result<Value, BoxError> {
    match value {
        Value::Object(map) if map.contains_key("@value") => Ok(value.clone()),
        Value::Object(map) => expand_node(context, map),
        Value::Array(_) => Err("arrays of arrays are not supported".into()),
        Value::Null => Err("null values are not supported".into()),
        scalar => Ok(json!({"@value": scalar})),
    }
}

fn compact_document(expanded: &Value, context: &Value) -> Result<Value, BoxError> {
    let ctx = Context::from_value(Some(context));
    let nodes = as_list(expanded)
        .into_iter()
        .map(|node| compact_node(&ctx, node))
        .collect::<Result<Vec<_>, _>>()?;
    let mut document = match nodes.len() {
        1 => nodes.into_iter().next().unwrap_or_default(),
        _ => {
            let mut map = Map::new();
            map.insert(
                "@graph".to_string(),
                Value::Array(nodes.into_iter().map(Value::Object).collect()),
            );
            map
        }
    };
    document.insert("@context".to_string(), context.clone());
    Ok(Value::Object(document))
}

fn compact_node(context: &Context, node: &Value) -> Result<Map<String, Value>, BoxError> {
    let map = node.as_object().ok_or("node must be an object")?;
    let mut compacted = Map::new();
    for (key, value) in map {
        match key.as_str() {
            "@id" => {
                compacted.insert("id".to_string(), value.clone());
            }
            "@type" => {
                let types = as_list(value)
                    .into_iter()
                    .map(|t| match t {
                        Value::String(iri) => Value::String(context.compact_iri(iri)),
                        other => other.clone(),
                    })
                    .collect();
                compacted.insert("type".to_string(), unwrap_single(types));
            }
            _ => {
                let values = as_list(value)
                    .into_iter()
                    .map(|v| compact_value(context, v))
                    .collect::<Result<Vec<_>, _>>()?;
                compacted.insert(context.compact_iri(key), unwrap_single(values));
            }
        }
    }
    Ok(compacted)
}

fn compact_value(context: &Context, value: &Value) -> Result<Value, BoxError> {
    match value {
        Value::Object(map) if map.contains_key("@value") => Ok(match map.len() {
            1 => map["@value"].clone(),
            _ => value.clone(),
        }),
        Value::Object(_) => Ok(Value::Object(compact_node(context, value)?)),
        other => Ok(other.clone()),
    }
}

fn id_term(id: &str) -> Term {
    match id.strip_prefix("_:") {
        Some(label) => Term::Blank(label.to_string()),
        None => Term::Iri(id.to_string()),
    }
}

#[derive(Default)]
struct QuadWriter {
    quads: Vec<Quad>,
    blank_count: usize,
}

impl QuadWriter {
    fn node(&mut self, node: &Value) -> Result<Term, BoxError> {
        let map = node.as_object().ok_or("node must be an object")?;
        let subject = match map.get("@id").and_then(Value::as_str) {
            Some(id) => id_term(id),
            None => {
                self.blank_count += 1;
                Term::Blank(format!("b{}", self.blank_count - 1))
            }
        };
        for (key, value) in map {
            match key.as_str() {
                "@id" => {}
                "@type" => {
                    for t in as_list(value) {
                        let t = t.as_str().ok_or("type must be a string")?;
                        self.push(subject.clone(), RDF_TYPE, id_term(t));
                    }
                }
                predicate => {
                    for item in as_list(value) {
                        let object = self.object(item)?;
                        self.push(subject.clone(), predicate, object);
                    }
                }
            }
        }
        Ok(subject)
    }

    fn object(&mut self, value: &Value) -> Result<Term, BoxError> {
        match value {
            Value::Object(map) if map.contains_key("@value") => literal(map),
            Value::Object(map) if map.len() == 1 && map.contains_key("@id") => map["@id"]
                .as_str()
                .map(id_term)
                .ok_or_else(|| "@id must be a string".into()),
            Value::Object(_) => self.node(value),
            _ => Err("expanded values must be objects".into()),
        }
    }

    fn push(&mut self, subject: Term, predicate: &str, object: Term) {
        self.quads.push(Quad {
            subject,
            predicate: Term::Iri(predicate.to_string()),
            object,
            graph: None,
        });
    }
}

fn literal(map: &Map<String, Value>) -> Result<Term, BoxError> {
    let annotation = match (map.get("@type"), map.get("@language")) {
        (Some(Value::String(datatype)), _) => LiteralAnnotation::Datatype(datatype.clone()),
        (_, Some(Value::String(language))) => LiteralAnnotation::Language(language.clone()),
        _ => LiteralAnnotation::None,
    };
    let (lexical, annotation) = match &map["@value"] {
        Value::String(s) => (s.clone(), annotation),
        Value::Bool(b) => (b.to_string(), LiteralAnnotation::Datatype(XSD_BOOLEAN.to_string())),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            (n.to_string(), LiteralAnnotation::Datatype(XSD_INTEGER.to_string()))
        }
        Value::Number(n) => (n.to_string(), LiteralAnnotation::Datatype(XSD_DOUBLE.to_string())),
        _ => return Err("unsupported @value".into()),
    };
    Ok(Term::Literal(Literal::new(&lexical, annotation)))
}

fn to_nquads(document: &Value) -> Result<String, BoxError> {
    let mut writer = QuadWriter::default();
    for node in expand_document(document)? {
        writer.node(&node)?;
    }
    Ok(writer.quads.iter().map(Quad::to_statement).collect())
}

fn term_id(term: &Term) -> String {
    match term {
        Term::Blank(label) => format!("_:{label}"),
        Term::Iri(iri) => iri.clone(),
        Term::Literal(_) => term.to_string(),
    }
}

fn from_nquads(nquads: &str) -> Result<Value, BoxError> {
    let mut nodes: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for statement in split_statements(nquads) {
        let quad = Quad::parse(&statement)?;
        let subject = term_id(&quad.subject);
        let node = nodes.entry(subject.clone()).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(subject));
            node
        });
        let Term::Iri(predicate) = &quad.predicate else {
            return Err("predicate must be an IRI".into());
        };
        let (key, value) = match (predicate.as_str(), &quad.object) {
            (RDF_TYPE, Term::Iri(_) | Term::Blank(_)) => {
                ("@type".to_string(), Value::String(term_id(&quad.object)))
            }
            (_, Term::Literal(lit)) => {
                let mut value = Map::new();
                value.insert("@value".to_string(), Value::String(lit.value()));
                match lit.annotation() {
                    LiteralAnnotation::None => {}
                    LiteralAnnotation::Language(l) => {
                        value.insert("@language".to_string(), Value::String(l.clone()));
                    }
                    LiteralAnnotation::Datatype(d) => {
                        value.insert("@type".to_string(), Value::String(d.clone()));
                    }
                }
                (predicate.clone(), Value::Object(value))
            }
            (_, object) => (predicate.clone(), json!({"@id": term_id(object)})),
        };
        match node.entry(key).or_insert_with(|| Value::Array(Vec::new())) {
            Value::Array(values) => values.push(value),
            _ => return Err("malformed node map".into()),
        }
    }
    Ok(Value::Array(nodes.into_values().map(Value::Object).collect()))
}

/// Explicit framing: matched nodes keep `@id`, `@type` when the frame names
/// types, and only the properties the frame names. References are embedded
/// when the target node matches the property's sub-frame.
fn frame_document(document: &Value, frame: &Value) -> Result<Value, BoxError> {
    let frame_map = frame.as_object().ok_or("frame must be an object")?;
    let context = frame_map
        .get("@context")
        .cloned()
        .unwrap_or_else(|| json!({"@vocab": VOCAB}));
    let ctx = Context::from_value(Some(&context));
    let expanded_frame = expand_node(&ctx, frame_map)?;

    let nodes: BTreeMap<String, &Map<String, Value>> = as_list(document)
        .into_iter()
        .filter_map(Value::as_object)
        .filter_map(|node| {
            node.get("@id")
                .and_then(Value::as_str)
                .map(|id| (id.to_string(), node))
        })
        .collect();

    let matched: Vec<Value> = nodes
        .values()
        .filter(|node| frame_matches(node, &expanded_frame))
        .map(|node| embed(node, &expanded_frame, &nodes, 0))
        .collect();
    if matched.is_empty() {
        let mut empty = Map::new();
        empty.insert("@context".to_string(), context);
        empty.insert("@graph".to_string(), Value::Array(Vec::new()));
        return Ok(Value::Object(empty));
    }
    compact_document(&Value::Array(matched), &context)
}

fn frame_matches(node: &Map<String, Value>, frame: &Value) -> bool {
    let Some(frame) = frame.as_object() else {
        return true;
    };
    let id = frame.get("@id");
    let types = frame.get("@type").and_then(Value::as_array);
    if let Some(id) = id {
        if node.get("@id") != Some(id) {
            return false;
        }
    }
    if let Some(types) = types {
        let node_types = node.get("@type").and_then(Value::as_array);
        if !types
            .iter()
            .all(|t| node_types.map_or(false, |nt| nt.contains(t)))
        {
            return false;
        }
    }
    if id.is_none() && types.is_none() {
        return frame
            .keys()
            .filter(|k| !k.starts_with('@'))
            .all(|k| node.contains_key(k));
    }
    true
}

fn sub_frame(frame_values: &Value) -> Option<&Value> {
    frame_values
        .as_array()
        .and_then(|values| values.first())
        .filter(|value| value.is_object() && value.get("@value").is_none())
}

fn embed(
    node: &Map<String, Value>,
    frame: &Value,
    nodes: &BTreeMap<String, &Map<String, Value>>,
    depth: usize,
) -> Value {
    let mut out = Map::new();
    if let Some(id) = node.get("@id") {
        out.insert("@id".to_string(), id.clone());
    }
    let Some(frame) = frame.as_object() else {
        return Value::Object(out);
    };
    if frame.contains_key("@type") {
        if let Some(types) = node.get("@type") {
            out.insert("@type".to_string(), types.clone());
        }
    }
    for (property, frame_values) in frame.iter().filter(|(k, _)| !k.starts_with('@')) {
        let Some(values) = node.get(property).and_then(Value::as_array) else {
            continue;
        };
        let sub = sub_frame(frame_values);
        let mut kept = Vec::new();
        for value in values {
            let reference = value.get("@id").and_then(Value::as_str);
            match (sub, reference) {
                (Some(sub), Some(id)) if depth < MAX_EMBED_DEPTH => {
                    match nodes.get(id) {
                        Some(target) if frame_matches(target, sub) => {
                            kept.push(embed(target, sub, nodes, depth + 1));
                        }
                        Some(_) => {}
                        None => kept.push(value.clone()),
                    }
                }
                _ => kept.push(value.clone()),
            }
        }
        if !kept.is_empty() {
            out.insert(property.clone(), Value::Array(kept));
        }
    }
    Value::Object(out)
}

#[async_trait]
impl DocumentTransformer for MiniJsonLd {
    async fn expand(&self, document: &Value, _options: &TransformOptions) -> Result<Value, BoxError> {
        Ok(Value::Array(expand_document(document)?))
    }

    async fn compact(
        &self,
        document: &Value,
        context: &Value,
        _options: &TransformOptions,
    ) -> Result<Value, BoxError> {
        compact_document(document, context)
    }

    async fn frame(
        &self,
        document: &Value,
        frame: &Value,
        _options: &TransformOptions,
    ) -> Result<Value, BoxError> {
        frame_document(document, frame)
    }

    async fn to_nquads(&self, document: &Value, _options: &TransformOptions) -> Result<String, BoxError> {
        to_nquads(document)
    }

    async fn from_nquads(&self, nquads: &str, _options: &TransformOptions) -> Result<Value, BoxError> {
        from_nquads(nquads)
    }
}

// ---------------------------------------------------------------------------
// FirstDegreeCanonicalizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstDegreeCanonicalizer {
    transformer: MiniJsonLd,
}

/// Canonicalize serialized statements: labels are `c14n{n}` in order of
/// (first-degree hash, input label); output is sorted and de-duplicated; the
/// id map uses `_:`-prefixed labels on both sides.
pub fn canonicalize_nquads(nquads: &str, safe: bool) -> Result<CanonicalOutput, BoxError> {
    let statements = split_statements(nquads);
    let mut quads = Vec::with_capacity(statements.len());
    for statement in &statements {
        match Quad::parse(statement) {
            Ok(quad) => quads.push(quad),
            Err(err) if safe => return Err(err.into()),
            Err(_) => {}
        }
    }

    let labels: BTreeSet<String> = quads
        .iter()
        .flat_map(Quad::terms)
        .filter_map(|term| match term {
            Term::Blank(label) => Some(label.clone()),
            _ => None,
        })
        .collect();

    let mut ranked: Vec<(String, String)> = labels
        .into_iter()
        .map(|label| (first_degree_hash(&quads, &label), label))
        .collect();
    ranked.sort();

    let canonical: LabelMap = ranked
        .iter()
        .enumerate()
        .map(|(i, (_, label))| (label.clone(), format!("c14n{i}")))
        .collect();

    let lines: Vec<String> = quads.iter().map(Quad::to_statement).collect();
    let mut relabelled = relabel_blank_nodes(&lines, &canonical)?;
    sort_statements(&mut relabelled);
    relabelled.dedup();

    let canonical_id_map: CanonicalIdMap = canonical
        .iter()
        .map(|(input, c14n)| (format!("_:{input}"), format!("_:{c14n}")))
        .collect();

    Ok(CanonicalOutput {
        nquads: relabelled.concat(),
        canonical_id_map,
    })
}

fn first_degree_hash(quads: &[Quad], label: &str) -> String {
    let mut lines: Vec<String> = quads
        .iter()
        .filter(|quad| {
            quad.terms()
                .any(|term| matches!(term, Term::Blank(l) if l == label))
        })
        .map(|quad| {
            let rewritten = quad.clone().try_map_terms(|term| {
                Ok::<_, Infallible>(match term {
                    Term::Blank(l) if l == label => Term::Blank("a".to_string()),
                    Term::Blank(_) => Term::Blank("z".to_string()),
                    other => other,
                })
            });
            match rewritten {
                Ok(quad) => quad.to_statement(),
                Err(never) => match never {},
            }
        })
        .collect();
    lines.sort();
    sha256_hex(lines.concat().as_bytes())
}

#[async_trait]
impl Canonicalizer for FirstDegreeCanonicalizer {
    async fn canonicalize(
        &self,
        input: CanonicalizeInput<'_>,
        options: &TransformOptions,
    ) -> Result<CanonicalOutput, BoxError> {
        let nquads = match input {
            CanonicalizeInput::Document(document) => {
                self.transformer.to_nquads(document, options).await?
            }
            CanonicalizeInput::NQuads(nquads) => nquads.to_string(),
        };
        canonicalize_nquads(&nquads, options.safe)
    }
}

/// Blank node labels occurring in `statements`.
pub fn blank_labels(statements: &[String]) -> BTreeSet<String> {
    statements
        .iter()
        .filter_map(|s| Quad::parse(s).ok())
        .flat_map(|quad| {
            quad.terms()
                .filter_map(|term| match term {
                    Term::Blank(label) => Some(label.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
