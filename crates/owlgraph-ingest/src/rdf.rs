//! RDF syntax adapter (boundary module).
//!
//! Parses N-Triples, Turtle and RDF/XML with Sophia and feeds each
//! statement straight into the engine, using the document path as the
//! partition locator. The engine core never sees Sophia types; it
//! consumes the crate-local term model only.

use crate::engine::TripleEngine;
use anyhow::{anyhow, Context, Result};
use owlgraph_model::{RdfLiteral, RdfNode, RdfObject};
use sophia::api::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    RdfXml,
}

impl RdfFormat {
    /// Format from a file extension, the usual suspects.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "nt" => Some(Self::NTriples),
            "ttl" | "turtle" => Some(Self::Turtle),
            "rdf" | "owl" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct StatementSinkError {
    message: String,
}

impl From<anyhow::Error> for StatementSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

/// Parse one document and feed every statement into `engine`. The
/// caller runs `end_of_stream` once all documents are in.
pub fn load_file(engine: &mut TripleEngine, path: &Path) -> Result<()> {
    let format = RdfFormat::from_path(path)
        .ok_or_else(|| anyhow!("unrecognized RDF file extension: {}", path.display()))?;
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let locator = format!("file://{}", path.display());
    load_reader(engine, reader, format, &locator)
}

/// Parse from any buffered reader, attributing statements to `locator`.
pub fn load_reader<R: std::io::BufRead>(
    engine: &mut TripleEngine,
    reader: R,
    format: RdfFormat,
    locator: &str,
) -> Result<()> {
    let mut sink = |subject: RdfNode, predicate: String, object: RdfObject| {
        engine.feed_triple(subject, &predicate, object, locator);
    };
    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), StatementSinkError> {
                    feed_one(&mut sink, &t.s().to_string(), &t.p().to_string(), &t.o().to_string())
                        .map_err(StatementSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse N-Triples: {e}"))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), StatementSinkError> {
                    feed_one(&mut sink, &t.s().to_string(), &t.p().to_string(), &t.o().to_string())
                        .map_err(StatementSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), StatementSinkError> {
                    feed_one(&mut sink, &t.s().to_string(), &t.p().to_string(), &t.o().to_string())
                        .map_err(StatementSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?;
        }
    }
    Ok(())
}

fn feed_one(
    sink: &mut impl FnMut(RdfNode, String, RdfObject),
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<()> {
    let subject = parse_node_term(subject)?;
    let RdfNode::Iri(predicate) = parse_node_term(predicate)? else {
        // Blank-node predicates are not valid RDF; skip quietly.
        return Ok(());
    };
    let object = parse_term(object)?;
    sink(subject, predicate, object);
    Ok(())
}

// ============================================================================
// N-Triples-ish display-form term parsing
// ============================================================================

fn parse_term(term: &str) -> Result<RdfObject> {
    let s = term.trim();
    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfObject::Node(RdfNode::iri(iri)));
    }
    if let Some(label) = s.strip_prefix("_:") {
        return Ok(RdfObject::Node(RdfNode::blank(label)));
    }
    if s.starts_with('"') {
        return parse_literal_term(s);
    }
    Err(anyhow!("unsupported RDF term form: {s}"))
}

fn parse_node_term(term: &str) -> Result<RdfNode> {
    match parse_term(term)? {
        RdfObject::Node(node) => Ok(node),
        RdfObject::Literal(_) => Err(anyhow!("expected IRI or blank node, got literal: {term}")),
    }
}

fn parse_literal_term(s: &str) -> Result<RdfObject> {
    let mut end_quote = None;
    let mut escaped = false;
    for (i, ch) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => {
                end_quote = Some(i);
                break;
            }
            _ => {}
        }
    }
    let end = end_quote.ok_or_else(|| anyhow!("unterminated literal: {s}"))?;
    let lexical = unescape(&s[1..end]);
    let suffix = s[end + 1..].trim();

    let literal = if let Some(lang) = suffix.strip_prefix('@') {
        RdfLiteral {
            lexical,
            datatype: None,
            language: Some(lang.to_string()),
        }
    } else if let Some(dt) = suffix.strip_prefix("^^") {
        let dt = dt.trim();
        let datatype = dt
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .unwrap_or(dt);
        RdfLiteral {
            lexical,
            datatype: (!datatype.is_empty()).then(|| datatype.to_string()),
            language: None,
        }
    } else {
        RdfLiteral::plain(lexical)
    };
    Ok(RdfObject::Literal(literal))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iri_and_blank_terms() {
        assert_eq!(
            parse_term("<http://ex.org#Dog>").unwrap(),
            RdfObject::Node(RdfNode::iri("http://ex.org#Dog"))
        );
        assert_eq!(
            parse_term("_:b0").unwrap(),
            RdfObject::Node(RdfNode::blank("b0"))
        );
    }

    #[test]
    fn parses_literal_forms() {
        let plain = parse_term(r#""hello""#).unwrap();
        assert_eq!(plain, RdfObject::Literal(RdfLiteral::plain("hello")));

        let RdfObject::Literal(lang) = parse_term(r#""chien"@fr"#).unwrap() else {
            panic!("expected literal");
        };
        assert_eq!(lang.language.as_deref(), Some("fr"));

        let RdfObject::Literal(typed) =
            parse_term(r#""1"^^<http://www.w3.org/2001/XMLSchema#int>"#).unwrap()
        else {
            panic!("expected literal");
        };
        assert_eq!(
            typed.datatype.as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#int")
        );
    }

    #[test]
    fn unescapes_common_sequences() {
        assert_eq!(unescape(r#"a\nb\"c"#), "a\nb\"c");
    }

    #[test]
    fn loads_ntriples_file_by_extension() {
        use owlgraph_model::{vocab, EntityKind};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.nt");
        std::fs::write(
            &path,
            concat!(
                "<http://ex.org#Fido> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org#Dog> .\n",
                "<http://ex.org#Dog> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n",
                "<http://ex.org#Fido> <http://www.w3.org/2000/01/rdf-schema#label> \"Fido\" .\n",
            ),
        )
        .unwrap();

        let mut engine = TripleEngine::with_defaults();
        load_file(&mut engine, &path).unwrap();
        let report = engine.end_of_stream();
        assert!(!report.halted);

        let graph = engine.graph();
        let dog = graph.entity_by_name("http://ex.org#Dog").unwrap();
        assert_eq!(dog.kind, EntityKind::Class);
        let fido = graph.entity_by_name("http://ex.org#Fido").unwrap();
        assert!(fido.declared_types.contains(&dog.id));
        assert_eq!(fido.slot_values(vocab::RDFS_LABEL).len(), 1);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            RdfFormat::from_path(Path::new("x.nt")),
            Some(RdfFormat::NTriples)
        );
        assert_eq!(
            RdfFormat::from_path(Path::new("x.owl")),
            Some(RdfFormat::RdfXml)
        );
        assert_eq!(RdfFormat::from_path(Path::new("x.json")), None);
    }
}
