//! # Statements — N-Quads Line Model
//!
//! A statement is one subject–predicate–object(–graph) fact serialized as a
//! single N-Quads line terminated by `\n`. Statements are compared and sorted
//! as opaque text.
//!
//! Blank node rewriting (skolemization, deskolemization, relabeling) never
//! pattern-matches raw text. Each line is parsed into a [`Quad`] whose four
//! slots are explicit [`Term`]s, only the blank-node (or skolem IRI) slots are
//! rewritten, and the quad is serialized back. Literal text is kept in its
//! escaped source form so that non-rewritten terms serialize byte-for-byte.
//!
//! ## Ordering
//!
//! Statement lists are sorted by Unicode code point. Rust compares `str` by
//! UTF-8 bytes, which orders identically to code points, so a plain `sort()`
//! is the correct sort. (UTF-16 code-unit order differs for characters above
//! U+FFFF and is not used.)

use crate::error::{SdpError, StatementError};
use crate::label::LabelMap;

/// Prefix of N-Quads blank node labels.
pub const BLANK_NODE_PREFIX: &str = "_:";

/// Default IRI prefix for skolem identifiers.
pub const DEFAULT_SKOLEM_PREFIX: &str = "urn:bnid:";

/// One RDF term in a statement slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Absolute IRI, without angle brackets.
    Iri(String),
    /// Blank node label, without the `_:` prefix.
    Blank(String),
    /// Literal value.
    Literal(Literal),
}

/// A literal term, stored in escaped source form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    escaped: String,
    annotation: LiteralAnnotation,
}

/// Language tag or datatype attached to a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralAnnotation {
    /// Plain string literal.
    None,
    /// `@lang` tag, without the `@`.
    Language(String),
    /// `^^<iri>` datatype, without brackets.
    Datatype(String),
}

impl Literal {
    /// Build a literal from an unescaped lexical value.
    pub fn new(value: &str, annotation: LiteralAnnotation) -> Self {
        Self {
            escaped: escape_literal(value),
            annotation,
        }
    }

    /// The escaped lexical form as it appears between quotes.
    pub fn escaped(&self) -> &str {
        &self.escaped
    }

    /// The unescaped lexical value.
    pub fn value(&self) -> String {
        unescape_literal(&self.escaped)
    }

    /// The language tag or datatype.
    pub fn annotation(&self) -> &LiteralAnnotation {
        &self.annotation
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "{BLANK_NODE_PREFIX}{label}"),
            Self::Literal(lit) => {
                write!(f, "\"{}\"", lit.escaped)?;
                match &lit.annotation {
                    LiteralAnnotation::None => Ok(()),
                    LiteralAnnotation::Language(lang) => write!(f, "@{lang}"),
                    LiteralAnnotation::Datatype(dt) => write!(f, "^^<{dt}>"),
                }
            }
        }
    }
}

/// A parsed statement with explicit subject, predicate, object and graph slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject slot.
    pub subject: Term,
    /// Predicate slot.
    pub predicate: Term,
    /// Object slot.
    pub object: Term,
    /// Graph slot; `None` for the default graph.
    pub graph: Option<Term>,
}

impl Quad {
    /// Parse one N-Quads line. A trailing line break is permitted.
    pub fn parse(line: &str) -> Result<Self, StatementError> {
        let mut reader = Reader::new(line);
        let subject = reader.term()?;
        let predicate = reader.term()?;
        let object = reader.term()?;
        reader.skip_ws();
        let graph = match reader.peek() {
            Some('.') => None,
            None | Some('\n') | Some('\r') => return Err(reader.missing_terminator()),
            Some(_) => Some(reader.term()?),
        };
        reader.terminator()?;
        Ok(Self {
            subject,
            predicate,
            object,
            graph,
        })
    }

    /// Rewrite every slot through `f`, failing on the first error.
    pub fn try_map_terms<E>(self, mut f: impl FnMut(Term) -> Result<Term, E>) -> Result<Self, E> {
        Ok(Self {
            subject: f(self.subject)?,
            predicate: f(self.predicate)?,
            object: f(self.object)?,
            graph: self.graph.map(&mut f).transpose()?,
        })
    }

    /// Iterate over the four slots (three when in the default graph).
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .chain(self.graph.as_ref())
    }

    /// Serialize as a statement line including the trailing `\n`.
    pub fn to_statement(&self) -> String {
        format!("{self}\n")
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(graph) = &self.graph {
            write!(f, " {graph}")?;
        }
        f.write_str(" .")
    }
}

impl std::str::FromStr for Quad {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Statement list operations
// ---------------------------------------------------------------------------

/// Split serialized N-Quads into statements, each keeping its `\n`.
///
/// Blank lines are dropped; a final line without a line break is kept and
/// terminated.
pub fn split_statements(nquads: &str) -> Vec<String> {
    nquads
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Sort statements in Unicode code-point order.
pub fn sort_statements(statements: &mut [String]) {
    statements.sort_unstable();
}

/// Replace blank node labels with skolem IRIs (`_:b0` → `<{prefix}b0>`).
///
/// Statements without a blank node marker pass through unchanged.
pub fn skolemize_statements(statements: &[String], prefix: &str) -> Result<Vec<String>, SdpError> {
    statements
        .iter()
        .map(|statement| {
            if !statement.contains(BLANK_NODE_PREFIX) {
                return Ok(statement.clone());
            }
            rewrite(statement, |term| match term {
                Term::Blank(label) => Ok(Term::Iri(format!("{prefix}{label}"))),
                other => Ok(other),
            })
        })
        .collect()
}

/// Replace skolem IRIs with blank node labels (`<{prefix}b0>` → `_:b0`).
///
/// Statements without the skolem marker pass through unchanged.
pub fn deskolemize_statements(
    statements: &[String],
    prefix: &str,
) -> Result<Vec<String>, SdpError> {
    let marker = format!("<{prefix}");
    statements
        .iter()
        .map(|statement| {
            if !statement.contains(&marker) {
                return Ok(statement.clone());
            }
            rewrite(statement, |term| match term {
                Term::Iri(iri) => match iri.strip_prefix(prefix) {
                    Some(label) if !label.is_empty() => Ok(Term::Blank(label.to_string())),
                    _ => Ok(Term::Iri(iri)),
                },
                other => Ok(other),
            })
        })
        .collect()
}

/// Rewrite every blank node label through `label_map`.
///
/// # Errors
///
/// Returns [`SdpError::UnmappedLabel`] when a label has no entry.
pub fn relabel_blank_nodes(
    statements: &[String],
    label_map: &LabelMap,
) -> Result<Vec<String>, SdpError> {
    statements
        .iter()
        .map(|statement| {
            if !statement.contains(BLANK_NODE_PREFIX) {
                return Ok(statement.clone());
            }
            rewrite(statement, |term| match term {
                Term::Blank(label) => label_map
                    .get(&label)
                    .map(|replacement| Term::Blank(replacement.to_string()))
                    .ok_or(SdpError::UnmappedLabel(label)),
                other => Ok(other),
            })
        })
        .collect()
}

fn rewrite(
    statement: &str,
    f: impl FnMut(Term) -> Result<Term, SdpError>,
) -> Result<String, SdpError> {
    let quad = Quad::parse(statement)?;
    Ok(quad.try_map_terms(f)?.to_statement())
}

// ---------------------------------------------------------------------------
// Line reader
// ---------------------------------------------------------------------------

struct Reader<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t']);
        self.pos += rest.len() - trimmed.len();
    }

    fn end(&self) -> StatementError {
        StatementError::UnexpectedEnd {
            line: self.line.to_string(),
        }
    }

    fn missing_terminator(&self) -> StatementError {
        StatementError::MissingTerminator {
            line: self.line.to_string(),
        }
    }

    fn invalid(&self, offset: usize, reason: &str) -> StatementError {
        StatementError::InvalidTerm {
            line: self.line.to_string(),
            offset,
            reason: reason.to_string(),
        }
    }

    fn term(&mut self) -> Result<Term, StatementError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            None | Some('\n') | Some('\r') => Err(self.end()),
            Some('<') => Ok(Term::Iri(self.iri()?)),
            Some('_') => {
                let rest = self.rest();
                if !rest.starts_with(BLANK_NODE_PREFIX) {
                    return Err(self.invalid(start, "expected \"_:\""));
                }
                let label_len = rest[2..]
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(rest.len() - 2);
                if label_len == 0 {
                    return Err(self.invalid(start, "empty blank node label"));
                }
                let label = &rest[2..2 + label_len];
                self.pos += 2 + label_len;
                Ok(Term::Blank(label.to_string()))
            }
            Some('"') => self.literal(),
            Some(_) => Err(self.invalid(start, "unexpected character")),
        }
    }

    fn iri(&mut self) -> Result<String, StatementError> {
        let start = self.pos;
        let rest = self.rest();
        match rest[1..].find('>') {
            Some(end) => {
                self.pos += end + 2;
                Ok(rest[1..1 + end].to_string())
            }
            None => Err(self.invalid(start, "unterminated IRI")),
        }
    }

    fn literal(&mut self) -> Result<Term, StatementError> {
        let start = self.pos;
        let rest = self.rest();
        let mut escaped = false;
        let mut close = None;
        for (i, c) in rest.char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                close = Some(i);
                break;
            }
        }
        let close = close.ok_or_else(|| self.invalid(start, "unterminated literal"))?;
        let lexical = rest[1..close].to_string();
        self.pos += close + 1;

        let annotation = match self.peek() {
            Some('@') => {
                let rest = self.rest();
                let len = rest[1..]
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(rest.len() - 1);
                if len == 0 {
                    return Err(self.invalid(self.pos, "empty language tag"));
                }
                let lang = rest[1..1 + len].to_string();
                self.pos += 1 + len;
                LiteralAnnotation::Language(lang)
            }
            Some('^') => {
                if !self.rest().starts_with("^^<") {
                    return Err(self.invalid(self.pos, "expected \"^^<\""));
                }
                self.pos += 2;
                LiteralAnnotation::Datatype(self.iri()?)
            }
            _ => LiteralAnnotation::None,
        };
        Ok(Term::Literal(Literal {
            escaped: lexical,
            annotation,
        }))
    }

    fn terminator(&mut self) -> Result<(), StatementError> {
        self.skip_ws();
        if self.peek() != Some('.') {
            return Err(self.missing_terminator());
        }
        self.pos += 1;
        let tail = self.rest().trim();
        if tail.is_empty() || tail.starts_with('#') {
            Ok(())
        } else {
            Err(self.invalid(self.pos, "trailing content after terminator"))
        }
    }
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_literal(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => push_code_point(&mut out, &mut chars, 4),
            Some('U') => push_code_point(&mut out, &mut chars, 8),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_point(out: &mut String, chars: &mut std::str::Chars<'_>, digits: usize) {
    let hex: String = chars.by_ref().take(digits).collect();
    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => out.push(char::REPLACEMENT_CHARACTER),
    }
}
