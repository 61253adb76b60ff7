//! I define [`Term`], a concrete owned RDF term
//! restricted to the strict RDF model
//! (IRIs, literals and blank nodes).

use std::fmt;
use std::rc::Rc;

mod bnode_id;
pub use bnode_id::{BnodeId, InvalidBnodeId};

/// The datatype IRI of simple literals.
///
/// [`Term::literal`] normalizes simple literals to this datatype;
/// the canonical N-Quads rendering omits it.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// A single RDF term.
///
/// Terms are compared and hashed by their canonical [N-Quads] lexical form,
/// which is what the [`Display`](fmt::Display) implementation produces.
/// Two blank nodes are equal iff their identifiers are equal.
///
/// The derived [`Ord`] is *not* the N-Quads line order
/// (that order is only defined on rendered lines, see
/// [`Dataset::sorted_nquads`](crate::Dataset::sorted_nquads));
/// it is an arbitrary total order making terms usable as map keys.
///
/// [N-Quads]: https://www.w3.org/TR/n-quads/
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// An RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#section-IRIs)
    Iri(Rc<str>),
    /// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#section-blank-nodes)
    BlankNode(BnodeId),
    /// An RDF [literal](https://www.w3.org/TR/rdf11-concepts/#section-Graph-Literal)
    /// with its datatype IRI
    LiteralDatatype(Rc<str>, Rc<str>),
    /// An RDF [language-tagged string](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tagged-string)
    LiteralLanguage(Rc<str>, Rc<str>),
}

impl Term {
    /// Build an IRI term.
    pub fn iri(iri: impl Into<Rc<str>>) -> Self {
        Term::Iri(iri.into())
    }

    /// Build a simple literal (datatype [`XSD_STRING`]).
    pub fn literal(lexical: impl Into<Rc<str>>) -> Self {
        Term::LiteralDatatype(lexical.into(), XSD_STRING.into())
    }

    /// Build a literal with an explicit datatype.
    pub fn literal_datatype(lexical: impl Into<Rc<str>>, datatype: impl Into<Rc<str>>) -> Self {
        Term::LiteralDatatype(lexical.into(), datatype.into())
    }

    /// Build a language-tagged string.
    pub fn literal_language(lexical: impl Into<Rc<str>>, tag: impl Into<Rc<str>>) -> Self {
        Term::LiteralLanguage(lexical.into(), tag.into())
    }

    /// Build a blank-node term.
    pub fn blank_node(id: BnodeId) -> Self {
        Term::BlankNode(id)
    }

    /// Whether this term is an IRI.
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Whether this term is a blank node.
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// The identifier of this term if it is a blank node.
    pub fn bnode_id(&self) -> Option<&BnodeId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }
}

impl From<BnodeId> for Term {
    fn from(id: BnodeId) -> Self {
        Term::BlankNode(id)
    }
}

impl fmt::Display for Term {
    /// The canonical N-Quads form of this term.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::LiteralDatatype(lexical, datatype) => {
                write_escaped(f, lexical)?;
                if datatype.as_ref() != XSD_STRING {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
            Term::LiteralLanguage(lexical, tag) => {
                write_escaped(f, lexical)?;
                write!(f, "@{tag}")
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, lexical: &str) -> fmt::Result {
    use fmt::Write;
    f.write_char('"')?;
    for c in lexical.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\x08' => f.write_str("\\b")?,
            '\x0c' => f.write_str("\\f")?,
            '\x7f' => f.write_str("\\u007F")?,
            c if c <= '\x1f' => write!(f, "\\u{:04X}", c as u8)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
