//! I define [`Quad`], an owned RDF quad:
//! a subject, predicate and object,
//! plus an optional graph name
//! (`None` denoting the default graph).

use std::fmt;
use thiserror::Error;

use crate::term::Term;

/// An RDF quad.
///
/// Positions are restricted to the strict RDF model
/// (see [`Quad::new`]);
/// quads are structurally equal by component-wise term equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quad {
    s: Term,
    p: Term,
    o: Term,
    g: Option<Term>,
}

impl Quad {
    /// Build a quad, checking each position:
    /// the subject must be an IRI or a blank node,
    /// the predicate must be an IRI,
    /// and the graph name, when present, must be an IRI or a blank node.
    /// The object may be any term.
    pub fn new(s: Term, p: Term, o: Term, g: Option<Term>) -> Result<Self, MalformedQuad> {
        if !s.is_iri() && !s.is_blank_node() {
            return Err(MalformedQuad(format!(
                "subject {s} must be an IRI or a blank node"
            )));
        }
        if !p.is_iri() {
            return Err(MalformedQuad(format!("predicate {p} must be an IRI")));
        }
        if let Some(g) = &g {
            if !g.is_iri() && !g.is_blank_node() {
                return Err(MalformedQuad(format!(
                    "graph name {g} must be an IRI or a blank node"
                )));
            }
        }
        Ok(Quad { s, p, o, g })
    }

    /// Build a quad without checking the positions.
    pub fn new_unchecked(s: Term, p: Term, o: Term, g: Option<Term>) -> Self {
        Quad { s, p, o, g }
    }

    /// The subject of this quad.
    pub fn s(&self) -> &Term {
        &self.s
    }

    /// The predicate of this quad.
    pub fn p(&self) -> &Term {
        &self.p
    }

    /// The object of this quad.
    pub fn o(&self) -> &Term {
        &self.o
    }

    /// The (optional) graph name of this quad.
    pub fn g(&self) -> Option<&Term> {
        self.g.as_ref()
    }

    /// Iterator over the components of this quad.
    pub fn components(&self) -> impl Iterator<Item = &Term> {
        [Some(&self.s), Some(&self.p), Some(&self.o), self.g.as_ref()]
            .into_iter()
            .flatten()
    }
}

impl fmt::Display for Quad {
    /// The canonical N-Quads line for this quad, without the line terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.s, self.p, self.o)?;
        if let Some(g) = &self.g {
            write!(f, " {g}")?;
        }
        f.write_str(" .")
    }
}

/// This error is raised when a quad position holds an unsupported term kind.
#[derive(Debug, Error)]
#[error("malformed quad: {0}")]
pub struct MalformedQuad(pub String);

#[cfg(test)]
mod test {
    use super::*;
    use crate::term::BnodeId;

    fn iri(value: &str) -> Term {
        Term::iri(value)
    }

    fn bnode(id: &str) -> Term {
        Term::BlankNode(BnodeId::new_unchecked(id))
    }

    #[test]
    fn display_triple() {
        let q = Quad::new(iri("tag:s"), iri("tag:p"), Term::literal("o"), None).unwrap();
        assert_eq!(q.to_string(), r#"<tag:s> <tag:p> "o" ."#);
    }

    #[test]
    fn display_quad() {
        let q = Quad::new(bnode("b"), iri("tag:p"), iri("tag:o"), Some(bnode("g"))).unwrap();
        assert_eq!(q.to_string(), "_:b <tag:p> <tag:o> _:g .");
    }

    #[test]
    fn literal_subject_rejected() {
        assert!(Quad::new(Term::literal("s"), iri("tag:p"), iri("tag:o"), None).is_err());
    }

    #[test]
    fn blank_predicate_rejected() {
        assert!(Quad::new(iri("tag:s"), bnode("p"), iri("tag:o"), None).is_err());
    }

    #[test]
    fn literal_graph_name_rejected() {
        let g = Some(Term::literal("g"));
        assert!(Quad::new(iri("tag:s"), iri("tag:p"), iri("tag:o"), g).is_err());
    }

    #[test]
    fn components_with_and_without_graph() {
        let q = Quad::new(iri("tag:s"), iri("tag:p"), iri("tag:o"), None).unwrap();
        assert_eq!(q.components().count(), 3);
        let q = Quad::new(iri("tag:s"), iri("tag:p"), iri("tag:o"), Some(iri("tag:g"))).unwrap();
        assert_eq!(q.components().count(), 4);
    }
}
